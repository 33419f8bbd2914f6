//! Canvas rendering functionality for nodes, wires, and grid.
//!
//! This module handles all drawing operations including the grid background,
//! routed wires with type labels and junction dots, the dashed wire-draft
//! preview, and node bodies with their terminal dots.

use super::state::SketcherApp;
use crate::constants::{
    DRAFT_DASH_LENGTH, GRID_SIZE, JUNCTION_RADIUS, TERMINAL_DOT_RADIUS,
};
use crate::routing::{self, PathSegment, RoutedPath};
use crate::templates;
use crate::types::*;
use eframe::egui;
use eframe::epaint::{CubicBezierShape, StrokeKind};

/// The display color for each wire type.
pub fn wire_color(wire_type: WireType) -> egui::Color32 {
    match wire_type {
        WireType::L1 => egui::Color32::from_rgb(0xea, 0xb3, 0x08),
        WireType::L2 => egui::Color32::from_rgb(0x22, 0xc5, 0x5e),
        WireType::L3 => egui::Color32::from_rgb(0xef, 0x44, 0x44),
        WireType::N => egui::Color32::from_rgb(0x3b, 0x82, 0xf6),
        WireType::PE => egui::Color32::from_rgb(0x84, 0xcc, 0x16),
    }
}

impl SketcherApp {
    /// Renders all schematic elements (grid, wires, and nodes) on the canvas.
    ///
    /// Elements are drawn in layers: grid first (background), then wires,
    /// then the draft preview, then nodes and their terminals (foreground),
    /// ensuring proper visual hierarchy.
    pub fn render_schematic_elements(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        if self.canvas.show_grid {
            self.draw_grid(painter, canvas_rect);
        }

        for connection in &self.schematic.connections {
            self.draw_wire(painter, connection);
        }

        if let Some(draft) = &self.interaction.wire_draft {
            self.draw_draft_preview(painter, draft);
        }

        for node in self.schematic.nodes.values() {
            self.draw_node(painter, node);
        }

        // Terminals last so their hotspots are never obscured by node bodies.
        for node in self.schematic.nodes.values() {
            self.draw_terminals(painter, node);
        }
    }

    /// Draws a zoom-aware grid on the canvas for visual reference.
    ///
    /// Grid lines are drawn every 20 world units. The grid automatically
    /// adjusts for zoom level and only draws when the grid spacing is visible.
    pub fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let grid_color = egui::Color32::from_rgba_unmultiplied(128, 128, 128, 32);
        let stroke = egui::Stroke::new(1.0, grid_color);

        let top_left_world = self.screen_to_world(canvas_rect.min);
        let bottom_right_world = self.screen_to_world(canvas_rect.max);

        let start_x = (top_left_world.x / GRID_SIZE).floor() * GRID_SIZE;
        let end_x = (bottom_right_world.x / GRID_SIZE).ceil() * GRID_SIZE;
        let start_y = (top_left_world.y / GRID_SIZE).floor() * GRID_SIZE;
        let end_y = (bottom_right_world.y / GRID_SIZE).ceil() * GRID_SIZE;

        // Skip drawing when the spacing collapses below visibility.
        let screen_grid_size = GRID_SIZE * self.canvas.zoom_factor;
        if screen_grid_size < 2.0 {
            return;
        }

        let mut x = start_x;
        while x <= end_x {
            let screen_x = self.world_to_screen(egui::pos2(x, 0.0)).x;
            if screen_x >= canvas_rect.min.x && screen_x <= canvas_rect.max.x {
                painter.line_segment(
                    [
                        egui::pos2(screen_x, canvas_rect.min.y),
                        egui::pos2(screen_x, canvas_rect.max.y),
                    ],
                    stroke,
                );
            }
            x += GRID_SIZE;
        }

        let mut y = start_y;
        while y <= end_y {
            let screen_y = self.world_to_screen(egui::pos2(0.0, y)).y;
            if screen_y >= canvas_rect.min.y && screen_y <= canvas_rect.max.y {
                painter.line_segment(
                    [
                        egui::pos2(canvas_rect.min.x, screen_y),
                        egui::pos2(canvas_rect.max.x, screen_y),
                    ],
                    stroke,
                );
            }
            y += GRID_SIZE;
        }
    }

    /// Renders one wire: a dark outline under a colored core, junction dots
    /// at manual waypoints, and the wire-type label chip.
    ///
    /// Dangling connections (either endpoint node missing) are skipped
    /// entirely rather than drawn in a broken state.
    pub fn draw_wire(&self, painter: &egui::Painter, connection: &Connection) {
        let Some(path) = routing::route_connection(&self.schematic, connection) else {
            return;
        };

        let color = wire_color(connection.wire_type);
        let outline = egui::Stroke::new(
            5.0 * self.canvas.zoom_factor,
            egui::Color32::from_rgb(0x1e, 0x29, 0x3b),
        );
        let core = egui::Stroke::new(2.0 * self.canvas.zoom_factor, color);

        self.stroke_path(painter, &path, outline);
        self.stroke_path(painter, &path, core);

        // Junction dots mark user-placed bend points on manual wires.
        for point in &connection.points {
            let pos = self.world_to_screen((*point).into());
            painter.circle_filled(pos, JUNCTION_RADIUS * self.canvas.zoom_factor, color);
        }

        self.draw_wire_label(painter, connection.wire_type, path.label_anchor);
    }

    /// Strokes a routed path in screen space, emitting polylines for runs of
    /// line segments and bezier shapes for curved segments.
    fn stroke_path(&self, painter: &egui::Painter, path: &RoutedPath, stroke: egui::Stroke) {
        let mut run: Vec<egui::Pos2> = vec![self.world_to_screen(path.start)];
        let mut cursor = path.start;

        for segment in &path.segments {
            match segment {
                PathSegment::Line { to } => {
                    run.push(self.world_to_screen(*to));
                    cursor = *to;
                }
                PathSegment::Cubic { c1, c2, to } => {
                    if run.len() > 1 {
                        painter.add(egui::Shape::line(std::mem::take(&mut run), stroke));
                    }
                    painter.add(CubicBezierShape::from_points_stroke(
                        [
                            self.world_to_screen(cursor),
                            self.world_to_screen(*c1),
                            self.world_to_screen(*c2),
                            self.world_to_screen(*to),
                        ],
                        false,
                        egui::Color32::TRANSPARENT,
                        stroke,
                    ));
                    run = vec![self.world_to_screen(*to)];
                    cursor = *to;
                }
            }
        }

        if run.len() > 1 {
            painter.add(egui::Shape::line(run, stroke));
        }
    }

    /// Draws the wire-type chip (for example "L1") centered on the path's
    /// label anchor.
    fn draw_wire_label(&self, painter: &egui::Painter, wire_type: WireType, anchor: egui::Pos2) {
        let font_size = (10.0 * self.canvas.zoom_factor).clamp(6.0, 20.0);
        let font_id = egui::FontId::monospace(font_size);
        let color = wire_color(wire_type);

        let galley = painter.layout_no_wrap(wire_type.as_str().to_string(), font_id, color);
        let center = self.world_to_screen(anchor);
        let padding = egui::vec2(6.0, 3.0) * self.canvas.zoom_factor;
        let rect = egui::Rect::from_center_size(center, galley.size() + padding);

        let bg = if self.dark_mode {
            egui::Color32::from_rgba_unmultiplied(15, 23, 42, 220)
        } else {
            egui::Color32::from_rgba_unmultiplied(248, 250, 252, 220)
        };
        painter.rect_filled(rect, 3.0, bg);
        painter.rect_stroke(rect, 3.0, egui::Stroke::new(1.0, color), StrokeKind::Inside);
        painter.galley(rect.center() - galley.size() / 2.0, galley, color);
    }

    /// Renders the dashed preview of the wire currently being drafted.
    ///
    /// The preview runs from the source terminal through any committed
    /// waypoints to the live pointer position, synthesized in the active
    /// wire style. The exit direction at the pointer end faces back toward
    /// the source since no real terminal exists there yet.
    pub fn draw_draft_preview(&self, painter: &egui::Painter, draft: &super::state::WireDraft) {
        let Some(source) = self.schematic.nodes.get(&draft.source_node) else {
            return;
        };
        let start: egui::Pos2 = source.terminal_position(&draft.source_terminal).into();
        let end = draft.current_pos;

        let path = if !draft.waypoints.is_empty() {
            routing::manual(start, &draft.waypoints, end)
        } else {
            match self.active_wire_style {
                WireStyle::Straight => routing::straight(start, end),
                WireStyle::Curved => routing::curved(start, end),
                WireStyle::Orthogonal => {
                    let terminal = templates::get(&source.template_type)
                        .and_then(|t| t.terminal(&draft.source_terminal));
                    routing::orthogonal(
                        start,
                        routing::exit_direction(terminal),
                        end,
                        routing::pointer_exit_direction(start, end),
                        self.active_wire_type,
                    )
                }
            }
        };

        let color = wire_color(self.active_wire_type);
        let stroke = egui::Stroke::new(2.0 * self.canvas.zoom_factor, color);
        let dash = DRAFT_DASH_LENGTH * self.canvas.zoom_factor;
        let points: Vec<egui::Pos2> = self
            .flatten_path(&path)
            .into_iter()
            .map(|p| self.world_to_screen(p))
            .collect();
        painter.extend(egui::Shape::dashed_line(&points, stroke, dash, dash));

        for point in &draft.waypoints {
            let pos = self.world_to_screen((*point).into());
            painter.circle_filled(pos, JUNCTION_RADIUS * self.canvas.zoom_factor, color);
        }
        painter.circle_filled(
            self.world_to_screen(end),
            TERMINAL_DOT_RADIUS * self.canvas.zoom_factor,
            color,
        );
    }

    /// Flattens a routed path into a world-space polyline, sampling any
    /// curved segments.
    fn flatten_path(&self, path: &RoutedPath) -> Vec<egui::Pos2> {
        let mut points = vec![path.start];
        let mut cursor = path.start;
        for segment in &path.segments {
            match segment {
                PathSegment::Line { to } => {
                    points.push(*to);
                    cursor = *to;
                }
                PathSegment::Cubic { c1, c2, to } => {
                    let bezier = CubicBezierShape::from_points_stroke(
                        [cursor, *c1, *c2, *to],
                        false,
                        egui::Color32::TRANSPARENT,
                        egui::Stroke::NONE,
                    );
                    points.extend(bezier.flatten(Some(2.0)));
                    cursor = *to;
                }
            }
        }
        points
    }

    /// Renders a single component node with appropriate styling and text.
    ///
    /// Nodes are dark rounded rectangles with their template (or custom)
    /// label centered inside. Text annotations get a distinct note styling.
    /// Selected nodes have an accent border, hovered nodes a lighter one.
    pub fn draw_node(&self, painter: &egui::Painter, node: &CircuitNode) {
        let world_rect = self.node_world_rect(node);
        let rect = egui::Rect::from_min_max(
            self.world_to_screen(world_rect.min),
            self.world_to_screen(world_rect.max),
        );

        let is_annotation = node.template_type == "text-annotation";

        let fill = if is_annotation {
            egui::Color32::from_rgba_unmultiplied(0xfe, 0xf0, 0x8a, 40)
        } else if self.dark_mode {
            egui::Color32::from_rgb(0x1e, 0x29, 0x3b)
        } else {
            egui::Color32::from_rgb(0xe2, 0xe8, 0xf0)
        };
        painter.rect_filled(rect, 6.0, fill);

        let (stroke_color, stroke_width) = if Some(node.id) == self.interaction.selected_node {
            (egui::Color32::from_rgb(0x38, 0xbd, 0xf8), 2.0)
        } else if Some(node.id) == self.interaction.hovered_node {
            (egui::Color32::from_gray(160), 1.5)
        } else if is_annotation {
            (egui::Color32::from_rgb(0xca, 0x8a, 0x04), 1.0)
        } else {
            (egui::Color32::from_gray(100), 1.0)
        };
        painter.rect_stroke(
            rect,
            6.0,
            egui::Stroke::new(stroke_width, stroke_color),
            StrokeKind::Outside,
        );

        let label = node.custom_label.clone().unwrap_or_else(|| {
            templates::get(&node.template_type)
                .map(|t| t.name.to_string())
                .unwrap_or_else(|| node.template_type.clone())
        });

        let font_size = (11.0 * self.canvas.zoom_factor).clamp(7.0, 32.0);
        let text_color = if is_annotation {
            egui::Color32::from_rgb(0xfa, 0xcc, 0x15)
        } else if self.dark_mode {
            egui::Color32::from_gray(230)
        } else {
            egui::Color32::from_gray(30)
        };
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            label,
            egui::FontId::proportional(font_size),
            text_color,
        );
    }

    /// Renders a node's terminal dots with hover highlighting and labels.
    ///
    /// Labels sit above terminals on the top half of the node and below them
    /// on the bottom half so they stay clear of the body.
    pub fn draw_terminals(&self, painter: &egui::Painter, node: &CircuitNode) {
        let Some(template) = templates::get(&node.template_type) else {
            return;
        };

        for terminal in &template.terminals {
            let world_pos: egui::Pos2 = node.terminal_position(terminal.id).into();
            let pos = self.world_to_screen(world_pos);

            let is_hovered = self
                .interaction
                .hovered_terminal
                .as_ref()
                .is_some_and(|(n, t)| *n == node.id && t == terminal.id);
            let is_draft_source = self
                .interaction
                .wire_draft
                .as_ref()
                .is_some_and(|d| d.is_source(node.id, terminal.id));

            let radius = if is_hovered {
                TERMINAL_DOT_RADIUS * 1.6 * self.canvas.zoom_factor
            } else {
                TERMINAL_DOT_RADIUS * self.canvas.zoom_factor
            };
            let dot_color = if is_hovered || is_draft_source {
                wire_color(self.active_wire_type)
            } else {
                egui::Color32::from_gray(170)
            };
            painter.circle_filled(pos, radius, dot_color);
            painter.circle_stroke(
                pos,
                radius,
                egui::Stroke::new(1.0, egui::Color32::from_gray(60)),
            );

            // Only bother with terminal labels when they are legible.
            if self.canvas.zoom_factor >= 0.6 {
                let above = terminal.y_offset < 0.5;
                let (align, offset) = if above {
                    (egui::Align2::CENTER_BOTTOM, -6.0 * self.canvas.zoom_factor)
                } else {
                    (egui::Align2::CENTER_TOP, 6.0 * self.canvas.zoom_factor)
                };
                let font_size = (8.0 * self.canvas.zoom_factor).clamp(6.0, 16.0);
                painter.text(
                    egui::pos2(pos.x, pos.y + offset),
                    align,
                    terminal.label,
                    egui::FontId::proportional(font_size),
                    egui::Color32::from_gray(150),
                );
            }
        }
    }
}

//! Canvas interaction and navigation functionality.
//!
//! This module handles canvas panning and zooming, coordinate transformations
//! between screen and world space, terminal/node hit-testing, and the two
//! gesture state machines: node dragging and wire drafting. Their entry
//! guards are mutually exclusive, so at most one is active at a time.

use super::state::{SketcherApp, WireDraft};
use crate::constants::{GRID_SIZE, TERMINAL_HIT_RADIUS};
use crate::templates;
use crate::types::*;
use eframe::egui;

impl SketcherApp {
    /// Converts screen coordinates to world coordinates accounting for zoom and pan.
    pub fn screen_to_world(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        (screen_pos - self.canvas.offset) / self.canvas.zoom_factor
    }

    /// Converts world coordinates to screen coordinates accounting for zoom and pan.
    pub fn world_to_screen(&self, world_pos: egui::Pos2) -> egui::Pos2 {
        world_pos * self.canvas.zoom_factor + self.canvas.offset
    }

    /// Snaps a position to the nearest grid point (20 world units).
    pub fn snap_to_grid(&self, pos: egui::Pos2) -> egui::Pos2 {
        egui::pos2(
            (pos.x / GRID_SIZE).round() * GRID_SIZE,
            (pos.y / GRID_SIZE).round() * GRID_SIZE,
        )
    }

    /// The world-space bounding box of a node, anchored at its top-left corner.
    pub fn node_world_rect(&self, node: &CircuitNode) -> egui::Rect {
        let size = templates::get(&node.template_type)
            .map(|t| egui::vec2(t.width, t.height))
            .unwrap_or_else(|| egui::vec2(100.0, 60.0));
        egui::Rect::from_min_size(egui::pos2(node.position.0, node.position.1), size)
    }

    /// Finds the node whose body contains the given world position, if any.
    pub fn find_node_at_position(&self, pos: egui::Pos2) -> Option<NodeId> {
        for (id, node) in &self.schematic.nodes {
            if self.node_world_rect(node).contains(pos) {
                return Some(*id);
            }
        }
        None
    }

    /// Finds the terminal hotspot under the given world position, if any.
    ///
    /// Hotspots are circles of [`TERMINAL_HIT_RADIUS`] around each resolved
    /// terminal position — deliberately larger than the visual dot for easier
    /// targeting. The closest hit wins when hotspots overlap.
    pub fn find_terminal_at_position(&self, pos: egui::Pos2) -> Option<(NodeId, String)> {
        let mut best: Option<(NodeId, String, f32)> = None;
        for (id, node) in &self.schematic.nodes {
            let Some(template) = templates::get(&node.template_type) else {
                continue;
            };
            for terminal in &template.terminals {
                let term_pos: egui::Pos2 = node.terminal_position(terminal.id).into();
                let dist = term_pos.distance(pos);
                if dist <= TERMINAL_HIT_RADIUS
                    && best.as_ref().map_or(true, |(_, _, d)| dist < *d)
                {
                    best = Some((*id, terminal.id.to_string(), dist));
                }
            }
        }
        best.map(|(id, terminal, _)| (id, terminal))
    }

    /// Handles middle-click or Cmd/Ctrl+left-click canvas panning.
    pub fn handle_canvas_panning(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let should_pan = ui.input(|i| {
            i.pointer.middle_down() || (i.pointer.primary_down() && i.modifiers.command)
        });

        if should_pan {
            if let Some(current_pos) = response.interact_pointer_pos() {
                if !self.interaction.is_panning {
                    self.interaction.is_panning = true;
                    self.interaction.last_pan_pos = Some(current_pos);
                } else if let Some(last_pos) = self.interaction.last_pan_pos {
                    let delta = current_pos - last_pos;
                    self.canvas.offset += delta;
                    self.interaction.last_pan_pos = Some(current_pos);
                }
            }
        } else {
            self.interaction.is_panning = false;
            self.interaction.last_pan_pos = None;
        }
    }

    /// Handles scroll wheel zooming about the cursor.
    ///
    /// Zoom range is clamped between 0.25x and 5.0x; the world point under the
    /// cursor stays fixed on screen.
    pub fn handle_canvas_zoom(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);

        if scroll_delta != 0.0 {
            let mouse_pos = ui
                .input(|i| i.pointer.hover_pos())
                .or_else(|| response.interact_pointer_pos());

            if let Some(mouse_pos) = mouse_pos {
                if !response.rect.contains(mouse_pos) {
                    return;
                }

                let world_pos_before_zoom = self.screen_to_world(mouse_pos);

                let zoom_delta = if scroll_delta > 0.0 { 0.025 } else { -0.025 };
                let old_zoom = self.canvas.zoom_factor;
                self.canvas.zoom_factor = (self.canvas.zoom_factor + zoom_delta).clamp(0.25, 5.0);

                if (self.canvas.zoom_factor - old_zoom).abs() > f32::EPSILON {
                    // Keep the world point under the cursor fixed on screen.
                    let world_pos_after_zoom = self.world_to_screen(world_pos_before_zoom);
                    self.canvas.offset += mouse_pos - world_pos_after_zoom;
                }
            }
        }
    }

    /// Dispatches pointer events to the drag and wire-draft state machines.
    ///
    /// All transitions are synchronous within the frame's event processing;
    /// model mutations apply immediately and atomically per event.
    pub fn handle_pointer_input(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let pointer_screen = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.hover_pos()));

        let Some(screen_pos) = pointer_screen else {
            // Pointer left the window: a drag ends (committing if it moved),
            // a wire draft stays alive. Hover highlights go with it.
            self.interaction.hovered_terminal = None;
            self.interaction.hovered_node = None;
            self.finish_drag();
            return;
        };

        // Leaving the canvas area (for a panel or toolbar) also ends a drag.
        if !response.rect.contains(screen_pos) {
            self.interaction.hovered_terminal = None;
            self.interaction.hovered_node = None;
            self.finish_drag();
            return;
        }

        let world_pos = self.screen_to_world(screen_pos);

        // Hover resolution drives highlighting only, never commit logic.
        self.interaction.hovered_terminal = self.find_terminal_at_position(world_pos);
        self.interaction.hovered_node = if self.interaction.hovered_terminal.is_none() {
            self.find_node_at_position(world_pos)
        } else {
            None
        };

        if self.interaction.is_panning {
            return;
        }

        // The draft's live preview endpoint follows every pointer move.
        if let Some(draft) = &mut self.interaction.wire_draft {
            draft.current_pos = world_pos;
        }

        let (primary_pressed, primary_down, primary_released, secondary_pressed, shift_held) = ui
            .input(|i| {
                (
                    i.pointer.primary_pressed(),
                    i.pointer.primary_down(),
                    i.pointer.primary_released(),
                    i.pointer.secondary_pressed(),
                    i.modifiers.shift,
                )
            });

        // Secondary button discards an active draft unconditionally.
        if secondary_pressed && self.interaction.wire_draft.is_some() {
            self.cancel_wire_draft();
            return;
        }

        if primary_pressed {
            self.on_primary_pressed(world_pos);
        }

        if primary_down && self.interaction.dragging_node.is_some() {
            self.update_dragged_node(world_pos, shift_held);
        }

        if primary_released {
            self.on_primary_released(world_pos);
        }
    }

    fn on_primary_pressed(&mut self, world_pos: egui::Pos2) {
        // Clicking the canvas while editing a label saves it.
        if self.interaction.editing_label.is_some() {
            self.save_label_edit();
            return;
        }

        // An armed palette placement consumes the click, but never while a
        // wire draft is routing: waypoint and finish clicks take precedence.
        if self.interaction.wire_draft.is_none() {
            if let Some(template_type) = self.interaction.pending_placement.take() {
                self.place_node(&template_type, world_pos);
                return;
            }
        }

        let terminal_hit = self.find_terminal_at_position(world_pos);

        if self.interaction.wire_draft.is_some() {
            // While drafting: a press on any terminal attempts to finish the
            // connection (pressing the source again abandons it); a press on
            // empty canvas commits a manual waypoint; a press on a node body
            // does neither.
            if let Some((node_id, terminal_id)) = terminal_hit {
                self.finish_connection(node_id, &terminal_id);
            } else if self.find_node_at_position(world_pos).is_none() {
                if let Some(draft) = &mut self.interaction.wire_draft {
                    draft.waypoints.push(world_pos.into());
                }
            }
            return;
        }

        // Idle: a terminal press starts a wire draft, a node-body press
        // starts a drag, empty canvas clears the selection.
        if let Some((node_id, terminal_id)) = terminal_hit {
            self.begin_wire_draft(node_id, terminal_id, world_pos);
        } else if let Some(node_id) = self.find_node_at_position(world_pos) {
            self.start_node_drag(node_id, world_pos);
        } else {
            self.interaction.selected_node = None;
        }
    }

    fn on_primary_released(&mut self, world_pos: egui::Pos2) {
        self.finish_drag();

        if self.interaction.wire_draft.is_some() {
            if let Some((node_id, terminal_id)) = self.find_terminal_at_position(world_pos) {
                let released_on_source = self
                    .interaction
                    .wire_draft
                    .as_ref()
                    .is_some_and(|d| d.is_source(node_id, &terminal_id));
                if released_on_source {
                    // Releasing on the source terminal enters manual-routing
                    // mode: the draft stays active so the user can click bend
                    // points and a target with separate gestures.
                } else {
                    self.finish_connection(node_id, &terminal_id);
                }
            }
            // Releasing over empty canvas keeps the draft alive too; this is
            // what lets click-move-click routing span multiple gestures.
        }
    }

    // --- Drag state machine ---

    /// Transitions the drag machine from Idle to Dragging.
    ///
    /// Refused while a wire draft or label edit is active. Captures the
    /// pointer anchor and the node's original position without touching the
    /// model yet.
    pub fn start_node_drag(&mut self, node_id: NodeId, world_pos: egui::Pos2) {
        if self.interaction.wire_draft.is_some() || self.interaction.editing_label.is_some() {
            return;
        }
        let Some(node) = self.schematic.nodes.get(&node_id) else {
            return;
        };
        self.interaction.dragging_node = Some(node_id);
        self.interaction.drag_anchor = Some(world_pos);
        self.interaction.drag_original_position = Some(node.position);
        self.interaction.drag_has_moved = false;
        self.interaction.selected_node = Some(node_id);
    }

    /// Applies `original + (pointer - anchor)` to the dragged node.
    ///
    /// The model is mutated directly so dragging is visually live; the moved
    /// flag latches on the first non-zero delta. Shift snaps to the grid.
    pub fn update_dragged_node(&mut self, world_pos: egui::Pos2, snap: bool) {
        let (Some(node_id), Some(anchor), Some(original)) = (
            self.interaction.dragging_node,
            self.interaction.drag_anchor,
            self.interaction.drag_original_position,
        ) else {
            return;
        };

        let delta = world_pos - anchor;
        if delta != egui::Vec2::ZERO {
            self.interaction.drag_has_moved = true;
        }

        let mut new_pos = egui::pos2(original.0 + delta.x, original.1 + delta.y);
        if snap {
            new_pos = self.snap_to_grid(new_pos);
        }
        self.update_node_position(node_id, new_pos.x, new_pos.y);
    }

    /// Transitions the drag machine back to Idle.
    ///
    /// Commits exactly one history checkpoint when the node actually moved; a
    /// motionless press-and-release is a no-op.
    pub fn finish_drag(&mut self) {
        let was_dragging = self.interaction.dragging_node.take().is_some();
        let moved = self.interaction.drag_has_moved;
        self.interaction.drag_anchor = None;
        self.interaction.drag_original_position = None;
        self.interaction.drag_has_moved = false;
        if was_dragging && moved {
            self.node_move_end();
        }
    }

    // --- Wire draft state machine ---

    /// Transitions the wire-draft machine from Idle to Drafting.
    ///
    /// Refused while dragging or editing a label.
    pub fn begin_wire_draft(
        &mut self,
        node_id: NodeId,
        terminal_id: String,
        world_pos: egui::Pos2,
    ) {
        if self.interaction.dragging_node.is_some() || self.interaction.editing_label.is_some() {
            return;
        }
        self.interaction.wire_draft = Some(WireDraft {
            source_node: node_id,
            source_terminal: terminal_id,
            current_pos: world_pos,
            waypoints: Vec::new(),
        });
    }

    /// Commits the active draft against the given target terminal.
    ///
    /// A target identical to the draft's source terminal silently discards
    /// the draft instead — no self-loop is ever created.
    pub fn finish_connection(&mut self, target_node: NodeId, target_terminal: &str) {
        let Some(draft) = self.interaction.wire_draft.take() else {
            return;
        };
        if draft.is_source(target_node, target_terminal) {
            log::debug!("wire draft discarded on its own source terminal");
            return;
        }

        let mut connection = Connection::new(
            draft.source_node,
            draft.source_terminal,
            target_node,
            target_terminal,
            self.active_wire_type,
            self.active_wire_style,
        );
        connection.points = draft.waypoints;
        self.add_connection(connection);
    }

    /// Discards the active draft and all of its waypoints unconditionally.
    pub fn cancel_wire_draft(&mut self) {
        if self.interaction.wire_draft.take().is_some() {
            log::debug!("wire draft cancelled");
        }
    }

    // --- Commit-point mutators ---

    /// Moves a node without checkpointing (used for live drag frames).
    pub fn update_node_position(&mut self, node_id: NodeId, x: f32, y: f32) {
        if let Some(node) = self.schematic.nodes.get_mut(&node_id) {
            node.position = (x, y);
        }
    }

    /// Checkpoints the document after a completed drag.
    pub fn node_move_end(&mut self) {
        log::debug!("node move committed");
        self.history.commit(&self.schematic);
    }

    /// Sets a node's display label and checkpoints; empty text clears it.
    pub fn update_node_label(&mut self, node_id: NodeId, label: &str) {
        if let Some(node) = self.schematic.nodes.get_mut(&node_id) {
            node.custom_label = if label.trim().is_empty() {
                None
            } else {
                Some(label.to_string())
            };
            self.history.commit(&self.schematic);
        }
    }

    /// Adds a committed connection to the document and checkpoints.
    pub fn add_connection(&mut self, connection: Connection) {
        match self.schematic.add_connection(connection) {
            Ok(()) => {
                log::debug!("connection committed");
                self.history.commit(&self.schematic);
            }
            Err(err) => log::warn!("rejected connection: {err}"),
        }
    }

    /// Deletes a node, cascading to its connections, and checkpoints.
    pub fn delete_node(&mut self, node_id: NodeId) {
        if self.schematic.remove_node(&node_id) {
            if self.interaction.selected_node == Some(node_id) {
                self.interaction.selected_node = None;
            }
            if self.interaction.hovered_node == Some(node_id) {
                self.interaction.hovered_node = None;
            }
            log::debug!("node deleted");
            self.history.commit(&self.schematic);
        }
    }

    /// Places a new node of the given template centered on a world position.
    pub fn place_node(&mut self, template_type: &str, world_pos: egui::Pos2) {
        let size = templates::get(template_type)
            .map(|t| egui::vec2(t.width, t.height))
            .unwrap_or_else(|| egui::vec2(100.0, 60.0));
        let node = CircuitNode::new(
            template_type,
            (world_pos.x - size.x / 2.0, world_pos.y - size.y / 2.0),
        );
        let id = self.schematic.add_node(node);
        self.interaction.selected_node = Some(id);
        self.history.commit(&self.schematic);
    }

    /// Empties the document and checkpoints, discarding any active draft.
    pub fn clear_all(&mut self) {
        self.cancel_wire_draft();
        self.interaction.selected_node = None;
        self.interaction.hovered_node = None;
        self.interaction.hovered_terminal = None;
        if !self.schematic.nodes.is_empty() || !self.schematic.connections.is_empty() {
            self.schematic = Schematic::new();
            self.history.commit(&self.schematic);
        }
    }

    // --- Label editing session ---

    /// Starts editing a node's display label.
    pub fn start_label_edit(&mut self, node_id: NodeId) {
        if self.interaction.wire_draft.is_some() || self.interaction.dragging_node.is_some() {
            return;
        }
        let Some(node) = self.schematic.nodes.get(&node_id) else {
            return;
        };
        let current = node.custom_label.clone().unwrap_or_else(|| {
            templates::get(&node.template_type)
                .map(|t| t.name.to_string())
                .unwrap_or_default()
        });
        self.interaction.editing_label = Some(node_id);
        self.interaction.temp_label = current;
        self.interaction.label_focus_requested = false;
    }

    /// Saves the in-progress label edit and ends the session.
    pub fn save_label_edit(&mut self) {
        if let Some(node_id) = self.interaction.editing_label.take() {
            let text = std::mem::take(&mut self.interaction.temp_label);
            self.update_node_label(node_id, &text);
        }
    }

    /// Abandons the in-progress label edit without touching the model.
    pub fn cancel_label_edit(&mut self) {
        self.interaction.editing_label = None;
        self.interaction.temp_label.clear();
    }
}

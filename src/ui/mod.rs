//! User interface components and rendering logic for the schematic editor.
//!
//! This module contains all the UI-related code including the main application
//! struct, canvas rendering, the component palette, and user interaction
//! handling.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main SketcherApp
//! - `canvas` - Canvas navigation, hit-testing, and the gesture state machines
//! - `rendering` - Drawing nodes, wires, terminals, and the grid
//! - `undo` - Snapshot-based undo/redo history

mod canvas;
mod rendering;
mod state;
mod undo;


pub use rendering::wire_color;
pub use state::{SketcherApp, WireDraft};
pub use undo::UndoHistory;

use crate::templates::{self, ComponentCategory};
use crate::types::*;
use eframe::egui;

impl eframe::App for SketcherApp {
    /// Persist UI preferences between restarts. The schematic itself is not
    /// part of the saved state.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => {
                storage.set_string("app_state", json);
            }
            Err(err) => {
                log::error!("failed to serialize app state: {err}");
            }
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// This method handles the overall UI layout, including the toolbar,
    /// component palette, and main canvas area.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_undo_redo_keys(ctx);
        self.handle_delete_key(ctx);
        self.handle_escape_key(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::SidePanel::left("component_palette")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                self.draw_palette(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });

        self.draw_label_editor(ctx);
    }
}

impl SketcherApp {
    /// Handles undo/redo keyboard shortcuts (Cmd/Ctrl+Z, Shift+Z, Y).
    fn handle_undo_redo_keys(&mut self, ctx: &egui::Context) {
        // Skip while a text edit widget wants the keyboard.
        if ctx.wants_keyboard_input() {
            return;
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Z) && i.modifiers.command && !i.modifiers.shift) {
            self.perform_undo();
        } else if ctx.input(|i| {
            (i.key_pressed(egui::Key::Z) && i.modifiers.command && i.modifiers.shift)
                || (i.key_pressed(egui::Key::Y) && i.modifiers.command)
        }) {
            self.perform_redo();
        }
    }

    /// Handles the Delete key for removing the selected node.
    fn handle_delete_key(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
            if let Some(node_id) = self.interaction.selected_node {
                self.delete_node(node_id);
            }
        }
    }

    /// Handles Escape: cancels a wire draft, label edit, armed placement, or
    /// selection, in that order of priority.
    fn handle_escape_key(&mut self, ctx: &egui::Context) {
        if !ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            return;
        }
        if self.interaction.wire_draft.is_some() {
            self.cancel_wire_draft();
        } else if self.interaction.editing_label.is_some() {
            self.cancel_label_edit();
        } else if self.interaction.pending_placement.is_some() {
            self.interaction.pending_placement = None;
        } else {
            self.interaction.selected_node = None;
        }
    }

    /// Restores the previous document snapshot, if any.
    ///
    /// Transient interaction state is reset so nothing references entities
    /// that no longer exist in the restored document.
    pub fn perform_undo(&mut self) {
        if let Some(snapshot) = self.history.undo() {
            self.schematic = snapshot;
            self.reset_transient_state();
        }
    }

    /// Restores the next document snapshot, if any.
    pub fn perform_redo(&mut self) {
        if let Some(snapshot) = self.history.redo() {
            self.schematic = snapshot;
            self.reset_transient_state();
        }
    }

    fn reset_transient_state(&mut self) {
        self.interaction.wire_draft = None;
        self.interaction.dragging_node = None;
        self.interaction.drag_anchor = None;
        self.interaction.drag_original_position = None;
        self.interaction.drag_has_moved = false;
        self.interaction.selected_node = None;
        self.interaction.hovered_node = None;
        self.interaction.hovered_terminal = None;
        self.interaction.editing_label = None;
        self.interaction.temp_label.clear();
    }

    /// Renders the toolbar with wire type/style selectors, undo/redo, and
    /// view options.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Wire:");
            for wire_type in WireType::ALL {
                let selected = self.active_wire_type == wire_type;
                let color = wire_color(wire_type);
                let text = egui::RichText::new(wire_type.as_str()).color(color).strong();
                if ui.selectable_label(selected, text).clicked() {
                    self.active_wire_type = wire_type;
                }
            }

            ui.separator();

            egui::ComboBox::from_id_source("wire_style_combo")
                .selected_text(match self.active_wire_style {
                    WireStyle::Orthogonal => "Orthogonal",
                    WireStyle::Curved => "Curved",
                    WireStyle::Straight => "Straight",
                })
                .show_ui(ui, |ui| {
                    ui.selectable_value(
                        &mut self.active_wire_style,
                        WireStyle::Orthogonal,
                        "Orthogonal",
                    );
                    ui.selectable_value(&mut self.active_wire_style, WireStyle::Curved, "Curved");
                    ui.selectable_value(
                        &mut self.active_wire_style,
                        WireStyle::Straight,
                        "Straight",
                    );
                });

            ui.separator();

            ui.add_enabled_ui(self.history.can_undo(), |ui| {
                if ui.button("⟲ Undo").clicked() {
                    self.perform_undo();
                }
            });
            ui.add_enabled_ui(self.history.can_redo(), |ui| {
                if ui.button("⟳ Redo").clicked() {
                    self.perform_redo();
                }
            });

            ui.separator();

            if ui.button("Clear").clicked() {
                self.clear_all();
            }

            ui.separator();

            ui.checkbox(&mut self.canvas.show_grid, "Show Grid");
            ui.separator();
            ui.checkbox(&mut self.dark_mode, "Dark Mode");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("Zoom: {:.0}%", self.canvas.zoom_factor * 100.0));
                if let Some(template_type) = &self.interaction.pending_placement {
                    let name = templates::get(template_type)
                        .map(|t| t.name)
                        .unwrap_or(template_type.as_str());
                    ui.label(format!("Placing: {name} (click canvas, Esc cancels)"));
                }
            });
        });
    }

    /// Renders the component palette grouped by category.
    ///
    /// Clicking an entry arms a placement; the next canvas click places the
    /// component there.
    fn draw_palette(&mut self, ui: &mut egui::Ui) {
        ui.heading("Components");
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for category in ComponentCategory::ALL {
                    egui::CollapsingHeader::new(category.label())
                        .default_open(true)
                        .show(ui, |ui| {
                            for template in
                                templates::all().iter().filter(|t| t.category == category)
                            {
                                let armed = self
                                    .interaction
                                    .pending_placement
                                    .as_deref()
                                    == Some(template.type_name);
                                if ui.selectable_label(armed, template.name).clicked() {
                                    self.interaction.pending_placement = if armed {
                                        None
                                    } else {
                                        Some(template.type_name.to_string())
                                    };
                                }
                            }
                        });
                }
            });
    }

    /// Renders the main canvas area and routes input to the interaction
    /// handlers.
    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let available_size = ui.available_size();
        let (response, painter) =
            ui.allocate_painter(available_size, egui::Sense::click_and_drag());
        let canvas_rect = response.rect;

        // Put the world origin a little inside the canvas on the first frame.
        if !self.applied_initial_center {
            self.canvas.offset = canvas_rect.min.to_vec2() + egui::vec2(60.0, 60.0);
            self.applied_initial_center = true;
        }

        self.handle_canvas_panning(ui, &response);
        self.handle_canvas_zoom(ui, &response);
        self.handle_pointer_input(ui, &response);

        // Double-click on a node opens its label editor.
        if response.double_clicked() {
            if let Some(screen_pos) = response.interact_pointer_pos() {
                let world_pos = self.screen_to_world(screen_pos);
                if let Some(node_id) = self.find_node_at_position(world_pos) {
                    self.finish_drag();
                    self.start_label_edit(node_id);
                }
            }
        }

        self.render_schematic_elements(&painter, canvas_rect);
    }

    /// Renders the floating label editor over the node being edited.
    fn draw_label_editor(&mut self, ctx: &egui::Context) {
        let Some(node_id) = self.interaction.editing_label else {
            return;
        };
        let Some(node) = self.schematic.nodes.get(&node_id) else {
            self.cancel_label_edit();
            return;
        };

        let anchor = self.world_to_screen(self.node_world_rect(node).center_bottom());

        egui::Area::new(egui::Id::new("label_editor"))
            .fixed_pos(anchor + egui::vec2(-80.0, 8.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.interaction.temp_label)
                            .desired_width(160.0),
                    );

                    if !self.interaction.label_focus_requested {
                        response.request_focus();
                        self.interaction.label_focus_requested = true;
                    }

                    let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
                    let escape = ui.input(|i| i.key_pressed(egui::Key::Escape));

                    if escape {
                        self.cancel_label_edit();
                    } else if enter || response.lost_focus() {
                        self.save_label_edit();
                    }
                });
            });
    }
}

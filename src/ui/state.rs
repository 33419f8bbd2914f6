//! Application state management structures.
//!
//! Separates the persisted document model (`Schematic`, owned by history
//! checkpointing) from the transient interaction context (drag state, wire
//! draft, hover, label editing) that exists only while a gesture is in
//! flight and is never serialized.

use super::undo::UndoHistory;
use crate::types::*;
use eframe::egui;
use serde::{Deserialize, Serialize};

/// State related to canvas navigation and display.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasState {
    /// Current canvas pan offset for navigation (in screen space)
    #[serde(skip)]
    pub offset: egui::Vec2,
    /// Current zoom level (1.0 = normal, 2.0 = 2x zoom, 0.5 = 50% zoom)
    pub zoom_factor: f32,
    /// Whether the grid should be displayed on the canvas
    pub show_grid: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            offset: egui::Vec2::ZERO,
            zoom_factor: 1.0,
            show_grid: true,
        }
    }
}

/// An in-progress, uncommitted wire being interactively routed.
///
/// Lives from a pointer-down on a terminal hotspot until the draft is either
/// committed on another terminal or explicitly cancelled. There is no timeout:
/// slow, deliberate manual routing keeps the draft alive indefinitely.
#[derive(Debug, Clone)]
pub struct WireDraft {
    /// Node the draft started from
    pub source_node: NodeId,
    /// Terminal id on the source node's template
    pub source_terminal: String,
    /// Live preview endpoint following the pointer (world space)
    pub current_pos: egui::Pos2,
    /// Committed manual bend points, in click order
    pub waypoints: Vec<Point>,
}

impl WireDraft {
    /// True if the given terminal is the draft's own source terminal.
    pub fn is_source(&self, node_id: NodeId, terminal_id: &str) -> bool {
        self.source_node == node_id && self.source_terminal == terminal_id
    }
}

/// Transient state of the user's current interaction with the canvas.
///
/// At most one gesture-state machine is active at a time: dragging is refused
/// while a wire draft exists and vice versa, and label editing blocks both.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionState {
    /// Node currently being repositioned, if any
    #[serde(skip)]
    pub dragging_node: Option<NodeId>,
    /// Pointer position (world space) captured at drag start
    #[serde(skip)]
    pub drag_anchor: Option<egui::Pos2>,
    /// Node position captured at drag start, applied as `original + delta`
    #[serde(skip)]
    pub drag_original_position: Option<(f32, f32)>,
    /// Set once any non-zero delta occurred; gates the history checkpoint
    #[serde(skip)]
    pub drag_has_moved: bool,
    /// The wire draft state machine, when active
    #[serde(skip)]
    pub wire_draft: Option<WireDraft>,
    /// Terminal hotspot currently under the pointer (visual highlight only)
    #[serde(skip)]
    pub hovered_terminal: Option<(NodeId, String)>,
    /// Node body currently under the pointer
    #[serde(skip)]
    pub hovered_node: Option<NodeId>,
    /// Currently selected node, if any
    #[serde(skip)]
    pub selected_node: Option<NodeId>,
    /// Node whose display label is being edited
    #[serde(skip)]
    pub editing_label: Option<NodeId>,
    /// Temporary storage for the label text while editing
    #[serde(skip)]
    pub temp_label: String,
    /// Flag to request focus once for the label editor
    #[serde(skip)]
    pub label_focus_requested: bool,
    /// Whether the user is currently panning the canvas
    #[serde(skip)]
    pub is_panning: bool,
    /// Last mouse position during panning operation
    #[serde(skip)]
    pub last_pan_pos: Option<egui::Pos2>,
    /// Template type armed from the palette; the next canvas click places it
    #[serde(skip)]
    pub pending_placement: Option<String>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            dragging_node: None,
            drag_anchor: None,
            drag_original_position: None,
            drag_has_moved: false,
            wire_draft: None,
            hovered_terminal: None,
            hovered_node: None,
            selected_node: None,
            editing_label: None,
            temp_label: String::new(),
            label_focus_requested: false,
            is_panning: false,
            last_pan_pos: None,
            pending_placement: None,
        }
    }
}

/// The main application structure containing UI state and the schematic.
///
/// This struct implements the `eframe::App` trait and handles all user
/// interface rendering and interaction logic.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct SketcherApp {
    /// The schematic document being edited
    #[serde(skip)]
    pub schematic: Schematic,
    /// Conductor class applied to newly drawn wires
    pub active_wire_type: WireType,
    /// Routing style applied to newly drawn wires
    pub active_wire_style: WireStyle,
    /// Canvas navigation and display state
    pub canvas: CanvasState,
    /// Transient interaction state
    #[serde(skip)]
    pub interaction: InteractionState,
    /// Undo/redo snapshot history
    #[serde(skip)]
    pub history: UndoHistory,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Whether the initial canvas centering has been applied this session
    #[serde(skip)]
    pub applied_initial_center: bool,
}

impl Default for SketcherApp {
    fn default() -> Self {
        Self {
            schematic: Schematic::new(),
            active_wire_type: WireType::L1,
            active_wire_style: WireStyle::Orthogonal,
            canvas: CanvasState::default(),
            interaction: InteractionState::default(),
            history: UndoHistory::new(),
            dark_mode: true,
            applied_initial_center: false,
        }
    }
}

impl SketcherApp {
    /// Serializes the persisted UI preferences to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Restores UI preferences from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

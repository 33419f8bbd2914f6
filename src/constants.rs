//! Shared application-wide constants.
//! Centralizes tweakable values used across routing, rendering and interactions.

// Wire routing
/// Base clearance (in world units) a wire keeps from its terminal before the first bend.
pub const BASE_MARGIN: f32 = 30.0;
/// Extra clearance added per conductor lane (L1..PE) so parallel wires stay separated.
pub const LANE_SPACING: f32 = 16.0;
/// Fraction along a straight run where the first lane's label sits.
pub const LABEL_STAGGER_BASE: f32 = 0.4;
/// Additional fraction added per conductor lane so stacked labels do not overlap.
pub const LABEL_STAGGER_STEP: f32 = 0.05;
/// Minimum control-point offset (in world units) for curved wires.
pub const CURVE_MIN_CONTROL: f32 = 50.0;

// Terminals
/// Radius of the invisible circular hotspot used for terminal hit-testing (world units).
pub const TERMINAL_HIT_RADIUS: f32 = 12.0;
/// Radius of the visible terminal dot (world units).
pub const TERMINAL_DOT_RADIUS: f32 = 4.0;

// Grid/drawing
/// Grid cell size in world units.
pub const GRID_SIZE: f32 = 20.0;
/// Radius of the junction dots drawn where a wire meets a terminal (world units).
pub const JUNCTION_RADIUS: f32 = 4.0;
/// Dash length used for the in-progress wire preview (screen pixels).
pub const DRAFT_DASH_LENGTH: f32 = 5.0;

// Undo/redo
/// Maximum number of history snapshots to retain.
pub const MAX_UNDO_HISTORY: usize = 100;

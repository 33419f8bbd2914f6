//! # Circuit Sketcher
//!
//! A visual single-line schematic editor for low-voltage electrical circuits.
//! Components from a built-in catalog are placed on a pannable, zoomable
//! canvas and wired together terminal-to-terminal:
//! - **Placement**: click a palette entry, then click the canvas
//! - **Wiring**: press a terminal, optionally click bend points, finish on
//!   another terminal
//! - **Routing**: wires are synthesized as orthogonal, curved, or straight
//!   paths, with per-phase lane offsets so parallel runs stay legible
//!
//! ## Features
//! - Interactive component placement, selection, and repositioning
//! - Click-through wire drafting with manual waypoints
//! - Five wire types (L1, L2, L3, N, PE) with distinct colors and lanes
//! - Snapshot-based undo/redo
//! - Canvas panning and zooming

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod constants;
pub mod routing;
pub mod templates;
mod types;
mod ui;

// Re-export public types and functions
pub use types::*;
pub use ui::{SketcherApp, UndoHistory};

/// Runs the schematic editor with default settings.
///
/// This function initializes the egui application window and starts the main
/// event loop. Stored UI preferences are restored when available.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an
/// `eframe::Error` if initialization fails.
///
/// # Example
///
/// ```no_run
/// use circuit_sketcher::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Circuit Sketcher",
        options,
        Box::new(|cc| {
            let app = cc
                .storage
                .and_then(|storage| storage.get_string("app_state"))
                .and_then(|json| match SketcherApp::from_json(&json) {
                    Ok(app) => Some(app),
                    Err(err) => {
                        log::warn!("ignoring stored app state: {err}");
                        None
                    }
                })
                .unwrap_or_default();
            Ok(Box::new(app))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schematic_default() {
        let schematic = Schematic::default();
        assert!(schematic.nodes.is_empty());
        assert!(schematic.connections.is_empty());
    }

    #[test]
    fn test_app_default_wire_settings() {
        let app = SketcherApp::default();
        assert_eq!(app.active_wire_type, WireType::L1);
        assert_eq!(app.active_wire_style, WireStyle::Orthogonal);
    }
}

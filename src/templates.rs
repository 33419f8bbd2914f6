//! Component template catalog.
//!
//! Static metadata describing each placeable symbol: bounding-box size,
//! terminal layout (fractional offsets within the box), and palette category.
//! The interaction engine treats this catalog as an external collaborator and
//! only reads it through [`get`].

use std::sync::LazyLock;

/// Palette grouping for component templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentCategory {
    /// Supply feeders and incoming lines
    Source,
    /// Breakers and protective devices
    Protection,
    /// Contactors, relays and switches
    Control,
    /// Meters and instrument transformers
    Measurement,
    /// Busbars and terminal blocks
    Accessory,
    /// Motors, sockets, lamps and other loads
    Load,
    /// Non-electrical annotations
    Auxiliary,
}

impl ComponentCategory {
    /// All categories in palette order.
    pub const ALL: [ComponentCategory; 7] = [
        ComponentCategory::Source,
        ComponentCategory::Protection,
        ComponentCategory::Control,
        ComponentCategory::Measurement,
        ComponentCategory::Accessory,
        ComponentCategory::Load,
        ComponentCategory::Auxiliary,
    ];

    /// Heading shown for this category in the palette panel.
    pub fn label(self) -> &'static str {
        match self {
            ComponentCategory::Source => "Sources",
            ComponentCategory::Protection => "Protection",
            ComponentCategory::Control => "Control",
            ComponentCategory::Measurement => "Measurement",
            ComponentCategory::Accessory => "Busbars & Terminals",
            ComponentCategory::Load => "Loads",
            ComponentCategory::Auxiliary => "Annotation",
        }
    }
}

/// Electrical role of a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    /// Current flows into the component here
    Input,
    /// Current flows out of the component here
    Output,
    /// Either direction (busbars, switch poles)
    Bidirectional,
}

/// A named connection point on a component template.
#[derive(Debug, Clone)]
pub struct TerminalDef {
    /// Stable identifier referenced by connections
    pub id: &'static str,
    /// Short label drawn beside the terminal dot
    pub label: &'static str,
    /// Horizontal position as a fraction of the template width (0..=1)
    pub x_offset: f32,
    /// Vertical position as a fraction of the template height (0..=1)
    pub y_offset: f32,
    /// Electrical role of this terminal
    pub kind: TerminalKind,
}

/// Static metadata for one placeable component symbol.
#[derive(Debug, Clone)]
pub struct ComponentTemplate {
    /// Stable key referenced by `CircuitNode::template_type`
    pub type_name: &'static str,
    /// Human-readable display name
    pub name: &'static str,
    /// Palette grouping
    pub category: ComponentCategory,
    /// Default bounding-box width in world units
    pub width: f32,
    /// Default bounding-box height in world units
    pub height: f32,
    /// Terminal layout
    pub terminals: Vec<TerminalDef>,
}

impl ComponentTemplate {
    /// Looks up a terminal definition by id.
    pub fn terminal(&self, id: &str) -> Option<&TerminalDef> {
        self.terminals.iter().find(|t| t.id == id)
    }
}

fn term(id: &'static str, label: &'static str, x: f32, y: f32, kind: TerminalKind) -> TerminalDef {
    TerminalDef {
        id,
        label,
        x_offset: x,
        y_offset: y,
        kind,
    }
}

static CATALOG: LazyLock<Vec<ComponentTemplate>> = LazyLock::new(|| {
    use ComponentCategory::*;
    use TerminalKind::{Bidirectional as Bi, Input as In, Output as Out};

    vec![
        ComponentTemplate {
            type_name: "3ph-source",
            name: "3-Phase Supply (TN-S)",
            category: Source,
            width: 120.0,
            height: 80.0,
            terminals: vec![
                term("L1", "L1", 0.1, 1.0, Out),
                term("L2", "L2", 0.3, 1.0, Out),
                term("L3", "L3", 0.5, 1.0, Out),
                term("N", "N", 0.7, 1.0, Out),
                term("PE", "PE", 0.9, 1.0, Out),
            ],
        },
        ComponentTemplate {
            type_name: "1ph-source",
            name: "1-Phase Supply",
            category: Source,
            width: 60.0,
            height: 60.0,
            terminals: vec![
                term("L", "L", 0.3, 1.0, Out),
                term("N", "N", 0.7, 1.0, Out),
                term("PE", "PE", 0.5, 0.5, Out),
            ],
        },
        ComponentTemplate {
            type_name: "mccb-3p",
            name: "MCCB 3P",
            category: Protection,
            width: 100.0,
            height: 130.0,
            terminals: vec![
                term("1", "1", 0.2, 0.0, In),
                term("3", "3", 0.5, 0.0, In),
                term("5", "5", 0.8, 0.0, In),
                term("2", "2", 0.2, 1.0, Out),
                term("4", "4", 0.5, 1.0, Out),
                term("6", "6", 0.8, 1.0, Out),
            ],
        },
        ComponentTemplate {
            type_name: "mcb-3p",
            name: "MCB 3P",
            category: Protection,
            width: 80.0,
            height: 100.0,
            terminals: vec![
                term("1", "1", 0.2, 0.0, In),
                term("3", "3", 0.5, 0.0, In),
                term("5", "5", 0.8, 0.0, In),
                term("2", "2", 0.2, 1.0, Out),
                term("4", "4", 0.5, 1.0, Out),
                term("6", "6", 0.8, 1.0, Out),
            ],
        },
        ComponentTemplate {
            type_name: "mcb-2p",
            name: "MCB 2P",
            category: Protection,
            width: 55.0,
            height: 100.0,
            terminals: vec![
                term("1", "1", 0.3, 0.0, In),
                term("3", "3", 0.7, 0.0, In),
                term("2", "2", 0.3, 1.0, Out),
                term("4", "4", 0.7, 1.0, Out),
            ],
        },
        ComponentTemplate {
            type_name: "mcb-1p",
            name: "MCB 1P",
            category: Protection,
            width: 30.0,
            height: 100.0,
            terminals: vec![
                term("1", "1", 0.5, 0.0, In),
                term("2", "2", 0.5, 1.0, Out),
            ],
        },
        ComponentTemplate {
            type_name: "rcbo-2p",
            name: "RCBO 2P",
            category: Protection,
            width: 70.0,
            height: 100.0,
            terminals: vec![
                term("inL", "1", 0.3, 0.0, In),
                term("inN", "N", 0.7, 0.0, In),
                term("outL", "2", 0.3, 1.0, Out),
                term("outN", "N", 0.7, 1.0, Out),
            ],
        },
        ComponentTemplate {
            type_name: "spd-4p",
            name: "Surge Protector 4P",
            category: Protection,
            width: 110.0,
            height: 90.0,
            terminals: vec![
                term("L1", "L1", 0.15, 0.0, In),
                term("L2", "L2", 0.38, 0.0, In),
                term("L3", "L3", 0.62, 0.0, In),
                term("N", "N", 0.85, 0.0, In),
                term("PE", "PE", 0.5, 1.0, Out),
            ],
        },
        ComponentTemplate {
            type_name: "contactor-ac",
            name: "AC Contactor",
            category: Control,
            width: 90.0,
            height: 110.0,
            terminals: vec![
                term("1", "1/L1", 0.2, 0.0, In),
                term("3", "3/L2", 0.5, 0.0, In),
                term("5", "5/L3", 0.8, 0.0, In),
                term("2", "2/T1", 0.2, 1.0, Out),
                term("4", "4/T2", 0.5, 1.0, Out),
                term("6", "6/T3", 0.8, 1.0, Out),
                term("A1", "A1", 0.05, 0.2, In),
                term("A2", "A2", 0.95, 0.2, In),
            ],
        },
        ComponentTemplate {
            type_name: "switch-start",
            name: "Start Button (NO)",
            category: Control,
            width: 50.0,
            height: 50.0,
            terminals: vec![
                term("3", "3", 0.0, 0.5, Bi),
                term("4", "4", 1.0, 0.5, Bi),
            ],
        },
        ComponentTemplate {
            type_name: "switch-stop",
            name: "Stop Button (NC)",
            category: Control,
            width: 50.0,
            height: 50.0,
            terminals: vec![
                term("1", "1", 0.0, 0.5, Bi),
                term("2", "2", 1.0, 0.5, Bi),
            ],
        },
        ComponentTemplate {
            type_name: "meter-multi",
            name: "Multifunction Meter",
            category: Measurement,
            width: 90.0,
            height: 90.0,
            terminals: vec![
                term("V1", "U1", 0.1, 1.0, In),
                term("V2", "U2", 0.3, 1.0, In),
                term("V3", "U3", 0.5, 1.0, In),
                term("N", "N", 0.7, 1.0, In),
                term("I1", "I*", 0.9, 0.3, In),
                term("I2", "I*", 0.9, 0.7, In),
            ],
        },
        ComponentTemplate {
            type_name: "ct",
            name: "Current Transformer",
            category: Measurement,
            width: 50.0,
            height: 60.0,
            terminals: vec![
                term("P1", "P1", 0.5, 0.0, In),
                term("P2", "P2", 0.5, 1.0, Out),
                term("S1", "S1", 0.0, 0.5, Out),
                term("S2", "S2", 1.0, 0.5, Out),
            ],
        },
        ComponentTemplate {
            type_name: "terminal-ground",
            name: "PE Busbar",
            category: Accessory,
            width: 150.0,
            height: 30.0,
            terminals: vec![
                term("PE1", "PE", 0.1, 0.5, Bi),
                term("PE2", "PE", 0.3, 0.5, Bi),
                term("PE3", "PE", 0.5, 0.5, Bi),
                term("PE4", "PE", 0.7, 0.5, Bi),
                term("PE5", "PE", 0.9, 0.5, Bi),
            ],
        },
        ComponentTemplate {
            type_name: "terminal-neutral",
            name: "N Busbar",
            category: Accessory,
            width: 150.0,
            height: 30.0,
            terminals: vec![
                term("N1", "N", 0.1, 0.5, Bi),
                term("N2", "N", 0.3, 0.5, Bi),
                term("N3", "N", 0.5, 0.5, Bi),
                term("N4", "N", 0.7, 0.5, Bi),
                term("N5", "N", 0.9, 0.5, Bi),
            ],
        },
        ComponentTemplate {
            type_name: "motor-3ph",
            name: "3-Phase Motor",
            category: Load,
            width: 100.0,
            height: 100.0,
            terminals: vec![
                term("U", "U", 0.2, 0.0, In),
                term("V", "V", 0.5, 0.0, In),
                term("W", "W", 0.8, 0.0, In),
                term("PE", "PE", 1.0, 1.0, In),
            ],
        },
        ComponentTemplate {
            type_name: "socket-5hole",
            name: "5-Hole Socket",
            category: Load,
            width: 60.0,
            height: 60.0,
            terminals: vec![
                term("PE", "PE", 0.5, 0.0, In),
                term("L", "L", 0.2, 1.0, In),
                term("N", "N", 0.8, 1.0, In),
            ],
        },
        ComponentTemplate {
            type_name: "lamp-indicator",
            name: "Indicator Lamp",
            category: Load,
            width: 50.0,
            height: 50.0,
            terminals: vec![
                term("X1", "X1", 0.5, 1.0, In),
                term("X2", "X2", 0.5, 0.0, In),
            ],
        },
        ComponentTemplate {
            type_name: "text-annotation",
            name: "Text Note",
            category: Auxiliary,
            width: 120.0,
            height: 40.0,
            terminals: vec![],
        },
    ]
});

/// Looks up a template by its type key.
pub fn get(template_type: &str) -> Option<&'static ComponentTemplate> {
    CATALOG.iter().find(|t| t.type_name == template_type)
}

/// Returns the full catalog in palette order.
pub fn all() -> &'static [ComponentTemplate] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_template() {
        let t = get("mcb-3p").expect("mcb-3p should exist");
        assert_eq!(t.width, 80.0);
        assert_eq!(t.terminals.len(), 6);
        assert!(t.terminal("1").is_some());
        assert!(t.terminal("7").is_none());
    }

    #[test]
    fn test_lookup_unknown_template() {
        assert!(get("fluffy-capacitor").is_none());
    }

    #[test]
    fn test_all_offsets_are_fractions() {
        for template in all() {
            for terminal in &template.terminals {
                assert!(
                    (0.0..=1.0).contains(&terminal.x_offset),
                    "{}/{}",
                    template.type_name,
                    terminal.id
                );
                assert!(
                    (0.0..=1.0).contains(&terminal.y_offset),
                    "{}/{}",
                    template.type_name,
                    terminal.id
                );
            }
        }
    }

    #[test]
    fn test_every_category_is_populated_except_none() {
        for category in ComponentCategory::ALL {
            assert!(
                all().iter().any(|t| t.category == category),
                "empty category {:?}",
                category
            );
        }
    }
}

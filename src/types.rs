//! Core data types for the schematic editor.
//!
//! This module defines the document model shared by the interaction engine,
//! the wire routing algorithms, and the renderer: nodes placed on the canvas,
//! typed connections between terminals, and the containing schematic.

use crate::templates;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for schematic nodes.
pub type NodeId = Uuid;

/// Unique identifier for wire connections.
pub type ConnectionId = Uuid;

/// A point in canvas (world) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate in world units
    pub x: f32,
    /// Vertical coordinate in world units
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<egui::Pos2> for Point {
    fn from(pos: egui::Pos2) -> Self {
        Self { x: pos.x, y: pos.y }
    }
}

impl From<Point> for egui::Pos2 {
    fn from(p: Point) -> Self {
        egui::pos2(p.x, p.y)
    }
}

/// Logical conductor class a wire belongs to.
///
/// Drives both the wire's color coding and its routing lane so that the five
/// conductors of one feeder stay visually separated when routed in parallel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireType {
    /// Phase A conductor
    L1,
    /// Phase B conductor
    L2,
    /// Phase C conductor
    L3,
    /// Neutral conductor
    N,
    /// Protective-earth conductor
    PE,
}

impl WireType {
    /// All conductor classes in lane order.
    pub const ALL: [WireType; 5] = [
        WireType::L1,
        WireType::L2,
        WireType::L3,
        WireType::N,
        WireType::PE,
    ];

    /// Zero-based lane index used for routing margins and label staggering.
    pub fn lane_index(self) -> usize {
        match self {
            WireType::L1 => 0,
            WireType::L2 => 1,
            WireType::L3 => 2,
            WireType::N => 3,
            WireType::PE => 4,
        }
    }

    /// Short display label drawn on the wire label chip.
    pub fn as_str(self) -> &'static str {
        match self {
            WireType::L1 => "L1",
            WireType::L2 => "L2",
            WireType::L3 => "L3",
            WireType::N => "N",
            WireType::PE => "PE",
        }
    }
}

/// Geometric routing algorithm used to draw a connection.
///
/// Overridden whenever a connection carries manual waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireStyle {
    /// Axis-aligned right-angle routing honoring terminal exit directions
    Orthogonal,
    /// A single smooth cubic curve between the endpoints
    Curved,
    /// A direct line between the endpoints
    Straight,
}

impl Default for WireStyle {
    fn default() -> Self {
        WireStyle::Orthogonal
    }
}

/// A component symbol placed on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitNode {
    /// Unique identifier for this node
    pub id: NodeId,
    /// Template type key resolved through the component catalog
    pub template_type: String,
    /// Top-left anchor of the node's bounding box in world coordinates
    pub position: (f32, f32),
    /// User-supplied label overriding the template's display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
}

impl CircuitNode {
    /// Creates a new node of the given template type at the given position.
    pub fn new(template_type: impl Into<String>, position: (f32, f32)) -> Self {
        Self {
            id: Uuid::new_v4(),
            template_type: template_type.into(),
            position,
            custom_label: None,
        }
    }

    /// Resolves the world position of one of this node's terminals.
    ///
    /// Terminal offsets are fractions of the template's bounding box. If the
    /// terminal id (or the whole template) is unknown the node's own anchor is
    /// returned instead, so a dangling reference degrades to a visible but
    /// harmless point rather than a crash.
    pub fn terminal_position(&self, terminal_id: &str) -> Point {
        let fallback = Point::new(self.position.0, self.position.1);
        let Some(template) = templates::get(&self.template_type) else {
            return fallback;
        };
        match template.terminal(terminal_id) {
            Some(term) => Point::new(
                self.position.0 + term.x_offset * template.width,
                self.position.1 + term.y_offset * template.height,
            ),
            None => fallback,
        }
    }
}

/// A routed wire between two terminals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique identifier for this connection
    pub id: ConnectionId,
    /// Node the wire starts from
    pub source_node: NodeId,
    /// Terminal id on the source node's template
    pub source_terminal: String,
    /// Node the wire ends at
    pub target_node: NodeId,
    /// Terminal id on the target node's template
    pub target_terminal: String,
    /// Conductor class (color and routing lane)
    pub wire_type: WireType,
    /// Routing algorithm; ignored when `points` is non-empty
    pub wire_style: WireStyle,
    /// Manual routing waypoints, in order from source to target
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,
}

impl Connection {
    /// Creates a new connection between two terminals with no waypoints.
    pub fn new(
        source_node: NodeId,
        source_terminal: impl Into<String>,
        target_node: NodeId,
        target_terminal: impl Into<String>,
        wire_type: WireType,
        wire_style: WireStyle,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_node,
            source_terminal: source_terminal.into(),
            target_node,
            target_terminal: target_terminal.into(),
            wire_type,
            wire_style,
            points: Vec::new(),
        }
    }

    /// Returns true if either endpoint references the given node.
    pub fn touches(&self, node_id: &NodeId) -> bool {
        self.source_node == *node_id || self.target_node == *node_id
    }
}

/// Errors raised when mutating the document model.
#[derive(Debug, Error)]
pub enum SchematicError {
    /// A connection endpoint references a node missing from the schematic
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    /// A connection endpoint references a terminal the node's template lacks
    #[error("node {node} has no terminal '{terminal}'")]
    UnknownTerminal {
        /// The node whose template was checked
        node: NodeId,
        /// The missing terminal id
        terminal: String,
    },
}

/// The document model: every placed node and every committed wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schematic {
    /// Map of all nodes in the schematic, indexed by their ID
    pub nodes: HashMap<NodeId, CircuitNode>,
    /// List of all wire connections between terminals
    pub connections: Vec<Connection>,
}

impl Schematic {
    /// Creates a new empty schematic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the schematic to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a schematic from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Adds a node to the schematic, returning its id.
    pub fn add_node(&mut self, node: CircuitNode) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Adds a connection after validating both endpoints.
    ///
    /// Each endpoint must reference an existing node, and the named terminal
    /// must exist on that node's template. Terminal validation is skipped for
    /// unknown template types, which are a caller error by contract.
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), SchematicError> {
        self.validate_endpoint(&connection.source_node, &connection.source_terminal)?;
        self.validate_endpoint(&connection.target_node, &connection.target_terminal)?;
        self.connections.push(connection);
        Ok(())
    }

    fn validate_endpoint(&self, node_id: &NodeId, terminal: &str) -> Result<(), SchematicError> {
        let node = self
            .nodes
            .get(node_id)
            .ok_or(SchematicError::UnknownNode(*node_id))?;
        if let Some(template) = templates::get(&node.template_type) {
            if template.terminal(terminal).is_none() {
                return Err(SchematicError::UnknownTerminal {
                    node: *node_id,
                    terminal: terminal.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Removes a node and cascades to every connection referencing it.
    ///
    /// Returns `true` if the node was found and removed.
    pub fn remove_node(&mut self, node_id: &NodeId) -> bool {
        let removed = self.nodes.remove(node_id).is_some();
        if removed {
            self.connections.retain(|conn| !conn.touches(node_id));
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = CircuitNode::new("mcb-1p", (100.0, 200.0));
        assert_eq!(node.template_type, "mcb-1p");
        assert_eq!(node.position, (100.0, 200.0));
        assert!(node.custom_label.is_none());
        assert!(!node.id.is_nil());
    }

    #[test]
    fn test_terminal_position_from_fractional_offsets() {
        // mcb-1p is 30x100 with terminals at (0.5, 0) and (0.5, 1)
        let node = CircuitNode::new("mcb-1p", (50.0, 50.0));
        let top = node.terminal_position("1");
        assert_eq!((top.x, top.y), (65.0, 50.0));
        let bottom = node.terminal_position("2");
        assert_eq!((bottom.x, bottom.y), (65.0, 150.0));
    }

    #[test]
    fn test_terminal_position_falls_back_to_anchor() {
        let node = CircuitNode::new("mcb-1p", (10.0, 20.0));
        let pos = node.terminal_position("no-such-terminal");
        assert_eq!((pos.x, pos.y), (10.0, 20.0));

        let bogus = CircuitNode::new("not-a-template", (3.0, 4.0));
        let pos = bogus.terminal_position("1");
        assert_eq!((pos.x, pos.y), (3.0, 4.0));
    }

    #[test]
    fn test_terminal_positions_stay_within_bounding_box() {
        let node = CircuitNode::new("3ph-source", (0.0, 0.0));
        let template = templates::get("3ph-source").unwrap();
        for term in &template.terminals {
            let pos = node.terminal_position(&term.id);
            assert!(pos.x >= 0.0 && pos.x <= template.width, "{}", term.id);
            assert!(pos.y >= 0.0 && pos.y <= template.height, "{}", term.id);
        }
    }

    #[test]
    fn test_add_connection_success() {
        let mut schematic = Schematic::new();
        let source = schematic.add_node(CircuitNode::new("3ph-source", (0.0, 0.0)));
        let breaker = schematic.add_node(CircuitNode::new("mcb-3p", (0.0, 200.0)));

        let conn = Connection::new(
            source,
            "L1",
            breaker,
            "1",
            WireType::L1,
            WireStyle::Orthogonal,
        );
        assert!(schematic.add_connection(conn).is_ok());
        assert_eq!(schematic.connections.len(), 1);
    }

    #[test]
    fn test_add_connection_rejects_missing_node() {
        let mut schematic = Schematic::new();
        let source = schematic.add_node(CircuitNode::new("3ph-source", (0.0, 0.0)));
        let ghost = Uuid::new_v4();

        let conn = Connection::new(
            source,
            "L1",
            ghost,
            "1",
            WireType::L1,
            WireStyle::Orthogonal,
        );
        let err = schematic.add_connection(conn).unwrap_err();
        assert!(matches!(err, SchematicError::UnknownNode(id) if id == ghost));
    }

    #[test]
    fn test_add_connection_rejects_missing_terminal() {
        let mut schematic = Schematic::new();
        let source = schematic.add_node(CircuitNode::new("3ph-source", (0.0, 0.0)));
        let breaker = schematic.add_node(CircuitNode::new("mcb-1p", (0.0, 200.0)));

        let conn = Connection::new(
            source,
            "L1",
            breaker,
            "99",
            WireType::L1,
            WireStyle::Orthogonal,
        );
        let err = schematic.add_connection(conn).unwrap_err();
        assert!(matches!(err, SchematicError::UnknownTerminal { .. }));
    }

    #[test]
    fn test_remove_node_cascades_connections() {
        let mut schematic = Schematic::new();
        let a = schematic.add_node(CircuitNode::new("3ph-source", (0.0, 0.0)));
        let b = schematic.add_node(CircuitNode::new("mcb-3p", (0.0, 200.0)));
        let c = schematic.add_node(CircuitNode::new("motor-3ph", (0.0, 400.0)));

        schematic
            .add_connection(Connection::new(
                a,
                "L1",
                b,
                "1",
                WireType::L1,
                WireStyle::Orthogonal,
            ))
            .unwrap();
        schematic
            .add_connection(Connection::new(
                b,
                "2",
                c,
                "U",
                WireType::L1,
                WireStyle::Orthogonal,
            ))
            .unwrap();
        schematic
            .add_connection(Connection::new(
                a,
                "L2",
                c,
                "V",
                WireType::L2,
                WireStyle::Curved,
            ))
            .unwrap();
        assert_eq!(schematic.connections.len(), 3);

        assert!(schematic.remove_node(&b));

        // Only the a->c wire remains; nothing referencing other nodes was touched.
        assert_eq!(schematic.connections.len(), 1);
        assert_eq!(schematic.connections[0].source_node, a);
        assert_eq!(schematic.connections[0].target_node, c);
    }

    #[test]
    fn test_remove_nonexistent_node() {
        let mut schematic = Schematic::new();
        assert!(!schematic.remove_node(&Uuid::new_v4()));
    }

    #[test]
    fn test_wire_type_lane_order() {
        let indices: Vec<usize> = WireType::ALL.iter().map(|w| w.lane_index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_schematic_roundtrip_serialization() {
        let mut original = Schematic::new();
        let a = original.add_node(CircuitNode::new("1ph-source", (10.0, 20.0)));
        let b = original.add_node(CircuitNode::new("lamp-indicator", (10.0, 200.0)));
        let mut conn = Connection::new(a, "L", b, "X1", WireType::L1, WireStyle::Straight);
        conn.points = vec![Point::new(40.0, 120.0)];
        original.add_connection(conn).unwrap();

        let json = original.to_json().unwrap();
        let restored = Schematic::from_json(&json).unwrap();

        assert_eq!(restored.nodes.len(), 2);
        assert_eq!(restored.connections.len(), 1);
        assert_eq!(restored.connections[0].source_node, a);
        assert_eq!(restored.connections[0].points.len(), 1);
        assert_eq!(restored.nodes[&a].position, (10.0, 20.0));
    }
}

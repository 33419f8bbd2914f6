//! Wire path synthesis.
//!
//! Four independent routing algorithms (orthogonal, curved, straight, manual
//! polyline), each a pure function from endpoint geometry to a drawable path
//! plus a label anchor. The renderer recomputes these every frame from the
//! committed model and the live draft, so none of them may hold hidden state.

use crate::constants::{
    BASE_MARGIN, CURVE_MIN_CONTROL, LABEL_STAGGER_BASE, LABEL_STAGGER_STEP, LANE_SPACING,
};
use crate::templates::{self, TerminalDef};
use crate::types::{Connection, Point, Schematic, WireStyle, WireType};
use egui::Pos2;

/// Which edge of a symbol's bounding box a wire should leave through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDirection {
    /// Leave upward through the top edge
    North,
    /// Leave downward through the bottom edge
    South,
    /// Leave rightward through the right edge
    East,
    /// Leave leftward through the left edge
    West,
}

impl ExitDirection {
    /// True for North/South exits.
    pub fn is_vertical(self) -> bool {
        matches!(self, ExitDirection::North | ExitDirection::South)
    }
}

/// One drawable piece of a routed wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Straight segment to the given point
    Line {
        /// Segment endpoint
        to: Pos2,
    },
    /// Cubic bezier segment to the given point
    Cubic {
        /// First control point
        c1: Pos2,
        /// Second control point
        c2: Pos2,
        /// Segment endpoint
        to: Pos2,
    },
}

impl PathSegment {
    /// The endpoint this segment arrives at.
    pub fn endpoint(&self) -> Pos2 {
        match self {
            PathSegment::Line { to } | PathSegment::Cubic { to, .. } => *to,
        }
    }
}

/// A synthesized wire path and the point where its label should sit.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    /// First point of the path
    pub start: Pos2,
    /// Segments from `start` to the far endpoint, in order
    pub segments: Vec<PathSegment>,
    /// World position for the wire-type label chip
    pub label_anchor: Pos2,
}

impl RoutedPath {
    /// All path vertices from start to end (bezier control points excluded).
    pub fn vertices(&self) -> Vec<Pos2> {
        let mut pts = Vec::with_capacity(self.segments.len() + 1);
        pts.push(self.start);
        pts.extend(self.segments.iter().map(PathSegment::endpoint));
        pts
    }

    fn polyline(points: Vec<Pos2>, label_anchor: Pos2) -> Self {
        let start = points[0];
        let segments = points[1..]
            .iter()
            .map(|&to| PathSegment::Line { to })
            .collect();
        Self {
            start,
            segments,
            label_anchor,
        }
    }
}

/// Extra routing clearance for a conductor class.
///
/// Each wire type gets its own lane so that the five conductors of one feeder
/// run in parallel channels instead of on top of each other.
pub fn lane_offset(wire_type: WireType) -> f32 {
    wire_type.lane_index() as f32 * LANE_SPACING
}

/// Staggered position along a straight run for this conductor's label.
fn stagger(start: f32, end: f32, wire_type: WireType) -> f32 {
    let fraction = LABEL_STAGGER_BASE + wire_type.lane_index() as f32 * LABEL_STAGGER_STEP;
    start + (end - start) * fraction
}

/// Derives a terminal's preferred exit direction from its fractional offsets.
///
/// Terminals sitting within 10% of an edge exit through that edge; interior
/// terminals pick North or South by comparing how close the vertical offset is
/// to each, defaulting South.
pub fn exit_direction(terminal: Option<&TerminalDef>) -> ExitDirection {
    let Some(t) = terminal else {
        return ExitDirection::South;
    };
    if t.x_offset <= 0.1 {
        return ExitDirection::West;
    }
    if t.x_offset >= 0.9 {
        return ExitDirection::East;
    }
    if t.y_offset <= 0.1 {
        return ExitDirection::North;
    }
    if t.y_offset >= 0.9 {
        return ExitDirection::South;
    }
    if t.y_offset > t.x_offset && t.y_offset > 1.0 - t.x_offset {
        return ExitDirection::South;
    }
    if t.y_offset < t.x_offset && t.y_offset < 1.0 - t.x_offset {
        return ExitDirection::North;
    }
    ExitDirection::South
}

/// Guesses the exit direction for a free endpoint from the dominant delta axis.
///
/// Used for the draft preview, where the pointer is not yet on a terminal: the
/// free end faces back toward the source.
pub fn pointer_exit_direction(from: Pos2, pointer: Pos2) -> ExitDirection {
    let dx = pointer.x - from.x;
    let dy = pointer.y - from.y;
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            ExitDirection::West
        } else {
            ExitDirection::East
        }
    } else if dy > 0.0 {
        ExitDirection::North
    } else {
        ExitDirection::South
    }
}

fn extend(p: Pos2, dir: ExitDirection, margin: f32) -> Pos2 {
    match dir {
        ExitDirection::North => Pos2::new(p.x, p.y - margin),
        ExitDirection::South => Pos2::new(p.x, p.y + margin),
        ExitDirection::West => Pos2::new(p.x - margin, p.y),
        ExitDirection::East => Pos2::new(p.x + margin, p.y),
    }
}

/// Direct line between the endpoints; label at the midpoint.
pub fn straight(a: Pos2, b: Pos2) -> RoutedPath {
    let mid = Pos2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    RoutedPath::polyline(vec![a, b], mid)
}

/// Single cubic curve between the endpoints.
///
/// Control points hang off each endpoint along the vertical axis by
/// `max(distance * 0.5, CURVE_MIN_CONTROL)`, which yields a smooth S-curve for
/// any relative orientation. The label sits at the endpoint midpoint, not the
/// parametric curve midpoint.
pub fn curved(a: Pos2, b: Pos2) -> RoutedPath {
    let dist = a.distance(b);
    let control_offset = (dist * 0.5).max(CURVE_MIN_CONTROL);
    let c1 = Pos2::new(a.x, a.y + control_offset);
    let c2 = Pos2::new(b.x, b.y - control_offset);
    RoutedPath {
        start: a,
        segments: vec![PathSegment::Cubic { c1, c2, to: b }],
        label_anchor: Pos2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0),
    }
}

/// Polyline through manual waypoints; label on the longest segment.
///
/// Joins source, each waypoint in order, and target with straight segments.
/// The label anchor is the midpoint of the longest individual segment, first
/// encountered winning ties.
pub fn manual(a: Pos2, waypoints: &[Point], b: Pos2) -> RoutedPath {
    let mut points = Vec::with_capacity(waypoints.len() + 2);
    points.push(a);
    points.extend(waypoints.iter().map(|&p| Pos2::from(p)));
    points.push(b);

    let mut max_len = 0.0;
    let mut label = a;
    for pair in points.windows(2) {
        let len = pair[0].distance(pair[1]);
        if len > max_len {
            max_len = len;
            label = Pos2::new((pair[0].x + pair[1].x) / 2.0, (pair[0].y + pair[1].y) / 2.0);
        }
    }

    RoutedPath::polyline(points, label)
}

/// Axis-aligned right-angle routing honoring both terminals' exit directions.
///
/// Each endpoint is first pushed outward from its symbol by
/// `BASE_MARGIN + lane_offset(wire_type)`, then the two extended points are
/// joined with one or two bends depending on whether the exits are both
/// vertical, both horizontal, or mixed. When both exits face the same vertical
/// direction the bend line sits at the extreme rather than the midpoint so the
/// wire never retraces through the component.
pub fn orthogonal(
    a: Pos2,
    dir_a: ExitDirection,
    b: Pos2,
    dir_b: ExitDirection,
    wire_type: WireType,
) -> RoutedPath {
    let margin = BASE_MARGIN + lane_offset(wire_type);
    let e1 = extend(a, dir_a, margin);
    let e2 = extend(b, dir_b, margin);

    let mut points = vec![a, e1];
    let label_anchor;

    match (dir_a.is_vertical(), dir_b.is_vertical()) {
        (true, true) => {
            let mid_y = match (dir_a, dir_b) {
                (ExitDirection::North, ExitDirection::North) => e1.y.min(e2.y),
                (ExitDirection::South, ExitDirection::South) => e1.y.max(e2.y),
                _ => (e1.y + e2.y) / 2.0,
            };
            points.push(Pos2::new(e1.x, mid_y));
            points.push(Pos2::new(e2.x, mid_y));
            label_anchor = Pos2::new(stagger(e1.x, e2.x, wire_type), mid_y);
        }
        (false, false) => {
            let mid_x = (e1.x + e2.x) / 2.0;
            points.push(Pos2::new(mid_x, e1.y));
            points.push(Pos2::new(mid_x, e2.y));
            label_anchor = Pos2::new(mid_x, stagger(e1.y, e2.y, wire_type));
        }
        (true, false) => {
            points.push(Pos2::new(e1.x, e2.y));
            label_anchor = if (e2.y - e1.y).abs() > (e2.x - e1.x).abs() {
                Pos2::new(e1.x, stagger(e1.y, e2.y, wire_type))
            } else {
                Pos2::new(stagger(e1.x, e2.x, wire_type), e2.y)
            };
        }
        (false, true) => {
            points.push(Pos2::new(e2.x, e1.y));
            label_anchor = if (e2.x - e1.x).abs() > (e2.y - e1.y).abs() {
                Pos2::new(stagger(e1.x, e2.x, wire_type), e1.y)
            } else {
                Pos2::new(e2.x, stagger(e1.y, e2.y, wire_type))
            };
        }
    }

    points.push(e2);
    points.push(b);
    RoutedPath::polyline(points, label_anchor)
}

/// Synthesizes the path for a committed connection.
///
/// Manual waypoints override the stored style. Returns `None` when either
/// endpoint node no longer exists (a dangling reference left behind by a
/// caller that failed to cascade a delete); such wires are skipped silently.
pub fn route_connection(schematic: &Schematic, conn: &Connection) -> Option<RoutedPath> {
    let source = schematic.nodes.get(&conn.source_node)?;
    let target = schematic.nodes.get(&conn.target_node)?;
    let p1 = Pos2::from(source.terminal_position(&conn.source_terminal));
    let p2 = Pos2::from(target.terminal_position(&conn.target_terminal));

    if !conn.points.is_empty() {
        return Some(manual(p1, &conn.points, p2));
    }

    Some(match conn.wire_style {
        WireStyle::Curved => curved(p1, p2),
        WireStyle::Straight => straight(p1, p2),
        WireStyle::Orthogonal => {
            let dir1 = exit_direction(
                templates::get(&source.template_type)
                    .and_then(|t| t.terminal(&conn.source_terminal)),
            );
            let dir2 = exit_direction(
                templates::get(&target.template_type)
                    .and_then(|t| t.terminal(&conn.target_terminal)),
            );
            orthogonal(p1, dir1, p2, dir2, conn.wire_type)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CircuitNode;

    fn pos(x: f32, y: f32) -> Pos2 {
        Pos2::new(x, y)
    }

    #[test]
    fn test_straight_label_at_midpoint() {
        let path = straight(pos(0.0, 0.0), pos(100.0, 40.0));
        assert_eq!(path.vertices(), vec![pos(0.0, 0.0), pos(100.0, 40.0)]);
        assert_eq!(path.label_anchor, pos(50.0, 20.0));
    }

    #[test]
    fn test_curved_control_points_use_minimum_offset() {
        // Endpoints 20 apart: distance * 0.5 = 10 < 50, so the floor applies.
        let path = curved(pos(0.0, 0.0), pos(20.0, 0.0));
        match path.segments[0] {
            PathSegment::Cubic { c1, c2, to } => {
                assert_eq!(c1, pos(0.0, 50.0));
                assert_eq!(c2, pos(20.0, -50.0));
                assert_eq!(to, pos(20.0, 0.0));
            }
            _ => panic!("expected cubic segment"),
        }
        assert_eq!(path.label_anchor, pos(10.0, 0.0));
    }

    #[test]
    fn test_curved_is_deterministic() {
        let a = curved(pos(3.5, -2.0), pos(180.0, 77.0));
        let b = curved(pos(3.5, -2.0), pos(180.0, 77.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_manual_label_on_longest_segment() {
        // Segments: 10 units, 100 units, 10 units. Label belongs to the middle one.
        let waypoints = [Point::new(10.0, 0.0), Point::new(110.0, 0.0)];
        let path = manual(pos(0.0, 0.0), &waypoints, pos(110.0, 10.0));
        assert_eq!(path.label_anchor, pos(60.0, 0.0));
        assert_eq!(path.vertices().len(), 4);
    }

    #[test]
    fn test_manual_tie_prefers_first_segment() {
        let waypoints = [Point::new(50.0, 0.0)];
        let path = manual(pos(0.0, 0.0), &waypoints, pos(100.0, 0.0));
        assert_eq!(path.label_anchor, pos(25.0, 0.0));
    }

    #[test]
    fn test_exit_direction_edges_and_interior() {
        let t = |x, y| TerminalDef {
            id: "t",
            label: "t",
            x_offset: x,
            y_offset: y,
            kind: crate::templates::TerminalKind::Bidirectional,
        };
        assert_eq!(exit_direction(Some(&t(0.05, 0.5))), ExitDirection::West);
        assert_eq!(exit_direction(Some(&t(0.95, 0.5))), ExitDirection::East);
        assert_eq!(exit_direction(Some(&t(0.5, 0.0))), ExitDirection::North);
        assert_eq!(exit_direction(Some(&t(0.5, 1.0))), ExitDirection::South);
        // Interior terminal closer to the bottom edge exits South
        assert_eq!(exit_direction(Some(&t(0.5, 0.8))), ExitDirection::South);
        // Interior terminal closer to the top edge exits North
        assert_eq!(exit_direction(Some(&t(0.5, 0.2))), ExitDirection::North);
        assert_eq!(exit_direction(None), ExitDirection::South);
    }

    #[test]
    fn test_orthogonal_worked_example_horizontal_exits() {
        // Terminal A at (150,100) exiting East, terminal B at (300,150) exiting
        // West, wire L2 (lane index 1): both ends extend by 30 + 16 = 46.
        let path = orthogonal(
            pos(150.0, 100.0),
            ExitDirection::East,
            pos(300.0, 150.0),
            ExitDirection::West,
            WireType::L2,
        );
        let vertices = path.vertices();
        assert_eq!(vertices[1], pos(196.0, 100.0));
        assert_eq!(vertices[vertices.len() - 2], pos(254.0, 150.0));
        // Both exits horizontal: one vertical jog at the midpoint of the
        // extended span, x = (196 + 254) / 2.
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[2], pos(225.0, 100.0));
        assert_eq!(vertices[3], pos(225.0, 150.0));
    }

    #[test]
    fn test_orthogonal_mixed_exits_single_corner() {
        // Vertical exit on one end, horizontal on the other: one corner at
        // (e1.x, e2.y).
        let path = orthogonal(
            pos(0.0, 0.0),
            ExitDirection::South,
            pos(200.0, 150.0),
            ExitDirection::West,
            WireType::L1,
        );
        let vertices = path.vertices();
        assert_eq!(vertices.len(), 5);
        assert_eq!(vertices[1], pos(0.0, 30.0));
        assert_eq!(vertices[2], pos(0.0, 150.0));
        assert_eq!(vertices[3], pos(170.0, 150.0));
    }

    #[test]
    fn test_orthogonal_lane_offsets_strictly_ordered() {
        let mut margins = Vec::new();
        for wire_type in WireType::ALL {
            let path = orthogonal(
                pos(0.0, 0.0),
                ExitDirection::East,
                pos(200.0, 100.0),
                ExitDirection::West,
                wire_type,
            );
            // Distance from the source to its extension point is the margin.
            margins.push(path.vertices()[1].x);
        }
        for pair in margins.windows(2) {
            assert!(pair[0] < pair[1], "margins not strictly increasing");
        }
        assert_eq!(margins[0], 30.0);
        assert_eq!(margins[4], 30.0 + 4.0 * 16.0);
    }

    #[test]
    fn test_orthogonal_label_stagger_monotonic() {
        let mut xs = Vec::new();
        for wire_type in WireType::ALL {
            // Both exits South: bend line at the max, labels staggered in x.
            let path = orthogonal(
                pos(0.0, 0.0),
                ExitDirection::South,
                pos(200.0, 0.0),
                ExitDirection::South,
                wire_type,
            );
            xs.push(path.label_anchor.x);
        }
        for pair in xs.windows(2) {
            assert!(pair[0] < pair[1], "label stagger not increasing");
        }
    }

    #[test]
    fn test_orthogonal_same_direction_bend_at_extreme() {
        // Both exits North, L1: margins are 30, extended ys are -30 and 20.
        // The bend line must be at the minimum (-30), not the midpoint.
        let path = orthogonal(
            pos(0.0, 0.0),
            ExitDirection::North,
            pos(100.0, 50.0),
            ExitDirection::North,
            WireType::L1,
        );
        let vertices = path.vertices();
        assert_eq!(vertices[2].y, -30.0);
        assert_eq!(vertices[3].y, -30.0);

        // Both exits South: extended ys are 30 and 80, bend at the maximum.
        let path = orthogonal(
            pos(0.0, 0.0),
            ExitDirection::South,
            pos(100.0, 50.0),
            ExitDirection::South,
            WireType::L1,
        );
        let vertices = path.vertices();
        assert_eq!(vertices[2].y, 80.0);
        assert_eq!(vertices[3].y, 80.0);
    }

    #[test]
    fn test_orthogonal_opposite_vertical_bend_at_midpoint() {
        let path = orthogonal(
            pos(0.0, 0.0),
            ExitDirection::South,
            pos(100.0, 200.0),
            ExitDirection::North,
            WireType::L1,
        );
        // Extended: (0,30) and (100,170); bend line at the average y = 100.
        let vertices = path.vertices();
        assert_eq!(vertices[2], pos(0.0, 100.0));
        assert_eq!(vertices[3], pos(100.0, 100.0));
    }

    #[test]
    fn test_pointer_exit_faces_back_toward_source() {
        let from = pos(0.0, 0.0);
        assert_eq!(
            pointer_exit_direction(from, pos(100.0, 10.0)),
            ExitDirection::West
        );
        assert_eq!(
            pointer_exit_direction(from, pos(-100.0, 10.0)),
            ExitDirection::East
        );
        assert_eq!(
            pointer_exit_direction(from, pos(10.0, 100.0)),
            ExitDirection::North
        );
        assert_eq!(
            pointer_exit_direction(from, pos(10.0, -100.0)),
            ExitDirection::South
        );
    }

    #[test]
    fn test_route_connection_skips_dangling_endpoints() {
        let mut schematic = Schematic::new();
        let a = schematic.add_node(CircuitNode::new("3ph-source", (0.0, 0.0)));
        let b = schematic.add_node(CircuitNode::new("mcb-3p", (0.0, 200.0)));
        let conn = Connection::new(a, "L1", b, "1", WireType::L1, WireStyle::Orthogonal);
        schematic.add_connection(conn.clone()).unwrap();

        assert!(route_connection(&schematic, &conn).is_some());

        // Simulate a caller that deleted the node without cascading.
        schematic.nodes.remove(&b);
        assert!(route_connection(&schematic, &conn).is_none());
    }

    #[test]
    fn test_route_connection_prefers_manual_points() {
        let mut schematic = Schematic::new();
        let a = schematic.add_node(CircuitNode::new("1ph-source", (0.0, 0.0)));
        let b = schematic.add_node(CircuitNode::new("lamp-indicator", (300.0, 0.0)));
        let mut conn = Connection::new(a, "L", b, "X1", WireType::L1, WireStyle::Curved);
        conn.points = vec![Point::new(150.0, 400.0)];
        schematic.add_connection(conn.clone()).unwrap();

        let path = route_connection(&schematic, &conn).unwrap();
        // Despite the curved style the path is a polyline through the waypoint.
        assert!(path
            .segments
            .iter()
            .all(|s| matches!(s, PathSegment::Line { .. })));
        assert!(path.vertices().contains(&pos(150.0, 400.0)));
    }
}

use crate::layout::{round_half_up, Edge, Point, PortSide, Slot, UNIT_BOTTOM_LEFT_INSET};
use std::collections::HashMap;
use std::fmt::Write;

/// Maximum per-axis drift two consecutive points may have and still count as
/// one straight segment.
pub const ORTHOGONAL_EPS: f64 = 0.75;

/// Anchor point of `side` on `slot`, snapped to whole pixels.
pub fn port(slot: &Slot, side: PortSide) -> Point {
    let (x, y) = match side {
        PortSide::Top => (slot.center_x(), slot.y),
        PortSide::Bottom => (slot.center_x(), slot.bottom()),
        PortSide::Left => (slot.x, slot.center_y()),
        PortSide::Right => (slot.right(), slot.center_y()),
        PortSide::BottomLeft => (slot.x + UNIT_BOTTOM_LEFT_INSET, slot.bottom()),
    };
    Point::new(round_half_up(x), round_half_up(y))
}

/// Full point list of an edge: source port, via points, target port.
///
/// `None` when either endpoint slot is missing from `slots`.
pub fn polyline(edge: &Edge, slots: &HashMap<&str, &Slot>) -> Option<Vec<Point>> {
    let from = slots.get(edge.from.slot_id.as_str())?;
    let to = slots.get(edge.to.slot_id.as_str())?;

    let mut points = Vec::with_capacity(edge.via.len() + 2);
    points.push(port(from, edge.from.side));
    points.extend(
        edge.via
            .iter()
            .map(|p| Point::new(round_half_up(p.x), round_half_up(p.y))),
    );
    points.push(port(to, edge.to.side));
    Some(points)
}

pub fn is_orthogonal(points: &[Point]) -> bool {
    points.windows(2).all(|pair| {
        let dx = (pair[0].x - pair[1].x).abs();
        let dy = (pair[0].y - pair[1].y).abs();
        dx <= ORTHOGONAL_EPS || dy <= ORTHOGONAL_EPS
    })
}

/// SVG path data, `M x y L x y ...`.
pub fn path_data(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        let _ = write!(d, "{cmd} {} {}", p.x, p.y);
    }
    d
}

/// Polylines for every drawable edge of a layout, in edge order.
/// Edges with a missing endpoint or a diagonal segment are skipped.
pub fn drawable_polylines(slots: &[Slot], edges: &[Edge]) -> Vec<(String, Vec<Point>)> {
    let by_id: HashMap<&str, &Slot> = slots.iter().map(|s| (s.id.as_str(), s)).collect();
    edges
        .iter()
        .filter_map(|e| {
            let points = polyline(e, &by_id)?;
            is_orthogonal(&points).then(|| (e.id.clone(), points))
        })
        .collect()
}

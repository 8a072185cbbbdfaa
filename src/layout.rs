use crate::model::{NodeId, NodeLevel, OrbatDoc};
use crate::tree;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Narrowest board the editor ever produces.
pub const MIN_BOARD_WIDTH: f64 = 680.0;

/// Horizontal offset of the unit rail from the unit's left edge.
pub const UNIT_BOTTOM_LEFT_INSET: f64 = 2.0;

/// Bottom padding in export mode.
pub const EXPORT_BOTTOM_PADDING: f64 = 40.0;

/// Bottom padding in edit mode, leaves room for the floating controls.
pub const EDIT_BOTTOM_PADDING: f64 = 218.0;

/// Two leads closer than this fraction of a column step collide.
const LEAD_COLLISION_RATIO: f64 = 0.85;

/// Column steps probed in each direction before accepting an overlap.
const LEAD_PROBE_LIMIT: u32 = 50;

/// Geometry constants of the board, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutStyle {
    pub node_w: f64,
    pub node_h: f64,
    pub margin_x: f64,
    pub margin_top: f64,
    pub col_gap: f64,
    pub row_gap: f64,
    pub rail_offset: f64,
    pub sub_gap: f64,
    pub sub_offset_x: f64,
    pub unit_sub_rail_drop: f64,
    pub unit_sub_branch_inset: f64,
    pub group_gap: f64,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            node_w: 220.0,
            node_h: 165.0,
            margin_x: 0.0,
            margin_top: 0.0,
            col_gap: 60.0,
            row_gap: 115.0,
            rail_offset: 60.0,
            sub_gap: 18.0,
            sub_offset_x: 0.0,
            unit_sub_rail_drop: 18.0,
            unit_sub_branch_inset: 14.0,
            group_gap: 60.0,
        }
    }
}

impl LayoutStyle {
    fn column_step(&self) -> f64 {
        self.node_w + self.col_gap
    }

    fn group_width(&self, count: usize) -> f64 {
        if count == 0 {
            0.0
        } else {
            count as f64 * self.node_w + (count - 1) as f64 * self.col_gap
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    #[default]
    Edit,
    Export,
}

impl LayoutMode {
    fn bottom_padding(self) -> f64 {
        match self {
            LayoutMode::Edit => EDIT_BOTTOM_PADDING,
            LayoutMode::Export => EXPORT_BOTTOM_PADDING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Slot {
    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortSide {
    Top,
    Bottom,
    Left,
    Right,
    BottomLeft,
}

impl fmt::Display for PortSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PortSide::Top => "top",
            PortSide::Bottom => "bottom",
            PortSide::Left => "left",
            PortSide::Right => "right",
            PortSide::BottomLeft => "bottomLeft",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeEndpoint {
    pub slot_id: NodeId,
    pub side: PortSide,
}

/// Connector between two slots; `via` forces right-angle routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub from: EdgeEndpoint,
    pub to: EdgeEndpoint,
    pub via: Vec<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardSize {
    pub w: f64,
    pub h: f64,
}

/// Output of one layout pass. Derived data only, never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardLayout {
    pub slots: Vec<Slot>,
    pub edges: Vec<Edge>,
    pub board: BoardSize,
}

impl BoardLayout {
    pub fn slot(&self, id: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Slots intersecting the `(left, top, right, bottom)` viewport.
    pub fn visible_slots(&self, viewport: (f64, f64, f64, f64)) -> Vec<&Slot> {
        let (vp_left, vp_top, vp_right, vp_bottom) = viewport;
        self.slots
            .iter()
            .filter(|s| {
                s.right() >= vp_left && s.x <= vp_right && s.bottom() >= vp_top && s.y <= vp_bottom
            })
            .collect()
    }
}

impl fmt::Display for BoardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "board {}x{}", self.board.w, self.board.h)?;
        for s in &self.slots {
            writeln!(f, "slot {} x={} y={} w={} h={}", s.id, s.x, s.y, s.w, s.h)?;
        }
        for e in &self.edges {
            write!(
                f,
                "edge {} {}:{} -> {}:{} via",
                e.id, e.from.slot_id, e.from.side, e.to.slot_id, e.to.side
            )?;
            for p in &e.via {
                write!(f, " ({},{})", p.x, p.y)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Half-up rounding: negative halves round toward +inf.
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Lays out the whole board.
///
/// Pure function of its inputs: leads on the top row, their units on the
/// second row as one centered block, subs stacked under their unit, then
/// orthogonal connectors. Export mode trims the board to the drawn content.
pub fn compute_layout(doc: &OrbatDoc, style: &LayoutStyle, mode: LayoutMode) -> BoardLayout {
    let children = tree::children_of(&doc.nodes, &doc.parent_by_id);

    let lead_ids = tree::lead_roots(doc);
    let unit_groups: Vec<Vec<NodeId>> = lead_ids
        .iter()
        .map(|lead| tree::siblings_of_level(lead, NodeLevel::Unit, &children, doc))
        .collect();
    let sub_groups: Vec<(NodeId, Vec<NodeId>)> = unit_groups
        .iter()
        .flatten()
        .map(|unit| {
            let subs = tree::siblings_of_level(unit, NodeLevel::Sub, &children, doc);
            (unit.clone(), subs)
        })
        .collect();

    let width = board_width(style, lead_ids.len(), &unit_groups);

    let mut engine = LayoutEngine::new(style);
    engine.place_units(&unit_groups, width);
    engine.place_leads(&lead_ids, &unit_groups, width);
    engine.place_subs(&sub_groups);
    engine.route_lead_edges(&lead_ids, &unit_groups);
    engine.route_sub_edges(&sub_groups);
    engine.finish(width, mode)
}

fn units_content_width(style: &LayoutStyle, unit_groups: &[Vec<NodeId>]) -> f64 {
    let groups: f64 = unit_groups.iter().map(|g| style.group_width(g.len())).sum();
    let non_empty = unit_groups.iter().filter(|g| !g.is_empty()).count();
    groups + non_empty.saturating_sub(1) as f64 * style.group_gap
}

fn board_width(style: &LayoutStyle, lead_count: usize, unit_groups: &[Vec<NodeId>]) -> f64 {
    let units_w = units_content_width(style, unit_groups);
    let leads_w = style.margin_x * 2.0 + style.group_width(lead_count);
    MIN_BOARD_WIDTH
        .max(units_w + style.sub_offset_x + style.margin_x * 2.0)
        .max(leads_w)
}

struct LayoutEngine<'a> {
    style: &'a LayoutStyle,
    slots: Vec<Slot>,
    index: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
}

impl<'a> LayoutEngine<'a> {
    fn new(style: &'a LayoutStyle) -> Self {
        Self {
            style,
            slots: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
        }
    }

    fn lead_row_y(&self) -> f64 {
        self.style.margin_top
    }

    fn unit_row_y(&self) -> f64 {
        self.style.margin_top + self.style.node_h + self.style.row_gap
    }

    fn push_slot(&mut self, id: &str, x: f64, y: f64) {
        self.index.insert(id.to_string(), self.slots.len());
        self.slots.push(Slot {
            id: id.to_string(),
            x,
            y,
            w: self.style.node_w,
            h: self.style.node_h,
        });
    }

    fn slot(&self, id: &str) -> Option<&Slot> {
        self.index.get(id).map(|&i| &self.slots[i])
    }

    fn place_units(&mut self, unit_groups: &[Vec<NodeId>], width: f64) {
        let content_w = units_content_width(self.style, unit_groups);
        if content_w <= 0.0 {
            return;
        }

        let y = self.unit_row_y();
        let step = self.style.column_step();
        let mut cursor_x = self
            .style
            .margin_x
            .max(round_half_up((width - content_w) / 2.0));

        let non_empty: Vec<&Vec<NodeId>> = unit_groups.iter().filter(|g| !g.is_empty()).collect();
        for (gi, group) in non_empty.iter().enumerate() {
            for id in group.iter() {
                self.push_slot(id, cursor_x, y);
                cursor_x += step;
            }
            if gi + 1 < non_empty.len() {
                cursor_x += self.style.group_gap;
            }
        }
    }

    /// Desired x of a lead floating above the span of its placed units.
    fn centered_lead_x(&self, units: &[NodeId]) -> Option<f64> {
        let centers: Vec<f64> = units
            .iter()
            .filter_map(|u| self.slot(u))
            .map(Slot::center_x)
            .collect();
        if centers.is_empty() {
            return None;
        }
        let min_c = centers.iter().copied().fold(f64::INFINITY, f64::min);
        let max_c = centers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(round_half_up((min_c + max_c) / 2.0 - self.style.node_w / 2.0))
    }

    fn place_leads(&mut self, lead_ids: &[NodeId], unit_groups: &[Vec<NodeId>], width: f64) {
        let style = self.style;
        let min_x = style.margin_x;
        let max_x = width - style.margin_x - style.node_w;
        let step = style.column_step();
        let clamp = |x: f64| x.min(max_x).max(min_x);
        let collides =
            |x: f64, used: &[f64]| used.iter().any(|u| (u - x).abs() < step * LEAD_COLLISION_RATIO);

        let y = self.lead_row_y();
        let mut used: Vec<f64> = Vec::with_capacity(lead_ids.len());
        let mut right_cursor = max_x;

        for (lead_id, units) in lead_ids.iter().zip(unit_groups) {
            let centered = self.centered_lead_x(units);
            let has_units = centered.is_some();
            let mut x = clamp(centered.unwrap_or(right_cursor));

            if collides(x, &used) {
                let probe = (1..LEAD_PROBE_LIMIT)
                    .map(|k| clamp(x + k as f64 * step))
                    .chain((1..LEAD_PROBE_LIMIT).map(|k| clamp(x - k as f64 * step)))
                    .find(|cand| !collides(*cand, &used));
                if let Some(free) = probe {
                    x = free;
                }
            }

            self.push_slot(lead_id, x, y);
            used.push(x);

            if !has_units {
                right_cursor = (x - step).max(min_x);
            }
        }
    }

    fn place_subs(&mut self, sub_groups: &[(NodeId, Vec<NodeId>)]) {
        let style = self.style;
        let pitch = style.node_h + style.sub_gap;

        for (unit_id, subs) in sub_groups {
            let Some((ux, uy)) = self.slot(unit_id).map(|s| (s.x, s.y)) else {
                continue;
            };
            for (i, sub_id) in subs.iter().enumerate() {
                let y = uy + style.node_h + style.sub_gap + i as f64 * pitch;
                self.push_slot(sub_id, ux + style.sub_offset_x, y);
            }
        }
    }

    /// Lead to unit connectors through a shared horizontal rail.
    fn route_lead_edges(&mut self, lead_ids: &[NodeId], unit_groups: &[Vec<NodeId>]) {
        let has_units = unit_groups.iter().any(|g| !g.is_empty());
        if lead_ids.is_empty() || !has_units {
            return;
        }
        let rail_y = self.lead_row_y() + self.style.node_h + self.style.rail_offset;

        let mut edges = Vec::new();
        for (lead_id, units) in lead_ids.iter().zip(unit_groups) {
            let Some(lead) = self.slot(lead_id) else {
                continue;
            };
            let px = round_half_up(lead.center_x());

            for unit_id in units {
                let Some(unit) = self.slot(unit_id) else {
                    continue;
                };
                let cx = round_half_up(unit.center_x());
                let via = if px == cx {
                    vec![Point::new(px, rail_y)]
                } else {
                    vec![Point::new(px, rail_y), Point::new(cx, rail_y)]
                };
                edges.push(Edge {
                    id: format!("{lead_id}-{unit_id}"),
                    from: EdgeEndpoint {
                        slot_id: lead_id.clone(),
                        side: PortSide::Bottom,
                    },
                    to: EdgeEndpoint {
                        slot_id: unit_id.clone(),
                        side: PortSide::Top,
                    },
                    via,
                });
            }
        }
        self.edges.extend(edges);
    }

    /// Unit to sub connectors along a vertical rail at the unit's bottom-left.
    fn route_sub_edges(&mut self, sub_groups: &[(NodeId, Vec<NodeId>)]) {
        let style = self.style;
        let mut edges = Vec::new();

        for (unit_id, subs) in sub_groups {
            if subs.is_empty() {
                continue;
            }
            let Some(unit) = self.slot(unit_id) else {
                continue;
            };
            let rail_x = round_half_up(unit.x + UNIT_BOTTOM_LEFT_INSET);
            let rail_start_y = round_half_up(unit.bottom() + style.unit_sub_rail_drop);

            for sub_id in subs {
                let Some(sub) = self.slot(sub_id) else {
                    continue;
                };
                let target_x = round_half_up(sub.x);
                let target_y = round_half_up(sub.center_y());
                let x_approach = target_x - style.unit_sub_branch_inset;

                edges.push(Edge {
                    id: format!("{unit_id}-{sub_id}"),
                    from: EdgeEndpoint {
                        slot_id: unit_id.clone(),
                        side: PortSide::BottomLeft,
                    },
                    to: EdgeEndpoint {
                        slot_id: sub_id.clone(),
                        side: PortSide::Left,
                    },
                    via: vec![
                        Point::new(rail_x, rail_start_y),
                        Point::new(rail_x, target_y),
                        Point::new(x_approach, target_y),
                    ],
                });
            }
        }
        self.edges.extend(edges);
    }

    fn finish(self, width: f64, mode: LayoutMode) -> BoardLayout {
        let max_bottom = self.slots.iter().map(Slot::bottom).fold(0.0, f64::max);
        let mut layout = BoardLayout {
            board: BoardSize {
                w: width,
                h: max_bottom + mode.bottom_padding(),
            },
            slots: self.slots,
            edges: self.edges,
        };

        if mode == LayoutMode::Export {
            trim_to_content(&mut layout);
        }
        layout
    }
}

/// Translates everything so the drawn content starts at (0, 0) and shrinks
/// the board to the tight bounding box of slots and via points.
fn trim_to_content(layout: &mut BoardLayout) {
    if layout.slots.is_empty() {
        return;
    }

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for s in &layout.slots {
        min_x = min_x.min(s.x);
        max_x = max_x.max(s.right());
        min_y = min_y.min(s.y);
        max_y = max_y.max(s.bottom());
    }
    for p in layout.edges.iter().flat_map(|e| e.via.iter()) {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    for s in &mut layout.slots {
        s.x -= min_x;
        s.y -= min_y;
    }
    for p in layout.edges.iter_mut().flat_map(|e| e.via.iter_mut()) {
        p.x -= min_x;
        p.y -= min_y;
    }

    layout.board = BoardSize {
        w: (max_x - min_x).ceil(),
        h: (max_y - min_y).ceil(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrbatNode, ROOT_ID};
    use crate::preset::{build_initial_orbat, InitParams};

    fn doc_from(entries: &[(&str, NodeLevel, Option<&str>)]) -> OrbatDoc {
        let mut doc = OrbatDoc::new();
        for (id, level, parent) in entries {
            doc.nodes.push(OrbatNode::new(*id, *level));
            doc.parent_by_id
                .insert(id.to_string(), parent.map(str::to_string));
        }
        doc
    }

    fn slot<'a>(layout: &'a BoardLayout, id: &str) -> &'a Slot {
        layout
            .slot(id)
            .unwrap_or_else(|| panic!("missing slot {id}"))
    }

    #[test]
    fn test_empty_doc_gets_minimum_board() {
        let layout = compute_layout(&OrbatDoc::new(), &LayoutStyle::default(), LayoutMode::Edit);
        assert!(layout.slots.is_empty());
        assert!(layout.edges.is_empty());
        assert_eq!(layout.board.w, MIN_BOARD_WIDTH);
        assert_eq!(layout.board.h, EDIT_BOTTOM_PADDING);

        let export = compute_layout(&OrbatDoc::new(), &LayoutStyle::default(), LayoutMode::Export);
        assert_eq!(export.board.w, MIN_BOARD_WIDTH);
        assert_eq!(export.board.h, EXPORT_BOTTOM_PADDING);
    }

    #[test]
    fn test_three_units_under_one_lead() {
        let init = build_initial_orbat(InitParams::default());
        let layout = compute_layout(&init.doc, &LayoutStyle::default(), LayoutMode::Edit);

        assert_eq!(layout.slots.len(), 4);
        let (u1, u2, u3) = (slot(&layout, "U1"), slot(&layout, "U2"), slot(&layout, "U3"));
        assert_eq!((u1.x, u2.x, u3.x), (0.0, 280.0, 560.0));
        assert_eq!(u2.x - u1.right(), 60.0);
        assert_eq!(u3.x - u2.right(), 60.0);
        assert!(u1.y == 280.0 && u2.y == 280.0 && u3.y == 280.0);

        let lead = slot(&layout, "L1");
        assert_eq!(lead.y, 0.0);
        assert_eq!(lead.center_x(), (u1.center_x() + u3.center_x()) / 2.0);

        assert_eq!(layout.board, BoardSize { w: 780.0, h: 663.0 });
    }

    #[test]
    fn test_lead_edges_share_rail() {
        let init = build_initial_orbat(InitParams::default());
        let layout = compute_layout(&init.doc, &LayoutStyle::default(), LayoutMode::Edit);

        assert_eq!(layout.edges.len(), 3);
        let middle = layout.edges.iter().find(|e| e.id == "L1-U2").unwrap();
        assert_eq!(middle.via, vec![Point::new(390.0, 225.0)]);

        let left = layout.edges.iter().find(|e| e.id == "L1-U1").unwrap();
        assert_eq!(
            left.via,
            vec![Point::new(390.0, 225.0), Point::new(110.0, 225.0)]
        );
        assert_eq!(left.from.side, PortSide::Bottom);
        assert_eq!(left.to.side, PortSide::Top);
    }

    #[test]
    fn test_subs_stack_under_unit() {
        let init = build_initial_orbat(InitParams::new(1, 1, 2));
        let layout = compute_layout(&init.doc, &LayoutStyle::default(), LayoutMode::Edit);

        let unit = slot(&layout, "U1");
        let s1 = slot(&layout, "S1");
        let s2 = slot(&layout, "S2");
        assert_eq!(s1.x, unit.x);
        assert_eq!(s1.y, unit.bottom() + 18.0);
        assert_eq!(s2.y - s1.y, 165.0 + 18.0);

        let edge = layout.edges.iter().find(|e| e.id == "U1-S2").unwrap();
        assert_eq!(edge.from.side, PortSide::BottomLeft);
        assert_eq!(edge.to.side, PortSide::Left);
        assert_eq!(edge.via.len(), 3);
        assert_eq!(edge.via[0].x, unit.x + UNIT_BOTTOM_LEFT_INSET);
        assert_eq!(edge.via[2].x, s2.x - 14.0);
        assert_eq!(edge.via[1].y, edge.via[2].y);
    }

    #[test]
    fn test_childless_lead_packs_right() {
        let doc = doc_from(&[
            ("L1", NodeLevel::Lead, None),
            ("L2", NodeLevel::Lead, None),
        ]);
        let layout = compute_layout(&doc, &LayoutStyle::default(), LayoutMode::Edit);

        // Width 680, max x 460, step 280.
        assert_eq!(slot(&layout, "L1").x, 460.0);
        assert_eq!(slot(&layout, "L2").x, 180.0);
    }

    #[test]
    fn test_single_unit_leads_sit_above_their_unit() {
        // Group gap pushes U2 to 430, so the leads are 340 apart and
        // neither needs probing.
        let doc = doc_from(&[
            ("L1", NodeLevel::Lead, None),
            ("L2", NodeLevel::Lead, None),
            ("U1", NodeLevel::Unit, Some("L1")),
            ("U2", NodeLevel::Unit, Some("L2")),
        ]);
        let layout = compute_layout(&doc, &LayoutStyle::default(), LayoutMode::Edit);
        let (l1, l2) = (slot(&layout, "L1"), slot(&layout, "L2"));
        assert_eq!(l1.x, slot(&layout, "U1").x);
        assert_eq!(l2.x, slot(&layout, "U2").x);
        assert!((l2.x - l1.x).abs() >= 280.0 * LEAD_COLLISION_RATIO);
    }

    #[test]
    fn test_childless_lead_next_to_centered_lead_moves_left() {
        // Three leads, L1 centered above two units; L2 and L3 childless.
        let doc = doc_from(&[
            ("L1", NodeLevel::Lead, None),
            ("L2", NodeLevel::Lead, None),
            ("L3", NodeLevel::Lead, None),
            ("U1", NodeLevel::Unit, Some("L1")),
            ("U2", NodeLevel::Unit, Some("L1")),
            ("U3", NodeLevel::Unit, Some("L1")),
        ]);
        let layout = compute_layout(&doc, &LayoutStyle::default(), LayoutMode::Edit);
        let xs: Vec<f64> = ["L1", "L2", "L3"]
            .iter()
            .map(|id| slot(&layout, id).x)
            .collect();

        // Board is 780 wide (leads need 3*220+2*60). L1 at 280, L2 wants
        // the right edge (560): free. L3 wants 280: taken, probes to 0.
        assert_eq!(xs, vec![280.0, 560.0, 0.0]);
    }

    #[test]
    fn test_group_gap_only_between_non_empty_groups() {
        let doc = doc_from(&[
            ("L1", NodeLevel::Lead, None),
            ("L2", NodeLevel::Lead, None),
            ("L3", NodeLevel::Lead, None),
            ("U1", NodeLevel::Unit, Some("L1")),
            ("U2", NodeLevel::Unit, Some("L3")),
        ]);
        let layout = compute_layout(&doc, &LayoutStyle::default(), LayoutMode::Edit);
        let gap = slot(&layout, "U2").x - slot(&layout, "U1").right();
        assert_eq!(gap, 60.0 + 60.0);
    }

    #[test]
    fn test_order_hint_changes_unit_positions() {
        let mut init = build_initial_orbat(InitParams::default());
        init.doc.children_order.insert(
            "L1".into(),
            vec!["U3".into(), "U1".into(), "U2".into()],
        );
        let layout = compute_layout(&init.doc, &LayoutStyle::default(), LayoutMode::Edit);
        assert_eq!(slot(&layout, "U3").x, 0.0);
        assert_eq!(slot(&layout, "U2").x, 560.0);
    }

    #[test]
    fn test_root_order_hint_with_stale_lead() {
        let mut init = build_initial_orbat(InitParams::new(2, 1, 0));
        init.doc.children_order.insert(
            ROOT_ID.into(),
            vec!["L9".into(), "L2".into(), "L1".into()],
        );
        let layout = compute_layout(&init.doc, &LayoutStyle::default(), LayoutMode::Edit);
        assert!(layout.slot("L9").is_none());
        // U2 belongs to L2, which now comes first.
        assert!(slot(&layout, "U2").x < slot(&layout, "U1").x);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let init = build_initial_orbat(InitParams::new(3, 4, 2));
        let style = LayoutStyle::default();
        let a = compute_layout(&init.doc, &style, LayoutMode::Export);
        let b = compute_layout(&init.doc, &style, LayoutMode::Export);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_export_trim_starts_at_origin() {
        let init = build_initial_orbat(InitParams::new(2, 2, 2));
        let layout = compute_layout(&init.doc, &LayoutStyle::default(), LayoutMode::Export);

        let xs = layout
            .slots
            .iter()
            .flat_map(|s| [s.x, s.right()])
            .chain(layout.edges.iter().flat_map(|e| e.via.iter().map(|p| p.x)));
        let ys = layout
            .slots
            .iter()
            .flat_map(|s| [s.y, s.bottom()])
            .chain(layout.edges.iter().flat_map(|e| e.via.iter().map(|p| p.y)));

        let (min_x, max_x) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let (min_y, max_y) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        assert_eq!(min_x, 0.0);
        assert_eq!(min_y, 0.0);
        assert_eq!(layout.board, BoardSize { w: max_x, h: max_y });
    }

    #[test]
    fn test_adding_sub_keeps_other_leads_in_place() {
        let mut init = build_initial_orbat(InitParams::new(2, 2, 0));
        let style = LayoutStyle::default();
        let before = compute_layout(&init.doc, &style, LayoutMode::Edit);

        crate::mutation::add_child(&mut init.doc, "U3", NodeLevel::Sub);
        let after = compute_layout(&init.doc, &style, LayoutMode::Edit);

        for id in ["L1", "L2", "U1", "U2", "U3", "U4"] {
            assert_eq!(before.slot(id), after.slot(id), "{id} moved");
        }
    }

    #[test]
    fn test_unit_reorder_leaves_other_lead_untouched() {
        let mut init = build_initial_orbat(InitParams::new(2, 3, 1));
        let style = LayoutStyle::default();
        let before = compute_layout(&init.doc, &style, LayoutMode::Edit);

        let order =
            crate::ordering::reorder_within_level(&init.doc, "L1", NodeLevel::Unit, "U2", 0)
                .unwrap();
        assert_eq!(order, vec!["U2", "U1", "U3"]);
        crate::mutation::set_children_order(&mut init.doc, "L1", order);
        let after = compute_layout(&init.doc, &style, LayoutMode::Edit);

        assert_eq!(slot(&after, "U2").x, slot(&before, "U1").x);
        assert_eq!(slot(&after, "U1").x, slot(&before, "U2").x);
        for id in ["L1", "L2", "U4", "U5", "U6", "S4", "S5", "S6"] {
            assert_eq!(before.slot(id), after.slot(id), "{id} moved");
        }

        // Edges leaving L2 or one of its units.
        let l2_edges = |layout: &BoardLayout| -> Vec<Edge> {
            layout
                .edges
                .iter()
                .filter(|e| ["L2", "U4", "U5", "U6"].contains(&e.from.slot_id.as_str()))
                .cloned()
                .collect()
        };
        let (old, new) = (l2_edges(&before), l2_edges(&after));
        assert_eq!(old.len(), 6);
        assert_eq!(old, new);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(545.5), 546.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(1.4), 1.0);
    }

    #[test]
    fn test_visible_slots() {
        let init = build_initial_orbat(InitParams::default());
        let layout = compute_layout(&init.doc, &LayoutStyle::default(), LayoutMode::Edit);
        let visible = layout.visible_slots((0.0, 0.0, 200.0, 200.0));
        assert!(visible.is_empty());

        let visible = layout.visible_slots((0.0, 250.0, 250.0, 400.0));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "U1");
    }
}

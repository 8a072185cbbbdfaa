use crate::model::{NodeId, NodeLevel, OrbatDoc, OrbatNode, ROOT_ID};
use serde::{Deserialize, Serialize};

pub const LEAD_COUNT_RANGE: (u32, u32) = (1, 6);
pub const UNITS_PER_LEAD_RANGE: (u32, u32) = (0, 12);
pub const SUBS_PER_UNIT_RANGE: (u32, u32) = (0, 12);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitRailDirection {
    #[default]
    Horizontal,
    Vertical,
}

/// Shape of a freshly generated tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InitParams {
    pub lead_count: u32,
    pub units_per_lead: u32,
    pub subs_per_unit: u32,
    pub unit_rail_direction: UnitRailDirection,
}

impl Default for InitParams {
    fn default() -> Self {
        Self {
            lead_count: 1,
            units_per_lead: 3,
            subs_per_unit: 0,
            unit_rail_direction: UnitRailDirection::Horizontal,
        }
    }
}

fn clamp_count(value: u32, (min, max): (u32, u32)) -> u32 {
    value.clamp(min, max)
}

impl InitParams {
    pub fn new(lead_count: u32, units_per_lead: u32, subs_per_unit: u32) -> Self {
        Self {
            lead_count,
            units_per_lead,
            subs_per_unit,
            unit_rail_direction: UnitRailDirection::default(),
        }
        .clamped()
    }

    /// Brings every count into its allowed range.
    pub fn clamped(self) -> Self {
        Self {
            lead_count: clamp_count(self.lead_count, LEAD_COUNT_RANGE),
            units_per_lead: clamp_count(self.units_per_lead, UNITS_PER_LEAD_RANGE),
            subs_per_unit: clamp_count(self.subs_per_unit, SUBS_PER_UNIT_RANGE),
            unit_rail_direction: self.unit_rail_direction,
        }
    }
}

/// Result of bulk generation: the document plus the initial selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialOrbat {
    pub doc: OrbatDoc,
    pub selected_id: Option<NodeId>,
}

/// Builds a fresh tree: leads `L1..`, units `U1..` numbered across leads,
/// subs `S1..` numbered across units.
pub fn build_initial_orbat(params: InitParams) -> InitialOrbat {
    let params = params.clamped();
    let mut doc = OrbatDoc::new();

    let lead_ids: Vec<NodeId> = (1..=params.lead_count).map(|i| format!("L{i}")).collect();
    for (i, id) in lead_ids.iter().enumerate() {
        let label = if i == 0 {
            "HQ".to_string()
        } else {
            format!("PL{}", i + 1)
        };
        doc.nodes
            .push(OrbatNode::new(id.clone(), NodeLevel::Lead).with_label_main(label));
        doc.parent_by_id.insert(id.clone(), None);
    }
    doc.children_order
        .insert(ROOT_ID.to_string(), lead_ids.clone());

    let mut unit_counter = 1;
    let mut units_by_lead: Vec<Vec<NodeId>> = Vec::with_capacity(lead_ids.len());
    for lead_id in &lead_ids {
        let mut units = Vec::with_capacity(params.units_per_lead as usize);
        for _ in 0..params.units_per_lead {
            let uid = format!("U{unit_counter}");
            unit_counter += 1;
            doc.nodes
                .push(OrbatNode::new(uid.clone(), NodeLevel::Unit));
            doc.parent_by_id.insert(uid.clone(), Some(lead_id.clone()));
            units.push(uid);
        }
        doc.children_order.insert(lead_id.clone(), units.clone());
        units_by_lead.push(units);
    }

    let mut sub_counter = 1;
    for uid in units_by_lead.iter().flatten() {
        let mut subs = Vec::with_capacity(params.subs_per_unit as usize);
        for _ in 0..params.subs_per_unit {
            let sid = format!("S{sub_counter}");
            sub_counter += 1;
            doc.nodes.push(OrbatNode::new(sid.clone(), NodeLevel::Sub));
            doc.parent_by_id.insert(sid.clone(), Some(uid.clone()));
            subs.push(sid);
        }
        if !subs.is_empty() {
            doc.children_order.insert(uid.clone(), subs);
        }
    }

    InitialOrbat {
        selected_id: lead_ids.first().cloned(),
        doc,
    }
}

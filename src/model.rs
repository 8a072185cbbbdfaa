use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type NodeId = String;

/// Parent entry of every node: `None` (or [`ROOT_ID`]) means "child of the root".
pub type ParentById = BTreeMap<NodeId, Option<NodeId>>;

/// User-controlled child ordering per parent. Only a hint, reconciled on read.
pub type ChildrenOrder = BTreeMap<NodeId, Vec<NodeId>>;

/// Implicit root sentinel. Never rendered, never stored in the node list.
pub const ROOT_ID: &str = "__ROOT__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeLevel {
    Lead,
    Unit,
    Sub,
}

impl NodeLevel {
    pub fn id_prefix(self) -> &'static str {
        match self {
            NodeLevel::Lead => "L",
            NodeLevel::Unit => "U",
            NodeLevel::Sub => "S",
        }
    }

    /// The level a child of this level must have.
    pub fn child_level(self) -> Option<NodeLevel> {
        match self {
            NodeLevel::Lead => Some(NodeLevel::Unit),
            NodeLevel::Unit => Some(NodeLevel::Sub),
            NodeLevel::Sub => None,
        }
    }

    pub fn parent_level(self) -> Option<NodeLevel> {
        match self {
            NodeLevel::Lead => None,
            NodeLevel::Unit => Some(NodeLevel::Lead),
            NodeLevel::Sub => Some(NodeLevel::Unit),
        }
    }
}

impl fmt::Display for NodeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeLevel::Lead => "LEAD",
            NodeLevel::Unit => "UNIT",
            NodeLevel::Sub => "SUB",
        };
        f.write_str(s)
    }
}

/// Unit-type tag. Only selects the symbol drawn inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitKind {
    AntiAir,
    AntiTank,
    Artillery,
    Helicopter,
    #[serde(rename = "hQ")]
    Hq,
    Infantry,
    Maintenance,
    Mechanized,
    MechInfantry,
    MechRecon,
    Medical,
    Mortar,
    Motorized,
    MotorizedRecon,
    Plane,
    Recon,
    Supply,
    Uav,
    UavAir,
    UavSwarm,
    Ugv,
    #[default]
    UnitBlufor,
}

impl UnitKind {
    pub const ALL: [UnitKind; 22] = [
        UnitKind::AntiAir,
        UnitKind::AntiTank,
        UnitKind::Artillery,
        UnitKind::Helicopter,
        UnitKind::Hq,
        UnitKind::Infantry,
        UnitKind::Maintenance,
        UnitKind::Mechanized,
        UnitKind::MechInfantry,
        UnitKind::MechRecon,
        UnitKind::Medical,
        UnitKind::Mortar,
        UnitKind::Motorized,
        UnitKind::MotorizedRecon,
        UnitKind::Plane,
        UnitKind::Recon,
        UnitKind::Supply,
        UnitKind::Uav,
        UnitKind::UavAir,
        UnitKind::UavSwarm,
        UnitKind::Ugv,
        UnitKind::UnitBlufor,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UnitKind::AntiAir => "Anti-air",
            UnitKind::AntiTank => "Anti-tank",
            UnitKind::Artillery => "Artillery",
            UnitKind::Helicopter => "Helicopter",
            UnitKind::Hq => "HQ",
            UnitKind::Infantry => "Infantry",
            UnitKind::Maintenance => "Maintenance",
            UnitKind::Mechanized => "Armored",
            UnitKind::MechInfantry => "Mechanized Infantry",
            UnitKind::MechRecon => "Mechanized Recon",
            UnitKind::Medical => "Medical",
            UnitKind::Mortar => "Mortar",
            UnitKind::Motorized => "Motorized Infantry",
            UnitKind::MotorizedRecon => "Motorized Recon",
            UnitKind::Plane => "Plane",
            UnitKind::Recon => "Recon",
            UnitKind::Supply => "Supply",
            UnitKind::Uav => "UAV",
            UnitKind::UavAir => "UAV Air",
            UnitKind::UavSwarm => "UAV Swarm",
            UnitKind::Ugv => "UGV",
            UnitKind::UnitBlufor => "Blufor unit",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    /// Next kind in the registry, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbatNode {
    pub id: NodeId,
    pub level: NodeLevel,
    pub kind: UnitKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_bottom: Option<String>,
}

impl OrbatNode {
    pub fn new(id: impl Into<NodeId>, level: NodeLevel) -> Self {
        let id = id.into();
        Self {
            display_id: Some(id.clone()),
            id,
            level,
            kind: UnitKind::default(),
            label_main: None,
            label_top: None,
            label_bottom: None,
        }
    }

    pub fn with_label_main(mut self, label: impl Into<String>) -> Self {
        self.label_main = Some(label.into());
        self
    }

    /// Name shown to the user: display id when set, raw id otherwise.
    pub fn display_name(&self) -> &str {
        self.display_id.as_deref().unwrap_or(&self.id)
    }
}

/// Editable label fields of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelField {
    DisplayId,
    Main,
    Top,
    Bottom,
}

impl LabelField {
    pub const ALL: [LabelField; 4] = [
        LabelField::Main,
        LabelField::Top,
        LabelField::Bottom,
        LabelField::DisplayId,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LabelField::DisplayId => "display id",
            LabelField::Main => "main label",
            LabelField::Top => "top label",
            LabelField::Bottom => "bottom label",
        }
    }

    pub fn read(self, node: &OrbatNode) -> Option<&str> {
        match self {
            LabelField::DisplayId => node.display_id.as_deref(),
            LabelField::Main => node.label_main.as_deref(),
            LabelField::Top => node.label_top.as_deref(),
            LabelField::Bottom => node.label_bottom.as_deref(),
        }
    }
}

/// Shallow patch applied by [`crate::mutation::update_node`].
/// `Some(None)` clears an optional label, `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub kind: Option<UnitKind>,
    pub display_id: Option<Option<String>>,
    pub label_main: Option<Option<String>>,
    pub label_top: Option<Option<String>>,
    pub label_bottom: Option<Option<String>>,
}

impl NodePatch {
    pub fn kind(kind: UnitKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Sets one label field; an empty string clears it.
    pub fn label(field: LabelField, value: &str) -> Self {
        let value = (!value.is_empty()).then(|| value.to_string());
        let mut patch = Self::default();
        match field {
            LabelField::DisplayId => patch.display_id = Some(value),
            LabelField::Main => patch.label_main = Some(value),
            LabelField::Top => patch.label_top = Some(value),
            LabelField::Bottom => patch.label_bottom = Some(value),
        }
        patch
    }

    pub fn apply(&self, node: &mut OrbatNode) {
        if let Some(kind) = self.kind {
            node.kind = kind;
        }
        if let Some(ref v) = self.display_id {
            node.display_id = v.clone();
        }
        if let Some(ref v) = self.label_main {
            node.label_main = v.clone();
        }
        if let Some(ref v) = self.label_top {
            node.label_top = v.clone();
        }
        if let Some(ref v) = self.label_bottom {
            node.label_bottom = v.clone();
        }
    }
}

/// The node / parent / order triple every engine works on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbatDoc {
    pub nodes: Vec<OrbatNode>,
    pub parent_by_id: ParentById,
    pub children_order: ChildrenOrder,
}

impl OrbatDoc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&OrbatNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut OrbatNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Parent of `id`, with the root sentinel folded into `None`.
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        match self.parent_by_id.get(id) {
            Some(Some(p)) if p != ROOT_ID => Some(p.as_str()),
            _ => None,
        }
    }

    pub fn level_of(&self, id: &str) -> Option<NodeLevel> {
        self.get(id).map(|n| n.level)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

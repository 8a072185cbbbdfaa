use orbat_rs::model::{NodeLevel, OrbatDoc};
use orbat_rs::mutation;
use orbat_rs::preset::{build_initial_orbat, InitParams};
use orbat_rs::{AppConfig, AppState};

/// One lead over three units, the default fresh board.
#[allow(dead_code)]
pub fn default_doc() -> OrbatDoc {
    build_initial_orbat(InitParams::default()).doc
}

/// L1 over U1 {S1, S2} and U2; L2 with no units.
#[allow(dead_code)]
pub fn mixed_doc() -> OrbatDoc {
    let mut doc = build_initial_orbat(InitParams::new(1, 2, 0)).doc;
    mutation::add_child(&mut doc, "U1", NodeLevel::Sub);
    mutation::add_child(&mut doc, "U1", NodeLevel::Sub);
    mutation::add_lead(&mut doc);
    doc
}

#[allow(dead_code)]
pub fn create_test_app() -> AppState {
    AppState::new(AppConfig::default())
}

/// A complete version-1 export document as a user would have saved it.
#[allow(dead_code)]
pub const SAMPLE_EXPORT: &str = r#"{
  "version": 1,
  "meta": { "exportedAt": "2025-03-01T12:00:00.000Z" },
  "state": {
    "initParams": { "leadCount": 1, "unitsPerLead": 2, "subsPerUnit": 0 },
    "unitRailDirection": "horizontal",
    "nodes": [
      { "id": "L1", "level": "LEAD", "kind": "hQ", "displayId": "L1", "labelMain": "HQ" },
      { "id": "U1", "level": "UNIT", "kind": "infantry", "displayId": "1PL", "labelTop": "A & B" },
      { "id": "U2", "level": "UNIT", "kind": "mortar", "displayId": "U2" },
      { "id": "S1", "level": "SUB", "kind": "recon", "displayId": "S1" }
    ],
    "parentById": { "L1": null, "U1": "L1", "U2": "L1", "S1": "U1" },
    "childrenOrder": { "__ROOT__": ["L1"], "L1": ["U2", "U1"], "U1": ["S1"] },
    "selectedId": "U1",
    "scale": 0.9,
    "colorPresetId": "p2"
  }
}"#;

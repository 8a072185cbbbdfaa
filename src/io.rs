use crate::model::{ChildrenOrder, NodeId, OrbatDoc, OrbatNode, ParentById};
use crate::preset::{
    InitParams, UnitRailDirection, LEAD_COUNT_RANGE, SUBS_PER_UNIT_RANGE, UNITS_PER_LEAD_RANGE,
};
use crate::theme::ColorPresetId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

pub const EXPORT_VERSION: u64 = 1;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Document root is not an object")]
    NotAnObject,
    #[error("Unsupported export version: {0}")]
    UnsupportedVersion(Value),
    #[error("Missing or invalid meta block")]
    InvalidMeta,
    #[error("Invalid editor state: field `{0}` is missing or has the wrong type")]
    InvalidState(&'static str),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn lenient_preset<'de, D>(deserializer: D) -> Result<ColorPresetId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(ColorPresetId::parse_lenient(&raw))
}

fn rail_direction_from(raw: &str) -> UnitRailDirection {
    match raw {
        "vertical" => UnitRailDirection::Vertical,
        _ => UnitRailDirection::Horizontal,
    }
}

fn lenient_rail_direction<'de, D>(deserializer: D) -> Result<UnitRailDirection, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(rail_direction_from(&raw))
}

/// Truncates a count toward zero and clamps it into `(min, max)`.
/// A missing key keeps `default`; a non-numeric or non-finite value gives `min`.
fn lenient_count(value: Option<&Value>, default: u32, (min, max): (u32, u32)) -> u32 {
    let Some(value) = value else {
        return default;
    };
    match value.as_f64() {
        Some(n) if n.is_finite() => n.trunc().clamp(min as f64, max as f64) as u32,
        _ => min,
    }
}

/// Accepts any object for `initParams` and normalises its counts.
fn lenient_init_params<'de, D>(deserializer: D) -> Result<InitParams, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Map::<String, Value>::deserialize(deserializer)?;
    let defaults = InitParams::default();
    Ok(InitParams {
        lead_count: lenient_count(raw.get("leadCount"), defaults.lead_count, LEAD_COUNT_RANGE),
        units_per_lead: lenient_count(
            raw.get("unitsPerLead"),
            defaults.units_per_lead,
            UNITS_PER_LEAD_RANGE,
        ),
        subs_per_unit: lenient_count(
            raw.get("subsPerUnit"),
            defaults.subs_per_unit,
            SUBS_PER_UNIT_RANGE,
        ),
        unit_rail_direction: raw
            .get("unitRailDirection")
            .and_then(Value::as_str)
            .map(rail_direction_from)
            .unwrap_or_default(),
    }
    .clamped())
}

/// Everything the editor persists: the document plus session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    #[serde(deserialize_with = "lenient_init_params")]
    pub init_params: InitParams,
    #[serde(deserialize_with = "lenient_rail_direction")]
    pub unit_rail_direction: UnitRailDirection,
    pub nodes: Vec<OrbatNode>,
    pub parent_by_id: ParentById,
    pub children_order: ChildrenOrder,
    pub selected_id: Option<NodeId>,
    pub scale: f64,
    #[serde(deserialize_with = "lenient_preset")]
    pub color_preset_id: ColorPresetId,
}

impl EditorState {
    pub fn doc(&self) -> OrbatDoc {
        OrbatDoc {
            nodes: self.nodes.clone(),
            parent_by_id: self.parent_by_id.clone(),
            children_order: self.children_order.clone(),
        }
    }

    pub fn into_doc(self) -> OrbatDoc {
        OrbatDoc {
            nodes: self.nodes,
            parent_by_id: self.parent_by_id,
            children_order: self.children_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeta {
    pub exported_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbatExportFile {
    pub version: u64,
    pub meta: ExportMeta,
    pub state: EditorState,
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl OrbatExportFile {
    /// Wraps `state` with the current version and an `exportedAt` of now.
    pub fn new(state: EditorState) -> Self {
        Self {
            version: EXPORT_VERSION,
            meta: ExportMeta {
                exported_at: now_rfc3339(),
            },
            state,
        }
    }

    /// Pretty-printed JSON, two-space indentation.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn check_state_shape(state: &Map<String, Value>) -> Result<(), ImportError> {
    let checks: [(&'static str, fn(&Value) -> bool); 8] = [
        ("initParams", Value::is_object),
        ("unitRailDirection", Value::is_string),
        ("nodes", Value::is_array),
        ("parentById", Value::is_object),
        ("childrenOrder", Value::is_object),
        ("selectedId", |v| v.is_string() || v.is_null()),
        ("scale", Value::is_number),
        ("colorPresetId", Value::is_string),
    ];

    for (field, ok) in checks {
        match state.get(field) {
            Some(v) if ok(v) => {}
            _ => return Err(ImportError::InvalidState(field)),
        }
    }
    Ok(())
}

/// Validates an untyped export document and converts it.
///
/// The structural check runs on the raw value first so a malformed file is
/// rejected before anything is deserialized. A missing or non-string
/// `exportedAt` is replaced with the current time.
pub fn parse_orbat_export(raw: &Value) -> Result<OrbatExportFile, ImportError> {
    let root = raw.as_object().ok_or(ImportError::NotAnObject)?;

    match root.get("version") {
        Some(v) if v.as_f64() == Some(EXPORT_VERSION as f64) => {}
        other => {
            return Err(ImportError::UnsupportedVersion(
                other.cloned().unwrap_or(Value::Null),
            ))
        }
    }

    let meta = root
        .get("meta")
        .and_then(Value::as_object)
        .ok_or(ImportError::InvalidMeta)?;

    let state_value = root
        .get("state")
        .ok_or(ImportError::InvalidState("state"))?;
    let state_map = state_value
        .as_object()
        .ok_or(ImportError::InvalidState("state"))?;
    check_state_shape(state_map)?;

    let state: EditorState = serde_json::from_value(state_value.clone())?;

    let exported_at = match meta.get("exportedAt").and_then(Value::as_str) {
        Some(s) => s.to_string(),
        None => now_rfc3339(),
    };

    Ok(OrbatExportFile {
        version: EXPORT_VERSION,
        meta: ExportMeta { exported_at },
        state,
    })
}

pub fn parse_orbat_export_str(text: &str) -> Result<OrbatExportFile, ImportError> {
    let raw: Value = serde_json::from_str(text)?;
    parse_orbat_export(&raw)
}

/// Reads and validates an export file. Nothing is applied on failure.
pub fn load_export_file(path: &Path) -> Result<OrbatExportFile, ImportError> {
    let file = File::open(path)?;
    let raw: Value = serde_json::from_reader(BufReader::new(file))?;
    match parse_orbat_export(&raw) {
        Ok(parsed) => {
            info!(path = %path.display(), nodes = parsed.state.nodes.len(), "imported document");
            Ok(parsed)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "rejected import");
            Err(e)
        }
    }
}

/// Writes `export` as pretty JSON, truncating any existing file.
pub fn save_export_file(export: &OrbatExportFile, path: &Path) -> io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, export)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %path.display(), "saved document");
    Ok(())
}

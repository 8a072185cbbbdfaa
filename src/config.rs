use crate::layout::LayoutStyle;
use crate::preset::InitParams;
use crate::theme::ColorPresetId;
use clap::Parser;
use config::{Config as ConfigCrate, ConfigError as ConfigCrateError, Environment, File, Map, Source, Value};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_MAX_UNDO: usize = 50;
const DEFAULT_SCALE: f64 = 1.0;
const DEFAULT_CELL_WIDTH_PX: f64 = 10.0;
const DEFAULT_CELL_HEIGHT_PX: f64 = 20.0;
const DEFAULT_AUTO_SAVE: bool = false;

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 1.2;
pub const SCALE_STEP: f64 = 0.05;

const ENV_PREFIX: &str = "ORBAT";
const APP_DIR_NAME: &str = "orbat-rs";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigCrateError),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

// Every field optional so the file/env layer can be partial.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
struct FileConfig {
    layout: Option<LayoutStyle>,
    leads: Option<u32>,
    units_per_lead: Option<u32>,
    subs_per_unit: Option<u32>,
    color_preset: Option<String>,
    default_scale: Option<f64>,
    max_undo_steps: Option<usize>,
    cell_width_px: Option<f64>,
    cell_height_px: Option<f64>,
    auto_save: Option<bool>,
}

/// Resolved configuration: defaults, then file, then `ORBAT__*` env, then flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub filename: Option<PathBuf>,
    pub layout: LayoutStyle,
    pub init_params: InitParams,
    pub color_preset: ColorPresetId,
    pub default_scale: f64,
    pub max_undo_steps: usize,
    pub cell_width_px: f64,
    pub cell_height_px: f64,
    pub auto_save: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            filename: None,
            layout: LayoutStyle::default(),
            init_params: InitParams::default(),
            color_preset: ColorPresetId::default(),
            default_scale: DEFAULT_SCALE,
            max_undo_steps: DEFAULT_MAX_UNDO,
            cell_width_px: DEFAULT_CELL_WIDTH_PX,
            cell_height_px: DEFAULT_CELL_HEIGHT_PX,
            auto_save: DEFAULT_AUTO_SAVE,
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Terminal ORBAT editor", long_about = None)]
pub struct CliArgs {
    /// ORBAT JSON document to open
    pub filename: Option<PathBuf>,

    /// Path to a custom configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Lead count for a fresh document
    #[arg(long)]
    pub leads: Option<u32>,
    /// Units per lead for a fresh document
    #[arg(long)]
    pub units: Option<u32>,
    /// Subs per unit for a fresh document
    #[arg(long)]
    pub subs: Option<u32>,

    #[arg(long)]
    pub color_preset: Option<String>,
    #[arg(long)]
    pub max_undo_steps: Option<usize>,
    #[arg(long)]
    pub auto_save: Option<bool>,

    /// Write the document as JSON and exit
    #[arg(long)]
    pub export_json: Option<PathBuf>,
    /// Write the board as SVG and exit
    #[arg(long)]
    pub export_svg: Option<PathBuf>,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub debug_config: bool,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl CliArgs {
    pub fn is_headless(&self) -> bool {
        self.export_json.is_some() || self.export_svg.is_some() || self.debug_config
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_DIR_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn load_config(args: &CliArgs) -> Result<AppConfig, ConfigError> {
    let env_source = Environment::with_prefix(ENV_PREFIX).separator("__");
    let env_map: Map<String, Value> = env_source.collect().unwrap_or_else(|_| Map::new());
    build_config(args, Some(env_map))
}

/// Builds the configuration from explicit overrides instead of the process
/// environment, so layering can be tested.
pub fn build_config(
    args: &CliArgs,
    override_source: Option<Map<String, Value>>,
) -> Result<AppConfig, ConfigError> {
    let config_file_path = args.config.clone().or_else(default_config_path);

    let mut builder = ConfigCrate::builder();
    if let Some(ref path) = config_file_path {
        builder = builder.add_source(File::from(path.clone()).required(false));
    }
    if let Some(overrides) = override_source {
        for (key, value) in overrides {
            builder = builder.set_override(&key, value)?;
        }
    }

    let loaded: FileConfig = builder.build()?.try_deserialize()?;
    let defaults = AppConfig::default();

    let init_params = InitParams {
        lead_count: args
            .leads
            .or(loaded.leads)
            .unwrap_or(defaults.init_params.lead_count),
        units_per_lead: args
            .units
            .or(loaded.units_per_lead)
            .unwrap_or(defaults.init_params.units_per_lead),
        subs_per_unit: args
            .subs
            .or(loaded.subs_per_unit)
            .unwrap_or(defaults.init_params.subs_per_unit),
        ..defaults.init_params
    }
    .clamped();

    let config = AppConfig {
        filename: args.filename.clone(),
        layout: loaded.layout.unwrap_or(defaults.layout),
        init_params,
        color_preset: args
            .color_preset
            .as_deref()
            .or(loaded.color_preset.as_deref())
            .map(ColorPresetId::parse_lenient)
            .unwrap_or(defaults.color_preset),
        default_scale: loaded.default_scale.unwrap_or(defaults.default_scale),
        max_undo_steps: args
            .max_undo_steps
            .or(loaded.max_undo_steps)
            .unwrap_or(defaults.max_undo_steps),
        cell_width_px: loaded.cell_width_px.unwrap_or(defaults.cell_width_px),
        cell_height_px: loaded.cell_height_px.unwrap_or(defaults.cell_height_px),
        auto_save: args
            .auto_save
            .or(loaded.auto_save)
            .unwrap_or(defaults.auto_save),
    };

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let style = &config.layout;
    if style.node_w <= 0.0 || style.node_h <= 0.0 {
        return Err(ConfigError::ValidationError(
            "layout.node_w and layout.node_h must be positive".to_string(),
        ));
    }
    if !(MIN_SCALE..=MAX_SCALE).contains(&config.default_scale) {
        return Err(ConfigError::ValidationError(format!(
            "default_scale must be between {MIN_SCALE} and {MAX_SCALE}"
        )));
    }
    if config.cell_width_px <= 0.0 || config.cell_height_px <= 0.0 {
        return Err(ConfigError::ValidationError(
            "cell sizes must be positive".to_string(),
        ));
    }
    if config.max_undo_steps == 0 {
        return Err(ConfigError::ValidationError(
            "max_undo_steps must be at least 1".to_string(),
        ));
    }
    Ok(())
}

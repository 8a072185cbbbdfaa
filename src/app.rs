use crate::config::{AppConfig, MAX_SCALE, MIN_SCALE, SCALE_STEP};
use crate::errors::{OrbatError, OrbatResult};
use crate::io::{self, EditorState, OrbatExportFile};
use crate::layout::{compute_layout, BoardLayout, LayoutMode};
use crate::model::{LabelField, NodeId, OrbatDoc, OrbatNode};
use crate::ordering::DragContext;
use crate::preset::{build_initial_orbat, InitParams, UnitRailDirection};
use crate::theme::ColorPresetId;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    EditLabel {
        field: LabelField,
        buffer: String,
        cursor_pos: usize,
    },
    Help,
    Preview,
}

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    doc: OrbatDoc,
    selected_id: Option<NodeId>,
}

struct LayoutCache {
    revision: u64,
    mode: LayoutMode,
    layout: Rc<BoardLayout>,
}

pub struct AppState {
    pub running: bool,
    pub mode: AppMode,
    pub doc: OrbatDoc,
    pub selected_id: Option<NodeId>,
    pub scale: f64,
    pub color_preset: ColorPresetId,
    pub init_params: InitParams,
    pub unit_rail_direction: UnitRailDirection,
    pub config: AppConfig,
    pub filename: Option<PathBuf>,
    pub drag: Option<DragContext>,
    pub show_outline: bool,

    // Viewport, in terminal cells
    pub viewport_top: f64,
    pub viewport_left: f64,
    pub terminal_width: u16,
    pub terminal_height: u16,

    pub message: Option<String>,
    pub is_dirty: bool,
    pub last_modify_time: Option<Instant>,
    pub last_save_time: Option<Instant>,

    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    revision: u64,
    layout_cache: Option<LayoutCache>,
}

/// Snaps `scale` to the zoom grid inside the allowed range.
pub fn clamp_scale(scale: f64) -> f64 {
    let snapped = (scale / SCALE_STEP).round() * SCALE_STEP;
    let rounded = (snapped * 100.0).round() / 100.0;
    rounded.max(MIN_SCALE).min(MAX_SCALE)
}

impl AppState {
    /// A session holding a freshly generated document from `config.init_params`.
    pub fn new(config: AppConfig) -> Self {
        let init = build_initial_orbat(config.init_params);
        Self {
            running: true,
            mode: AppMode::Normal,
            doc: init.doc,
            selected_id: init.selected_id,
            scale: clamp_scale(config.default_scale),
            color_preset: config.color_preset,
            init_params: config.init_params,
            unit_rail_direction: config.init_params.unit_rail_direction,
            filename: config.filename.clone(),
            config,
            drag: None,
            show_outline: true,
            viewport_top: 0.0,
            viewport_left: 0.0,
            terminal_width: 80,
            terminal_height: 24,
            message: None,
            is_dirty: false,
            last_modify_time: None,
            last_save_time: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            revision: 0,
            layout_cache: None,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Marks the document as changed. Every mutation of `doc` goes through here.
    pub fn touch(&mut self) {
        self.revision += 1;
        self.is_dirty = true;
        self.last_modify_time = Some(Instant::now());
    }

    /// Layout for the current document, recomputed only when the document
    /// revision or the mode changed since the last call.
    pub fn layout(&mut self, mode: LayoutMode) -> Rc<BoardLayout> {
        if let Some(cache) = &self.layout_cache {
            if cache.revision == self.revision && cache.mode == mode {
                return Rc::clone(&cache.layout);
            }
        }

        let layout = Rc::new(compute_layout(&self.doc, &self.config.layout, mode));
        debug!(revision = self.revision, ?mode, slots = layout.slots.len(), "layout recomputed");
        self.layout_cache = Some(LayoutCache {
            revision: self.revision,
            mode,
            layout: Rc::clone(&layout),
        });
        layout
    }

    pub fn selected_node(&self) -> Option<&OrbatNode> {
        self.selected_id.as_deref().and_then(|id| self.doc.get(id))
    }

    pub fn select(&mut self, id: impl Into<NodeId>) {
        self.selected_id = Some(id.into());
    }

    // --- History ---

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            doc: self.doc.clone(),
            selected_id: self.selected_id.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.doc = snapshot.doc;
        self.selected_id = snapshot.selected_id;
        self.drag = None;
        self.touch();
    }

    /// Records the current document before a structural edit.
    pub fn push_history(&mut self) {
        self.redo_stack.clear();
        self.undo_stack.push(self.snapshot());
        if self.undo_stack.len() > self.config.max_undo_steps {
            self.undo_stack.remove(0);
        }
    }

    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.redo_stack.push(self.snapshot());
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push(self.snapshot());
                self.restore(next);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    // --- View ---

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = clamp_scale(scale);
    }

    /// Terminal cell size in logical pixels at the current zoom.
    pub fn cell_size(&self) -> (f64, f64) {
        (
            self.config.cell_width_px / self.scale,
            self.config.cell_height_px / self.scale,
        )
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    // --- Persistence ---

    pub fn editor_state(&self) -> EditorState {
        EditorState {
            init_params: self.init_params,
            unit_rail_direction: self.unit_rail_direction,
            nodes: self.doc.nodes.clone(),
            parent_by_id: self.doc.parent_by_id.clone(),
            children_order: self.doc.children_order.clone(),
            selected_id: self.selected_id.clone(),
            scale: self.scale,
            color_preset_id: self.color_preset,
        }
    }

    pub fn export_file(&self) -> OrbatExportFile {
        OrbatExportFile::new(self.editor_state())
    }

    /// Replaces the whole session with an imported state.
    pub fn apply_editor_state(&mut self, state: EditorState) {
        self.init_params = state.init_params.clamped();
        self.unit_rail_direction = state.unit_rail_direction;
        self.scale = clamp_scale(state.scale);
        self.color_preset = state.color_preset_id;
        let selected = state.selected_id.clone();
        self.doc = state.into_doc();
        self.selected_id = selected.filter(|id| self.doc.contains(id));
        self.drag = None;
        self.mode = AppMode::Normal;
        self.touch();
    }

    /// Loads `path`. On failure the current document is left untouched.
    pub fn load_file(&mut self, path: &Path) -> OrbatResult<()> {
        let file = io::load_export_file(path)?;
        self.apply_editor_state(file.state);
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.filename = Some(path.to_path_buf());
        self.is_dirty = false;
        Ok(())
    }

    /// Saves to the current file name.
    pub fn save(&mut self) -> OrbatResult<PathBuf> {
        let path = self.filename.clone().ok_or(OrbatError::NoFileName)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&mut self, path: &Path) -> OrbatResult<()> {
        io::save_export_file(&self.export_file(), path)?;
        self.is_dirty = false;
        self.last_save_time = Some(Instant::now());
        Ok(())
    }
}

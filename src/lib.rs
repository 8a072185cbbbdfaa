pub mod app;
pub mod config;
pub mod errors;
pub mod io;
pub mod layout;
pub mod links;
pub mod model;
pub mod mutation;
pub mod ordering;
pub mod preset;
pub mod svg;
pub mod theme;
pub mod tree;
pub mod ui;

// Internal modules
pub mod actions;
pub mod event;

// Re-export commonly used types
pub use app::{AppMode, AppState};
pub use config::AppConfig;
pub use errors::{OrbatError, OrbatResult};
pub use layout::{compute_layout, BoardLayout, LayoutMode, LayoutStyle};
pub use model::{NodeId, NodeLevel, OrbatDoc, OrbatNode, UnitKind};

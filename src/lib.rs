//! Derives a yearly "Wrapped" report from a collaborative playlist export.
//!
//! Loading is done through an [`loader::EntrySource`]; the report itself is a pure
//! function of the loaded entries, see [`analytics::compute`].

pub mod analytics;
pub mod config;
pub mod loader;
pub mod models;

pub use analytics::{AnalysisSettings, Wrapped, WrappedAnalyzer, WrappedReport, compute};
pub use loader::{EntrySource, LoadError};
pub use models::PlaylistEntry;

//! Project database integration and project layout definitions.
//!
//! The project database is a local SQLite file holding:
//! - Projects (name, kind, free-form settings)
//! - Analysis results (complexity scores and findings) per revision
//! - Project metrics (code tree, dependency graph, performance) per revision
//!
//! Findings and metrics are stored in separate tables, mirroring how the
//! realtime layer reports them as two independent streams.

pub mod config;
pub mod context;
pub mod layout;
pub mod models;
pub mod project_db;
pub mod util;

pub use config::*;
pub use context::*;
pub use layout::*;
pub use models::*;
pub use project_db::*;
pub use util::*;

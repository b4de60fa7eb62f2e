use serde::{Deserialize, Serialize};

use crate::model::AnalysisOptions;
use crate::store::WidgetSettings;

/// Database location, as recorded in the project config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Relative paths resolve against the project root.
    pub path: String,
}

impl DbConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Contents of `.codescope/project.json`: identity, DB location, analysis
/// defaults and local widget overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub description: Option<String>,
    /// Version of this file's format (the DB has its own `user_version`).
    pub config_version: String,
    pub db: DbConfig,
    /// Id of the project row in the database. Resolved on first open when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Language/kind label recorded for the project (e.g. "python").
    #[serde(default = "default_project_kind")]
    pub kind: String,
    /// Analysis sections enabled when the CLI is not told otherwise.
    #[serde(default)]
    pub analysis: AnalysisOptions,
    /// Local widget display overrides. Never written to the project database.
    #[serde(default)]
    pub widgets: WidgetSettings,
}

fn default_project_kind() -> String {
    "python".to_string()
}

impl ProjectConfig {
    pub fn new(name: impl Into<String>, db_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_version: "0.1.0".to_string(),
            db: DbConfig::new(db_path),
            project_id: None,
            kind: default_project_kind(),
            analysis: AnalysisOptions::default(),
            widgets: WidgetSettings::default(),
        }
    }
}

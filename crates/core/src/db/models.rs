use serde::{Deserialize, Serialize};

use crate::model::Revision;

/// Record describing a project known to the database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectRecord {
    /// Row id; `None` until the record has been inserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Human-friendly name (e.g., "Default Project").
    pub name: String,
    /// Language/kind label (e.g., "python").
    pub kind: String,
    /// Free-form settings captured at creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
    /// RFC 3339 creation timestamp; filled in by the database layer.
    #[serde(default)]
    pub created_at: String,
}

impl ProjectRecord {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind: kind.into(),
            settings: None,
            created_at: String::new(),
        }
    }

    /// Builder-style helper to attach settings when constructing a record.
    pub fn with_settings(mut self, settings: Option<serde_json::Value>) -> Self {
        self.settings = settings;
        self
    }
}

/// Summary row for one persisted analysis, used for history listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisRunRecord {
    pub project_id: i64,
    pub revision: Revision,
    pub source_digest: String,
    pub lines_of_code: u32,
    pub finding_count: u32,
    pub created_at: String,
}

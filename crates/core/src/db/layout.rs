use std::path::{Path, PathBuf};

use crate::model::Revision;

/// Where a codescope project keeps its files, relative to one root.
///
/// Pure path arithmetic; directories are created by `init-project`.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub root: PathBuf,
    /// Directory for internal metadata (.codescope).
    pub meta_dir: PathBuf,
    /// `.codescope/project.json`.
    pub project_config_path: PathBuf,
    /// `.codescope/project.db`.
    pub db_path: PathBuf,
    /// Directory for exported analysis reports (reports).
    pub reports_dir: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".codescope");
        let project_config_path = meta_dir.join("project.json");
        let db_path = meta_dir.join("project.db");
        let reports_dir = root.join("reports");

        Self { root, meta_dir, project_config_path, db_path, reports_dir }
    }

    /// DB path as written into `project.json`: relative to `root` when possible.
    pub fn db_path_relative_string(&self) -> String {
        match self.db_path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => self.db_path.to_string_lossy().to_string(),
        }
    }

    /// Path of the exported report for a revision (`reports/analysis-<n>.<ext>`).
    pub fn report_path(&self, revision: Revision, extension: &str) -> PathBuf {
        self.reports_dir.join(format!("analysis-{}.{extension}", revision.0))
    }
}

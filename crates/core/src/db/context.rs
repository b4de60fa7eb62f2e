use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::dashboard::Dashboard;
use crate::db::{open_project_db, save_project_config, ProjectConfig, ProjectDb, ProjectLayout};
use crate::gateway::SqliteGateway;
use crate::model::ProjectId;

/// Layout, config and an open gateway for one project root.
#[derive(Debug)]
pub struct ProjectContext {
    pub layout: ProjectLayout,
    pub config: ProjectConfig,
    pub db_path: PathBuf,
    pub project: ProjectId,
    pub gateway: SqliteGateway,
}

impl ProjectContext {
    /// Load project config, open the database and resolve the project row.
    ///
    /// A config without a `project_id` gets the most recent project row, or a
    /// freshly created default one.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let layout = ProjectLayout::new(root);
        let (config, db_path, db) = open_project_db(&layout)?;
        let row_id = match config.project_id.as_deref() {
            Some(id) => id
                .parse::<i64>()
                .with_context(|| format!("Invalid project id '{id}' in project config"))?,
            None => db
                .ensure_default_project(&config.kind)
                .context("Failed to resolve default project")?,
        };
        debug!(row_id, db = %db_path.display(), "opened project context");
        let gateway = SqliteGateway::new(db);
        let project = ProjectId::new(row_id.to_string());
        gateway.resolve(&project).context("Project row referenced by config is missing")?;
        Ok(Self { layout, config, db_path, project, gateway })
    }

    pub fn db(&self) -> &ProjectDb {
        self.gateway.db()
    }

    /// A dashboard bound to this project, seeded with the configured widget settings.
    pub fn dashboard(&self) -> Dashboard<&SqliteGateway> {
        Dashboard::new(&self.gateway, self.project.clone(), self.config.widgets)
    }

    pub fn save_config(&self) -> Result<()> {
        save_project_config(&self.layout, &self.config)
    }
}

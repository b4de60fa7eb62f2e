use tracing::debug;

use crate::db::ProjectDb;
use crate::gateway::{
    publish_saved, GatewayError, GatewayResult, PersistenceGateway, Subscription, UpdateHub,
};
use crate::model::{ProjectId, ProjectMetrics, ResultRecord, Revision};

/// Gateway backed by the local project database.
///
/// Realtime notifications are in-process: every subscriber obtained from the
/// same gateway sees saves made through it.
#[derive(Debug)]
pub struct SqliteGateway {
    db: ProjectDb,
    hub: UpdateHub,
}

impl SqliteGateway {
    pub fn new(db: ProjectDb) -> Self {
        Self { db, hub: UpdateHub::new() }
    }

    pub fn db(&self) -> &ProjectDb {
        &self.db
    }

    /// Resolve an opaque project id to an existing project row id.
    pub fn resolve(&self, project: &ProjectId) -> GatewayResult<i64> {
        let id: i64 = project
            .as_str()
            .parse()
            .map_err(|_| GatewayError::UnknownProject(project.clone()))?;
        match self.db.get_project(id)? {
            Some(_) => Ok(id),
            None => Err(GatewayError::UnknownProject(project.clone())),
        }
    }
}

impl PersistenceGateway for SqliteGateway {
    fn fetch_latest_result(
        &self,
        project: &ProjectId,
    ) -> GatewayResult<Option<(Revision, ResultRecord)>> {
        let id = self.resolve(project)?;
        Ok(self.db.latest_analysis(id)?)
    }

    fn fetch_latest_metrics(
        &self,
        project: &ProjectId,
    ) -> GatewayResult<Option<(Revision, ProjectMetrics)>> {
        let id = self.resolve(project)?;
        Ok(self.db.latest_metrics(id)?)
    }

    fn fetch_latest_revision(&self, project: &ProjectId) -> GatewayResult<Revision> {
        let id = self.resolve(project)?;
        Ok(self.db.max_revision(id)?)
    }

    fn save_result(
        &self,
        project: &ProjectId,
        revision: Revision,
        record: &ResultRecord,
    ) -> GatewayResult<()> {
        let id = self.resolve(project)?;
        self.db.insert_analysis(id, revision, record)?;
        debug!(%project, %revision, "persisted analysis");
        publish_saved(&self.hub, project, revision, record);
        Ok(())
    }

    fn subscribe(&self, project: &ProjectId) -> GatewayResult<Subscription> {
        self.resolve(project)?;
        Ok(self.hub.subscribe(project))
    }
}

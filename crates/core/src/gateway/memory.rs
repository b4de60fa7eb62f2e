use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::gateway::{
    publish_saved, GatewayError, GatewayResult, PersistenceGateway, Subscription, UpdateHub,
};
use crate::model::{ProjectId, ProjectMetrics, ResultRecord, Revision};

/// Volatile gateway keeping the latest record per project in memory.
///
/// Saves can be made to fail on demand, which is how callers exercise the
/// "shown locally but not saved" path.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    latest: Mutex<HashMap<ProjectId, (Revision, ResultRecord)>>,
    hub: UpdateHub,
    fail_saves: AtomicBool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `save_result` calls fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Push an update to subscribers as if another client had saved it.
    ///
    /// The stored latest record is only replaced when `revision` is newer.
    pub fn inject(&self, project: &ProjectId, revision: Revision, record: ResultRecord) {
        {
            let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
            let newer = latest.get(project).map_or(true, |(current, _)| revision > *current);
            if newer {
                latest.insert(project.clone(), (revision, record.clone()));
            }
        }
        publish_saved(&self.hub, project, revision, &record);
    }

    pub fn hub(&self) -> &UpdateHub {
        &self.hub
    }
}

impl PersistenceGateway for MemoryGateway {
    fn fetch_latest_result(
        &self,
        project: &ProjectId,
    ) -> GatewayResult<Option<(Revision, ResultRecord)>> {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(latest.get(project).cloned())
    }

    fn fetch_latest_metrics(
        &self,
        project: &ProjectId,
    ) -> GatewayResult<Option<(Revision, ProjectMetrics)>> {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(latest.get(project).map(|(rev, record)| (*rev, record.metrics())))
    }

    fn fetch_latest_revision(&self, project: &ProjectId) -> GatewayResult<Revision> {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(latest.get(project).map_or(Revision::ZERO, |(rev, _)| *rev))
    }

    fn save_result(
        &self,
        project: &ProjectId,
        revision: Revision,
        record: &ResultRecord,
    ) -> GatewayResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("memory gateway is rejecting saves".into()));
        }
        self.inject(project, revision, record.clone());
        Ok(())
    }

    fn subscribe(&self, project: &ProjectId) -> GatewayResult<Subscription> {
        Ok(self.hub.subscribe(project))
    }
}

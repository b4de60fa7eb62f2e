//! Persistence gateway: durable storage of result records plus realtime
//! notification of changes, keyed by an opaque project id.
//!
//! Realtime updates are delivered as revision-tagged messages over a channel.
//! A [`Subscription`] owns the receiving end; dropping it unsubscribes.

mod memory;
mod sqlite;

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

pub use memory::MemoryGateway;
pub use sqlite::SqliteGateway;

use crate::db::DbError;
use crate::model::{ProjectId, ProjectMetrics, ResultRecord, Revision};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Project database error: {0}")]
    Db(#[from] DbError),

    #[error("Unknown project: {0}")]
    UnknownProject(ProjectId),

    /// Storage could not be reached (network, disk, injected failure).
    #[error("Persistence unavailable: {0}")]
    Unavailable(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Revision-tagged change pushed to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteUpdate {
    Result { revision: Revision, record: ResultRecord },
    Metrics { revision: Revision, metrics: ProjectMetrics },
}

impl RemoteUpdate {
    pub fn revision(&self) -> Revision {
        match self {
            RemoteUpdate::Result { revision, .. } | RemoteUpdate::Metrics { revision, .. } => {
                *revision
            }
        }
    }
}

/// Storage and change-notification backend consumed by the dashboard.
///
/// Authentication and project resolution are the implementation's concern;
/// callers only hand over an opaque [`ProjectId`].
pub trait PersistenceGateway {
    fn fetch_latest_result(&self, project: &ProjectId)
        -> GatewayResult<Option<(Revision, ResultRecord)>>;

    fn fetch_latest_metrics(
        &self,
        project: &ProjectId,
    ) -> GatewayResult<Option<(Revision, ProjectMetrics)>>;

    /// Highest revision stored for the project, `Revision::ZERO` when empty.
    fn fetch_latest_revision(&self, project: &ProjectId) -> GatewayResult<Revision>;

    /// Store `record` under `revision` and notify subscribers of the project.
    fn save_result(
        &self,
        project: &ProjectId,
        revision: Revision,
        record: &ResultRecord,
    ) -> GatewayResult<()>;

    fn subscribe(&self, project: &ProjectId) -> GatewayResult<Subscription>;
}

impl<T: PersistenceGateway + ?Sized> PersistenceGateway for &T {
    fn fetch_latest_result(
        &self,
        project: &ProjectId,
    ) -> GatewayResult<Option<(Revision, ResultRecord)>> {
        (**self).fetch_latest_result(project)
    }

    fn fetch_latest_metrics(
        &self,
        project: &ProjectId,
    ) -> GatewayResult<Option<(Revision, ProjectMetrics)>> {
        (**self).fetch_latest_metrics(project)
    }

    fn fetch_latest_revision(&self, project: &ProjectId) -> GatewayResult<Revision> {
        (**self).fetch_latest_revision(project)
    }

    fn save_result(
        &self,
        project: &ProjectId,
        revision: Revision,
        record: &ResultRecord,
    ) -> GatewayResult<()> {
        (**self).save_result(project, revision, record)
    }

    fn subscribe(&self, project: &ProjectId) -> GatewayResult<Subscription> {
        (**self).subscribe(project)
    }
}

/// Receiving end of a realtime subscription.
#[derive(Debug)]
pub struct Subscription {
    project: ProjectId,
    rx: Receiver<RemoteUpdate>,
}

impl Subscription {
    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    /// Next pending update without blocking. `None` when nothing is queued
    /// or the publisher is gone.
    pub fn try_next(&self) -> Option<RemoteUpdate> {
        match self.rx.try_recv() {
            Ok(update) => Some(update),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// All currently queued updates, in publish order.
    pub fn drain(&self) -> Vec<RemoteUpdate> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Stop receiving updates. Equivalent to dropping the subscription.
    pub fn unsubscribe(self) {}
}

/// In-process fan-out of updates to subscribers, filtered by project.
///
/// Senders whose receiver was dropped are pruned on the next publish.
#[derive(Debug, Default)]
pub struct UpdateHub {
    senders: Mutex<Vec<(ProjectId, Sender<RemoteUpdate>)>>,
}

impl UpdateHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, project: &ProjectId) -> Subscription {
        let (tx, rx) = mpsc::channel();
        self.senders.lock().unwrap_or_else(PoisonError::into_inner).push((project.clone(), tx));
        Subscription { project: project.clone(), rx }
    }

    /// Deliver `update` to every live subscriber of `project`.
    pub fn publish(&self, project: &ProjectId, update: RemoteUpdate) {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        senders.retain(|(target, tx)| target != project || tx.send(update.clone()).is_ok());
    }

    /// Number of subscriber slots still registered (including not yet pruned ones).
    pub fn subscriber_count(&self) -> usize {
        self.senders.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Publish the result and metrics echoes for a freshly saved record.
pub(crate) fn publish_saved(
    hub: &UpdateHub,
    project: &ProjectId,
    revision: Revision,
    record: &ResultRecord,
) {
    hub.publish(project, RemoteUpdate::Result { revision, record: record.clone() });
    hub.publish(project, RemoteUpdate::Metrics { revision, metrics: record.metrics() });
}

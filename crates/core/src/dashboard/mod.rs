//! Dashboard context: ties a result store to a persistence gateway for one
//! project.
//!
//! The context is created explicitly, passed by reference to whatever drives
//! it, and torn down with [`Dashboard::shutdown`]. Lifecycle:
//! `new -> mount -> (submit | sync | update settings)* -> shutdown`.

use tracing::{debug, info, warn};

use crate::gateway::{GatewayError, GatewayResult, PersistenceGateway, RemoteUpdate, Subscription};
use crate::model::{AnalysisOptions, ProjectId, Revision};
use crate::store::{ResultStore, WidgetSettings};

/// Result of [`Dashboard::submit`].
///
/// The local record is current regardless of `persisted`; a persistence error
/// must be shown to the user, not swallowed.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub revision: Revision,
    pub persisted: Result<(), GatewayError>,
}

impl SubmitOutcome {
    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }
}

pub struct Dashboard<G: PersistenceGateway> {
    gateway: G,
    project: ProjectId,
    store: ResultStore,
    subscription: Option<Subscription>,
}

impl<G: PersistenceGateway> Dashboard<G> {
    pub fn new(gateway: G, project: ProjectId, settings: WidgetSettings) -> Self {
        Self { gateway, project, store: ResultStore::new(settings), subscription: None }
    }

    /// Initial fetch plus realtime subscription.
    ///
    /// The loading flags are cleared even when the fetch fails, so widgets fall
    /// back to their "no data" state instead of loading forever.
    pub fn mount(&mut self) -> GatewayResult<()> {
        let fetched = self.gateway.fetch_latest_result(&self.project).and_then(|result| {
            Ok((result, self.gateway.fetch_latest_metrics(&self.project)?))
        });
        match fetched {
            Ok((result, metrics)) => {
                debug!(
                    project = %self.project,
                    has_result = result.is_some(),
                    has_metrics = metrics.is_some(),
                    "hydrating dashboard"
                );
                self.store.hydrate(result, metrics);
            }
            Err(err) => {
                warn!(project = %self.project, error = %err, "initial fetch failed");
                self.store.hydrate(None, None);
                return Err(err);
            }
        }

        let subscription = self.gateway.subscribe(&self.project)?;
        self.subscription = Some(subscription);
        self.store.set_live(true);
        info!(project = %self.project, revision = %self.store.revision(), "dashboard mounted");
        Ok(())
    }

    /// Score `text` locally, then persist it.
    ///
    /// The revision is allocated past the highest one the gateway holds, even
    /// when `mount` failed. If that revision cannot be read the record stays
    /// local and the read error is reported instead of saving.
    pub fn submit(&mut self, text: &str, options: &AnalysisOptions) -> SubmitOutcome {
        let latest = self.gateway.fetch_latest_revision(&self.project);
        if let Ok(latest) = &latest {
            self.store.observe_revision(*latest);
        }
        let (revision, record) = self.store.submit(text, options);
        let persisted = match latest {
            Ok(_) => self.gateway.save_result(&self.project, revision, &record),
            Err(err) => Err(err),
        };
        if let Err(err) = &persisted {
            warn!(%revision, error = %err, "analysis shown locally but not saved");
        }
        SubmitOutcome { revision, persisted }
    }

    /// Apply every queued realtime update. Returns how many changed the store.
    pub fn sync(&mut self) -> usize {
        let Some(subscription) = &self.subscription else {
            return 0;
        };
        let mut applied = 0;
        for update in subscription.drain() {
            let changed = match update {
                RemoteUpdate::Result { revision, record } => {
                    self.store.apply_remote_result(revision, record)
                }
                RemoteUpdate::Metrics { revision, metrics } => {
                    self.store.apply_remote_metrics(revision, metrics)
                }
            };
            if changed {
                applied += 1;
            }
        }
        applied
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ResultStore {
        &mut self.store
    }

    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn is_live(&self) -> bool {
        self.subscription.is_some()
    }

    /// Drop the realtime subscription and hand back the final store state.
    pub fn shutdown(mut self) -> ResultStore {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.store.set_live(false);
        debug!(project = %self.project, "dashboard shut down");
        self.store
    }
}

//! Result store: the single owner of the current analysis result, the widget
//! display settings, the per-widget loading flags and the tree selection.
//!
//! All mutation goes through `&mut ResultStore`. Every mutation builds the
//! complete next state first and only then notifies subscribers, so a
//! subscriber never sees a record without the loading flags that changed with it.

mod settings;

use std::sync::Arc;

use tracing::debug;

pub use settings::{
    CodeTreeSettings, ComplexitySettings, DependencySettings, LoadingFlags, PerformanceSettings,
    SettingsError, SettingsRecord, WidgetKind, WidgetSettings,
};

use crate::analysis;
use crate::model::{AnalysisOptions, ProjectMetrics, ResultRecord, Revision};

/// What a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A new record became current (local submit or remote echo).
    Record,
    /// Initial fetch applied; loading flags cleared in the same step.
    Hydrated,
    Settings(WidgetKind),
    Loading(WidgetKind),
    Selection,
    Live,
}

/// Consistent view of the store handed to subscribers and widgets.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub revision: Revision,
    pub record: Option<Arc<ResultRecord>>,
    /// Record that was current before `record`, used for trends.
    pub previous: Option<Arc<ResultRecord>>,
    pub settings: WidgetSettings,
    pub loading: LoadingFlags,
    pub selected_node: Option<String>,
    /// True while a realtime subscription is attached.
    pub live: bool,
}

/// Handle returned by [`ResultStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Callback = Box<dyn FnMut(&Snapshot, Change)>;

pub struct ResultStore {
    state: Snapshot,
    /// Highest revision observed locally or from the gateway.
    high_water: Revision,
    /// Metrics echo for a revision whose result has not arrived yet. Never
    /// visible to subscribers; merged when the matching result is applied.
    pending_metrics: Option<(Revision, ProjectMetrics)>,
    subscribers: Vec<(SubscriberId, Callback)>,
    next_subscriber: u64,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new(WidgetSettings::default())
    }
}

impl ResultStore {
    pub fn new(settings: WidgetSettings) -> Self {
        Self {
            state: Snapshot { settings, ..Snapshot::default() },
            high_water: Revision::ZERO,
            pending_metrics: None,
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    pub fn current(&self) -> Option<&Arc<ResultRecord>> {
        self.state.record.as_ref()
    }

    pub fn revision(&self) -> Revision {
        self.state.revision
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.state.settings
    }

    pub fn is_loading(&self, widget: WidgetKind) -> bool {
        self.state.loading.get(widget)
    }

    /// Revision of metrics held back until their result arrives.
    pub fn pending_metrics_revision(&self) -> Option<Revision> {
        self.pending_metrics.as_ref().map(|(revision, _)| *revision)
    }

    /// Record a revision known to exist elsewhere so the next local submit
    /// allocates past it. Nothing becomes current and no one is notified.
    pub fn observe_revision(&mut self, revision: Revision) {
        self.observe(revision);
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&Snapshot, Change) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Score `text` and make the result current under a fresh revision.
    pub fn submit(
        &mut self,
        text: &str,
        options: &AnalysisOptions,
    ) -> (Revision, Arc<ResultRecord>) {
        let record = Arc::new(analysis::score(text, options));
        let revision = self.high_water.next();
        self.replace_record(revision, Arc::clone(&record));
        debug!(%revision, "submitted analysis");
        self.notify(Change::Record);
        (revision, record)
    }

    /// Merge one key into one widget's settings.
    pub fn update_setting(
        &mut self,
        widget: WidgetKind,
        key: &str,
        value: bool,
    ) -> Result<(), SettingsError> {
        self.state.settings.set(widget, key, value)?;
        self.notify(Change::Settings(widget));
        Ok(())
    }

    pub fn set_loading(&mut self, widget: WidgetKind, loading: bool) {
        self.state.loading.set(widget, loading);
        self.notify(Change::Loading(widget));
    }

    /// Single selection; the last call wins. `None` clears it.
    pub fn select_node(&mut self, node_id: Option<String>) {
        self.state.selected_node = node_id;
        self.notify(Change::Selection);
    }

    pub fn set_live(&mut self, live: bool) {
        if self.state.live != live {
            self.state.live = live;
            self.notify(Change::Live);
        }
    }

    /// Apply the initial fetch and clear every loading flag in one notification.
    ///
    /// Anything older than what is already current is ignored, but the loading
    /// flags are cleared regardless. Metrics newer than the fetched result are
    /// held back until that revision's result arrives.
    pub fn hydrate(
        &mut self,
        result: Option<(Revision, ResultRecord)>,
        metrics: Option<(Revision, ProjectMetrics)>,
    ) {
        let mut metrics = metrics;
        if let Some((revision, record)) = result {
            if revision > self.state.revision {
                let record = match metrics.take() {
                    Some((metrics_rev, metrics)) if metrics_rev == revision => {
                        record.with_metrics(metrics)
                    }
                    other => {
                        metrics = other;
                        record
                    }
                };
                self.replace_record(revision, Arc::new(record));
            }
        }
        if let Some((revision, metrics)) = metrics {
            self.hold_metrics(revision, metrics);
        }
        self.state.loading = LoadingFlags::all(false);
        self.notify(Change::Hydrated);
    }

    /// Apply a full record pushed by the gateway. Returns `true` if applied.
    ///
    /// Only strictly newer revisions win; our own echoes and late echoes of
    /// earlier submits are dropped.
    pub fn apply_remote_result(&mut self, revision: Revision, record: ResultRecord) -> bool {
        self.observe(revision);
        if revision <= self.state.revision {
            debug!(%revision, current = %self.state.revision, "discarding stale result echo");
            return false;
        }
        let record = match self.pending_metrics.take() {
            Some((pending_rev, metrics)) if pending_rev == revision => record.with_metrics(metrics),
            other => {
                self.pending_metrics = other;
                record
            }
        };
        self.replace_record(revision, Arc::new(record));
        self.notify(Change::Record);
        true
    }

    /// Apply a metrics slice pushed by the gateway. Returns `true` if the
    /// visible state changed.
    ///
    /// Metrics for the current revision are merged into the current record.
    /// Metrics for a newer revision are held until the matching result
    /// arrives, so subscribers never see a record without its findings.
    pub fn apply_remote_metrics(&mut self, revision: Revision, metrics: ProjectMetrics) -> bool {
        self.observe(revision);
        if revision < self.state.revision {
            debug!(%revision, current = %self.state.revision, "discarding stale metrics echo");
            return false;
        }
        if revision > self.state.revision {
            self.hold_metrics(revision, metrics);
            return false;
        }
        let Some(current) = &self.state.record else {
            return false;
        };
        let next = current.with_metrics(metrics);
        if **current == next {
            return false;
        }
        self.state.record = Some(Arc::new(next));
        self.notify(Change::Record);
        true
    }

    fn hold_metrics(&mut self, revision: Revision, metrics: ProjectMetrics) {
        if revision <= self.state.revision {
            return;
        }
        if self.pending_metrics.as_ref().is_some_and(|(held, _)| *held > revision) {
            return;
        }
        debug!(%revision, "holding metrics until their result arrives");
        self.pending_metrics = Some((revision, metrics));
    }

    fn observe(&mut self, revision: Revision) {
        if revision > self.high_water {
            self.high_water = revision;
        }
    }

    fn replace_record(&mut self, revision: Revision, record: Arc<ResultRecord>) {
        self.observe(revision);
        self.state.previous = self.state.record.take();
        self.state.record = Some(record);
        self.state.revision = revision;
        if self.pending_metrics.as_ref().is_some_and(|(held, _)| *held <= revision) {
            self.pending_metrics = None;
        }
    }

    fn notify(&mut self, change: Change) {
        // Callbacks only get `&Snapshot`, so they cannot re-enter the store.
        let mut subscribers = std::mem::take(&mut self.subscribers);
        for (_, callback) in subscribers.iter_mut() {
            callback(&self.state, change);
        }
        self.subscribers = subscribers;
    }
}

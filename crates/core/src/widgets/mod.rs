//! Widget renderers.
//!
//! Every widget follows the same contract: it reads its slice of the current
//! record, its own settings and its own loading flag from a [`Snapshot`], and
//! produces a plain view value. Widgets never touch the record; the only
//! mutation they may request is a settings change for their own kind.

mod complexity;
mod dependency;
mod performance;
mod tree;

use std::fmt;

pub use complexity::{ComplexityView, ComplexityWidget, MetricRow, Trend};
pub use dependency::{
    DependencyEntry, DependencyGroup, DependencyView, DependencyWidget, ResolvedDependency,
};
pub use performance::{Gauge, PerformanceView, PerformanceWidget};
pub use tree::{CodeTreeWidget, TreeRow, TreeView};

use crate::model::ResultRecord;
use crate::store::{ResultStore, SettingsError, Snapshot, WidgetKind};

/// What a widget shows for a given snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState<V> {
    /// Placeholder content while the initial fetch is outstanding.
    Loading,
    /// No record exists yet.
    NoData,
    Ready(V),
}

impl<V> WidgetState<V> {
    pub fn ready(&self) -> Option<&V> {
        match self {
            WidgetState::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, WidgetState::Loading)
    }
}

impl<V: fmt::Display> fmt::Display for WidgetState<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetState::Loading => writeln!(f, "  ░░░░░░░░ loading…"),
            WidgetState::NoData => writeln!(f, "  (no analysis yet)"),
            WidgetState::Ready(view) => view.fmt(f),
        }
    }
}

pub trait Widget {
    const KIND: WidgetKind;
    const TITLE: &'static str;
    type View;

    /// Build the view from a record that is known to exist.
    fn view(&self, record: &ResultRecord, snapshot: &Snapshot) -> Self::View;

    fn render(&self, snapshot: &Snapshot) -> WidgetState<Self::View> {
        if snapshot.loading.get(Self::KIND) {
            return WidgetState::Loading;
        }
        match &snapshot.record {
            Some(record) => WidgetState::Ready(self.view(record, snapshot)),
            None => WidgetState::NoData,
        }
    }

    /// Change one of this widget's own settings.
    fn update_setting(
        &self,
        store: &mut ResultStore,
        key: &str,
        value: bool,
    ) -> Result<(), SettingsError> {
        store.update_setting(Self::KIND, key, value)
    }
}

/// Render one widget to text, with a heading.
pub fn render_text<W: Widget>(widget: &W, snapshot: &Snapshot) -> String
where
    W::View: fmt::Display,
{
    format!("== {} ==\n{}", W::TITLE, widget.render(snapshot))
}

/// Render all four widgets with fresh local state.
pub fn render_all_text(snapshot: &Snapshot) -> String {
    [
        render_text(&CodeTreeWidget::new(), snapshot),
        render_text(&ComplexityWidget, snapshot),
        render_text(&DependencyWidget, snapshot),
        render_text(&PerformanceWidget, snapshot),
    ]
    .join("\n")
}

/// Render a single widget by kind with fresh local state.
pub fn render_kind_text(kind: WidgetKind, snapshot: &Snapshot) -> String {
    match kind {
        WidgetKind::CodeTree => render_text(&CodeTreeWidget::new(), snapshot),
        WidgetKind::Complexity => render_text(&ComplexityWidget, snapshot),
        WidgetKind::Dependency => render_text(&DependencyWidget, snapshot),
        WidgetKind::Performance => render_text(&PerformanceWidget, snapshot),
    }
}

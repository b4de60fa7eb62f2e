use std::cell::RefCell;
use std::rc::Rc;

use codescope_core::analysis::score;
use codescope_core::model::{AnalysisOptions, ProjectMetrics, ResultRecord, Revision};
use codescope_core::store::{
    Change, ResultStore, SettingsError, Snapshot, WidgetKind, WidgetSettings,
};

type Seen = Rc<RefCell<Vec<(Change, Revision, Option<u32>, bool)>>>;

/// Subscribe a recorder capturing (change, revision, loc, any widget loading).
fn record_changes(store: &mut ResultStore) -> Seen {
    let seen: Seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |snap: &Snapshot, change| {
        let loading = WidgetKind::ALL.iter().any(|kind| snap.loading.get(*kind));
        let loc = snap.record.as_ref().map(|r| r.complexity.lines_of_code);
        sink.borrow_mut().push((change, snap.revision, loc, loading));
    });
    seen
}

#[test]
fn new_store_is_empty_and_loading() {
    let store = ResultStore::default();
    assert!(store.current().is_none());
    assert_eq!(store.revision(), Revision::ZERO);
    for kind in WidgetKind::ALL {
        assert!(store.is_loading(kind), "{kind} should start loading");
    }
}

#[test]
fn second_submit_wins() {
    let mut store = ResultStore::default();
    let (first, _) = store.submit("a\n", &AnalysisOptions::all());
    let (second, installed) = store.submit("a\nb\nc\n", &AnalysisOptions::all());

    assert!(second > first);
    let current = store.current().expect("record");
    assert!(std::sync::Arc::ptr_eq(current, &installed));
    assert_eq!(current.complexity.lines_of_code, 3);
    assert_eq!(store.snapshot().previous.as_ref().map(|p| p.complexity.lines_of_code), Some(1));
}

#[test]
fn late_echo_of_earlier_submit_is_discarded() {
    let mut store = ResultStore::default();
    let (first, _) = store.submit("one\n", &AnalysisOptions::all());
    let first_record = store.current().map(|r| (**r).clone()).expect("first");
    store.submit("one\ntwo\n", &AnalysisOptions::all());

    assert!(!store.apply_remote_result(first, first_record.clone()));
    assert!(!store.apply_remote_metrics(first, first_record.metrics()));
    assert_eq!(store.current().map(|r| r.complexity.lines_of_code), Some(2));
}

#[test]
fn newer_remote_result_replaces_and_bumps_next_revision() {
    let mut store = ResultStore::default();
    store.submit("local\n", &AnalysisOptions::all());

    let remote = score("r1\nr2\nr3\nr4\n", &AnalysisOptions::all());
    assert!(store.apply_remote_result(Revision(10), remote));
    assert_eq!(store.revision(), Revision(10));

    let (next, _) = store.submit("mine\n", &AnalysisOptions::all());
    assert_eq!(next, Revision(11));
}

#[test]
fn metrics_before_result_are_held_until_the_result_arrives() {
    let mut store = ResultStore::default();
    store.submit("old\n", &AnalysisOptions::all());
    let seen = record_changes(&mut store);
    let remote = score("eval(x)\nif y:\n", &AnalysisOptions::all());

    assert!(!store.apply_remote_metrics(Revision(2), remote.metrics()));
    assert!(seen.borrow().is_empty());
    assert_eq!(store.revision(), Revision(1));
    assert_eq!(store.current().map(|r| r.complexity.lines_of_code), Some(1));
    assert_eq!(store.pending_metrics_revision(), Some(Revision(2)));

    assert!(store.apply_remote_result(Revision(2), remote.clone()));
    assert_eq!(store.current().map(|r| (**r).clone()), Some(remote));
    assert_eq!(store.pending_metrics_revision(), None);
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], (Change::Record, Revision(2), Some(2), true));
    let previous = store.snapshot().previous.as_ref().expect("previous");
    assert_eq!(previous.complexity.lines_of_code, 1);
}

#[test]
fn held_metrics_are_merged_into_their_result() {
    let mut store = ResultStore::default();
    let mut metrics = ProjectMetrics::default();
    metrics.performance.memory_usage = 77;

    store.apply_remote_metrics(Revision(3), metrics);
    let remote = score("a\n", &AnalysisOptions::all());
    assert!(store.apply_remote_result(Revision(3), remote));
    assert_eq!(store.current().map(|r| r.performance.memory_usage), Some(77));
}

#[test]
fn held_metrics_are_dropped_once_a_later_revision_is_current() {
    let mut store = ResultStore::default();
    let remote = score("a\nb\n", &AnalysisOptions::all());
    store.apply_remote_metrics(Revision(2), remote.metrics());

    let (rev, _) = store.submit("mine\n", &AnalysisOptions::all());
    assert_eq!(rev, Revision(3));
    assert_eq!(store.pending_metrics_revision(), None);
    // The late result for revision 2 is stale now.
    assert!(!store.apply_remote_result(Revision(2), remote));
    assert_eq!(store.current().map(|r| r.complexity.lines_of_code), Some(1));
}

#[test]
fn identical_metrics_echo_does_not_notify() {
    let mut store = ResultStore::default();
    let (rev, _) = store.submit("x = 1\n", &AnalysisOptions::all());
    let seen = record_changes(&mut store);
    let metrics = store.current().map(|r| r.metrics()).expect("metrics");

    assert!(!store.apply_remote_metrics(rev, metrics));
    assert!(seen.borrow().is_empty());
}

#[test]
fn metrics_for_current_revision_merge_in_place() {
    let mut store = ResultStore::default();
    let (rev, _) = store.submit("eval(x)\n", &AnalysisOptions::all());
    let mut metrics = ProjectMetrics::default();
    metrics.performance.memory_usage = 512;

    assert!(store.apply_remote_metrics(rev, metrics));
    let current = store.current().expect("record");
    assert_eq!(current.performance.memory_usage, 512);
    assert_eq!(current.security.len(), 1);
    assert_eq!(store.revision(), rev);
}

#[test]
fn hydrate_sets_record_and_clears_loading_in_one_notification() {
    let mut store = ResultStore::default();
    let seen = record_changes(&mut store);
    let record = score("a\nb\n", &AnalysisOptions::all());

    store.hydrate(Some((Revision(3), record.clone())), Some((Revision(3), record.metrics())));

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], (Change::Hydrated, Revision(3), Some(2), false));
}

#[test]
fn hydrate_without_data_still_clears_loading() {
    let mut store = ResultStore::default();
    store.hydrate(None, None);
    assert!(store.current().is_none());
    for kind in WidgetKind::ALL {
        assert!(!store.is_loading(kind));
    }
}

#[test]
fn hydrate_with_only_metrics_shows_no_record_until_result() {
    let mut store = ResultStore::default();
    let record = score("a\n", &AnalysisOptions::all());
    store.hydrate(None, Some((Revision(2), record.metrics())));

    assert!(store.current().is_none());
    assert!(!store.is_loading(WidgetKind::Complexity));
    assert_eq!(store.pending_metrics_revision(), Some(Revision(2)));

    assert!(store.apply_remote_result(Revision(2), record.clone()));
    assert_eq!(store.current().map(|r| (**r).clone()), Some(record));
}

#[test]
fn subscribers_only_ever_see_complete_records() {
    let mut store = ResultStore::default();
    let seen = record_changes(&mut store);
    store.hydrate(None, None);
    store.submit("a\n", &AnalysisOptions::all());
    store.submit("a\nb\n", &AnalysisOptions::all());

    let seen = seen.borrow();
    let records: Vec<_> = seen.iter().filter(|(c, ..)| *c == Change::Record).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].1, Revision(1));
    assert_eq!(records[0].2, Some(1));
    assert_eq!(records[1].1, Revision(2));
    assert_eq!(records[1].2, Some(2));
}

#[test]
fn unsubscribe_stops_notifications() {
    let mut store = ResultStore::default();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    let id = store.subscribe(move |_, _| *sink.borrow_mut() += 1);

    store.set_loading(WidgetKind::Complexity, false);
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.set_loading(WidgetKind::Complexity, true);

    assert_eq!(*count.borrow(), 1);
}

#[test]
fn update_setting_touches_only_one_widget() {
    let mut store = ResultStore::default();
    let (rev, _) = store.submit("x\n", &AnalysisOptions::all());
    let before = *store.settings();

    store.update_setting(WidgetKind::Complexity, "showPercentages", false).expect("update");

    let after = *store.settings();
    assert!(!after.complexity.show_percentages);
    assert_eq!(after.code_tree, before.code_tree);
    assert_eq!(after.dependency, before.dependency);
    assert_eq!(after.performance, before.performance);
    assert_eq!(store.revision(), rev);
}

#[test]
fn unknown_setting_key_is_rejected() {
    let mut store = ResultStore::new(WidgetSettings::default());
    let err = store.update_setting(WidgetKind::CodeTree, "showPercentages", true).unwrap_err();
    match err {
        SettingsError::UnknownKey { widget, key, allowed } => {
            assert_eq!(widget, WidgetKind::CodeTree);
            assert_eq!(key, "showPercentages");
            assert!(allowed.contains("expandedByDefault"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*store.settings(), WidgetSettings::default());
}

#[test]
fn loading_flags_are_independent() {
    let mut store = ResultStore::default();
    store.set_loading(WidgetKind::Dependency, false);
    assert!(!store.is_loading(WidgetKind::Dependency));
    assert!(store.is_loading(WidgetKind::CodeTree));
    assert!(store.is_loading(WidgetKind::Complexity));
    assert!(store.is_loading(WidgetKind::Performance));
    assert!(store.current().is_none());
}

#[test]
fn selection_is_single_and_clearable() {
    let mut store = ResultStore::default();
    store.select_node(Some("src".into()));
    store.select_node(Some("main".into()));
    assert_eq!(store.snapshot().selected_node.as_deref(), Some("main"));
    store.select_node(None);
    assert!(store.snapshot().selected_node.is_none());
}

#[test]
fn default_record_has_placeholder_root() {
    let record = ResultRecord::default();
    assert!(record.code_tree.is_folder());
    assert_eq!(record.code_tree.name, "Project Root");
}

use codescope_core::db::{
    load_project_config, save_project_config, ProjectConfig, ProjectContext, ProjectLayout,
};
use codescope_core::model::AnalysisOptions;
use codescope_core::store::WidgetKind;
use tempfile::tempdir;

fn write_config(layout: &ProjectLayout, config: &ProjectConfig) {
    std::fs::create_dir_all(&layout.meta_dir).expect("meta dir");
    save_project_config(layout, config).expect("write config");
}

#[test]
fn layout_paths_live_under_root() {
    let tmp = tempdir().expect("tempdir");
    let layout = ProjectLayout::new(tmp.path());
    assert_eq!(layout.meta_dir, tmp.path().join(".codescope"));
    assert_eq!(layout.project_config_path, tmp.path().join(".codescope").join("project.json"));
    assert_eq!(layout.reports_dir, tmp.path().join("reports"));
    assert_eq!(
        std::path::Path::new(&layout.db_path_relative_string()),
        std::path::Path::new(".codescope").join("project.db")
    );
    assert_eq!(
        layout.report_path(codescope_core::model::Revision(7), "json"),
        tmp.path().join("reports").join("analysis-7.json")
    );
}

#[test]
fn context_creates_default_project_when_config_has_none() {
    let tmp = tempdir().expect("tempdir");
    let layout = ProjectLayout::new(tmp.path());
    write_config(&layout, &ProjectConfig::new("Ctx", layout.db_path_relative_string()));

    let ctx = ProjectContext::from_root(tmp.path()).expect("ctx");
    assert!(ctx.db_path.exists());
    let projects = ctx.db().list_projects().expect("list");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].kind, "python");
    assert_eq!(ctx.project.as_str(), projects[0].id.expect("id").to_string());

    // Opening again reuses the same row.
    let again = ProjectContext::from_root(tmp.path()).expect("ctx again");
    assert_eq!(again.project, ctx.project);
}

#[test]
fn context_rejects_missing_project_row() {
    let tmp = tempdir().expect("tempdir");
    let layout = ProjectLayout::new(tmp.path());
    let mut config = ProjectConfig::new("Ctx", layout.db_path_relative_string());
    config.project_id = Some("42".into());
    write_config(&layout, &config);

    assert!(ProjectContext::from_root(tmp.path()).is_err());
}

#[test]
fn missing_config_is_an_error() {
    let tmp = tempdir().expect("tempdir");
    let err = ProjectContext::from_root(tmp.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read project config"));
}

#[test]
fn widget_overrides_and_options_round_trip_through_config() {
    let tmp = tempdir().expect("tempdir");
    let layout = ProjectLayout::new(tmp.path());
    let mut config = ProjectConfig::new("Ctx", layout.db_path_relative_string());
    config.widgets.set(WidgetKind::Performance, "showAlerts", false).expect("set");
    config.analysis = AnalysisOptions { style: false, ..AnalysisOptions::all() };
    write_config(&layout, &config);

    let loaded = load_project_config(&layout).expect("load");
    assert!(!loaded.widgets.performance.show_alerts);
    assert!(!loaded.analysis.style);

    let ctx = ProjectContext::from_root(tmp.path()).expect("ctx");
    let mut dashboard = ctx.dashboard();
    dashboard.mount().expect("mount");
    assert!(!dashboard.store().settings().performance.show_alerts);
}

#[test]
fn older_config_without_new_fields_still_loads() {
    let tmp = tempdir().expect("tempdir");
    let layout = ProjectLayout::new(tmp.path());
    std::fs::create_dir_all(&layout.meta_dir).expect("meta dir");
    std::fs::write(
        &layout.project_config_path,
        r#"{"name":"Old","description":null,"config_version":"0.1.0","db":{"path":".codescope/project.db"}}"#,
    )
    .expect("write");

    let config = load_project_config(&layout).expect("load");
    assert_eq!(config.kind, "python");
    assert_eq!(config.analysis, AnalysisOptions::all());
    assert!(config.project_id.is_none());
}

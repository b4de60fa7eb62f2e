use codescope_core::store::{SettingsError, WidgetKind, WidgetSettings};

#[test]
fn defaults_match_documented_values() {
    let settings = WidgetSettings::default();
    assert!(settings.code_tree.show_line_numbers);
    assert!(settings.code_tree.show_file_sizes);
    assert!(!settings.code_tree.expanded_by_default);
    assert!(settings.complexity.show_trends);
    assert!(settings.complexity.show_thresholds);
    assert!(settings.complexity.show_percentages);
    assert!(settings.dependency.show_types);
    assert!(settings.dependency.show_details);
    assert!(!settings.dependency.group_by_type);
    assert!(settings.performance.show_real_time);
    assert!(settings.performance.show_alerts);
    assert!(settings.performance.show_thresholds);
}

#[test]
fn widget_names_parse_with_aliases() {
    assert_eq!("codeTree".parse::<WidgetKind>(), Ok(WidgetKind::CodeTree));
    assert_eq!("tree".parse::<WidgetKind>(), Ok(WidgetKind::CodeTree));
    assert_eq!("dependencies".parse::<WidgetKind>(), Ok(WidgetKind::Dependency));
    assert_eq!(
        "gauges".parse::<WidgetKind>(),
        Err(SettingsError::UnknownWidget("gauges".to_string()))
    );
    for kind in WidgetKind::ALL {
        assert_eq!(kind.as_str().parse::<WidgetKind>(), Ok(kind));
    }
}

#[test]
fn entries_follow_key_order() {
    let settings = WidgetSettings::default();
    let keys: Vec<&str> =
        settings.entries(WidgetKind::Dependency).into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, WidgetSettings::keys(WidgetKind::Dependency));
    assert_eq!(keys, vec!["showTypes", "showDetails", "groupByType"]);
}

#[test]
fn settings_round_trip_through_camel_case_json() {
    let mut settings = WidgetSettings::default();
    settings.set(WidgetKind::Dependency, "groupByType", true).expect("set");

    let json = serde_json::to_value(settings).expect("serialize");
    assert_eq!(json["dependency"]["groupByType"], serde_json::Value::Bool(true));
    assert_eq!(json["codeTree"]["expandedByDefault"], serde_json::Value::Bool(false));

    let back: WidgetSettings = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, settings);
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let parsed: WidgetSettings =
        serde_json::from_str(r#"{"performance":{"showAlerts":false}}"#).expect("parse");
    assert!(!parsed.performance.show_alerts);
    assert!(parsed.performance.show_thresholds);
    assert_eq!(parsed.complexity, WidgetSettings::default().complexity);
}

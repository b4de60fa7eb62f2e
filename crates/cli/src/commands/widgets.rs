use anyhow::Result;
use codescope_core::db::ProjectContext;
use codescope_core::store::{ResultStore, WidgetKind, WidgetSettings};

use crate::canonicalize_or_current;
use crate::commands::parse_widget;

/// Persist one widget display setting in the local project config.
///
/// The change goes through a result store so unknown widgets and keys are
/// rejected the same way the dashboard rejects them.
pub fn set_widget_command(root: &str, widget: &str, key: &str, value: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let mut ctx = ProjectContext::from_root(&root_path)?;
    let kind = parse_widget(widget)?;

    let mut store = ResultStore::new(ctx.config.widgets);
    store.update_setting(kind, key, value)?;
    ctx.config.widgets = *store.settings();
    ctx.save_config()?;

    println!("Updated {kind}.{key} = {value}");
    Ok(())
}

/// List effective widget settings.
pub fn widgets_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = ProjectContext::from_root(&root_path)?;
    let settings = ctx.config.widgets;

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    println!("Widget settings:");
    for kind in WidgetKind::ALL {
        println!("- {kind}:");
        for (key, value) in settings.entries(kind) {
            let marker = if default_value(kind, key) == Some(value) { "" } else { " (override)" };
            println!("    {key}: {value}{marker}");
        }
    }
    Ok(())
}

fn default_value(kind: WidgetKind, key: &str) -> Option<bool> {
    WidgetSettings::default().get(kind, key)
}

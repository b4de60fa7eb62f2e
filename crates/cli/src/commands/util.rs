use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use codescope_core::store::WidgetKind;
use serde::Serialize;

/// Output format shared by `analyze` and `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Helper to print whether a directory exists.
pub fn print_dir_status(label: &str, path: &Path) {
    let exists = path.is_dir();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}

/// Parse a widget name (`codeTree`, `tree`, `complexity`, ...).
pub fn parse_widget(name: &str) -> Result<WidgetKind> {
    name.parse::<WidgetKind>().map_err(|err| anyhow!(err))
}

/// Serialize `value` as pretty JSON or YAML. Text is the caller's job.
pub fn to_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to serialize JSON output")
        }
        OutputFormat::Yaml => serde_yaml::to_string(value).context("Failed to serialize YAML output"),
        OutputFormat::Text => Err(anyhow!("text output is not a structured format")),
    }
}

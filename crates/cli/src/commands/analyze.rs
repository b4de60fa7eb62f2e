use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use codescope_core::db::ProjectContext;
use codescope_core::model::{AnalysisOptions, Finding, ResultRecord, Revision};
use codescope_core::store::{Snapshot, WidgetKind};
use codescope_core::widgets::{
    render_all_text, render_kind_text, CodeTreeWidget, ComplexityWidget, DependencyWidget,
    PerformanceWidget, Widget,
};
use serde::Serialize;
use tracing::info;

use crate::commands::{parse_widget, to_structured, OutputFormat};
use crate::{canonicalize_or_current, read_source};

/// Inputs for `analyze`, mirroring its flags.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Source file; stdin when `None`.
    pub file: Option<String>,
    pub skip_complexity: bool,
    pub skip_security: bool,
    pub skip_style: bool,
    pub skip_documentation: bool,
    pub widget: Option<String>,
    pub format: OutputFormat,
    /// Also write `reports/analysis-<revision>.json`.
    pub report: bool,
}

impl AnalyzeArgs {
    /// Project defaults with the `--skip-*` flags applied on top.
    pub fn options(&self, defaults: AnalysisOptions) -> AnalysisOptions {
        AnalysisOptions {
            complexity: defaults.complexity && !self.skip_complexity,
            security: defaults.security && !self.skip_security,
            style: defaults.style && !self.skip_style,
            documentation: defaults.documentation && !self.skip_documentation,
        }
    }
}

/// Structured form of an analysis, for `--format json|yaml` and reports.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport<'a> {
    pub project: String,
    pub revision: Revision,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
    pub record: &'a ResultRecord,
}

/// Score source text, persist it and render the result.
///
/// A persistence failure is reported on stderr; the analysis is still shown
/// and the command succeeds.
pub fn analyze_command(root: &str, args: &AnalyzeArgs) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = ProjectContext::from_root(&root_path)?;
    let widget = args.widget.as_deref().map(parse_widget).transpose()?;
    let source = read_source(args.file.as_deref())?;
    let options = args.options(ctx.config.analysis);

    let mut dashboard = ctx.dashboard();
    if let Err(err) = dashboard.mount() {
        eprintln!("Warning: could not load previous analysis: {err}");
    }

    let outcome = dashboard.submit(&source, &options);
    let persist_error = outcome.persisted.as_ref().err().map(|err| err.to_string());
    if let Some(err) = &persist_error {
        eprintln!("Warning: analysis shown locally but not saved: {err}");
    }
    dashboard.sync();

    let snapshot = dashboard.store().snapshot().clone();
    let record = snapshot
        .record
        .clone()
        .context("Analysis produced no record")?;
    info!(revision = %outcome.revision, findings = record.finding_count(), "analysis complete");

    let report = AnalysisReport {
        project: ctx.project.to_string(),
        revision: outcome.revision,
        persisted: persist_error.is_none(),
        persist_error,
        record: &*record,
    };

    let report_path = if args.report { Some(write_report(&ctx, &report)?) } else { None };

    match args.format {
        OutputFormat::Text => {
            println!("Analysis {} (project {}):", report.revision, report.project);
            println!("  Lines of code: {}", record.complexity.lines_of_code);
            println!("  Findings: {}", record.finding_count());
            print_findings("Security", &record.security);
            print_findings("Style", &record.style);
            print_findings("Documentation", &record.documentation);
            if let Some(path) = &report_path {
                println!("  Report: {}", path.display());
            }
            println!();
            print_widgets(widget, &snapshot);
        }
        format => match widget {
            Some(kind) => println!("{}", to_structured(&widget_value(kind, &snapshot)?, format)?),
            None => println!("{}", to_structured(&report, format)?),
        },
    }

    dashboard.shutdown();
    Ok(())
}

/// Render the latest persisted analysis without running a new one.
pub fn show_command(root: &str, widget: Option<String>, format: OutputFormat) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = ProjectContext::from_root(&root_path)?;
    let widget = widget.as_deref().map(parse_widget).transpose()?;

    let mut dashboard = ctx.dashboard();
    dashboard.mount().context("Failed to load latest analysis")?;
    let snapshot = dashboard.store().snapshot().clone();
    dashboard.shutdown();

    let Some(record) = snapshot.record.clone() else {
        println!("No analysis recorded yet for project {}.", ctx.project);
        return Ok(());
    };

    match format {
        OutputFormat::Text => {
            println!("Latest analysis {} (project {}):", snapshot.revision, ctx.project);
            println!();
            print_widgets(widget, &snapshot);
        }
        format => match widget {
            Some(kind) => println!("{}", to_structured(&widget_value(kind, &snapshot)?, format)?),
            None => {
                let report = AnalysisReport {
                    project: ctx.project.to_string(),
                    revision: snapshot.revision,
                    persisted: true,
                    persist_error: None,
                    record: &*record,
                };
                println!("{}", to_structured(&report, format)?);
            }
        },
    }
    Ok(())
}

fn print_findings(label: &str, findings: &[Finding]) {
    if findings.is_empty() {
        return;
    }
    println!("  {label}:");
    for finding in findings {
        let severity = finding.severity.map(|s| format!(" [{}]", s.as_str())).unwrap_or_default();
        println!("    - line {}{}: {}", finding.line, severity, finding.message);
        if let Some(suggestion) = &finding.suggestion {
            println!("        suggestion: {suggestion}");
        }
    }
}

fn print_widgets(widget: Option<WidgetKind>, snapshot: &Snapshot) {
    match widget {
        Some(kind) => print!("{}", render_kind_text(kind, snapshot)),
        None => print!("{}", render_all_text(snapshot)),
    }
}

/// A single widget's view as a serializable value (`null` when not ready).
pub fn widget_value(kind: WidgetKind, snapshot: &Snapshot) -> Result<serde_json::Value> {
    let value = match kind {
        WidgetKind::CodeTree => serde_json::to_value(CodeTreeWidget::new().render(snapshot).ready()),
        WidgetKind::Complexity => serde_json::to_value(ComplexityWidget.render(snapshot).ready()),
        WidgetKind::Dependency => serde_json::to_value(DependencyWidget.render(snapshot).ready()),
        WidgetKind::Performance => {
            serde_json::to_value(PerformanceWidget.render(snapshot).ready())
        }
    };
    value.with_context(|| format!("Failed to serialize {kind} view"))
}

fn write_report(ctx: &ProjectContext, report: &AnalysisReport<'_>) -> Result<PathBuf> {
    fs::create_dir_all(&ctx.layout.reports_dir).with_context(|| {
        format!("Failed to create reports dir: {}", ctx.layout.reports_dir.display())
    })?;
    let path = ctx.layout.report_path(report.revision, "json");
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    info!(path = %path.display(), "report written");
    Ok(path)
}

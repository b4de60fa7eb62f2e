use anyhow::{Context, Result};
use codescope_core::db::ProjectContext;

use crate::canonicalize_or_current;

/// List persisted analyses for the project, oldest first.
pub fn history_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = ProjectContext::from_root(&root_path)?;
    let row_id = ctx.gateway.resolve(&ctx.project)?;
    let runs = ctx.db().list_analysis_runs(row_id).context("Failed to list analysis runs")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
        return Ok(());
    }

    if runs.is_empty() {
        println!("No analyses recorded.");
        return Ok(());
    }

    println!("Analyses:");
    for run in runs {
        let digest: String = run.source_digest.chars().take(12).collect();
        println!(
            "- {} [{}] loc={} findings={} digest={}",
            run.revision, run.created_at, run.lines_of_code, run.finding_count, digest
        );
    }
    Ok(())
}

use std::fs;

use anyhow::{Context, Result};
use codescope_core::db::{ProjectConfig, ProjectContext, ProjectDb, ProjectLayout, ProjectRecord};
use serde::Serialize;

use crate::commands::print_dir_status;
use crate::{canonicalize_or_current, infer_project_name};

#[derive(Serialize)]
pub struct ProjectInfoSnapshot {
    pub name: String,
    pub kind: String,
    pub project_id: String,
    pub root: String,
    pub config_file: String,
    pub config_version: String,
    pub db_path: String,
    pub reports_dir: String,
    pub analysis_runs: usize,
    pub latest_revision: u64,
}

/// Initialize a new project at `root`.
pub fn init_project_command(root: &str, name: Option<String>, kind: Option<String>) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);

    let project_name = match name {
        Some(n) => n,
        None => infer_project_name(&root_path),
    };

    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;
    fs::create_dir_all(&layout.reports_dir).with_context(|| {
        format!("Failed to create reports dir: {}", layout.reports_dir.display())
    })?;

    let mut config = ProjectConfig::new(&project_name, layout.db_path_relative_string());
    if let Some(kind) = kind {
        config.kind = kind;
    }

    let db = ProjectDb::open(&layout.db_path).with_context(|| {
        format!("Failed to initialize project database at {}", layout.db_path.display())
    })?;
    let row_id = db
        .insert_project(&ProjectRecord::new(&project_name, &config.kind))
        .context("Failed to create project row")?;
    config.project_id = Some(row_id.to_string());

    codescope_core::db::save_project_config(&layout, &config)?;

    println!("Initialized codescope project:");
    println!("  Name: {}", project_name);
    println!("  Kind: {}", config.kind);
    println!("  Project id: {}", row_id);
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.project_config_path.display());
    println!("  DB path (relative): {}", config.db.path);
    println!("  Reports dir: {}", layout.reports_dir.display());

    Ok(())
}

/// Show basic information about an existing project.
pub fn project_info_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = ProjectContext::from_root(&root_path)?;
    let row_id = ctx.gateway.resolve(&ctx.project)?;
    let runs = ctx.db().list_analysis_runs(row_id).context("Failed to list analysis runs")?;
    let latest_revision = ctx.db().max_revision(row_id)?;

    if json {
        let snapshot = ProjectInfoSnapshot {
            name: ctx.config.name.clone(),
            kind: ctx.config.kind.clone(),
            project_id: ctx.project.to_string(),
            root: ctx.layout.root.display().to_string(),
            config_file: ctx.layout.project_config_path.display().to_string(),
            config_version: ctx.config.config_version.clone(),
            db_path: ctx.config.db.path.clone(),
            reports_dir: ctx.layout.reports_dir.display().to_string(),
            analysis_runs: runs.len(),
            latest_revision: latest_revision.0,
        };
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("codescope Project Info");
    println!("======================");
    println!("Name: {}", ctx.config.name);
    println!("Kind: {}", ctx.config.kind);
    println!("Project id: {}", ctx.project);
    println!("Root: {}", ctx.layout.root.display());
    println!("Config file: {}", ctx.layout.project_config_path.display());
    println!("Config version: {}", ctx.config.config_version);
    println!("DB path (config): {}", ctx.config.db.path);
    println!();

    println!("Directories:");
    print_dir_status("Meta dir (.codescope)", &ctx.layout.meta_dir);
    print_dir_status("Reports dir", &ctx.layout.reports_dir);
    println!();
    println!("Analysis runs: {}", runs.len());
    if !runs.is_empty() {
        println!("Latest revision: {}", latest_revision);
    }

    Ok(())
}

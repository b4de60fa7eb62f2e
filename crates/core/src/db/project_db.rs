use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::db::{AnalysisRunRecord, ProjectRecord};
use crate::model::{ComplexityMetrics, Finding, ProjectMetrics, ResultRecord, Revision};

/// Oldest `user_version` accepted on open; `0` is a fresh file.
const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Schema written by [`apply_migrations`]: v1 projects, v2 results and metrics.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Name given to the project created when none exists yet.
pub const DEFAULT_PROJECT_NAME: &str = "Default Project";

/// Failures of the project database.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// A JSON column could not be encoded or decoded.
    #[error("JSON column error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file was written by a newer build.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },
}

pub type DbResult<T> = Result<T, DbError>;

/// Project rows, analysis results and metrics slices in one SQLite file.
///
/// Results and metrics are stored in separate tables, both keyed by project
/// row id and revision, and written together in one transaction.
#[derive(Debug)]
pub struct ProjectDb {
    conn: Connection,
}

impl ProjectDb {
    /// Open or create the file at `path` and migrate it to [`CURRENT_SCHEMA_VERSION`].
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database with the current schema.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Raw connection, for tests and one-off maintenance.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert a project record and return its row id.
    ///
    /// An empty `created_at` is replaced with the current time.
    pub fn insert_project(&self, record: &ProjectRecord) -> DbResult<i64> {
        let created_at = if record.created_at.is_empty() {
            Utc::now().to_rfc3339()
        } else {
            record.created_at.clone()
        };
        let settings = record.settings.as_ref().map(|v| serde_json::to_string(v)).transpose()?;
        self.conn.execute(
            r#"
            INSERT INTO projects (name, kind, settings, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![record.name, record.kind, settings, created_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// List all projects (ordered by id).
    pub fn list_projects(&self) -> DbResult<Vec<ProjectRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, kind, settings, created_at
            FROM projects
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map([], map_project_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(decode_project(row?)?);
        }
        Ok(out)
    }

    /// Load a single project by id.
    pub fn get_project(&self, id: i64) -> DbResult<Option<ProjectRecord>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT id, name, kind, settings, created_at
                FROM projects
                WHERE id = ?1
                "#,
                params![id],
                map_project_row,
            )
            .optional()?;
        row.map(decode_project).transpose()
    }

    /// The most recently created project, if any.
    pub fn latest_project(&self) -> DbResult<Option<ProjectRecord>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT id, name, kind, settings, created_at
                FROM projects
                ORDER BY created_at DESC, id DESC
                LIMIT 1
                "#,
                [],
                map_project_row,
            )
            .optional()?;
        row.map(decode_project).transpose()
    }

    /// Return the latest project's id, creating a default project when the
    /// database has none.
    pub fn ensure_default_project(&self, kind: &str) -> DbResult<i64> {
        if let Some(id) = self.latest_project()?.and_then(|p| p.id) {
            return Ok(id);
        }
        self.insert_project(&ProjectRecord::new(DEFAULT_PROJECT_NAME, kind))
    }

    /// Persist one analysis: findings into `analysis_results` and the tree,
    /// graph and performance slice into `project_metrics`, atomically.
    pub fn insert_analysis(
        &self,
        project_id: i64,
        revision: Revision,
        record: &ResultRecord,
    ) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO analysis_results (
                project_id, revision, source_digest, lines_of_code, finding_count,
                complexity_metrics, security_issues, style_issues, documentation_issues, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                project_id,
                revision.0 as i64,
                record.source_digest,
                record.complexity.lines_of_code,
                record.finding_count() as i64,
                serde_json::to_string(&record.complexity)?,
                serde_json::to_string(&record.security)?,
                serde_json::to_string(&record.style)?,
                serde_json::to_string(&record.documentation)?,
                now,
            ],
        )?;

        tx.execute(
            r#"
            INSERT INTO project_metrics (
                project_id, revision, code_tree, dependency_graph, performance_metrics,
                created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
            params![
                project_id,
                revision.0 as i64,
                serde_json::to_string(&record.code_tree)?,
                serde_json::to_string(&record.dependency_graph)?,
                serde_json::to_string(&record.performance)?,
                now,
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Highest revision stored for a project (`Revision::ZERO` if none).
    pub fn max_revision(&self, project_id: i64) -> DbResult<Revision> {
        let max: Option<i64> = self.conn.query_row(
            "SELECT MAX(revision) FROM analysis_results WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )?;
        Ok(Revision(max.unwrap_or(0) as u64))
    }

    /// Load the newest findings row for a project and join the metrics row of
    /// the same revision into a full record.
    ///
    /// When the metrics row is missing the record carries default metrics.
    pub fn latest_analysis(&self, project_id: i64) -> DbResult<Option<(Revision, ResultRecord)>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT revision, source_digest, complexity_metrics, security_issues,
                       style_issues, documentation_issues
                FROM analysis_results
                WHERE project_id = ?1
                ORDER BY revision DESC, id DESC
                LIMIT 1
                "#,
                params![project_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((revision, source_digest, complexity, security, style, documentation)) = row
        else {
            return Ok(None);
        };
        let revision = Revision(revision as u64);

        let metrics = self.metrics_at(project_id, revision)?.unwrap_or_default();
        let record = ResultRecord {
            complexity: serde_json::from_str::<ComplexityMetrics>(&complexity)?,
            security: serde_json::from_str::<Vec<Finding>>(&security)?,
            style: serde_json::from_str::<Vec<Finding>>(&style)?,
            documentation: serde_json::from_str::<Vec<Finding>>(&documentation)?,
            source_digest,
            ..ResultRecord::default()
        }
        .with_metrics(metrics);

        Ok(Some((revision, record)))
    }

    /// Load the newest metrics row for a project.
    pub fn latest_metrics(&self, project_id: i64) -> DbResult<Option<(Revision, ProjectMetrics)>> {
        let revision: Option<i64> = self
            .conn
            .query_row(
                r#"
                SELECT revision FROM project_metrics
                WHERE project_id = ?1
                ORDER BY revision DESC, id DESC
                LIMIT 1
                "#,
                params![project_id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(revision) = revision.map(|r| Revision(r as u64)) else {
            return Ok(None);
        };
        Ok(self.metrics_at(project_id, revision)?.map(|m| (revision, m)))
    }

    fn metrics_at(&self, project_id: i64, revision: Revision) -> DbResult<Option<ProjectMetrics>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT code_tree, dependency_graph, performance_metrics
                FROM project_metrics
                WHERE project_id = ?1 AND revision = ?2
                ORDER BY id DESC
                LIMIT 1
                "#,
                params![project_id, revision.0 as i64],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(tree, graph, perf)| -> DbResult<ProjectMetrics> {
            Ok(ProjectMetrics {
                code_tree: serde_json::from_str(&tree)?,
                dependency_graph: serde_json::from_str(&graph)?,
                performance: serde_json::from_str(&perf)?,
            })
        })
        .transpose()
    }

    /// List persisted analyses for a project (oldest first).
    pub fn list_analysis_runs(&self, project_id: i64) -> DbResult<Vec<AnalysisRunRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT project_id, revision, source_digest, lines_of_code, finding_count, created_at
            FROM analysis_results
            WHERE project_id = ?1
            ORDER BY revision, id
            "#,
        )?;
        let rows = stmt.query_map(params![project_id], |row| {
            Ok(AnalysisRunRecord {
                project_id: row.get(0)?,
                revision: Revision(row.get::<_, i64>(1)? as u64),
                source_digest: row.get(2)?,
                lines_of_code: row.get(3)?,
                finding_count: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

type ProjectRow = (i64, String, String, Option<String>, String);

fn map_project_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProjectRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn decode_project((id, name, kind, settings, created_at): ProjectRow) -> DbResult<ProjectRecord> {
    let settings = settings.as_deref().map(|s| serde_json::from_str(s)).transpose()?;
    Ok(ProjectRecord { id: Some(id), name, kind, settings, created_at })
}

/// Step `user_version` forward one batch at a time until it reaches
/// [`CURRENT_SCHEMA_VERSION`]. Each batch runs in its own transaction.
fn apply_migrations(conn: &Connection) -> DbResult<()> {
    let mut current_version = current_schema_version(conn)?;

    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version == 0 {
        // Initial schema.
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS projects (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                name       TEXT NOT NULL,
                kind       TEXT NOT NULL,
                settings   TEXT,
                created_at TEXT NOT NULL
            );

            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
        current_version = 1;
    }

    if current_version < 2 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS analysis_results (
                id                   INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id           INTEGER NOT NULL REFERENCES projects(id),
                revision             INTEGER NOT NULL,
                source_digest        TEXT NOT NULL,
                lines_of_code        INTEGER NOT NULL,
                finding_count        INTEGER NOT NULL,
                complexity_metrics   TEXT NOT NULL,
                security_issues      TEXT NOT NULL,
                style_issues         TEXT NOT NULL,
                documentation_issues TEXT NOT NULL,
                created_at           TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_analysis_results_project
                ON analysis_results (project_id, revision);

            CREATE TABLE IF NOT EXISTS project_metrics (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id          INTEGER NOT NULL REFERENCES projects(id),
                revision            INTEGER NOT NULL,
                code_tree           TEXT NOT NULL,
                dependency_graph    TEXT NOT NULL,
                performance_metrics TEXT NOT NULL,
                created_at          TEXT NOT NULL,
                updated_at          TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_project_metrics_project
                ON project_metrics (project_id, revision);

            PRAGMA user_version = 2;
            COMMIT;
            "#,
        )?;
    }

    Ok(())
}

fn current_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}

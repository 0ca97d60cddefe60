/*!
 * Repository layer for database operations.
 *
 * This module provides the verbs the submission pipeline consumes
 * (add, update, get-by-filter, get-all) over translations, jobs and the
 * links between them, abstracting away the SQL details.
 */

use anyhow::{Result, anyhow};
use log::debug;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{
    JobFilter, JobRecord, TranslationFilter, TranslationJobRecord, TranslationRecord,
    TranslationStatus,
};

const TRANSLATION_COLUMNS: &str = "id, locale, slug, status, created_at, updated_at";
const JOB_COLUMNS: &str = "id, job_uid, batch_uid, locale, status, created_at, updated_at";

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

fn parse_translation_row(row: &rusqlite::Row) -> rusqlite::Result<TranslationRecord> {
    Ok(TranslationRecord {
        id: row.get(0)?,
        locale: row.get(1)?,
        slug: row.get(2)?,
        status: row
            .get::<_, String>(3)?
            .parse()
            .unwrap_or(TranslationStatus::Pending),
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn parse_job_row(row: &rusqlite::Row) -> rusqlite::Result<JobRecord> {
    Ok(JobRecord {
        id: row.get(0)?,
        job_uid: row.get(1)?,
        batch_uid: row.get(2)?,
        locale: row.get(3)?,
        status: row
            .get::<_, String>(4)?
            .parse()
            .unwrap_or(TranslationStatus::Pending),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Build a `WHERE` clause from optional column filters
fn where_clause(filters: &[(&str, Option<String>)]) -> (String, Vec<String>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();
    for (column, value) in filters {
        if let Some(value) = value {
            values.push(value.clone());
            clauses.push(format!("{} = ?{}", column, values.len()));
        }
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!("WHERE {}", clauses.join(" AND ")), values)
    }
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Translation Operations
    // =========================================================================

    /// Queue a translation request; an existing (locale, slug) is left as is
    pub async fn add_translation(&self, locale: &str, slug: &str) -> Result<TranslationRecord> {
        let locale = locale.to_string();
        let slug = slug.to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO translations (locale, slug, status, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?4)
                    ON CONFLICT(locale, slug) DO NOTHING
                    "#,
                    params![locale, slug, TranslationStatus::Pending.to_string(), now],
                )?;

                let sql = format!(
                    "SELECT {} FROM translations WHERE locale = ?1 AND slug = ?2",
                    TRANSLATION_COLUMNS
                );
                Ok(conn.query_row(&sql, params![locale, slug], parse_translation_row)?)
            })
            .await
    }

    /// Get a translation request by id
    pub async fn get_translation(&self, id: i64) -> Result<Option<TranslationRecord>> {
        self.db
            .execute_async(move |conn| Self::get_translation_sync(conn, id))
            .await
    }

    fn get_translation_sync(conn: &Connection, id: i64) -> Result<Option<TranslationRecord>> {
        let sql = format!("SELECT {} FROM translations WHERE id = ?1", TRANSLATION_COLUMNS);
        Ok(conn.query_row(&sql, [id], parse_translation_row).optional()?)
    }

    /// List translation requests matching the filter, oldest first
    pub async fn get_translations(&self, filter: TranslationFilter) -> Result<Vec<TranslationRecord>> {
        self.db
            .execute_async(move |conn| {
                let (clause, values) = where_clause(&[
                    ("status", filter.status.map(|s| s.to_string())),
                    ("locale", filter.locale),
                ]);
                let sql = format!(
                    "SELECT {} FROM translations {} ORDER BY id",
                    TRANSLATION_COLUMNS, clause
                );

                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params_from_iter(values.iter()), parse_translation_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
    }

    /// Set a translation request's status
    pub async fn update_translation(&self, id: i64, status: TranslationStatus) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                let updated = conn.execute(
                    "UPDATE translations SET status = ?1, updated_at = ?2 WHERE id = ?3",
                    params![status.to_string(), now, id],
                )?;
                if updated == 0 {
                    return Err(anyhow!("Translation {} does not exist", id));
                }
                debug!("Translation {} -> {}", id, status);
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Job Operations
    // =========================================================================

    /// Record a vendor job
    pub async fn add_job(
        &self,
        job_uid: &str,
        batch_uid: Option<&str>,
        locale: &str,
        status: TranslationStatus,
    ) -> Result<JobRecord> {
        let job_uid = job_uid.to_string();
        let batch_uid = batch_uid.map(str::to_string);
        let locale = locale.to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO jobs (job_uid, batch_uid, locale, status, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                    "#,
                    params![job_uid, batch_uid, locale, status.to_string(), now],
                )?;
                let id = conn.last_insert_rowid();

                Ok(JobRecord {
                    id,
                    job_uid,
                    batch_uid,
                    locale,
                    status,
                    created_at: now.clone(),
                    updated_at: now,
                })
            })
            .await
    }

    /// Associate a vendor batch with an already recorded job
    pub async fn attach_batch(&self, job_uid: &str, batch_uid: &str) -> Result<JobRecord> {
        let job_uid = job_uid.to_string();
        let batch_uid = batch_uid.to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                let updated = conn.execute(
                    "UPDATE jobs SET batch_uid = ?1, updated_at = ?2 WHERE job_uid = ?3",
                    params![batch_uid, now, job_uid],
                )?;
                if updated == 0 {
                    return Err(anyhow!("Job {} does not exist", job_uid));
                }

                let sql = format!("SELECT {} FROM jobs WHERE job_uid = ?1", JOB_COLUMNS);
                Ok(conn.query_row(&sql, [&job_uid], parse_job_row)?)
            })
            .await
    }

    /// Set a job's status
    pub async fn update_job(&self, id: i64, status: TranslationStatus) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                let updated = conn.execute(
                    "UPDATE jobs SET status = ?1, updated_at = ?2 WHERE id = ?3",
                    params![status.to_string(), now, id],
                )?;
                if updated == 0 {
                    return Err(anyhow!("Job {} does not exist", id));
                }
                debug!("Job {} -> {}", id, status);
                Ok(())
            })
            .await
    }

    /// List jobs matching the filter, oldest first
    pub async fn get_jobs(&self, filter: JobFilter) -> Result<Vec<JobRecord>> {
        self.db
            .execute_async(move |conn| {
                let (clause, values) = where_clause(&[
                    ("job_uid", filter.job_uid),
                    ("batch_uid", filter.batch_uid),
                ]);
                let sql = format!("SELECT {} FROM jobs {} ORDER BY id", JOB_COLUMNS, clause);

                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params_from_iter(values.iter()), parse_job_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
    }

    // =========================================================================
    // Translation/Job Link Operations
    // =========================================================================

    /// Link translation requests to the job carrying them (single transaction)
    pub async fn add_translations_jobs_records(
        &self,
        job_id: i64,
        translation_ids: Vec<i64>,
    ) -> Result<Vec<TranslationJobRecord>> {
        self.db
            .transaction_async(move |tx| {
                let mut records = Vec::with_capacity(translation_ids.len());
                for translation_id in translation_ids {
                    tx.execute(
                        "INSERT INTO translations_jobs (translation_id, job_id) VALUES (?1, ?2)",
                        params![translation_id, job_id],
                    )?;
                    records.push(TranslationJobRecord {
                        id: tx.last_insert_rowid(),
                        translation_id,
                        job_id,
                    });
                }
                Ok(records)
            })
            .await
    }

    /// Links for a job
    pub async fn get_translations_jobs_records(&self, job_id: i64) -> Result<Vec<TranslationJobRecord>> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, translation_id, job_id FROM translations_jobs WHERE job_id = ?1 ORDER BY id",
                )?;
                let rows = stmt
                    .query_map([job_id], |row| {
                        Ok(TranslationJobRecord {
                            id: row.get(0)?,
                            translation_id: row.get(1)?,
                            job_id: row.get(2)?,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
    }

    /// Translation requests carried by a job
    pub async fn get_job_translations(&self, job_id: i64) -> Result<Vec<TranslationRecord>> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT t.id, t.locale, t.slug, t.status, t.created_at, t.updated_at
                    FROM translations t
                    JOIN translations_jobs tj ON tj.translation_id = t.id
                    WHERE tj.job_id = ?1
                    ORDER BY t.id
                    "#,
                )?;
                let rows = stmt
                    .query_map([job_id], parse_translation_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
    }
}

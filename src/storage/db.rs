// src/storage/db.rs

//! SQLite-backed persisted job store.
//!
//! One `jobs` table keyed by the site-assigned `job_id`. Re-encountering a
//! known id updates the mutable fields and bumps `last_seen`; `scraped_at`
//! records the first encounter and is never touched again. Each record is
//! upserted in a single conflict-clause statement, so a crash mid-batch
//! leaves previously committed rows intact.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::Result;
use crate::models::{JobPosting, Source, StoredJob};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS jobs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id      TEXT NOT NULL UNIQUE,
    title       TEXT NOT NULL,
    company     TEXT,
    location    TEXT,
    salary      TEXT,
    job_type    TEXT,
    date_posted TEXT,
    url         TEXT,
    source      TEXT,
    scraped_at  TEXT NOT NULL,
    last_seen   TEXT NOT NULL,
    is_active   INTEGER NOT NULL DEFAULT 1
);
CREATE INDEX IF NOT EXISTS idx_jobs_source ON jobs(source);
";

const JOB_COLUMNS: &str = "job_id, title, company, location, salary, job_type, \
                           date_posted, url, source, scraped_at, last_seen, is_active";

/// Counts from one upsert batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpsertStats {
    /// Postings seen for the first time
    pub inserted: usize,

    /// Postings whose `job_id` was already known
    pub updated: usize,

    /// Postings without a `job_id`, never persisted
    pub skipped: usize,
}

/// Aggregate store statistics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub total_jobs: u64,
    pub active_jobs: u64,
    pub inactive_jobs: u64,

    /// Active-job counts per source label, largest first
    pub by_source: Vec<(String, u64)>,

    /// Jobs first scraped within the last 24 hours
    pub added_last_day: u64,
}

/// SQLite job store.
pub struct JobStore {
    conn: Connection,
}

impl JobStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let store = Self::from_connection(Connection::open(path)?)?;
        log::debug!("Job store ready at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Upsert a batch of postings with the current time.
    pub fn upsert_batch(&self, postings: &[JobPosting]) -> Result<UpsertStats> {
        self.upsert_batch_at(postings, Utc::now())
    }

    /// Upsert a batch of postings with an explicit timestamp.
    ///
    /// Postings without a `job_id` cannot be deduplicated and are counted
    /// as skipped without touching the table.
    pub fn upsert_batch_at(
        &self,
        postings: &[JobPosting],
        now: DateTime<Utc>,
    ) -> Result<UpsertStats> {
        let mut stats = UpsertStats::default();

        for posting in postings {
            let Some(job_id) = posting.dedup_key() else {
                log::debug!("Posting without job id skipped: '{}'", posting.title);
                stats.skipped += 1;
                continue;
            };

            let existed = self
                .conn
                .query_row("SELECT 1 FROM jobs WHERE job_id = ?1", params![job_id], |_| {
                    Ok(())
                })
                .optional()?
                .is_some();

            self.conn.execute(
                "INSERT INTO jobs (job_id, title, company, location, salary, job_type,
                                   date_posted, url, source, scraped_at, last_seen, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10, 1)
                 ON CONFLICT(job_id) DO UPDATE SET
                     title = excluded.title,
                     company = excluded.company,
                     location = excluded.location,
                     salary = excluded.salary,
                     job_type = excluded.job_type,
                     date_posted = excluded.date_posted,
                     url = excluded.url,
                     source = excluded.source,
                     last_seen = excluded.last_seen,
                     is_active = 1",
                params![
                    job_id,
                    posting.title,
                    posting.company,
                    posting.location,
                    posting.salary,
                    posting.job_type,
                    posting.date_posted,
                    posting.url,
                    posting.source.label(),
                    now,
                ],
            )?;

            if existed {
                stats.updated += 1;
            } else {
                stats.inserted += 1;
            }
        }

        Ok(stats)
    }

    /// All persisted jobs, newest first.
    pub fn all_jobs(&self, active_only: bool) -> Result<Vec<StoredJob>> {
        let sql = if active_only {
            format!("SELECT {JOB_COLUMNS} FROM jobs WHERE is_active = 1 ORDER BY scraped_at DESC")
        } else {
            format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY scraped_at DESC")
        };
        self.query_jobs(&sql, params![])
    }

    /// Active jobs from one source, newest first.
    pub fn jobs_by_source(&self, source: &str) -> Result<Vec<StoredJob>> {
        let sql = format!(
            "SELECT {JOB_COLUMNS} FROM jobs \
             WHERE source = ?1 AND is_active = 1 ORDER BY scraped_at DESC"
        );
        self.query_jobs(&sql, params![source])
    }

    /// Aggregate statistics over the whole table.
    pub fn stats(&self) -> Result<StoreStats> {
        let total_jobs: u64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        let active_jobs: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM jobs WHERE is_active = 1",
            [],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT source, COUNT(*) FROM jobs WHERE is_active = 1 \
             GROUP BY source ORDER BY COUNT(*) DESC",
        )?;
        let by_source = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let day_ago = Utc::now() - Duration::days(1);
        let added_last_day: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM jobs WHERE scraped_at >= ?1",
            params![day_ago],
            |row| row.get(0),
        )?;

        Ok(StoreStats {
            total_jobs,
            active_jobs,
            inactive_jobs: total_jobs - active_jobs,
            by_source,
            added_last_day,
        })
    }

    fn query_jobs<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<StoredJob>> {
        let mut stmt = self.conn.prepare(sql)?;
        let jobs = stmt
            .query_map(params, read_job_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(jobs)
    }
}

fn read_job_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredJob> {
    Ok(StoredJob {
        job_id: row.get(0)?,
        title: row.get(1)?,
        company: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        location: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        salary: row.get(4)?,
        job_type: row.get(5)?,
        date_posted: row.get(6)?,
        url: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        source: Source::parse(&row.get::<_, Option<String>>(8)?.unwrap_or_default()),
        scraped_at: row.get(9)?,
        last_seen: row.get(10)?,
        is_active: row.get(11)?,
    })
}

//! Report history in SQLite
//!
//! The store is append-only: rows are inserted once per generated report
//! and never updated or removed. It expects to be the only writer; the pool
//! holds a single connection so appends are serialized.

use std::str::FromStr;

use hse_types::{DashboardStats, NewReportRecord, ReportFilter, ReportRecord, RiskLevel};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::{debug, info, warn};

use crate::error::StoreError;

const SELECT_REPORTS: &str = "SELECT id, job_title, site_type, location, date, auditor, pdf_path, risk_level FROM reports";

#[derive(Debug, FromRow)]
struct ReportRow {
    id: i64,
    job_title: String,
    site_type: String,
    location: String,
    date: String,
    auditor: String,
    pdf_path: String,
    risk_level: String,
}

impl TryFrom<ReportRow> for ReportRecord {
    type Error = StoreError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let risk_level = RiskLevel::from_str(&row.risk_level)
            .map_err(|reason| StoreError::CorruptRow { id: row.id, reason })?;
        Ok(ReportRecord {
            id: row.id,
            job_title: row.job_title,
            site_type: row.site_type,
            location: row.location,
            date: row.date,
            auditor: row.auditor,
            pdf_path: row.pdf_path,
            risk_level,
        })
    }
}

/// Build a LIKE pattern matching `needle` anywhere, with wildcards escaped
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, Clone)]
pub struct ReportStore {
    pool: SqlitePool,
}

impl ReportStore {
    /// Open (creating if needed) the database at `url` and run migrations
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        info!("Connecting to report database: {}", url);
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            // An in-memory database lives only as long as its connection
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:").await
    }

    /// Close the pool; later calls fail with a database error
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        debug!("Running report store migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                job_title TEXT NOT NULL,
                site_type TEXT NOT NULL,
                location TEXT NOT NULL,
                date TEXT NOT NULL,
                auditor TEXT NOT NULL,
                pdf_path TEXT NOT NULL,
                risk_level TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reports_risk_level ON reports(risk_level)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reports_date ON reports(date)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a record and return its assigned id
    pub async fn append(&self, record: &NewReportRecord) -> Result<i64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO reports (job_title, site_type, location, date, auditor, pdf_path, risk_level)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.job_title)
        .bind(&record.site_type)
        .bind(&record.location)
        .bind(&record.date)
        .bind(&record.auditor)
        .bind(&record.pdf_path)
        .bind(record.risk_level.as_str())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(
            "Recorded report {} for {} ({})",
            id, record.location, record.risk_level
        );
        Ok(id)
    }

    /// Records matching `filter`, most recent inspection date first
    pub async fn query(&self, filter: &ReportFilter) -> Result<Vec<ReportRecord>, StoreError> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_REPORTS);
        builder.push(" WHERE 1 = 1");

        if let Some(risk) = filter.risk {
            builder.push(" AND risk_level = ").push_bind(risk.as_str());
        }
        let auditor = filter
            .auditor_substring
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(auditor) = auditor {
            // SQLite LIKE ignores ASCII case
            builder
                .push(" AND auditor LIKE ")
                .push_bind(contains_pattern(auditor))
                .push(" ESCAPE '\\'");
        }
        builder.push(" ORDER BY date DESC, id DESC");

        let rows: Vec<ReportRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(ReportRecord::try_from).collect()
    }

    pub async fn get(&self, id: i64) -> Result<Option<ReportRecord>, StoreError> {
        let row: Option<ReportRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_REPORTS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(ReportRecord::try_from).transpose()
    }

    /// Report counts per risk level
    pub async fn stats(&self) -> Result<DashboardStats, StoreError> {
        let counts: Vec<(String, i64)> =
            sqlx::query_as("SELECT risk_level, COUNT(*) FROM reports GROUP BY risk_level")
                .fetch_all(&self.pool)
                .await?;

        let mut stats = DashboardStats::default();
        for (risk, count) in counts {
            stats.total += count;
            match RiskLevel::from_str(&risk) {
                Ok(RiskLevel::Green) => stats.green += count,
                Ok(RiskLevel::Yellow) => stats.yellow += count,
                Ok(RiskLevel::Red) => stats.red += count,
                Err(reason) => warn!("{} report rows with unreadable risk level: {}", count, reason),
            }
        }
        Ok(stats)
    }
}

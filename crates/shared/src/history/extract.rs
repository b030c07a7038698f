use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use super::epoch;
use super::location::{HistoryStoreLocation, StoreKind};
use crate::privacy::SessionAuthorization;

pub const NO_MATCHING_HISTORY_MESSAGE: &str = "No matching history found.";

/// Per-request filters for a history read. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuerySpec {
    pub keyword: Option<String>,
    pub since: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub url: String,
    pub title: String,
    pub last_visited_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history access is not authorized for this session")]
    PermissionDenied,
    #[error("history store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("history query failed: {0}")]
    QueryFailure(String),
}

/// Snapshots the browser's history store and runs one read query against
/// the copy, newest visits first.
///
/// The live store is never opened: browsers hold locking handles on it, so
/// the file is copied to a uniquely named temp location first. The copy is
/// removed on every exit path. Refuses outright unless the caller's
/// session authorization is currently granted.
pub async fn fetch_history(
    location: &HistoryStoreLocation,
    spec: &HistoryQuerySpec,
    authorization: &SessionAuthorization,
) -> Result<Vec<HistoryRecord>, HistoryError> {
    if !authorization.granted {
        return Err(HistoryError::PermissionDenied);
    }

    let snapshot = snapshot_store(&location.path).await?;
    debug!(
        store = %location.path.display(),
        snapshot = %snapshot.path().display(),
        "copied history store snapshot"
    );

    let result = query_snapshot(snapshot.path(), location.kind, spec).await;
    // `snapshot` drops here, deleting the temp copy on success and failure alike.
    result
}

async fn snapshot_store(path: &Path) -> Result<NamedTempFile, HistoryError> {
    let snapshot = NamedTempFile::new().map_err(|err| {
        HistoryError::StoreUnavailable(format!("could not create snapshot file: {err}"))
    })?;

    tokio::fs::copy(path, snapshot.path()).await.map_err(|err| {
        HistoryError::StoreUnavailable(format!(
            "could not copy store at {}: {err}",
            path.display()
        ))
    })?;

    Ok(snapshot)
}

async fn query_snapshot(
    snapshot_path: &Path,
    kind: StoreKind,
    spec: &HistoryQuerySpec,
) -> Result<Vec<HistoryRecord>, HistoryError> {
    let options = SqliteConnectOptions::new()
        .filename(snapshot_path)
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|err| HistoryError::StoreUnavailable(format!("could not open snapshot: {err}")))?;

    let records = match kind {
        StoreKind::Chromium => fetch_chromium_rows(&pool, spec).await,
        StoreKind::Safari => fetch_safari_rows(&pool, spec).await,
    };

    pool.close().await;
    records
}

async fn fetch_chromium_rows(
    pool: &SqlitePool,
    spec: &HistoryQuerySpec,
) -> Result<Vec<HistoryRecord>, HistoryError> {
    let mut sql = String::from("SELECT url, title, last_visit_time FROM urls");
    push_filter_clauses(&mut sql, spec, "title", "url", "last_visit_time");
    sql.push_str(" ORDER BY last_visit_time DESC");

    let mut query = sqlx::query(&sql);
    if let Some(keyword) = &spec.keyword {
        let pattern = format!("%{keyword}%");
        query = query.bind(pattern.clone()).bind(pattern);
    }
    if let Some(since) = spec.since {
        query = query.bind(epoch::chromium_from_date(since));
    }

    let rows = query
        .fetch_all(pool)
        .await
        .map_err(|err| HistoryError::QueryFailure(err.to_string()))?;

    rows.into_iter()
        .map(|row| {
            let raw_visit_time: i64 = get_column(&row, "last_visit_time")?;
            let last_visited_at = epoch::chromium_to_utc(raw_visit_time).ok_or_else(|| {
                HistoryError::QueryFailure(format!("visit time out of range: {raw_visit_time}"))
            })?;
            Ok(HistoryRecord {
                url: get_column(&row, "url")?,
                title: get_column::<Option<String>>(&row, "title")?.unwrap_or_default(),
                last_visited_at,
            })
        })
        .collect()
}

async fn fetch_safari_rows(
    pool: &SqlitePool,
    spec: &HistoryQuerySpec,
) -> Result<Vec<HistoryRecord>, HistoryError> {
    let mut sql = String::from(
        "SELECT i.url AS url, v.title AS title, v.visit_time AS visit_time \
         FROM history_items i JOIN history_visits v ON v.history_item = i.id",
    );
    push_filter_clauses(&mut sql, spec, "v.title", "i.url", "v.visit_time");
    sql.push_str(" ORDER BY v.visit_time DESC");

    let mut query = sqlx::query(&sql);
    if let Some(keyword) = &spec.keyword {
        let pattern = format!("%{keyword}%");
        query = query.bind(pattern.clone()).bind(pattern);
    }
    if let Some(since) = spec.since {
        query = query.bind(epoch::safari_from_date(since));
    }

    let rows = query
        .fetch_all(pool)
        .await
        .map_err(|err| HistoryError::QueryFailure(err.to_string()))?;

    rows.into_iter()
        .map(|row| {
            let raw_visit_time: f64 = get_column(&row, "visit_time")?;
            let last_visited_at = epoch::safari_to_utc(raw_visit_time).ok_or_else(|| {
                HistoryError::QueryFailure(format!("visit time out of range: {raw_visit_time}"))
            })?;
            Ok(HistoryRecord {
                url: get_column(&row, "url")?,
                title: get_column::<Option<String>>(&row, "title")?.unwrap_or_default(),
                last_visited_at,
            })
        })
        .collect()
}

fn push_filter_clauses(
    sql: &mut String,
    spec: &HistoryQuerySpec,
    title_column: &str,
    url_column: &str,
    visit_time_column: &str,
) {
    let mut clauses = Vec::new();
    if spec.keyword.is_some() {
        clauses.push(format!("({title_column} LIKE ? OR {url_column} LIKE ?)"));
    }
    if spec.since.is_some() {
        clauses.push(format!("{visit_time_column} >= ?"));
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
}

fn get_column<'r, T>(row: &'r sqlx::sqlite::SqliteRow, column: &str) -> Result<T, HistoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|err| HistoryError::QueryFailure(format!("column {column}: {err}")))
}

/// Renders records for the user, newest first, one line per visit. An
/// empty result set renders as a fixed no-match message.
pub fn format_history(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return NO_MATCHING_HISTORY_MESSAGE.to_string();
    }

    records
        .iter()
        .map(|record| {
            format!(
                "{} ({}) - Last visited: {}",
                record.title,
                record.url,
                record.last_visited_at.format("%Y-%m-%d %H:%M:%S")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{
        HistoryError, HistoryQuerySpec, HistoryRecord, NO_MATCHING_HISTORY_MESSAGE, fetch_history,
        format_history,
    };
    use crate::history::location::{HistoryStoreLocation, StoreKind};
    use crate::privacy::SessionAuthorization;

    #[tokio::test]
    async fn extraction_refuses_without_authorization() {
        let location = HistoryStoreLocation {
            path: "/nonexistent/History".into(),
            kind: StoreKind::Chromium,
        };

        let result = fetch_history(
            &location,
            &HistoryQuerySpec::default(),
            &SessionAuthorization::denied(),
        )
        .await;

        assert!(matches!(result, Err(HistoryError::PermissionDenied)));
    }

    #[tokio::test]
    async fn missing_store_is_reported_as_unavailable() {
        let location = HistoryStoreLocation {
            path: "/nonexistent/History".into(),
            kind: StoreKind::Chromium,
        };
        let authorization = SessionAuthorization {
            granted: true,
            ..Default::default()
        };

        let result = fetch_history(&location, &HistoryQuerySpec::default(), &authorization).await;
        assert!(matches!(result, Err(HistoryError::StoreUnavailable(_))));
    }

    #[test]
    fn formatting_renders_one_line_per_record() {
        let records = vec![
            HistoryRecord {
                url: "http://b.com".to_string(),
                title: "B".to_string(),
                last_visited_at: Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap(),
            },
            HistoryRecord {
                url: "http://a.com".to_string(),
                title: "A".to_string(),
                last_visited_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            },
        ];

        let rendered = format_history(&records);
        assert_eq!(
            rendered,
            "B (http://b.com) - Last visited: 2024-05-02 09:30:00\n\
             A (http://a.com) - Last visited: 2024-05-01 08:00:00"
        );
    }

    #[test]
    fn empty_result_renders_fixed_message() {
        assert_eq!(format_history(&[]), NO_MATCHING_HISTORY_MESSAGE);
    }
}

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Builds a minimal Chromium-schema history store at `path` with the given
/// (url, title, last_visit_time) rows. Timestamps use the vendor epoch
/// (microseconds since 1601-01-01).
pub async fn create_chromium_store(path: &Path, rows: &[(&str, &str, i64)]) {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("fixture store should open");

    sqlx::query(
        "CREATE TABLE urls (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url LONGVARCHAR,
            title LONGVARCHAR,
            visit_count INTEGER DEFAULT 0 NOT NULL,
            typed_count INTEGER DEFAULT 0 NOT NULL,
            last_visit_time INTEGER NOT NULL,
            hidden INTEGER DEFAULT 0 NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .expect("urls table should create");

    for (url, title, last_visit_time) in rows {
        sqlx::query("INSERT INTO urls (url, title, last_visit_time) VALUES (?, ?, ?)")
            .bind(url)
            .bind(title)
            .bind(last_visit_time)
            .execute(&pool)
            .await
            .expect("fixture row should insert");
    }

    pool.close().await;
}

/// Builds a minimal Safari-schema history store at `path` with the given
/// (url, title, visit_time) rows. Timestamps use seconds since 2001-01-01.
pub async fn create_safari_store(path: &Path, rows: &[(&str, &str, f64)]) {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("fixture store should open");

    sqlx::query(
        "CREATE TABLE history_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .expect("history_items table should create");

    sqlx::query(
        "CREATE TABLE history_visits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            history_item INTEGER NOT NULL,
            visit_time REAL NOT NULL,
            title TEXT
        )",
    )
    .execute(&pool)
    .await
    .expect("history_visits table should create");

    for (url, title, visit_time) in rows {
        let item_id: i64 = sqlx::query_scalar(
            "INSERT INTO history_items (url) VALUES (?) RETURNING id",
        )
        .bind(url)
        .fetch_one(&pool)
        .await
        .expect("fixture item should insert");

        sqlx::query("INSERT INTO history_visits (history_item, visit_time, title) VALUES (?, ?, ?)")
            .bind(item_id)
            .bind(visit_time)
            .bind(title)
            .execute(&pool)
            .await
            .expect("fixture visit should insert");
    }

    pool.close().await;
}

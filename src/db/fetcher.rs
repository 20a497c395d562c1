//! One-shot table fetching.
//!
//! The connection is scoped to a single fetch: the pool is created on entry
//! and closed on every exit path, including errors. Column order comes from
//! `DESCRIBE`, so an empty table still yields its declared columns.

use crate::config::DbConfig;
use crate::db::types::row_to_values;
use crate::error::{FetchError, FetchResult};
use crate::models::TableSnapshot;
use serde_json::Value as JsonValue;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySqlPool, Row};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch an entire table into a snapshot.
///
/// The table name is caller-trusted: it is interpolated as a backtick-quoted
/// identifier with no further escaping.
pub async fn fetch_table(config: &DbConfig, table: &str) -> FetchResult<TableSnapshot> {
    fetch_table_with_timeout(config, table, CONNECT_TIMEOUT).await
}

/// [`fetch_table`] with an explicit connect timeout.
pub async fn fetch_table_with_timeout(
    config: &DbConfig,
    table: &str,
    connect_timeout: Duration,
) -> FetchResult<TableSnapshot> {
    let pool = connect(config, connect_timeout).await?;
    let result = fetch_with_pool(&pool, table).await;
    pool.close().await;
    result
}

async fn connect(config: &DbConfig, connect_timeout: Duration) -> FetchResult<MySqlPool> {
    debug!(url = %config.redacted_url(), "Connecting to database");
    MySqlPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(connect_timeout)
        .connect_with(config.connect_options())
        .await
        .map_err(|e| match e {
            // Everything at connect time is a connectivity failure, even when
            // sqlx reports it as a database error (bad credentials, bad schema).
            sqlx::Error::Database(db_err) => FetchError::connection(
                db_err.message().to_string(),
                "Check DB_HOST, DB_PORT, DB_USER, DB_PASSWORD and DB_NAME",
            ),
            other => FetchError::from(other),
        })
}

async fn fetch_with_pool(pool: &MySqlPool, table: &str) -> FetchResult<TableSnapshot> {
    // Column names in declared order
    let describe_sql = format!("DESCRIBE `{}`", table);
    let describe_rows = sqlx::query(&describe_sql).fetch_all(pool).await?;
    let columns: Vec<String> = describe_rows
        .iter()
        .map(|row| row.try_get::<String, _>(0).map_err(FetchError::from))
        .collect::<FetchResult<_>>()?;

    // All rows, unfiltered
    let select_sql = format!("SELECT * FROM `{}`", table);
    let data_rows = sqlx::query(&select_sql).fetch_all(pool).await?;

    // Align each row to the DESCRIBE order by column name; a column missing
    // from the result set (shouldn't happen for SELECT *) becomes NULL.
    let rows: Vec<Vec<JsonValue>> = data_rows
        .iter()
        .map(|row| {
            let mut by_name: HashMap<String, JsonValue> = row_to_values(row).into_iter().collect();
            columns
                .iter()
                .map(|col| by_name.remove(col).unwrap_or(JsonValue::Null))
                .collect()
        })
        .collect();

    info!(
        table = %table,
        columns = columns.len(),
        rows = rows.len(),
        "Fetched table snapshot"
    );

    Ok(TableSnapshot::new(columns, rows))
}

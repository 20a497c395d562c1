//! Fetcher failure-path tests. Happy paths need a live MySQL server and are
//! exercised by the module tests on the snapshot and decoding layers.

use sql_assistant::config::DbConfig;
use sql_assistant::db::fetch_table_with_timeout;
use sql_assistant::error::FetchError;
use std::time::Duration;

// The pool keeps retrying a refused connect until the timeout elapses, so
// keep it short here.
const TEST_TIMEOUT: Duration = Duration::from_millis(500);

fn unreachable_config() -> DbConfig {
    DbConfig {
        db_host: "127.0.0.1".to_string(),
        // Port 1 is never a MySQL server; connection is refused immediately.
        db_port: 1,
        db_user: "policy_admin".to_string(),
        db_password: "irrelevant".to_string(),
        db_name: "policy_management".to_string(),
    }
}

#[tokio::test]
async fn unreachable_database_is_a_connection_error() {
    let err = fetch_table_with_timeout(&unreachable_config(), "order_details", TEST_TIMEOUT)
        .await
        .unwrap_err();
    assert!(
        matches!(err, FetchError::Connection { .. }),
        "expected Connection error, got {:?}",
        err
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn connection_error_carries_a_suggestion() {
    let err = fetch_table_with_timeout(&unreachable_config(), "order_details", TEST_TIMEOUT)
        .await
        .unwrap_err();
    assert!(err.suggestion().is_some());
}

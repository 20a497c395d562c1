//! Error types for the SQL Assistant.
//!
//! This module defines all error types using `thiserror`. Errors are absorbed
//! at the boundary where they occur: the fetch utility logs a failure notice
//! and exits cleanly, while agent errors become a warning message in the chat
//! transcript. Nothing here should crash the process.

use thiserror::Error;

/// Errors from the table fetcher. Connectivity failures are kept distinct
/// from query failures so callers can tell a bad configuration from a broken
/// statement.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Query failed: {message}")]
    Query {
        message: String,
        /// e.g., "42S02" for unknown table
        sql_state: Option<String>,
        suggestion: String,
    },

    #[error("Failed to decode row: {message}")]
    Decode { message: String },
}

impl FetchError {
    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a query error with optional SQL state.
    pub fn query(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Query {
            message: message.into(),
            sql_state,
            suggestion: suggestion.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Query { suggestion, .. } => Some(suggestion),
            Self::Decode { .. } => None,
        }
    }

    /// True for failures that may succeed on a plain re-run.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// Convert sqlx errors to FetchError.
impl From<sqlx::Error> for FetchError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => FetchError::connection(
                msg.to_string(),
                "Check DB_HOST, DB_PORT, DB_USER, DB_PASSWORD and DB_NAME",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                FetchError::query(
                    db_err.message(),
                    code,
                    "Check the table name and the database user's privileges",
                )
            }
            sqlx::Error::PoolTimedOut => FetchError::connection(
                "Timed out acquiring a connection",
                "Check network connectivity and database server status",
            ),
            sqlx::Error::PoolClosed => {
                FetchError::connection("Connection pool is closed", "Re-run the fetch")
            }
            sqlx::Error::Io(io_err) => FetchError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => FetchError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => FetchError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => FetchError::decode(format!(
                "Column index {} out of bounds (len: {})",
                index, len
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                FetchError::decode(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => FetchError::decode(format!("Decode error: {}", source)),
            _ => FetchError::query(
                format!("Unexpected database error: {}", err),
                None,
                "Re-run the fetch; report if it persists",
            ),
        }
    }
}

/// Errors from the hosted agent call.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Agent request failed: {message}")]
    Http { message: String },

    #[error("Agent API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed agent response: {message}")]
    MalformedResponse { message: String },
}

impl AgentError {
    /// Create an HTTP transport error.
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    /// Create an API error from a non-success status.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            AgentError::api(status.as_u16(), err.to_string())
        } else {
            AgentError::http(err.to_string())
        }
    }
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type alias for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::connection("Failed to connect", "Check credentials");
        assert!(err.to_string().contains("Connection failed"));
    }

    #[test]
    fn test_fetch_error_suggestion() {
        let err = FetchError::query("Unknown table", Some("42S02".to_string()), "Check the name");
        assert_eq!(err.suggestion(), Some("Check the name"));
        assert!(FetchError::decode("bad value").suggestion().is_none());
    }

    #[test]
    fn test_fetch_error_retryable() {
        assert!(FetchError::connection("err", "sugg").is_retryable());
        assert!(!FetchError::query("err", None, "sugg").is_retryable());
    }

    #[test]
    fn test_agent_error_display() {
        let err = AgentError::api(401, "invalid api key");
        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("invalid api key"));
    }
}

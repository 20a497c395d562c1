//! Configuration handling for the SQL Assistant.
//!
//! Configuration comes from CLI arguments with environment-variable fallbacks.
//! Database parameters use the same variable names as the original deployment
//! (`DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`).

use clap::{Args, Parser};
use sqlx::mysql::MySqlConnectOptions;
use url::Url;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_MODEL: &str = "gemma2-9b-it";
pub const DEFAULT_TABLE: &str = "order_details";

/// MySQL connection parameters, read once at startup and immutable after.
#[derive(Args, Debug, Clone)]
pub struct DbConfig {
    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = DEFAULT_DB_PORT)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub db_user: String,

    /// Database password (sensitive - never logged)
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: String,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: String,
}

impl DbConfig {
    /// Build sqlx connection options from the parts.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
    }

    /// Connection URL with the password masked, safe for logging.
    pub fn redacted_url(&self) -> String {
        let mut url = Url::parse("mysql://localhost").expect("static URL parses");
        let _ = url.set_username(&self.db_user);
        let _ = url.set_password(Some("****"));
        let _ = url.set_host(Some(&self.db_host));
        let _ = url.set_port(Some(self.db_port));
        url.set_path(&self.db_name);
        url.to_string()
    }
}

/// Configuration for the chat web server.
#[derive(Parser, Debug, Clone)]
#[command(name = "sql-assistant", version, about)]
pub struct Config {
    /// API key for the hosted agent (sensitive - never logged)
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: String,

    /// Model identifier to request from the agent
    #[arg(long, env = "GROQ_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Host to bind the HTTP server to
    #[arg(long, env = "HTTP_HOST", default_value = DEFAULT_HTTP_HOST)]
    pub http_host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "HTTP_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    pub http_port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "JSON_LOGS", default_value_t = false)]
    pub json_logs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_db_config() -> DbConfig {
        DbConfig {
            db_host: "db.internal".to_string(),
            db_port: 3307,
            db_user: "policy_admin".to_string(),
            db_password: "s3cret/with:odd@chars".to_string(),
            db_name: "policy_management".to_string(),
        }
    }

    #[test]
    fn test_redacted_url_hides_password() {
        let url = sample_db_config().redacted_url();
        assert!(url.contains("policy_admin"));
        assert!(url.contains("****"));
        assert!(!url.contains("s3cret"));
        assert!(url.contains("db.internal:3307"));
        assert!(url.ends_with("/policy_management"));
    }

    #[test]
    fn test_connect_options_from_parts() {
        let cfg = sample_db_config();
        // Builds without panicking and carries the host through.
        let opts = cfg.connect_options();
        assert!(format!("{:?}", opts).contains("db.internal"));
    }

    #[test]
    fn test_config_parses_from_args() {
        let cfg = Config::parse_from(["sql-assistant", "--groq-api-key", "k"]);
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.http_port, DEFAULT_HTTP_PORT);
        assert!(!cfg.json_logs);
    }

    #[test]
    fn test_db_port_must_be_integer() {
        #[derive(Parser, Debug)]
        struct Wrapper {
            #[command(flatten)]
            db: DbConfig,
        }
        let result = Wrapper::try_parse_from([
            "fetch-table",
            "--db-user",
            "u",
            "--db-password",
            "p",
            "--db-name",
            "d",
            "--db-port",
            "not-a-port",
        ]);
        assert!(result.is_err());
    }
}

//! SQL Assistant - chat server entry point.
//!
//! Serves the NL-to-SQL chat interface backed by a hosted agent. The system
//! instruction is rendered once at startup from the structured insurance
//! schema description.

use clap::Parser;
use sql_assistant::agent::GroqAgent;
use sql_assistant::chat::ChatPipeline;
use sql_assistant::config::Config;
use sql_assistant::models::insurance_schema;
use sql_assistant::transport::HttpServer;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_tracing(&config);

    info!(
        model = %config.model,
        "Starting SQL Assistant v{}",
        env!("CARGO_PKG_VERSION")
    );

    let instruction = insurance_schema().render_instruction();
    let agent = Arc::new(GroqAgent::new(&config.groq_api_key, &config.model));
    let pipeline = Arc::new(ChatPipeline::new(agent, instruction));

    let server = HttpServer::new(pipeline, &config.http_host, config.http_port);
    if let Err(e) = server.run().await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

//! SQL Assistant Library
//!
//! This library converts natural-language questions about an insurance policy
//! database into SQL via a hosted chat-completions agent, and provides a
//! standalone MySQL table fetch utility.

pub mod agent;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod transport;

pub use chat::{ChatPipeline, ChatSession};
pub use config::Config;
pub use error::{AgentError, FetchError};

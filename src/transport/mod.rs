//! HTTP transport for the chat pipeline.

pub mod http;

pub use http::{AppState, HttpServer, router};

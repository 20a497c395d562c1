//! Hosted agent client.

pub mod client;

pub use client::{GroqAgent, SqlAgent};

//! Database access layer.
//!
//! One-shot table fetching against MySQL plus the value decoding it needs.

pub mod fetcher;
pub mod types;

pub use fetcher::{fetch_table, fetch_table_with_timeout};

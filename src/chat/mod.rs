//! NL-to-SQL chat pipeline.

pub mod parser;
pub mod session;

pub use parser::SqlResponse;
pub use session::{ChatPipeline, ChatSession};

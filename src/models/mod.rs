//! Data models shared across the assistant.

pub mod chat;
pub mod schema;
pub mod snapshot;

pub use chat::{ChatTurn, Role};
pub use schema::{ColumnDef, SchemaDescription, TableDef, insurance_schema};
pub use snapshot::TableSnapshot;

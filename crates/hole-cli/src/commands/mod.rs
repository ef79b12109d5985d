pub mod dispatch;
pub mod history;
pub mod ingest;
pub mod query;
pub mod redact;
pub mod stats;

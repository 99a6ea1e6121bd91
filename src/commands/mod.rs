pub mod help;
pub mod ingest;

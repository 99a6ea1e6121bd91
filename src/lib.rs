pub mod auth;
pub mod commands;
pub mod config;
pub mod discord;
pub mod elastic;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pagination;

#[cfg(test)]
pub(crate) mod testing;

/// Custom data passed to all commands
pub struct Data {
    pub ingest: commands::ingest::IngestHandler,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

use crate::error::FetchError;
use crate::model::HistoryMessage;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::debug;

/// Read access to a channel's message history.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Returns up to `limit` messages older than `before` (the newest ones if `None`),
    /// newest first.
    async fn fetch_page(
        &self,
        channel_id: &str,
        limit: u8,
        before: Option<&str>,
    ) -> Result<Vec<HistoryMessage>, FetchError>;
}

pub struct DiscordHistory {
    http: Arc<serenity::Http>,
}

impl DiscordHistory {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

fn parse_snowflake(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|id| *id != 0)
}

#[async_trait]
impl HistorySource for DiscordHistory {
    async fn fetch_page(
        &self,
        channel_id: &str,
        limit: u8,
        before: Option<&str>,
    ) -> Result<Vec<HistoryMessage>, FetchError> {
        let channel = parse_snowflake(channel_id)
            .map(serenity::ChannelId::new)
            .ok_or_else(|| FetchError::InvalidChannel(channel_id.to_string()))?;

        let mut builder = serenity::GetMessages::new().limit(limit);
        if let Some(cursor) = before {
            let cursor = parse_snowflake(cursor)
                .ok_or_else(|| FetchError::InvalidCursor(cursor.to_string()))?;
            builder = builder.before(serenity::MessageId::new(cursor));
        }

        debug!("Fetching up to {} messages from channel {} before {:?}", limit, channel, before);
        let messages = channel.messages(&self.http, builder).await?;
        Ok(messages.iter().map(HistoryMessage::from).collect())
    }
}

//! Snapshots of Discord history as the ingestion pipeline sees them.
//!
//! Identifiers are kept as decimal snowflake strings so they can be used directly
//! as Elasticsearch document IDs.

use poise::serenity_prelude as serenity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub id: String,
    pub channel_id: String,
    pub author_id: String,
    pub content: String,
    /// RFC 3339
    pub timestamp: String,
    pub attachments: Vec<HistoryAttachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryAttachment {
    pub id: String,
    pub filename: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub size: u32,
    pub url: String,
    pub proxy_url: String,
}

impl From<&serenity::Message> for HistoryMessage {
    fn from(message: &serenity::Message) -> Self {
        Self {
            id: message.id.to_string(),
            channel_id: message.channel_id.to_string(),
            author_id: message.author.id.to_string(),
            content: message.content.clone(),
            timestamp: message.timestamp.to_string(),
            attachments: message.attachments.iter().map(HistoryAttachment::from).collect(),
        }
    }
}

impl From<&serenity::Attachment> for HistoryAttachment {
    fn from(attachment: &serenity::Attachment) -> Self {
        Self {
            id: attachment.id.to_string(),
            filename: attachment.filename.clone(),
            height: attachment.height,
            width: attachment.width,
            size: attachment.size,
            url: attachment.url.clone(),
            proxy_url: attachment.proxy_url.clone(),
        }
    }
}

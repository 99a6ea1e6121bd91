//! Projection of Discord history into index documents.

use crate::elastic::{Document, IndexWriter, ATTACHMENTS_INDEX, MESSAGES_INDEX};
use crate::error::IngestError;
use crate::model::{HistoryAttachment, HistoryMessage};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Documents written during an ingestion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub messages: usize,
    pub attachments: usize,
}

impl std::ops::AddAssign for IngestStats {
    fn add_assign(&mut self, other: Self) {
        self.messages += other.messages;
        self.attachments += other.attachments;
    }
}

pub fn message_document(message: &HistoryMessage) -> Document {
    let mut doc = Document::new();
    doc.insert("content".to_string(), json!(message.content));
    doc.insert("channel_id".to_string(), json!(message.channel_id));
    doc.insert("author_id".to_string(), json!(message.author_id));
    doc.insert("timestamp".to_string(), json!(message.timestamp));
    doc
}

/// Missing dimensions are written as zero.
pub fn attachment_document(attachment: &HistoryAttachment, parent: &HistoryMessage) -> Document {
    let mut doc = Document::new();
    doc.insert("filename".to_string(), json!(attachment.filename));
    doc.insert("height".to_string(), json!(attachment.height.unwrap_or(0)));
    doc.insert("width".to_string(), json!(attachment.width.unwrap_or(0)));
    doc.insert("size".to_string(), json!(attachment.size));
    doc.insert("url".to_string(), json!(attachment.url));
    doc.insert("proxy_url".to_string(), json!(attachment.proxy_url));
    doc.insert("message_id".to_string(), json!(parent.id));
    doc.insert("timestamp".to_string(), json!(parent.timestamp));
    doc
}

#[derive(Clone)]
pub struct Ingestor {
    writer: Arc<dyn IndexWriter>,
}

impl Ingestor {
    pub fn new(writer: Arc<dyn IndexWriter>) -> Self {
        Self { writer }
    }

    pub async fn ingest_attachment(
        &self,
        attachment: &HistoryAttachment,
        parent: &HistoryMessage,
    ) -> Result<(), IngestError> {
        let doc = attachment_document(attachment, parent);
        self.writer
            .write(ATTACHMENTS_INDEX, &attachment.id, &doc)
            .await
            .map_err(|error| IngestError::Attachment {
                attachment_id: attachment.id.clone(),
                error,
            })
    }

    /// Writes the message, then its attachments in order. Stops at the first failure.
    pub async fn ingest_message(
        &self,
        message: &HistoryMessage,
    ) -> Result<IngestStats, IngestError> {
        let doc = message_document(message);
        self.writer
            .write(MESSAGES_INDEX, &message.id, &doc)
            .await
            .map_err(|error| IngestError::Message {
                message_id: message.id.clone(),
                error,
            })?;

        let mut stats = IngestStats {
            messages: 1,
            attachments: 0,
        };
        for attachment in &message.attachments {
            self.ingest_attachment(attachment, message).await?;
            stats.attachments += 1;
        }

        Ok(stats)
    }

    pub async fn ingest_page(&self, page: &[HistoryMessage]) -> Result<IngestStats, IngestError> {
        let mut stats = IngestStats::default();
        for message in page {
            stats += self.ingest_message(message).await?;
        }
        debug!(
            "Ingested page: {} messages, {} attachments",
            stats.messages, stats.attachments
        );
        Ok(stats)
    }
}

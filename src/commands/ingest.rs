use crate::auth::Authorizer;
use crate::config::DISCORD_MESSAGE_LIMIT;
use crate::discord::HistorySource;
use crate::elastic::IndexWriter;
use crate::ingest::{IngestStats, Ingestor};
use crate::pagination::{paginate, HistoryPages, PaginationSummary};
use crate::{Context, Error};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Ingest a backlog of messages from a certain channel.
#[poise::command(prefix_command, check = "is_allowed")]
pub async fn ingest(
    ctx: Context<'_>,
    #[description = "ID of the channel to ingest logs from."] channel_id: String,
) -> Result<(), Error> {
    let caller_id = ctx.author().id.to_string();
    if let Some(report) = ctx.data().ingest.handle(&caller_id, &channel_id).await {
        ctx.say(report).await?;
    }
    Ok(())
}

/// Runs before argument parsing, so a denied caller never sees a usage error either.
async fn is_allowed(ctx: Context<'_>) -> Result<bool, Error> {
    Ok(ctx.data().ingest.is_authorized(&ctx.author().id.to_string()))
}

/// Runs one backlog ingestion and turns its outcome into a chat report.
pub struct IngestHandler {
    history: Arc<dyn HistorySource>,
    ingestor: Ingestor,
    authorizer: Arc<dyn Authorizer>,
    max_pages: Option<usize>,
}

impl IngestHandler {
    pub fn new(
        history: Arc<dyn HistorySource>,
        writer: Arc<dyn IndexWriter>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            history,
            ingestor: Ingestor::new(writer),
            authorizer,
            max_pages: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn is_authorized(&self, caller_id: &str) -> bool {
        let allowed = self.authorizer.is_authorized(caller_id);
        if !allowed {
            warn!("User {} does not have access to the ingest command", caller_id);
        }
        allowed
    }

    /// Returns the text to post back, or `None` when the caller is not allowed.
    pub async fn handle(&self, caller_id: &str, channel_id: &str) -> Option<String> {
        if !self.is_authorized(caller_id) {
            return None;
        }

        info!("Ingesting backlog of channel {} (requested by {})", channel_id, caller_id);
        let pages =
            HistoryPages::new(self.history.as_ref(), channel_id).with_max_pages(self.max_pages);
        let ingestor = &self.ingestor;
        let result = paginate(pages, move |page| async move {
            ingestor.ingest_page(&page).await
        })
        .await;

        match result {
            Ok(summary) => {
                info!(
                    "Ingested channel {}: {} messages, {} attachments over {} pages",
                    channel_id,
                    summary.handled.messages,
                    summary.handled.attachments,
                    summary.pages
                );
                Some(success_report(&summary))
            }
            Err(e) => {
                error!("Error ingesting messages from channel {}: {}", channel_id, e);
                Some(error_report(&e.to_string()))
            }
        }
    }
}

fn success_report(summary: &PaginationSummary<IngestStats>) -> String {
    let mut report = format!(
        "Channel messages successfully ingested. ({} messages, {} attachments)",
        summary.handled.messages, summary.handled.attachments
    );
    if summary.truncated {
        report.push_str(&format!(
            "\nStopped after the {} page limit; older messages may not have been ingested.",
            summary.pages
        ));
    }
    report
}

/// Wraps the error text in a code block that fits in one Discord message.
fn error_report(text: &str) -> String {
    const FENCE: &str = "```\n";
    let budget = DISCORD_MESSAGE_LIMIT - 2 * FENCE.len() - 3;
    let body = if text.chars().count() > budget {
        let mut cut: String = text.chars().take(budget).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    };
    format!("{FENCE}{body}\n```")
}

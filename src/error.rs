use thiserror::Error;

/// Reading channel history from Discord failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid channel id '{0}'")]
    InvalidChannel(String),
    #[error("invalid message cursor '{0}'")]
    InvalidCursor(String),
    #[error(transparent)]
    Discord(#[from] serenity::Error),
}

/// Writing a document into Elasticsearch failed.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("invalid Elasticsearch URL {0}")]
    InvalidUrl(String),
    #[error("got status code {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("error ingesting message {message_id}: {error}")]
    Message { message_id: String, error: IndexError },
    #[error("error ingesting attachment {attachment_id}: {error}")]
    Attachment {
        attachment_id: String,
        error: IndexError,
    },
}

/// Failure while walking a channel's history, split by where it happened.
///
/// The inner error is part of the message and is not repeated as a source.
#[derive(Debug, Error)]
pub enum PaginateError<E: std::error::Error + 'static> {
    #[error("error fetching messages from Discord: {0}")]
    Fetch(FetchError),
    #[error("error when processing messages: {0}")]
    Handler(E),
}

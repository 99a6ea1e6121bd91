//! In-memory stand-ins for Discord and Elasticsearch used by unit tests.

use crate::discord::HistorySource;
use crate::elastic::{Document, IndexWriter};
use crate::error::{FetchError, IndexError};
use crate::model::{HistoryAttachment, HistoryMessage};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

pub fn message(id: &str, attachments: Vec<HistoryAttachment>) -> HistoryMessage {
    HistoryMessage {
        id: id.to_string(),
        channel_id: "500".to_string(),
        author_id: "7".to_string(),
        content: format!("message {}", id),
        timestamp: "2021-03-04T05:06:07.000Z".to_string(),
        attachments,
    }
}

pub fn attachment(id: &str) -> HistoryAttachment {
    HistoryAttachment {
        id: id.to_string(),
        filename: format!("{}.png", id),
        height: Some(480),
        width: Some(640),
        size: 2048,
        url: format!("https://cdn.example.com/{}.png", id),
        proxy_url: format!("https://media.example.com/{}.png", id),
    }
}

/// Records every write. Documents whose ID matches `fail_on` are rejected.
#[derive(Default)]
pub struct RecordingWriter {
    fail_on: Option<String>,
    writes: Mutex<Vec<(String, String)>>,
    documents: Mutex<BTreeMap<(String, String), Document>>,
}

impl RecordingWriter {
    pub fn failing_on(document_id: &str) -> Self {
        Self {
            fail_on: Some(document_id.to_string()),
            ..Default::default()
        }
    }

    /// IDs written to `index`, in write order.
    pub fn ids(&self, index: &str) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(i, _)| i == index)
            .map(|(_, id)| id.clone())
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn snapshot(&self) -> BTreeMap<(String, String), Document> {
        self.documents.lock().unwrap().clone()
    }
}

#[async_trait]
impl IndexWriter for RecordingWriter {
    async fn write(
        &self,
        index: &str,
        document_id: &str,
        document: &Document,
    ) -> Result<(), IndexError> {
        if self.fail_on.as_deref() == Some(document_id) {
            return Err(IndexError::Status {
                status: 403,
                body: "index is read-only".to_string(),
            });
        }
        self.writes
            .lock()
            .unwrap()
            .push((index.to_string(), document_id.to_string()));
        self.documents
            .lock()
            .unwrap()
            .insert((index.to_string(), document_id.to_string()), document.clone());
        Ok(())
    }
}

/// A channel whose messages have IDs `1..=count`, served newest-first.
pub struct FakeHistory {
    messages: Vec<HistoryMessage>,
    fail_on_call: Option<usize>,
    pub calls: Mutex<Vec<(u8, Option<String>)>>,
}

impl FakeHistory {
    pub fn with_messages(count: u64) -> Self {
        Self {
            messages: (1..=count).rev().map(|id| message(&id.to_string(), vec![])).collect(),
            fail_on_call: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn from_messages(messages: Vec<HistoryMessage>) -> Self {
        Self {
            messages,
            fail_on_call: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The `n`th fetch (zero based) fails.
    pub fn failing_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HistorySource for FakeHistory {
    async fn fetch_page(
        &self,
        _channel_id: &str,
        limit: u8,
        before: Option<&str>,
    ) -> Result<Vec<HistoryMessage>, FetchError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((limit, before.map(str::to_string)));
            calls.len() - 1
        };
        if self.fail_on_call == Some(call) {
            return Err(FetchError::InvalidChannel("unreachable".to_string()));
        }

        let start = match before {
            Some(cursor) => self
                .messages
                .iter()
                .position(|m| m.id == cursor)
                .map(|pos| pos + 1)
                .unwrap_or(self.messages.len()),
            None => 0,
        };
        Ok(self
            .messages
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

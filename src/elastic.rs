use crate::config::Config;
use crate::error::IndexError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

/// A flat document as stored in the index.
pub type Document = Map<String, Value>;

pub const MESSAGES_INDEX: &str = "messages";
pub const ATTACHMENTS_INDEX: &str = "attachments";

#[async_trait]
pub trait IndexWriter: Send + Sync {
    /// Creates or fully replaces `document_id` in `index`. The write is visible to
    /// searches on return.
    async fn write(&self, index: &str, document_id: &str, document: &Document)
        -> Result<(), IndexError>;
}

enum Auth {
    ApiKey(String),
    Basic { username: String, password: Option<String> },
    None,
}

pub struct ElasticsearchClient {
    http: reqwest::Client,
    base_url: String,
    auth: Auth,
}

impl ElasticsearchClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: Auth::None,
        }
    }

    pub fn from_config(config: &Config, http: reqwest::Client) -> Self {
        let client = Self::new(http, config.elasticsearch_url.clone());
        if let Some(key) = &config.elasticsearch_api_key {
            client.with_api_key(key.clone())
        } else if let Some(username) = &config.elasticsearch_username {
            client.with_basic_auth(username.clone(), config.elasticsearch_password.clone())
        } else {
            client
        }
    }

    pub fn with_api_key(mut self, key: String) -> Self {
        self.auth = Auth::ApiKey(key);
        self
    }

    pub fn with_basic_auth(mut self, username: String, password: Option<String>) -> Self {
        self.auth = Auth::Basic { username, password };
        self
    }

    fn document_url(&self, index: &str, document_id: &str) -> Result<reqwest::Url, IndexError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| IndexError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| IndexError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend([index, "_doc", document_id]);
        url.query_pairs_mut().append_pair("refresh", "true");
        Ok(url)
    }
}

#[async_trait]
impl IndexWriter for ElasticsearchClient {
    async fn write(
        &self,
        index: &str,
        document_id: &str,
        document: &Document,
    ) -> Result<(), IndexError> {
        let url = self.document_url(index, document_id)?;
        debug!("Elasticsearch: indexing {}/{}", index, document_id);

        let request = self.http.put(url).json(document);
        let request = match &self.auth {
            Auth::ApiKey(key) => request.header("Authorization", format!("ApiKey {}", key)),
            Auth::Basic { username, password } => request.basic_auth(username, password.as_ref()),
            Auth::None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

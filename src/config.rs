use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub prefix: String,
    pub log_level: String,
    /// The single Discord user allowed to run ingestion commands
    pub allowed_user_id: String,
    pub max_pages: Option<usize>,
    pub elasticsearch_url: String,
    pub elasticsearch_username: Option<String>,
    pub elasticsearch_password: Option<String>,
    pub elasticsearch_api_key: Option<String>,
}

pub const DEFAULT_PREFIX: &str = "elk!";
pub const DEFAULT_ALLOWED_USER_ID: &str = "106162668032802816";
pub const DEFAULT_ELASTICSEARCH_URL: &str = "http://localhost:9200";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::build()
    }

    fn build() -> anyhow::Result<Self> {
        Ok(Config {
            discord_token: env::var("ELKBOT_TOKEN")
                .map_err(|_| anyhow::anyhow!("ELKBOT_TOKEN must be set"))?,
            prefix: env::var("ELKBOT_PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
            log_level: env::var("ELKBOT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            allowed_user_id: env::var("ELKBOT_ALLOWED_USER_ID")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_USER_ID.to_string()),
            max_pages: match env::var("ELKBOT_MAX_PAGES") {
                Ok(raw) => Some(
                    raw.trim()
                        .parse::<usize>()
                        .ok()
                        .filter(|pages| *pages > 0)
                        .ok_or_else(|| {
                            anyhow::anyhow!("ELKBOT_MAX_PAGES must be a positive integer")
                        })?,
                ),
                Err(_) => None,
            },
            elasticsearch_url: env::var("ELASTICSEARCH_URL")
                .ok()
                .and_then(|urls| first_url(&urls))
                .unwrap_or_else(|| DEFAULT_ELASTICSEARCH_URL.to_string()),
            elasticsearch_username: env::var("ELASTICSEARCH_USERNAME").ok(),
            elasticsearch_password: env::var("ELASTICSEARCH_PASSWORD").ok(),
            elasticsearch_api_key: env::var("ELASTICSEARCH_API_KEY").ok(),
        })
    }
}

/// `ELASTICSEARCH_URL` may hold a comma separated node list; only the first node is used.
fn first_url(urls: &str) -> Option<String> {
    urls.split(',')
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(|url| url.trim_end_matches('/').to_string())
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &"[REDACTED]")
            .field("prefix", &self.prefix)
            .field("log_level", &self.log_level)
            .field("allowed_user_id", &self.allowed_user_id)
            .field("max_pages", &self.max_pages)
            .field("elasticsearch_url", &self.elasticsearch_url)
            .field("elasticsearch_username", &self.elasticsearch_username)
            .field(
                "elasticsearch_password",
                &self.elasticsearch_password.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "elasticsearch_api_key",
                &self.elasticsearch_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Discord message limit is 2000 characters
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_config_logic() {
        // 1. Test missing vars
        env::remove_var("ELKBOT_TOKEN");
        env::remove_var("ELKBOT_PREFIX");
        env::remove_var("ELKBOT_MAX_PAGES");
        env::remove_var("ELASTICSEARCH_URL");
        let result = Config::build();
        assert!(result.is_err(), "Should fail when the token is missing");

        // 2. Test defaults
        env::set_var("ELKBOT_TOKEN", "test_token");
        let config = Config::build().unwrap();
        assert_eq!(config.discord_token, "test_token");
        assert_eq!(config.prefix, "elk!");
        assert_eq!(config.allowed_user_id, DEFAULT_ALLOWED_USER_ID);
        assert_eq!(config.max_pages, None);
        assert_eq!(config.elasticsearch_url, "http://localhost:9200");

        // 3. Test overrides
        env::set_var("ELKBOT_MAX_PAGES", "12");
        env::set_var("ELASTICSEARCH_URL", " http://es-1:9200/ ,http://es-2:9200");
        let config = Config::build().unwrap();
        assert_eq!(config.max_pages, Some(12));
        assert_eq!(config.elasticsearch_url, "http://es-1:9200");

        env::set_var("ELKBOT_MAX_PAGES", "lots");
        assert!(Config::build().is_err());
        env::set_var("ELKBOT_MAX_PAGES", "0");
        let err = Config::build().unwrap_err();
        assert!(err.to_string().contains("positive integer"));
        env::remove_var("ELKBOT_MAX_PAGES");

        // 4. Test debug redaction
        env::set_var("ELASTICSEARCH_API_KEY", "secret_api_key");
        env::set_var("ELASTICSEARCH_PASSWORD", "hunter2");
        let config_redacted = Config::build().unwrap();
        let debug_output = format!("{:?}", config_redacted);
        assert!(!debug_output.contains("test_token"));
        assert!(!debug_output.contains("secret_api_key"));
        assert!(!debug_output.contains("hunter2"));
        assert!(debug_output.contains("[REDACTED]"));

        // Cleanup
        env::remove_var("ELKBOT_TOKEN");
        env::remove_var("ELASTICSEARCH_URL");
        env::remove_var("ELASTICSEARCH_API_KEY");
        env::remove_var("ELASTICSEARCH_PASSWORD");
    }

    #[test]
    fn test_first_url() {
        assert_eq!(first_url(""), None);
        assert_eq!(first_url(" , http://a:9200"), Some("http://a:9200".to_string()));
    }
}

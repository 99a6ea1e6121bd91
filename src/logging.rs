use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. `RUST_LOG` takes precedence over the configured level.
pub fn init(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(normalize_level(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

/// Accepts tracing directives as well as zerolog style numeric levels (`-1` trace .. `5` panic).
pub fn normalize_level(level: &str) -> String {
    match level.trim() {
        "-1" => "trace".to_string(),
        "0" => "debug".to_string(),
        "1" => "info".to_string(),
        "2" => "warn".to_string(),
        "3" | "4" | "5" => "error".to_string(),
        "" => "info".to_string(),
        other => other.to_lowercase(),
    }
}

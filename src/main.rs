use elkbot::auth::SinglePrincipal;
use elkbot::commands::ingest::IngestHandler;
use elkbot::commands::{help, ingest};
use elkbot::config::Config;
use elkbot::discord::DiscordHistory;
use elkbot::elastic::ElasticsearchClient;
use elkbot::{logging, Data};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration, then logging at the configured level
    let config = Config::from_env()?;
    logging::init(&config.log_level)?;
    debug!("Loaded configuration: {:?}", config);

    debug!("Creating Elasticsearch client for {}", config.elasticsearch_url);
    let index_writer = Arc::new(ElasticsearchClient::from_config(
        &config,
        reqwest::Client::new(),
    ));

    let discord_token = config.discord_token.clone();
    let allowed_user_id = config.allowed_user_id.clone();
    let max_pages = config.max_pages;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![ingest::ingest(), help::help()],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                info!("Connected to Discord as {}", ready.user.name);

                let history = Arc::new(DiscordHistory::new(ctx.http.clone()));
                let ingest = IngestHandler::new(
                    history,
                    index_writer,
                    Arc::new(SinglePrincipal::new(allowed_user_id)),
                )
                .with_max_pages(max_pages);

                Ok(Data { ingest })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(&discord_token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Quitting elkbot");
        shard_manager.shutdown_all().await;
    });

    info!("elkbot is now running, press CTRL-C to exit.");
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}

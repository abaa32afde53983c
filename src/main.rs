use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::info;

use chat_bridge::channels::{BridgeHandler, TelegramRelay, WebhookSink, discord};
use chat_bridge::config::BridgeConfig;
use chat_bridge::pipeline::dispatch::{Dispatcher, Sink};
use chat_bridge::pipeline::rules::RuleTable;

/// Mirror Discord messages into a Telegram chat and an optional webhook.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the YAML config file.
    #[arg(
        short,
        long,
        global = true,
        default_value = "config.yaml",
        env = "CONFIG_PATH"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the guilds and channels the bot can see, then exit.
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = BridgeConfig::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    config.validate()?;

    match cli.command {
        Some(Command::List) => discord::list_guilds(&config.discord_token).await?,
        None => run(config).await?,
    }

    Ok(())
}

/// Start the bridge and block until a termination signal.
async fn run(config: BridgeConfig) -> anyhow::Result<()> {
    let rules = Arc::new(RuleTable::from_config(&config));

    let relay = TelegramRelay::new(config.telegram_bot_token.clone(), config.telegram_to_chat_id);
    let account = relay
        .health_check()
        .await
        .context("Telegram credential check failed")?;
    info!(account = %account, chat_id = config.telegram_to_chat_id, "Telegram relay authorized");

    let webhook: Option<Arc<dyn Sink>> = config
        .webhook_url
        .as_ref()
        .map(|url| Arc::new(WebhookSink::new(url.clone())) as Arc<dyn Sink>);
    if webhook.is_some() {
        info!("Webhook sink enabled");
    }

    let dispatcher = Arc::new(Dispatcher::new(Arc::new(relay), webhook));
    let handler = BridgeHandler::new(rules, dispatcher, config.debug_log);

    let mut client = serenity::Client::builder(&config.discord_token, discord::intents())
        .event_handler(handler)
        .await
        .context("creating Discord client")?;

    // In-flight dispatches are not drained; the signal tears the shards down
    // and the process exits.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Termination signal received, shutting down");
        shard_manager.shutdown_all().await;
    });

    client
        .start()
        .await
        .context("Discord connection failed")?;

    Ok(())
}

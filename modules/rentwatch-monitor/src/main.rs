use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use monitor_api_client::MonitorApiClient;
use rentwatch_common::{Config, InboundMessage};
use rentwatch_monitor::aggregator::Aggregator;
use rentwatch_monitor::analyzer;
use rentwatch_monitor::pipeline::Pipeline;
use telegram_files_client::TelegramFilesClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("rentwatch_monitor=info".parse()?),
        )
        .init();

    info!("rentwatch monitor starting...");

    let config = Config::from_env();
    config.log_redacted();

    let resolver = Arc::new(TelegramFilesClient::new(
        &config.telegram_api_base,
        &config.bot_token,
        config.http_timeout(),
    ));
    let store = Arc::new(MonitorApiClient::new(
        &config.monitor_api_base,
        config.http_timeout(),
    ));

    // reachability check; a down backend is worth knowing about at boot
    match store.list_groups().await {
        Ok(groups) => info!(groups = groups.len(), "backend connection successful"),
        Err(err) => error!(error = %err, "backend connection failed"),
    }

    let pipeline = Pipeline::new(resolver, store);
    let aggregator = Aggregator::new(pipeline, config.media_group_timeout());

    info!(
        keywords = analyzer::RENTAL_KEYWORDS.len(),
        media_group_timeout_secs = config.media_group_timeout_secs,
        "listening for captured messages on stdin"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<InboundMessage>(line) {
            Ok(message) => aggregator.on_message(message).await,
            Err(err) => warn!(error = %err, "skipping malformed message line"),
        }
    }

    // input drained; give in-flight media groups their quiet period
    tokio::time::sleep(config.media_group_timeout() + Duration::from_millis(250)).await;
    info!("input drained, shutting down");
    Ok(())
}

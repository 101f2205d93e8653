mod bootstrap_helpers;
mod cli_args;
mod startup_data;
mod static_site;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use atlas_ai::{GoogleClient, GoogleConfig};
use atlas_runtime::{InteractionRouter, RouterConfig};
use atlas_telegram::{run_telegram_poll_loop, TelegramApiClient, TelegramPollConfig};

use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::Cli;
use crate::startup_data::{load_registry, load_taxonomy};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let taxonomy = Arc::new(load_taxonomy(&cli.taxonomy_path));
    let registry = Arc::new(load_registry(&cli.users_path));

    let generation = Arc::new(GoogleClient::new(GoogleConfig {
        api_base: cli.google_api_base.clone(),
        api_key: cli.google_api_key.clone(),
        model: cli.model.clone(),
        request_timeout_ms: cli.request_timeout_ms,
    })?);
    let telegram = TelegramApiClient::new(
        cli.telegram_api_base.clone(),
        cli.bot_token.clone(),
        cli.request_timeout_ms,
    )?;

    let router = Arc::new(InteractionRouter::new(
        taxonomy,
        registry,
        generation,
        Arc::new(telegram.clone()),
        RouterConfig {
            owner_chat_id: cli.owner_chat_id,
            snapshot_path: Some(cli.users_path.clone()),
        },
    ));

    tokio::spawn({
        let port = cli.http_port;
        let static_dir = cli.static_dir.clone();
        async move {
            if let Err(error) = static_site::serve_static_page(port, static_dir).await {
                warn!("static page server failed: {error:#}");
            }
        }
    });

    let poll_config = TelegramPollConfig {
        poll_timeout_s: cli.poll_timeout_s,
        ..TelegramPollConfig::default()
    };
    info!("atlas bot is running");
    tokio::select! {
        result = run_telegram_poll_loop(telegram, router, poll_config) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested");
            Ok(())
        }
    }
}

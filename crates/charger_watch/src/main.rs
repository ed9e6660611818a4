//! Terminal front end for the charger availability poller.
//! Watches one EV charging station and forwards the device token to the backend.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use availability_poller::{AvailabilityPoller, PollerSession};
use places_api::PlacesClient;
use tokio::io::{AsyncBufReadExt, BufReader};
use token_notifier::TokenNotifier;

mod config;
mod view;

use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting charger watch...");

    let config = AppConfig::from_env()?;
    log::info!(
        "🔌 Watching place {} every {:?}",
        config.place_id,
        config.refresh_interval
    );

    // Device token submission runs detached and never blocks startup
    let notifier = TokenNotifier::new(config.device_token_endpoint.clone())?;
    match &config.device_token {
        Some(raw_token) => {
            notifier.on_registered(raw_token);
        }
        None => notifier.on_registration_failed("DEVICE_TOKEN not set"),
    }

    let client = PlacesClient::new(config.api_key.clone(), Some(config.places_config()))?;
    let poller = Arc::new(AvailabilityPoller::new(
        Arc::new(client),
        Some(config.poller_config()),
    ));

    // The initial fetch can take up to the HTTP timeout; stay interruptible
    let session = tokio::select! {
        session = PollerSession::mount(poller) => session,
        _ = tokio::signal::ctrl_c() => {
            log::info!("👋 Interrupted before the first refresh completed");
            return Ok(());
        }
    };
    let mut shown = session.state().await;
    println!("{}", view::render(&shown));

    log::info!("⌨️ Type 'r' + Enter to refresh, 'q' + Enter or Ctrl-C to quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut redraw = tokio::time::interval(Duration::from_millis(500));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(input)) => match input.trim() {
                    "r" => {
                        session.spawn_pull_to_refresh();
                    }
                    "q" => break,
                    "" => {}
                    other => log::warn!("Unknown command: {}", other),
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    log::error!("❌ Failed to read stdin: {}", e);
                    stdin_open = false;
                }
            },
            _ = redraw.tick() => {}
        }

        let state = session.state().await;
        if state != shown {
            println!("{}", view::render(&state));
            shown = state;
        }
    }

    session.unmount().await;
    log::info!("👋 Charger watch stopped");
    Ok(())
}

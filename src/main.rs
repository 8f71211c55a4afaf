mod attendance;
mod config;
mod database;
mod error;
mod server;
mod store;
mod utils;

use anyhow::Result;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "clockin_kiosk=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Starting clock-in kiosk service...");

    if let Err(why) = server::serve(config).await {
        tracing::error!("Server error: {:?}", why);
        return Err(why);
    }

    Ok(())
}

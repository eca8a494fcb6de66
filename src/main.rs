//! # Order Chat Relay
//!
//! Application entry point. Loads configuration, initializes logging, and
//! serves the WebSocket gateway until interrupted.

use anyhow::Result;
use tracing::info;

use order_chat_relay::config::Settings;
use order_chat_relay::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: it decides the log format
    let settings = Settings::load()?;
    order_chat_relay::telemetry::init_tracing(&settings.telemetry);

    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        websocket_path = %settings.websocket.path,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}

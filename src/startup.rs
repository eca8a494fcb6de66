//! Application Startup
//!
//! Builds the shared state once and serves it until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;

use crate::application::services::GatewayDispatcher;
use crate::config::Settings;
use crate::domain::{ConversationStore, RoomRegistry};
use crate::infrastructure::store::{InMemoryConversationStore, MessageIdGenerator};
use crate::presentation::http::{handlers::health, routes};
use crate::presentation::middleware::{create_cors_layer, create_trace_layer};
use crate::presentation::websocket::Gateway;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<GatewayDispatcher>,
    pub gateway: Arc<Gateway>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Construct the room registry, conversation store and gateway.
    pub fn new(settings: Settings) -> Self {
        let rooms = Arc::new(RoomRegistry::new(settings.rooms.leave_all_policy));
        let conversations: Arc<dyn ConversationStore> = Arc::new(InMemoryConversationStore::new(
            MessageIdGenerator::from_settings(&settings.conversations),
        ));

        Self {
            dispatcher: Arc::new(GatewayDispatcher::new(rooms, conversations)),
            gateway: Arc::new(Gateway::new()),
            settings: Arc::new(settings),
        }
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();

        let addr = settings
            .server
            .socket_addr()
            .with_context(|| format!("invalid server address {}", settings.server_addr()))?;

        tracing::info!(
            leave_all_policy = ?settings.rooms.leave_all_policy,
            message_ids = ?settings.conversations.message_id_strategy,
            "Room registry and conversation store created"
        );
        let state = AppState::new(settings);

        // Build router with middleware
        let router = routes::create_router(state.clone())
            .layer(create_trace_layer())
            .layer(create_cors_layer(&state.settings.cors));

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            router,
            state,
        })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

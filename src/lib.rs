//! # Order Chat Relay Library
//!
//! Real-time order-support chat over WebSocket:
//! - Clients join rooms keyed by store id or order number
//! - Chat messages are kept per store and order for the process lifetime
//! - Messages and order status updates are relayed to both rooms
//!
//! ## Architecture
//!
//! - **Domain Layer**: Room registry, conversation entities and store contract
//! - **Application Layer**: Event decoding and the gateway dispatcher
//! - **Infrastructure Layer**: In-memory conversation store and metrics
//! - **Presentation Layer**: WebSocket gateway and operational HTTP endpoints
//!
//! ## Module Structure
//!
//! ```text
//! order_chat_relay/
//! +-- config/         Configuration management
//! +-- domain/         Entities and the room registry
//! +-- application/    Dispatcher and DTOs
//! +-- infrastructure/ Conversation store and metrics
//! +-- presentation/   WebSocket gateway, HTTP routes, middleware
//! +-- shared/         Common utilities (errors, snowflake IDs)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core state
pub mod domain;

// Application layer - Event handling
pub mod application;

// Infrastructure layer - Storage and metrics
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;

//! Application Services
//!
//! Event handling on top of the domain layer.

pub mod dispatcher;

pub use dispatcher::GatewayDispatcher;

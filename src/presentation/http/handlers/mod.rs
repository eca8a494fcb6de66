//! HTTP Handlers
//!
//! Operational endpoints. Chat traffic goes over the WebSocket gateway.

pub mod health;

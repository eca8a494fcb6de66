//! Infrastructure Layer
//!
//! Contains implementations for process-level services:
//! - Conversation storage (in memory)
//! - Prometheus metrics

pub mod metrics;
pub mod store;

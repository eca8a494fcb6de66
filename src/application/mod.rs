//! Application Layer
//!
//! Decodes gateway events, drives the domain layer, and computes broadcast
//! targets.

pub mod dto;
pub mod services;

//! Worldgen Server Library
//!
//! This library provides the core functionality for the worldgen server: an
//! HTTP front end that asks a chat-completion model to generate, render and
//! simulate a small text-adventure world held by the client.
//!
//! ## Modules
//!
//! - `api` - HTTP routes, request/response bodies and error mapping
//! - `config` - Server configuration management
//! - `error` - Error types and result definitions
//! - `gateway` - Prompt building, payload extraction and retries
//! - `llm` - Chat-completion client
//! - `world` - World, object, interaction and effect types

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod state;
pub mod world;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{GatewayError, Result};
pub use gateway::Gateway;
pub use state::AppState;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! HTTP transport for the JSON-RPC service
//!
//! Provides the external API routing: the root JSON-RPC listener and metadata endpoints.

pub mod handlers;

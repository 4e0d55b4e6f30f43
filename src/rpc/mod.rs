//! JSON-RPC 2.0 protocol handling
//!
//! Envelope decoding and encoding, plus the validate, dispatch, respond pipeline.

pub mod envelope;
pub mod server;

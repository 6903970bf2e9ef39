#![deny(missing_docs)]

//! Core library for gistr, an article summarizer with a remote model cascade and a local
//! extractive fallback.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Summarization counters.
pub mod metrics;
/// Remote cascade, extractive fallback and the orchestrator that ties them together.
pub mod summarization;
/// Transport abstraction over the remote model API.
pub mod transport;

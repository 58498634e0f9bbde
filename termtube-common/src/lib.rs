//! Common types and utilities shared across termtube crates.
//!
//! This crate holds the logging bootstrap and the error type used by the
//! front-ends (CLI and terminal UI). The extraction engine and the HTTP
//! client carry their own narrower error enums; this one is where they meet.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`TermtubeError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use termtube_common::TermtubeError;
//!
//! let err = TermtubeError::Config("missing provider origin".into());
//! assert_eq!(err.to_string(), "Configuration error: missing provider origin");
//! ```
pub mod observability;

/// Error types used by the termtube front-ends.
#[derive(thiserror::Error, Debug)]
pub enum TermtubeError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal or process I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient alias for results that use [`TermtubeError`].
pub type Result<T> = std::result::Result<T, TermtubeError>;

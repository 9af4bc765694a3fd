//! # quantum-core
//!
//! Core types and utilities shared by the Quantum networking API client and
//! command-line tool.
//!
//! ## Modules
//!
//! - [`error`] - Error type and HTTP status code mapping
//! - [`config`] - Validated client configuration
//! - [`client`] - HTTP client tuning and retry policy
//! - [`query`] - Query parameter builder

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod query;

// Re-export commonly used types
pub use error::{Error, Result};

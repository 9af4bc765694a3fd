//! Quantum networking API client and data models.
//!
//! Provides an asynchronous client for the v2.0 REST API and the wire
//! models of the network and subnet resources.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{QuantumClient, QuantumClientBuilder, ResourceApi};
pub use models::{CreateNetworkRequest, Network, Record, ResourceKind, Subnet, NETWORK, SUBNET};

/// Convenient result alias sharing the `quantum-core` error type.
pub type Result<T> = quantum_core::Result<T>;

//! HeartLedger - a hash-linked append-only ledger of sampled measurements
//!
//! # Architecture
//!
//! ## Core Ledger
//! - [`blockchain`] - Block construction, hashing, link validation and the chain
//! - [`consensus`] - Longest-valid-chain rule for competing sequences
//! - [`ledger`] - Shared, lock-guarded handle used by request handlers
//!
//! ## Integration
//! - [`api`] - HTTP endpoints (axum)
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`logging`] - Tracing subscriber setup
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod consensus;
pub mod ledger;

// ============================================================================
// Integration
// ============================================================================
#[cfg(feature = "api")]
pub mod api;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
pub mod logging;

//! Shared helpers used across layers.

/// Logger initialization
pub mod logging;

/// Width-aware text helpers
pub mod text;

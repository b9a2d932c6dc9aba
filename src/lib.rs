//! Brisk - a minimal YAML-based recipe runner
//!
//! Recipes are named lists of shell commands with dependencies on other
//! recipes. Brisk runs a requested recipe after everything it depends on,
//! each recipe at most once per invocation, and stops at the first failure.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{BriskError, Result};

/// Current version of Brisk
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

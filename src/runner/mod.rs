//! Recipe execution engine
//!
//! This module holds the recipe registry, dependency resolution, command
//! execution and the orchestrating runner.

pub mod command;
pub mod context;
pub mod interrupt;
pub mod recipe;
pub mod registry;
pub mod resolver;
pub mod run;

// Re-export main types
pub use command::*;
pub use context::*;
pub use interrupt::*;
pub use recipe::*;
pub use registry::*;
pub use resolver::*;
pub use run::*;

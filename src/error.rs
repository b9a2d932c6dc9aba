//! Error types for Brisk

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Brisk operations
pub type Result<T> = std::result::Result<T, BriskError>;

/// Exit code for a command that ran and exited non-zero
pub const EXIT_COMMAND_FAILURE: i32 = 1;
/// Exit code for configuration and usage problems
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for a requested or depended-upon recipe that does not exist
pub const EXIT_UNKNOWN_RECIPE: i32 = 3;
/// Exit code for a dependency cycle
pub const EXIT_CYCLE: i32 = 4;
/// Exit code for a command whose interpreter could not be started
pub const EXIT_LAUNCH_FAILURE: i32 = 127;
/// Exit code after Ctrl-C
pub const EXIT_INTERRUPTED: i32 = 130;

/// Main error type for Brisk
#[derive(Error, Debug)]
pub enum BriskError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan resolution errors
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A recipe failed while running its commands
    #[error("{}", recipe_failed_message(.recipe, .source))]
    RecipeFailed {
        recipe: String,
        #[source]
        source: ExecutionError,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl BriskError {
    /// Process exit status for this error, one code per failure category
    pub fn exit_code(&self) -> i32 {
        match self {
            BriskError::Resolve(ResolveError::UnknownRecipe { .. }) => EXIT_UNKNOWN_RECIPE,
            BriskError::Resolve(ResolveError::CyclicDependency(_)) => EXIT_CYCLE,
            BriskError::RecipeFailed { source, .. } => source.exit_code(),
            BriskError::Config(_) | BriskError::Io(_) | BriskError::Yaml(_) => EXIT_CONFIG,
        }
    }

    /// Whether this error came from Ctrl-C rather than a real failure
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            BriskError::RecipeFailed {
                source: ExecutionError::Interrupted,
                ..
            }
        )
    }
}

fn recipe_failed_message(recipe: &str, source: &ExecutionError) -> String {
    match source {
        ExecutionError::Interrupted => format!("Recipe '{}' interrupted", recipe),
        other => format!("Recipe '{}' failed: {}", recipe, other),
    }
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Recipe '{0}' is defined more than once")]
    DuplicateDefinition(String),

    #[error("Invalid recipe name '{0}': names must be non-empty and contain no whitespace")]
    InvalidName(String),

    #[error("Failed to include file '{path}': {error}")]
    IncludeFile { path: PathBuf, error: String },

    #[error("Failed to load environment file '{path}': {error}")]
    EnvFile { path: PathBuf, error: String },
}

/// Errors raised while computing an execution plan
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{}", unknown_recipe_message(.name, .required_by))]
    UnknownRecipe {
        name: String,
        required_by: Option<String>,
    },

    #[error("Circular dependency detected: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),
}

fn unknown_recipe_message(name: &str, required_by: &Option<String>) -> String {
    match required_by {
        Some(parent) => format!("Recipe '{}' (required by '{}') is not defined", name, parent),
        None => format!("Recipe '{}' is not defined", name),
    }
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("failed to launch `{command}`: {reason}")]
    LaunchFailure { command: String, reason: String },

    #[error("command `{command}` {}", describe_exit(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// The command started but its status could not be collected
    #[error("lost track of `{command}`: {reason}")]
    WaitFailed { command: String, reason: String },

    #[error("interrupted")]
    Interrupted,
}

impl ExecutionError {
    fn exit_code(&self) -> i32 {
        match self {
            ExecutionError::LaunchFailure { .. } => EXIT_LAUNCH_FAILURE,
            ExecutionError::CommandFailed { .. } | ExecutionError::WaitFailed { .. } => {
                EXIT_COMMAND_FAILURE
            }
            ExecutionError::Interrupted => EXIT_INTERRUPTED,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for plan resolution
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

//! Execution context for recipe running
//!
//! The context carries everything a command needs that is not part of the
//! recipe itself, plus the verbosity-aware printers for runner output.

use crate::runner::Interrupt;
use colored::Colorize;
use indexmap::IndexMap;
use std::env;
use std::path::PathBuf;

/// Execution context shared by every command in an invocation
pub struct Context {
    /// Current working directory
    pub working_dir: PathBuf,

    /// Configuration file path
    pub config_path: Option<PathBuf>,

    /// Environment overrides passed to every command
    pub environment: IndexMap<String, String>,

    /// Interpreter that receives each command line (e.g., ["bash", "-c"])
    pub interpreter: Vec<String>,

    /// Verbosity level
    pub verbosity: Verbosity,

    /// Echo commands instead of running them
    pub dry_run: bool,

    /// Raised on Ctrl-C
    pub interrupt: Interrupt,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_path: None,
            environment: IndexMap::new(),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            verbosity: Verbosity::Normal,
            dry_run: false,
            interrupt: Interrupt::new(),
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the configuration file path
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Set environment overrides
    pub fn with_environment(mut self, environment: IndexMap<String, String>) -> Self {
        self.environment = environment;
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Use a specific interrupt flag
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "[INFO]".green(), message);
        }
    }

    /// Print debug message (only in verbose mode)
    pub fn print_debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("{} {}", "[DEBUG]".dimmed(), message);
        }
    }

    /// Print a command line before it runs
    pub fn print_command(&self, command: &str) {
        if self.verbosity >= Verbosity::Normal {
            let tag = if self.dry_run { "[DRY RUN]" } else { "[RUN]" };
            eprintln!("{} {}", tag.cyan(), command);
        }
    }

    /// Print recipe start message
    pub fn print_recipe_start(&self, recipe: &str) {
        self.print_info(&format!("Running recipe: {}", recipe.bold()));
    }

    /// Print recipe complete message
    pub fn print_recipe_complete(&self, recipe: &str) {
        self.print_debug(&format!("Recipe completed: {}", recipe));
    }

    /// Print recipe skip message
    pub fn print_recipe_skip(&self, recipe: &str, reason: &str) {
        self.print_debug(&format!("Skipping recipe '{}': {}", recipe, reason));
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

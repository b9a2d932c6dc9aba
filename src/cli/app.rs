//! Main CLI application

use crate::config::{
    load_environment, parse_config_auto, parse_config_file, validate_config, Config,
};
use crate::error::{ConfigError, Result};
use crate::runner::{resolve_all, Context, Interrupt, Registry, Runner, Verbosity};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use colored::Colorize;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// CLI application
pub struct App {
    /// Parsed configuration
    config: Config,
    /// Config file path
    config_path: PathBuf,
    /// Recipes loaded from the configuration
    registry: Registry,
}

impl App {
    /// Create a new app from the nearest configuration file
    pub fn new() -> Result<Self> {
        let (config, config_path) = parse_config_auto()?;
        Self::from_parts(config, config_path)
    }

    /// Create app with a specific config file
    pub fn with_config_file(path: PathBuf) -> Result<Self> {
        let config = parse_config_file(&path)?;
        Self::from_parts(config, path)
    }

    fn from_parts(config: Config, config_path: PathBuf) -> Result<Self> {
        validate_config(&config)?;
        let registry = Registry::from_config(&config)?;
        debug!(path = %config_path.display(), recipes = registry.len(), "loaded config");

        Ok(App {
            config,
            config_path,
            registry,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run the application with already parsed command line arguments
    pub fn run(&self, matches: &ArgMatches) -> Result<()> {
        let verbosity = get_verbosity(matches);

        if matches.get_flag("list") {
            self.print_list();
            return Ok(());
        }

        let mut targets: Vec<String> = matches
            .get_many::<String>("recipes")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        if targets.is_empty() {
            match &self.config.default {
                Some(default) => targets.push(default.clone()),
                None => {
                    build_command().print_help()?;
                    println!();
                    return Ok(());
                }
            }
        }

        let dry_run = matches.get_flag("dry-run");
        let ctx = self.build_context(verbosity, dry_run)?;

        if dry_run {
            let plan = resolve_all(&self.registry, targets.iter().map(String::as_str))?;
            ctx.print_info(&format!("Plan: {}", plan.join(" -> ")));
        }

        let mut runner = Runner::new(&self.registry, ctx);
        runner.run(&targets)
    }

    /// Create the execution context from configuration and flags
    fn build_context(&self, verbosity: Verbosity, dry_run: bool) -> Result<Context> {
        let environment = load_environment(&self.config, Some(&self.config_path))?;

        let interrupt = Interrupt::install().unwrap_or_else(|e| {
            warn!(error = %e, "could not install Ctrl-C handler");
            Interrupt::new()
        });

        let mut ctx = Context::new()
            .with_config_path(self.config_path.clone())
            .with_verbosity(verbosity)
            .with_environment(environment)
            .with_dry_run(dry_run)
            .with_interrupt(interrupt);

        // Set interpreter if specified in config
        if let Some(interpreter) = &self.config.interpreter {
            ctx = ctx.with_interpreter(interpreter.clone());
        }

        Ok(ctx)
    }

    /// Print public recipes in declaration order
    fn print_list(&self) {
        if let Some(name) = &self.config.name {
            match &self.config.usage {
                Some(usage) => println!("{} - {}", name.bold(), usage),
                None => println!("{}", name.bold()),
            }
        }
        println!("Available recipes:");

        let width = self
            .registry
            .iter()
            .filter(|r| !r.private)
            .map(|r| r.name.len())
            .max()
            .unwrap_or(0);

        for recipe in self.registry.iter().filter(|r| !r.private) {
            let mut line = format!("    {:width$}", recipe.name, width = width);
            if let Some(usage) = &recipe.usage {
                line.push_str(&format!("  {}", usage));
            }
            if !recipe.deps.is_empty() {
                line.push_str(&format!("  [deps: {}]", recipe.deps.join(", ")).dimmed().to_string());
            }
            if self.config.default.as_deref() == Some(recipe.name.as_str()) {
                line.push_str(&" (default)".green().to_string());
            }
            println!("{}", line.trim_end());
        }
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("brisk")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A minimal YAML-based recipe runner")
        .arg(
            Arg::new("recipes")
                .value_name("RECIPE")
                .help("Recipes to run, in order")
                .num_args(0..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to brisk.yml config file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no runner output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List available recipes")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print what would run without running it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Print shell completions")
                .value_parser(value_parser!(Shell)),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Install the tracing subscriber; `RUST_LOG` takes precedence over verbosity
fn init_logging(verbosity: Verbosity) {
    let default_filter = match verbosity {
        Verbosity::Silent => "off",
        Verbosity::Quiet | Verbosity::Normal => "brisk=warn",
        Verbosity::Verbose => "brisk=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<()> {
    run_from(std::env::args_os())
}

/// Run the CLI application with provided arguments
pub fn run_from<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command().get_matches_from(args);
    init_logging(get_verbosity(&matches));

    if let Some(shell) = matches.get_one::<Shell>("completions") {
        let mut command = build_command();
        clap_complete::generate(*shell, &mut command, "brisk", &mut io::stdout());
        return Ok(());
    }

    let app = match matches.get_one::<PathBuf>("file") {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.display().to_string()).into());
            }
            App::with_config_file(path.clone())?
        }
        None => App::new()?,
    };

    app.run(&matches)
}

//! Command execution
//!
//! This module runs a recipe's command lines through the interpreter, one
//! child process at a time, with the child's output going straight to ours.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{Context, Recipe};
use std::io;
use std::path::Path;
use std::process::{Child, Command as StdCommand, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// How often a running child is checked for exit or interruption
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Run every command of a recipe in declared order, stopping at the first failure
///
/// A recipe without commands succeeds immediately and spawns nothing.
pub fn execute_recipe(recipe: &Recipe, ctx: &Context) -> ExecutionResult<()> {
    if recipe.is_grouping() {
        debug!(recipe = %recipe.name, "grouping recipe, nothing to run");
        return Ok(());
    }

    let working_dir = match &recipe.dir {
        Some(dir) => ctx.working_dir.join(dir),
        None => ctx.working_dir.clone(),
    };

    for line in &recipe.commands {
        execute_command(line, &working_dir, ctx)?;
    }

    Ok(())
}

/// Run a single command line in the given directory
pub fn execute_command(line: &str, working_dir: &Path, ctx: &Context) -> ExecutionResult<()> {
    ctx.print_command(line);
    if ctx.dry_run {
        return Ok(());
    }

    if ctx.interrupt.is_triggered() {
        return Err(ExecutionError::Interrupted);
    }

    let mut command = build_command(line, working_dir, ctx)?;
    debug!(command = line, dir = %working_dir.display(), "spawning");

    let child = command
        .spawn()
        .map_err(|e| ExecutionError::LaunchFailure {
            command: line.to_string(),
            reason: launch_reason(&command.get_program().to_string_lossy(), &e),
        })?;

    let status = ChildGuard::new(child).wait(line, ctx)?;
    debug!(command = line, ?status, "finished");

    if status.success() {
        return Ok(());
    }

    // A terminal Ctrl-C reaches the child too, which then usually exits
    // non-zero before the flag is observed
    if ctx.interrupt.is_triggered() {
        return Err(ExecutionError::Interrupted);
    }

    Err(ExecutionError::CommandFailed {
        command: line.to_string(),
        code: status.code(),
    })
}

/// Prepare the interpreter invocation for a command line
fn build_command(line: &str, working_dir: &Path, ctx: &Context) -> ExecutionResult<StdCommand> {
    let (program, interpreter_args) =
        ctx.interpreter
            .split_first()
            .ok_or_else(|| ExecutionError::LaunchFailure {
                command: line.to_string(),
                reason: "no interpreter configured".to_string(),
            })?;

    let mut command = StdCommand::new(program);
    command.args(interpreter_args);
    command.arg(line);
    command.current_dir(working_dir);

    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    command.envs(&ctx.environment);

    Ok(command)
}

fn launch_reason(program: &str, err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => format!("interpreter '{}' not found", program),
        _ => format!("{}: {}", program, err),
    }
}

/// Owns a running child; kills and reaps it if dropped before it exits
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        ChildGuard {
            child,
            reaped: false,
        }
    }

    /// Block until the child exits, or kill it once the interrupt flag is raised
    fn wait(mut self, line: &str, ctx: &Context) -> ExecutionResult<ExitStatus> {
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    self.reaped = true;
                    return Ok(status);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(command = line, error = %e, "failed to poll child process");
                    return Err(ExecutionError::WaitFailed {
                        command: line.to_string(),
                        reason: e.to_string(),
                    });
                }
            }

            if ctx.interrupt.is_triggered() {
                ctx.print_debug(&format!("Stopping process {}", self.child.id()));
                // Drop kills and reaps
                return Err(ExecutionError::Interrupted);
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        if let Err(e) = self.child.kill() {
            debug!(error = %e, "kill failed, child probably already exited");
        }
        let _ = self.child.wait();
    }
}

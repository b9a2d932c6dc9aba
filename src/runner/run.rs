//! Invocation orchestration
//!
//! The runner resolves every requested target up front, then runs the
//! recipes of each plan that have not run yet in this invocation and stops at
//! the first failure.

use crate::error::{BriskError, ExecutionError, Result};
use crate::runner::{execute_recipe, resolve, Context, ExecutionPlan, Registry};
use std::collections::HashSet;
use tracing::{debug, info_span};

/// Where an invocation currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Resolving(String),
    Executing(String),
    Succeeded(String),
    Failed(String),
    /// Every requested target finished
    Completed,
    /// Stopped at the first failure
    Aborted,
}

/// Recipes that have completed successfully in this invocation
#[derive(Debug, Clone, Default)]
pub struct ExecutionState {
    completed: Vec<String>,
    seen: HashSet<String>,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, recipe: &str) -> bool {
        self.seen.contains(recipe)
    }

    /// Completed recipes in the order they finished
    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    fn mark_completed(&mut self, recipe: &str) {
        if self.seen.insert(recipe.to_string()) {
            self.completed.push(recipe.to_string());
        }
    }
}

/// Drives one invocation over a loaded registry
pub struct Runner<'a> {
    registry: &'a Registry,
    ctx: Context,
    state: ExecutionState,
    phase: Phase,
}

impl<'a> Runner<'a> {
    pub fn new(registry: &'a Registry, ctx: Context) -> Self {
        Runner {
            registry,
            ctx,
            state: ExecutionState::new(),
            phase: Phase::Pending,
        }
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Run the requested targets in order
    ///
    /// Every target is resolved before any command runs, so an unknown
    /// recipe or a cycle in any target leaves no side effects. A recipe
    /// already completed in this invocation is never run again, even when a
    /// later target depends on it. Zero targets is a successful no-op.
    pub fn run<S: AsRef<str>>(&mut self, targets: &[S]) -> Result<()> {
        debug!(config = ?self.ctx.config_path, targets = targets.len(), "starting run");

        let plans = match self.resolve_targets(targets) {
            Ok(plans) => plans,
            Err(e) => {
                self.phase = Phase::Aborted;
                return Err(e);
            }
        };

        for (target, plan) in &plans {
            if let Err(e) = self.run_plan(target, plan) {
                self.phase = Phase::Aborted;
                return Err(e);
            }
        }

        self.phase = Phase::Completed;
        Ok(())
    }

    fn resolve_targets<S: AsRef<str>>(
        &mut self,
        targets: &[S],
    ) -> Result<Vec<(String, ExecutionPlan)>> {
        let mut plans = Vec::with_capacity(targets.len());
        for target in targets {
            let target = target.as_ref();
            self.phase = Phase::Resolving(target.to_string());
            let plan = resolve(self.registry, target)?;
            debug!(target, ?plan, "resolved plan");
            plans.push((target.to_string(), plan));
        }
        Ok(plans)
    }

    fn run_plan(&mut self, target: &str, plan: &ExecutionPlan) -> Result<()> {
        let _span = info_span!("target", name = target).entered();

        for name in plan {
            if self.state.contains(name) {
                self.ctx.print_recipe_skip(name, "already ran in this invocation");
                continue;
            }
            self.run_recipe(name)?;
        }

        Ok(())
    }

    fn run_recipe(&mut self, name: &str) -> Result<()> {
        let recipe = self.registry.lookup(name)?;
        let fail = |source: ExecutionError| BriskError::RecipeFailed {
            recipe: name.to_string(),
            source,
        };

        if self.ctx.interrupt.is_triggered() {
            self.phase = Phase::Failed(name.to_string());
            return Err(fail(ExecutionError::Interrupted));
        }

        self.phase = Phase::Executing(name.to_string());
        self.ctx.print_recipe_start(name);

        if let Err(e) = execute_recipe(recipe, &self.ctx) {
            self.phase = Phase::Failed(name.to_string());
            return Err(fail(e));
        }

        self.state.mark_completed(name);
        self.phase = Phase::Succeeded(name.to_string());
        self.ctx.print_recipe_complete(name);
        Ok(())
    }
}

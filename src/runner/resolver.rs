//! Dependency resolution
//!
//! Turns a requested recipe into an execution plan: its transitive
//! dependencies in post-order depth-first sequence, each recipe once,
//! followed by the recipe itself.

use crate::error::{ResolveError, ResolveResult};
use crate::runner::Registry;
use std::collections::HashSet;
use tracing::trace;

/// Ordered recipe names where every recipe comes after its dependencies
pub type ExecutionPlan = Vec<String>;

/// Resolve the execution plan for a single root recipe
///
/// Dependencies are visited in declared order, so the same registry and root
/// always yield the same plan. A recipe reachable through several paths is
/// placed where the first path finishes resolving it.
pub fn resolve(registry: &Registry, root: &str) -> ResolveResult<ExecutionPlan> {
    resolve_all(registry, [root])
}

/// Resolve several roots into one plan, shared dependencies included once
pub fn resolve_all<'a, I>(registry: &Registry, roots: I) -> ResolveResult<ExecutionPlan>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut walk = Walk {
        registry,
        plan: Vec::new(),
        planned: HashSet::new(),
        visiting: Vec::new(),
    };

    for root in roots {
        // Surface the root's own absence without a "required by" parent
        registry.lookup(root)?;
        walk.visit(root, None)?;
    }

    Ok(walk.plan)
}

/// State for one depth-first traversal
struct Walk<'r> {
    registry: &'r Registry,
    plan: ExecutionPlan,
    planned: HashSet<String>,
    /// Recipes whose dependencies are still being resolved, outermost first
    visiting: Vec<String>,
}

impl Walk<'_> {
    fn visit(&mut self, name: &str, required_by: Option<&str>) -> ResolveResult<()> {
        if self.planned.contains(name) {
            return Ok(());
        }

        if let Some(pos) = self.visiting.iter().position(|v| v == name) {
            let mut cycle: Vec<String> = self.visiting[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(ResolveError::CyclicDependency(cycle));
        }

        let recipe = self
            .registry
            .lookup(name)
            .map_err(|_| ResolveError::UnknownRecipe {
                name: name.to_string(),
                required_by: required_by.map(str::to_string),
            })?;

        self.visiting.push(name.to_string());
        for dep in &recipe.deps {
            trace!(recipe = name, dependency = %dep, "visiting dependency");
            self.visit(dep, Some(name))?;
        }
        self.visiting.pop();

        self.planned.insert(name.to_string());
        self.plan.push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::Recipe;

    fn registry(recipes: &[(&str, &[&str])]) -> Registry {
        let mut registry = Registry::new();
        for (name, deps) in recipes {
            registry
                .register(Recipe::new(*name, deps.iter().copied(), [format!("echo {}", name)]))
                .unwrap();
        }
        registry
    }

    fn diamond() -> Registry {
        registry(&[("A", &[]), ("B", &["A"]), ("C", &["A"]), ("D", &["B", "C"])])
    }

    fn assert_topological(registry: &Registry, plan: &[String]) {
        for (i, name) in plan.iter().enumerate() {
            for dep in &registry.lookup(name).unwrap().deps {
                let dep_pos = plan.iter().position(|p| p == dep).expect("dependency missing");
                assert!(dep_pos < i, "{} must precede {}", dep, name);
            }
        }
    }

    #[test]
    fn test_single_recipe() {
        let registry = registry(&[("clean", &[])]);
        assert_eq!(resolve(&registry, "clean").unwrap(), vec!["clean"]);
    }

    #[test]
    fn test_diamond_includes_shared_dependency_once() {
        let registry = diamond();
        let plan = resolve(&registry, "D").unwrap();

        assert_eq!(plan, vec!["A", "B", "C", "D"]);
        assert_topological(&registry, &plan);
    }

    #[test]
    fn test_declared_dependency_order_is_preserved() {
        let registry = registry(&[("A", &[]), ("B", &["A"]), ("C", &["A"]), ("D", &["C", "B"])]);
        assert_eq!(resolve(&registry, "D").unwrap(), vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let registry = registry(&[
            ("lint", &["isort", "black"]),
            ("isort", &["pip"]),
            ("black", &["pip"]),
            ("pip", &[]),
            ("clean", &[]),
        ]);

        let first = resolve(&registry, "lint").unwrap();
        for _ in 0..10 {
            assert_eq!(resolve(&registry, "lint").unwrap(), first);
        }
        assert_eq!(first, vec!["pip", "isort", "black", "lint"]);
        assert_topological(&registry, &first);
    }

    #[test]
    fn test_repeated_dependency_in_list() {
        let registry = registry(&[("A", &[]), ("B", &["A", "A"])]);
        assert_eq!(resolve(&registry, "B").unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_two_node_cycle_names_path() {
        let registry = registry(&[("X", &["Y"]), ("Y", &["X"])]);
        let result = resolve(&registry, "X");

        assert_eq!(
            result,
            Err(ResolveError::CyclicDependency(vec![
                "X".to_string(),
                "Y".to_string(),
                "X".to_string()
            ]))
        );
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let registry = registry(&[("X", &["X"])]);
        assert_eq!(
            resolve(&registry, "X"),
            Err(ResolveError::CyclicDependency(vec![
                "X".to_string(),
                "X".to_string()
            ]))
        );
    }

    #[test]
    fn test_cycle_below_root_starts_at_repeated_node() {
        let registry = registry(&[("top", &["a"]), ("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let err = resolve(&registry, "top").unwrap_err();

        assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> c -> a");
    }

    #[test]
    fn test_unreachable_cycle_does_not_matter() {
        let registry = registry(&[("ok", &[]), ("X", &["Y"]), ("Y", &["X"])]);
        assert_eq!(resolve(&registry, "ok").unwrap(), vec!["ok"]);
    }

    #[test]
    fn test_unknown_root() {
        let registry = diamond();
        assert_eq!(
            resolve(&registry, "E"),
            Err(ResolveError::UnknownRecipe {
                name: "E".to_string(),
                required_by: None,
            })
        );
    }

    #[test]
    fn test_unknown_dependency_names_parent() {
        let registry = registry(&[("lint", &["pip"])]);
        assert_eq!(
            resolve(&registry, "lint"),
            Err(ResolveError::UnknownRecipe {
                name: "pip".to_string(),
                required_by: Some("lint".to_string()),
            })
        );
    }

    #[test]
    fn test_resolve_all_dedupes_across_roots() {
        let registry = diamond();
        let plan = resolve_all(&registry, ["B", "C", "B"]).unwrap();
        assert_eq!(plan, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_resolve_all_empty() {
        let registry = diamond();
        let plan = resolve_all(&registry, std::iter::empty()).unwrap();
        assert!(plan.is_empty());
    }
}

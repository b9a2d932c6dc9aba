//! Configuration validation
//!
//! This module provides validation logic for configuration files. Whether
//! dependencies exist and form a cycle is checked later, when a plan is
//! resolved, so that unrelated broken recipes do not block working ones.

use crate::config::types::{Config, RecipeConfig};
use crate::error::{ConfigError, ConfigResult};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Check a recipe name: non-empty, no whitespace
pub fn is_valid_recipe_name(name: &str) -> bool {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE
        .get_or_init(|| Regex::new(r"^\S+$").unwrap())
        .is_match(name)
}

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    if let Some(interpreter) = &config.interpreter {
        if interpreter.is_empty() || interpreter[0].trim().is_empty() {
            return Err(ConfigError::Invalid(
                "interpreter must name a program, e.g. [sh, -c]".to_string(),
            ));
        }
    }

    let mut seen = HashSet::new();
    for (name, recipe) in &config.recipes {
        validate_recipe(name, recipe)?;
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::DuplicateDefinition(name.clone()));
        }
    }

    if let Some(default) = &config.default {
        if !seen.contains(default.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "default recipe '{}' is not defined",
                default
            )));
        }
    }

    Ok(())
}

/// Validate a single recipe
pub fn validate_recipe(name: &str, recipe: &RecipeConfig) -> ConfigResult<()> {
    if !is_valid_recipe_name(name) {
        return Err(ConfigError::InvalidName(name.to_string()));
    }

    for dep in &recipe.deps {
        if !is_valid_recipe_name(dep) {
            return Err(ConfigError::Invalid(format!(
                "recipe '{}' has an invalid dependency name '{}'",
                name, dep
            )));
        }
    }

    Ok(())
}

//! Recipe registry
//!
//! Holds every loaded recipe by name. Built once at startup and only read
//! afterwards.

use crate::config::{is_valid_recipe_name, Config};
use crate::error::{ConfigError, ConfigResult, ResolveError, ResolveResult};
use crate::runner::Recipe;
use indexmap::IndexMap;

/// Name-to-recipe mapping in declaration order
///
/// Registration is strict: a name can only be registered once.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    recipes: IndexMap<String, Recipe>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from every recipe in the configuration
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        let mut registry = Registry::new();
        for (name, recipe) in &config.recipes {
            registry.register(Recipe::from_config(name.clone(), recipe.clone()))?;
        }
        Ok(registry)
    }

    /// Add a recipe, refusing a name that is already taken
    pub fn register(&mut self, recipe: Recipe) -> ConfigResult<()> {
        if !is_valid_recipe_name(&recipe.name) {
            return Err(ConfigError::InvalidName(recipe.name));
        }
        if self.recipes.contains_key(&recipe.name) {
            return Err(ConfigError::DuplicateDefinition(recipe.name));
        }
        self.recipes.insert(recipe.name.clone(), recipe);
        Ok(())
    }

    /// Look up a recipe by name
    pub fn lookup(&self, name: &str) -> ResolveResult<&Recipe> {
        self.recipes
            .get(name)
            .ok_or_else(|| ResolveError::UnknownRecipe {
                name: name.to_string(),
                required_by: None,
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.recipes.contains_key(name)
    }

    /// Recipe names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.recipes.keys().map(String::as_str)
    }

    /// Recipes in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new();
        registry
            .register(Recipe::new("clean", Vec::<String>::new(), ["rm -rf dist"]))
            .unwrap();

        let recipe = registry.lookup("clean").unwrap();
        assert_eq!(recipe.commands, vec!["rm -rf dist"]);
        // Reads are repeatable
        assert_eq!(registry.lookup("clean").unwrap(), recipe);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut registry = Registry::new();
        registry
            .register(Recipe::new("Lint", Vec::<String>::new(), Vec::<String>::new()))
            .unwrap();

        assert!(registry.lookup("Lint").is_ok());
        assert_eq!(
            registry.lookup("lint"),
            Err(ResolveError::UnknownRecipe {
                name: "lint".to_string(),
                required_by: None,
            })
        );
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = Registry::new();
        registry
            .register(Recipe::new("pip", Vec::<String>::new(), ["uv sync"]))
            .unwrap();

        let result = registry.register(Recipe::new("pip", Vec::<String>::new(), ["pip install"]));
        assert!(matches!(result, Err(ConfigError::DuplicateDefinition(ref n)) if n == "pip"));
        // The first definition survives
        assert_eq!(registry.lookup("pip").unwrap().commands, vec!["uv sync"]);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut registry = Registry::new();
        let result = registry.register(Recipe::new("", Vec::<String>::new(), Vec::<String>::new()));
        assert!(matches!(result, Err(ConfigError::InvalidName(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_from_config_keeps_declaration_order() {
        let yaml = r#"
recipes:
  lint:
    deps: [isort, black]
  isort:
    run: uv run isort .
  black:
    run: uv run black .
"#;
        let config = parse_config(yaml, None).unwrap();
        let registry = Registry::from_config(&config).unwrap();

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["lint", "isort", "black"]);
        assert!(registry.contains("black"));
        assert!(!registry.contains("pip"));
    }
}

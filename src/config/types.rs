//! Core configuration types
//!
//! This module defines the data structures that represent a brisk.yml configuration file.

use indexmap::IndexMap;
use serde::de::{Deserializer, Error, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Application name (optional)
    #[serde(default)]
    pub name: Option<String>,

    /// Application usage description (optional)
    #[serde(default)]
    pub usage: Option<String>,

    /// Global interpreter to use for commands (e.g., ["sh", "-c"])
    #[serde(default)]
    pub interpreter: Option<Vec<String>>,

    /// Recipe run when none is requested on the command line
    #[serde(default)]
    pub default: Option<String>,

    /// Environment file loaded into every command's environment
    #[serde(default)]
    pub dotenv: Option<String>,

    /// Environment overrides passed through to every command
    #[serde(default)]
    pub environment: IndexMap<String, String>,

    /// Additional recipe files, relative to this one
    #[serde(default)]
    pub include: Vec<String>,

    /// Recipes in declaration order, repeated names kept so they can be rejected
    #[serde(default, deserialize_with = "deserialize_recipes")]
    pub recipes: Vec<(String, RecipeConfig)>,
}

/// A file pulled in through `include`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncludedRecipes {
    #[serde(default, deserialize_with = "deserialize_recipes")]
    pub recipes: Vec<(String, RecipeConfig)>,
}

/// A recipe definition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeConfig {
    /// Usage description for listings
    #[serde(default)]
    pub usage: Option<String>,

    /// Whether this recipe is hidden from listings
    #[serde(default)]
    pub private: bool,

    /// Working directory for the commands, relative to the invocation directory
    #[serde(default)]
    pub dir: Option<String>,

    /// Recipes that must run first
    #[serde(
        default,
        alias = "dependencies",
        deserialize_with = "deserialize_string_list"
    )]
    pub deps: Vec<String>,

    /// Command lines to run through the interpreter
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub run: Vec<String>,
}

/// Custom deserializer for fields that accept a single string or an array of strings
fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![s]),
        Value::Sequence(seq) => {
            let mut items = Vec::new();
            for item in seq {
                match item {
                    Value::String(s) => items.push(s),
                    Value::Number(n) => items.push(n.to_string()),
                    Value::Bool(b) => items.push(b.to_string()),
                    other => {
                        return Err(D::Error::custom(format!(
                            "expected a string list entry, found {:?}",
                            other
                        )))
                    }
                }
            }
            Ok(items)
        }
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("expected a string or array of strings")),
    }
}

/// Deserialize the recipes mapping without collapsing repeated keys
fn deserialize_recipes<'de, D>(deserializer: D) -> Result<Vec<(String, RecipeConfig)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RecipesVisitor;

    impl<'de> Visitor<'de> for RecipesVisitor {
        type Value = Vec<(String, RecipeConfig)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a mapping of recipe names to recipe definitions")
        }

        fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut recipes = Vec::new();
            while let Some((name, recipe)) = map.next_entry::<String, Option<RecipeConfig>>()? {
                // `name:` with nothing after it is an empty grouping recipe
                recipes.push((name, recipe.unwrap_or_default()));
            }
            Ok(recipes)
        }
    }

    deserializer.deserialize_any(RecipesVisitor)
}

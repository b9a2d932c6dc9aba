//! Runtime recipe representation

use crate::config;

/// A named unit of work: dependencies plus an ordered list of command lines
///
/// This differs from config::RecipeConfig by carrying its own name, so it can
/// be handed around on its own once it lives in a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Recipe name, unique within a registry
    pub name: String,

    /// Usage description
    pub usage: Option<String>,

    /// Hidden from listings
    pub private: bool,

    /// Working directory relative to the invocation directory
    pub dir: Option<String>,

    /// Names of recipes that must complete first, in declared order
    pub deps: Vec<String>,

    /// Command lines, in declared order
    pub commands: Vec<String>,
}

impl Recipe {
    /// Create a recipe with dependencies and commands only
    pub fn new<N, D, C>(name: N, deps: D, commands: C) -> Self
    where
        N: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Recipe {
            name: name.into(),
            usage: None,
            private: false,
            dir: None,
            deps: deps.into_iter().map(Into::into).collect(),
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a recipe from configuration
    pub fn from_config(name: String, config: config::RecipeConfig) -> Self {
        Recipe {
            name,
            usage: config.usage,
            private: config.private,
            dir: config.dir,
            deps: config.deps,
            commands: config.run,
        }
    }

    /// A recipe with no commands only exists to pull in its dependencies
    pub fn is_grouping(&self) -> bool {
        self.commands.is_empty()
    }
}

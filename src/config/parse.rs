//! Configuration file parsing and discovery

use crate::config::types::{Config, IncludedRecipes};
use crate::error::{ConfigError, ConfigResult, Result};
use indexmap::IndexMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["brisk.yml", "brisk.yaml"];

/// Find the configuration file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ConfigError::Invalid(format!("Failed to read {}: {}", path.display(), e))
    })?;

    parse_config(&contents, Some(path))
}

/// Parse configuration from a string
///
/// When `config_path` is given, `include` entries are resolved relative to it
/// and their recipes are appended after the file's own recipes.
pub fn parse_config(yaml: &str, config_path: Option<&Path>) -> Result<Config> {
    let mut config: Config = serde_yaml::from_str(yaml)?;

    if let Some(base_path) = config_path {
        process_includes(&mut config, base_path)?;
    }

    Ok(config)
}

/// Append recipes from every included file
fn process_includes(config: &mut Config, config_path: &Path) -> Result<()> {
    let base_dir = config_dir(config_path);

    for include_path in &config.include {
        let full_include_path = base_dir.join(include_path);
        debug!(path = %full_include_path.display(), "including recipe file");

        let included = load_included_recipes(&full_include_path)?;
        config.recipes.extend(included.recipes);
    }

    Ok(())
}

/// Load recipes from an included file
fn load_included_recipes(path: &Path) -> ConfigResult<IncludedRecipes> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::IncludeFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    serde_yaml::from_str(&contents).map_err(|e| ConfigError::IncludeFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Build the environment overrides handed to every command
///
/// Values from the `dotenv` file come first; `environment` entries override them.
pub fn load_environment(
    config: &Config,
    config_path: Option<&Path>,
) -> ConfigResult<IndexMap<String, String>> {
    let mut environment = IndexMap::new();

    if let Some(dotenv) = &config.dotenv {
        let path = match config_path {
            Some(p) => config_dir(p).join(dotenv),
            None => PathBuf::from(dotenv),
        };
        debug!(path = %path.display(), "loading environment file");

        let entries = dotenvy::from_path_iter(&path).map_err(|e| ConfigError::EnvFile {
            path: path.clone(),
            error: e.to_string(),
        })?;
        for entry in entries {
            let (key, value) = entry.map_err(|e| ConfigError::EnvFile {
                path: path.clone(),
                error: e.to_string(),
            })?;
            environment.insert(key, value);
        }
    }

    for (key, value) in &config.environment {
        environment.insert(key.clone(), value.clone());
    }

    Ok(environment)
}

/// Directory containing the configuration file
fn config_dir(config_path: &Path) -> &Path {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Parse configuration with automatic file discovery
pub fn parse_config_auto() -> Result<(Config, PathBuf)> {
    let config_path = find_config_file()?;
    let config = parse_config_file(&config_path)?;
    Ok((config, config_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BriskError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_simple_config() {
        let yaml = r#"
recipes:
  hello:
    usage: Say hello
    run: echo "hello"
"#;
        let config = parse_config(yaml, None).unwrap();
        assert_eq!(config.recipes.len(), 1);
        assert_eq!(config.recipes[0].0, "hello");
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("brisk.yml");

        fs::write(
            &config_path,
            r#"
recipes:
  test:
    run: echo "test"
"#,
        )
        .unwrap();

        let found = find_config_file_from(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("brisk.yaml");
        let sub_dir = temp_dir.path().join("subdir");

        fs::create_dir(&sub_dir).unwrap();
        fs::write(&config_path, "recipes: {}\n").unwrap();

        let found = find_config_file_from(sub_dir).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_config_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = find_config_file_from(temp_dir.path().to_path_buf());
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_parse_config_with_interpreter() {
        let yaml = r#"
interpreter:
  - bash
  - -c
recipes:
  hello:
    run: echo "hello"
"#;
        let config = parse_config(yaml, None).unwrap();
        assert_eq!(
            config.interpreter,
            Some(vec!["bash".to_string(), "-c".to_string()])
        );
    }

    #[test]
    fn test_includes_append_recipes() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("recipes")).unwrap();
        fs::write(
            temp_dir.path().join("recipes/python.yml"),
            r#"
recipes:
  black:
    run: uv run black src
"#,
        )
        .unwrap();
        let config_path = temp_dir.path().join("brisk.yml");
        fs::write(
            &config_path,
            r#"
include:
  - recipes/python.yml
recipes:
  lint:
    deps: black
"#,
        )
        .unwrap();

        let config = parse_config_file(&config_path).unwrap();
        let names: Vec<&str> = config.recipes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["lint", "black"]);
    }

    #[test]
    fn test_missing_include_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("brisk.yml");
        fs::write(&config_path, "include: [nope.yml]\nrecipes: {}\n").unwrap();

        let result = parse_config_file(&config_path);
        assert!(matches!(
            result,
            Err(BriskError::Config(ConfigError::IncludeFile { .. }))
        ));
    }

    #[test]
    fn test_environment_overrides_dotenv() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".env"), "A=from_file\nB=from_file\n").unwrap();
        let config_path = temp_dir.path().join("brisk.yml");
        let yaml = r#"
dotenv: .env
environment:
  B: from_config
recipes: {}
"#;
        let config = parse_config(yaml, Some(&config_path)).unwrap();
        let env = load_environment(&config, Some(&config_path)).unwrap();

        assert_eq!(env.get("A").map(String::as_str), Some("from_file"));
        assert_eq!(env.get("B").map(String::as_str), Some("from_config"));
    }

    #[test]
    fn test_missing_dotenv_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("brisk.yml");
        let config = parse_config("dotenv: missing.env\n", Some(&config_path)).unwrap();

        let result = load_environment(&config, Some(&config_path));
        assert!(matches!(result, Err(ConfigError::EnvFile { .. })));
    }
}

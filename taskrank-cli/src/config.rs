/// Config file for the taskrank CLI.
///
/// Looked up at `$XDG_CONFIG_HOME/taskrank/config.toml`, falling back to
/// `~/.config/taskrank/config.toml`. Every key is optional and flags win.
use serde::Deserialize;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TaskrankConfig {
    pub question: Option<String>,
    pub k_factor: Option<f64>,
    pub initial_rating: Option<f64>,
    pub json: Option<bool>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# taskrank configuration
# All values here can be overridden by CLI flags.

# Question shown above every pair of tasks
# question = \"Which task is more important?\"

# Elo K-factor: how far one answer can move a rating (0 < k_factor <= 1e6)
# k_factor = 32.0

# Rating every task starts with
# initial_rating = 1000.0

# Print the final ranking as JSON instead of a table
# json = false
";

impl TaskrankConfig {
    /// Parse and sanity-check config text. Engine numbers are checked again by the engine.
    pub fn parse(content: &str) -> Result<Self, String> {
        let config: TaskrankConfig = toml::from_str(content).map_err(|e| e.to_string())?;
        if config.question.as_deref().is_some_and(|q| q.trim().is_empty()) {
            return Err("question must not be blank".to_string());
        }
        Ok(config)
    }

    /// Read the config at `path`. A missing file means "no overrides".
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return TaskrankConfig::default(),
            Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
        };
        Self::parse(&content).unwrap_or_else(|e| bail(format!("Invalid config at {}: {e}", path.display())))
    }

    /// Write the commented template to `path`. Never overwrites an existing file.
    pub fn write_template(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                bail(format!("Config file already exists at {}", path.display()))
            }
            Err(e) => bail(format!("Failed to create {}: {e}", path.display())),
        };
        file.write_all(DEFAULT_CONFIG_TEMPLATE.as_bytes())
            .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));
    }
}

/// Where the config lives given the values of `XDG_CONFIG_HOME` and `HOME`.
/// An empty `XDG_CONFIG_HOME` counts as unset.
fn resolve_config_path(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = match xdg_config_home.filter(|dir| !dir.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(home?).join(".config"),
    };
    Some(base.join("taskrank").join("config.toml"))
}

/// Default config path for this user.
pub fn config_path() -> PathBuf {
    resolve_config_path(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
        .unwrap_or_else(|| bail("Neither XDG_CONFIG_HOME nor HOME is set; pass --config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses_to_empty_config() {
        assert_eq!(TaskrankConfig::parse(DEFAULT_CONFIG_TEMPLATE).unwrap(), TaskrankConfig::default());
    }

    #[test]
    fn test_parse_all_fields() {
        let cfg = TaskrankConfig::parse(
            "question = \"Which should I do first?\"\nk_factor = 24.0\ninitial_rating = 1500.0\njson = true\n",
        )
        .unwrap();
        assert_eq!(cfg.question.as_deref(), Some("Which should I do first?"));
        assert_eq!(cfg.k_factor, Some(24.0));
        assert_eq!(cfg.initial_rating, Some(1500.0));
        assert_eq!(cfg.json, Some(true));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(TaskrankConfig::parse("rounds = 10\n").is_err());
    }

    #[test]
    fn test_blank_question_is_rejected() {
        let err = TaskrankConfig::parse("question = \"   \"\n").unwrap_err();
        assert!(err.contains("question"), "{err}");
    }

    #[test]
    fn test_xdg_config_home_wins_over_home() {
        let path = resolve_config_path(Some("/xdg".into()), Some("/home/me".into())).unwrap();
        assert_eq!(path, PathBuf::from("/xdg/taskrank/config.toml"));
    }

    #[test]
    fn test_falls_back_to_home_dot_config() {
        let expected = PathBuf::from("/home/me/.config/taskrank/config.toml");
        assert_eq!(resolve_config_path(None, Some("/home/me".into())), Some(expected.clone()));
        assert_eq!(resolve_config_path(Some("".into()), Some("/home/me".into())), Some(expected));
        assert_eq!(resolve_config_path(None, None), None);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("taskrank-test-missing").join("config.toml");
        assert_eq!(TaskrankConfig::load(&path), TaskrankConfig::default());
    }

    #[test]
    fn test_template_written_then_loaded() {
        let dir = std::env::temp_dir().join(format!("taskrank-config-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = std::fs::remove_dir_all(&dir);

        TaskrankConfig::write_template(&path);
        assert_eq!(TaskrankConfig::load(&path), TaskrankConfig::default());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

//! Configuration for the `embert` driver.
//!
//! Loads an optional `embert.toml` the way `faxt::config::Config` loads
//! `faxt.toml`: `serde` + `toml`, falling back to spec defaults when the
//! file is absent or a field is missing (SPEC_FULL §1.3). This only
//! changes the host binary's behavior — `emberc_vm::Vm::new` always uses
//! the spec constants regardless of what this struct holds.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EmbertError, Result};

pub const CONFIG_FILE_NAME: &str = "embert.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Overrides `emberc_vm::STACK_SIZE`.
    #[serde(default = "default_stack_size")]
    pub stack_size: usize,

    /// Overrides `emberc_vm::GLOBAL_SIZE`.
    #[serde(default = "default_global_size")]
    pub global_size: usize,

    /// Overrides `emberc_vm::MAX_FRAMES`.
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
}

fn default_stack_size() -> usize {
    emberc_vm::STACK_SIZE
}

fn default_global_size() -> usize {
    emberc_vm::GLOBAL_SIZE
}

fn default_max_frames() -> usize {
    emberc_vm::MAX_FRAMES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stack_size: default_stack_size(),
            global_size: default_global_size(),
            max_frames: default_max_frames(),
        }
    }
}

impl Config {
    /// Loads `embert.toml` from the current directory, falling back to
    /// [`Config::default`] if it isn't there.
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load_from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| EmbertError::Config(format!("failed to parse {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_spec_constants() {
        let config = Config::default();
        assert_eq!(config.stack_size, emberc_vm::STACK_SIZE);
        assert_eq!(config.global_size, emberc_vm::GLOBAL_SIZE);
        assert_eq!(config.max_frames, emberc_vm::MAX_FRAMES);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults_for_missing_fields() {
        let config: Config = toml::from_str("stack_size = 4096").unwrap();
        assert_eq!(config.stack_size, 4096);
        assert_eq!(config.global_size, emberc_vm::GLOBAL_SIZE);
        assert_eq!(config.max_frames, emberc_vm::MAX_FRAMES);
    }

    #[test]
    fn load_from_nonexistent_path_is_an_error() {
        let result = Config::load_from_path(Path::new("/nonexistent/embert.toml"));
        assert!(result.is_err());
    }
}

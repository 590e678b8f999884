// FILE: src/cli/config.rs

use crate::error::{CompilerError, Result};
use crate::types::ComponentMode;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub mode: Option<ComponentMode>,
    pub debug_mode: Option<bool>,
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| {
        CompilerError::FileNotFound {
            path: format!("Config file {}: {}", config_path, e),
        }
    })?;

    let config = parse(config_path, &config_content)?;
    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

fn parse(config_path: &str, config_content: &str) -> Result<ConfigFile> {
    if config_path.ends_with(".json") {
        serde_json::from_str(config_content).map_err(|e| CompilerError::InvalidFormat {
            message: format!("Invalid JSON config: {}", e),
        })
    } else if config_path.ends_with(".toml") {
        toml::from_str(config_content).map_err(|e| CompilerError::InvalidFormat {
            message: format!("Invalid TOML config: {}", e),
        })
    } else {
        Err(CompilerError::InvalidFormat {
            message: "Config file must be .json or .toml format".to_string(),
        })
    }
}

use bevy::prelude::Resource;
use serde::Deserialize;
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Resource)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Display name shown to other players.
    pub name: String,
    pub server_addr: SocketAddr,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            server_addr: "127.0.0.1:7600".parse().expect("valid default server addr"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ClientConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

        toml::from_str(&contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_yields_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();

        assert_eq!(config.name, "Player");
        assert_eq!(config.server_addr, "127.0.0.1:7600".parse().unwrap());
    }

    #[test]
    fn fields_override_defaults() {
        let config: ClientConfig =
            toml::from_str("name = \"Ada\"\nserver_addr = \"10.0.0.2:7600\"").unwrap();

        assert_eq!(config.name, "Ada");
        assert_eq!(config.server_addr, "10.0.0.2:7600".parse().unwrap());
    }
}

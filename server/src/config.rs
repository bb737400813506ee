use bevy::prelude::Resource;
use hns_common::avatars;
use serde::Deserialize;
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Resource)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Seconds the lobby stays open before the round starts.
    pub lobby_countdown_secs: u64,
    /// Players picked as seekers each round.
    pub seeker_count: usize,
    /// The one round toggle the original exposed in its settings menu.
    pub force_override_avatars: bool,
    pub hider_override_avatar: String,
    pub seeker_override_avatar: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:7600".parse().expect("valid default bind addr"),
            lobby_countdown_secs: 30,
            seeker_count: 1,
            force_override_avatars: true,
            hider_override_avatar: avatars::DEFAULT_HIDER_OVERRIDE.to_string(),
            seeker_override_avatar: avatars::DEFAULT_SEEKER_OVERRIDE.to_string(),
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

impl ServerConfig {
    /// Loads the config file, or the defaults if no path was given.
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

//! Replicated round metadata.
//!
//! On the wire every entry is a string key and a string value, with keys
//! namespaced under a fixed prefix (`HideAndSeek.Seeker.3`). In memory the
//! keys are a tagged enum so that dispatch is exhaustive and the string
//! splitting only ever happens at the wire boundary.

use crate::components::player::PlayerId;
use bevy::prelude::Resource;
use std::{collections::HashMap, fmt, str::FromStr};
use thiserror::Error;

pub const METADATA_PREFIX: &str = "HideAndSeek";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKey {
    /// Boolean per-player flag, true for the round's seeker.
    Seeker(PlayerId),
    /// Boolean per-player flag, flipped to true once a hider is found.
    Found(PlayerId),
    /// Boolean round setting, forces the role avatars below onto players.
    ForceOverrideAvatars,
    /// Avatar barcode applied to hiders when overrides are forced.
    HiderOverrideAvatar,
    /// Avatar barcode applied to seekers when overrides are forced.
    SeekerOverrideAvatar,
}

impl MetadataKey {
    /// True for keys whose value must parse as a boolean.
    pub fn is_flag(self) -> bool {
        matches!(
            self,
            MetadataKey::Seeker(_) | MetadataKey::Found(_) | MetadataKey::ForceOverrideAvatars
        )
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataKey::Seeker(player_id) => {
                write!(f, "{METADATA_PREFIX}.Seeker.{player_id}")
            },
            MetadataKey::Found(player_id) => {
                write!(f, "{METADATA_PREFIX}.Found.{player_id}")
            },
            MetadataKey::ForceOverrideAvatars => {
                write!(f, "{METADATA_PREFIX}.ForceOverrideAvatars")
            },
            MetadataKey::HiderOverrideAvatar => {
                write!(f, "{METADATA_PREFIX}.HiderOverrideAvatar")
            },
            MetadataKey::SeekerOverrideAvatar => {
                write!(f, "{METADATA_PREFIX}.SeekerOverrideAvatar")
            },
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("metadata key {0:?} is not namespaced under the gamemode prefix")]
    MissingPrefix(String),
    #[error("unknown metadata key: {0}")]
    UnknownKey(String),
    #[error("metadata key {0:?} is missing its player id segment")]
    MissingPlayerId(String),
    #[error("metadata key {0:?} has an invalid player id segment")]
    InvalidPlayerId(String),
    #[error("invalid boolean metadata value: {0:?}")]
    InvalidBool(String),
}

impl FromStr for MetadataKey {
    type Err = MetadataError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let mut segments = key.split('.');

        if segments.next() != Some(METADATA_PREFIX) {
            return Err(MetadataError::MissingPrefix(key.to_string()));
        }

        let sub_key = segments.next().ok_or_else(|| MetadataError::UnknownKey(key.to_string()))?;

        let parsed = match sub_key {
            "Seeker" => MetadataKey::Seeker(parse_player_id(key, segments.next())?),
            "Found" => MetadataKey::Found(parse_player_id(key, segments.next())?),
            "ForceOverrideAvatars" => MetadataKey::ForceOverrideAvatars,
            "HiderOverrideAvatar" => MetadataKey::HiderOverrideAvatar,
            "SeekerOverrideAvatar" => MetadataKey::SeekerOverrideAvatar,
            _ => return Err(MetadataError::UnknownKey(key.to_string())),
        };

        if segments.next().is_some() {
            return Err(MetadataError::UnknownKey(key.to_string()));
        }

        Ok(parsed)
    }
}

fn parse_player_id(key: &str, segment: Option<&str>) -> Result<PlayerId, MetadataError> {
    let segment = segment.ok_or_else(|| MetadataError::MissingPlayerId(key.to_string()))?;

    segment
        .parse::<u8>()
        .map(PlayerId)
        .map_err(|_| MetadataError::InvalidPlayerId(key.to_string()))
}

/// Boolean values travel as the literal strings `"true"` / `"false"`.
pub fn parse_bool(value: &str) -> Result<bool, MetadataError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(MetadataError::InvalidBool(other.to_string())),
    }
}

pub fn bool_value(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// The replicated key/value store. The server holds the authoritative copy,
/// every client holds a mirror updated from change notifications.
#[derive(Debug, Default, Clone, Resource)]
pub struct MetadataStore {
    entries: HashMap<MetadataKey, String>,
}

impl MetadataStore {
    pub fn set(&mut self, key: MetadataKey, value: impl Into<String>) {
        self.entries.insert(key, value.into());
    }

    pub fn set_bool(&mut self, key: MetadataKey, value: bool) {
        self.entries.insert(key, bool_value(value).to_string());
    }

    pub fn get(&self, key: MetadataKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    /// Absent flags read as false. Per-player flags default to false until
    /// the server writes them, so absence is not an error.
    pub fn get_bool(&self, key: MetadataKey) -> Result<bool, MetadataError> {
        match self.entries.get(&key) {
            Some(value) => parse_bool(value),
            None => Ok(false),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MetadataKey, &str)> {
        self.entries.iter().map(|(key, value)| (key, value.as_str()))
    }
}

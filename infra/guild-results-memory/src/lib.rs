use std::{collections::HashMap, path::Path};

use dashmap::DashMap;
use guild_results_app::{
    domain::{GuildId, RepoRetrieveError, result::GameResult, result::ResultRepository},
    ports::guild_directory::GuildDirectory,
};
use thiserror::Error;

/// On-disk layout: both collections keyed by the stringified guild id.
#[derive(serde::Deserialize, Default)]
pub struct Snapshot {
    #[serde(default)]
    pub results: HashMap<String, Vec<GameResult>>,
    #[serde(default)]
    pub guild: HashMap<String, String>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid snapshot: {0}")]
    Format(#[from] serde_json::Error),
}

/// Read-only guild store held in process memory.
#[derive(Default)]
pub struct MemoryGuildStore {
    results: DashMap<String, Vec<GameResult>>,
    names: DashMap<String, String>,
}

impl MemoryGuildStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            results: snapshot.results.into_iter().collect(),
            names: snapshot.guild.into_iter().collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::from_json(&json)?;
        log::info!(
            "Loaded {} result collections and {} guild names from {}",
            store.results.len(),
            store.names.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn with_results(self, guild_id: GuildId, results: Vec<GameResult>) -> Self {
        self.results.insert(guild_id.as_key(), results);
        self
    }

    pub fn with_name(self, guild_id: GuildId, name: impl Into<String>) -> Self {
        self.names.insert(guild_id.as_key(), name.into());
        self
    }
}

#[async_trait::async_trait]
impl ResultRepository for MemoryGuildStore {
    async fn get_results(&self, guild_id: GuildId) -> Result<Vec<GameResult>, RepoRetrieveError> {
        self.results
            .get(&guild_id.as_key())
            .map(|entry| entry.value().clone())
            .ok_or(RepoRetrieveError::NotFound)
    }
}

#[async_trait::async_trait]
impl GuildDirectory for MemoryGuildStore {
    async fn get_guild_name(&self, guild_id: GuildId) -> Result<String, RepoRetrieveError> {
        self.names
            .get(&guild_id.as_key())
            .map(|entry| entry.value().clone())
            .ok_or(RepoRetrieveError::NotFound)
    }
}

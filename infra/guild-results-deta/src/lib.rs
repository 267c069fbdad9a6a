use std::collections::HashMap;

use guild_results_app::{
    domain::{
        GuildId, RepoRetrieveError,
        result::{GameResult, ResultRepository},
    },
    ports::guild_directory::GuildDirectory,
};

pub mod client;

pub use client::{DetaClient, DetaConfig, DetaError};

const RESULTS_BASE: &str = "results";
const GUILD_BASE: &str = "guild";
const NAME_MAP_KEY: &str = "name";

#[derive(serde::Deserialize)]
struct ResultsItem {
    #[serde(default)]
    data: Vec<GameResult>,
}

/// Results and guild names kept in two Deta bases.
///
/// `results` holds one item per guild id whose `data` field is the list of
/// games. `guild` holds a single item keyed `name` that maps every guild id
/// to its display name.
pub struct DetaGuildStore {
    client: DetaClient,
}

impl DetaGuildStore {
    pub fn new(config: &DetaConfig) -> Result<Self, DetaError> {
        Ok(Self {
            client: DetaClient::new(config)?,
        })
    }
}

fn storage_error(e: DetaError) -> RepoRetrieveError {
    RepoRetrieveError::StorageError(e.to_string())
}

#[async_trait::async_trait]
impl ResultRepository for DetaGuildStore {
    async fn get_results(&self, guild_id: GuildId) -> Result<Vec<GameResult>, RepoRetrieveError> {
        self.client
            .get_item::<ResultsItem>(RESULTS_BASE, &guild_id.as_key())
            .await
            .map_err(storage_error)?
            .map(|item| item.data)
            .ok_or(RepoRetrieveError::NotFound)
    }
}

#[async_trait::async_trait]
impl GuildDirectory for DetaGuildStore {
    async fn get_guild_name(&self, guild_id: GuildId) -> Result<String, RepoRetrieveError> {
        let name_map = self
            .client
            .get_item::<HashMap<String, serde_json::Value>>(GUILD_BASE, NAME_MAP_KEY)
            .await
            .map_err(storage_error)?
            .ok_or(RepoRetrieveError::NotFound)?;

        match name_map.get(&guild_id.as_key()) {
            Some(serde_json::Value::String(name)) => Ok(name.clone()),
            Some(other) => Err(RepoRetrieveError::StorageError(format!(
                "name of guild {} is not a string: {}",
                guild_id, other
            ))),
            None => Err(RepoRetrieveError::NotFound),
        }
    }
}

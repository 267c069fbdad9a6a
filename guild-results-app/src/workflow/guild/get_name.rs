use std::sync::Arc;

use crate::{
    domain::{GuildId, RepoRetrieveError},
    ports::guild_directory::GuildDirectory,
};

#[async_trait::async_trait]
pub trait GetGuildNameUseCase {
    async fn get_name(&self, guild_id: GuildId) -> Result<String, GetGuildNameError>;
}

#[derive(Debug)]
pub enum GetGuildNameError {
    NotFound,
    RepositoryError,
}

pub struct GetGuildNameUseCaseImpl<G: GuildDirectory> {
    guild_directory: Arc<G>,
}

impl<G: GuildDirectory> GetGuildNameUseCaseImpl<G> {
    pub fn new(guild_directory: Arc<G>) -> Self {
        Self { guild_directory }
    }
}

#[async_trait::async_trait]
impl<G: GuildDirectory + Send + Sync + 'static> GetGuildNameUseCase for GetGuildNameUseCaseImpl<G> {
    async fn get_name(&self, guild_id: GuildId) -> Result<String, GetGuildNameError> {
        match self.guild_directory.get_guild_name(guild_id).await {
            Ok(name) => Ok(name),
            Err(RepoRetrieveError::NotFound) => Err(GetGuildNameError::NotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error retrieving name of guild {}: {}", guild_id, e);
                Err(GetGuildNameError::RepositoryError)
            }
        }
    }
}

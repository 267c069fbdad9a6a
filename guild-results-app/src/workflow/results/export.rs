use std::sync::Arc;

use crate::{
    domain::{GuildId, export::results_to_csv, result::ResultRepository},
    ports::guild_directory::GuildDirectory,
    workflow::{LookupError, optional_name, require_results},
};

#[async_trait::async_trait]
pub trait ExportResultsUseCase {
    async fn export_csv(&self, guild_id: GuildId) -> Result<Vec<u8>, ExportResultsError>;
}

#[derive(Debug)]
pub enum ExportResultsError {
    NotFound,
    RepositoryError,
}

impl From<LookupError> for ExportResultsError {
    fn from(value: LookupError) -> Self {
        match value {
            LookupError::NotFound => ExportResultsError::NotFound,
            LookupError::Storage => ExportResultsError::RepositoryError,
        }
    }
}

pub struct ExportResultsUseCaseImpl<R: ResultRepository, G: GuildDirectory> {
    result_repository: Arc<R>,
    guild_directory: Arc<G>,
}

impl<R: ResultRepository, G: GuildDirectory> ExportResultsUseCaseImpl<R, G> {
    pub fn new(result_repository: Arc<R>, guild_directory: Arc<G>) -> Self {
        Self {
            result_repository,
            guild_directory,
        }
    }
}

#[async_trait::async_trait]
impl<R: ResultRepository + Send + Sync + 'static, G: GuildDirectory + Send + Sync + 'static>
    ExportResultsUseCase for ExportResultsUseCaseImpl<R, G>
{
    async fn export_csv(&self, guild_id: GuildId) -> Result<Vec<u8>, ExportResultsError> {
        let (results, name) = tokio::join!(
            self.result_repository.get_results(guild_id),
            self.guild_directory.get_guild_name(guild_id),
        );
        let results = require_results(guild_id, results)?;
        let Some(name) = optional_name(guild_id, name)? else {
            return Err(ExportResultsError::NotFound);
        };
        log::debug!("Exporting {} results of guild {}", results.len(), guild_id);
        Ok(results_to_csv(&name, &results))
    }
}

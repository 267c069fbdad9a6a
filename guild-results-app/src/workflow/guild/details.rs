use std::sync::Arc;

use crate::{
    domain::{
        GuildId,
        result::{AnnotatedGameResult, ResultRepository, annotate_all},
    },
    ports::guild_directory::GuildDirectory,
    workflow::{LookupError, optional_name, require_results},
};

/// Everything the details page shows for one guild.
#[derive(Debug)]
pub struct GuildDetails {
    pub guild_id: GuildId,
    pub name: String,
    pub results: Vec<AnnotatedGameResult>,
}

#[async_trait::async_trait]
pub trait GuildDetailsUseCase {
    async fn get_details(&self, guild_id: GuildId) -> Result<GuildDetails, GuildDetailsError>;
}

#[derive(Debug)]
pub enum GuildDetailsError {
    NotFound,
    RepositoryError,
}

impl From<LookupError> for GuildDetailsError {
    fn from(value: LookupError) -> Self {
        match value {
            LookupError::NotFound => GuildDetailsError::NotFound,
            LookupError::Storage => GuildDetailsError::RepositoryError,
        }
    }
}

pub struct GuildDetailsUseCaseImpl<R: ResultRepository, G: GuildDirectory> {
    result_repository: Arc<R>,
    guild_directory: Arc<G>,
}

impl<R: ResultRepository, G: GuildDirectory> GuildDetailsUseCaseImpl<R, G> {
    pub fn new(result_repository: Arc<R>, guild_directory: Arc<G>) -> Self {
        Self {
            result_repository,
            guild_directory,
        }
    }
}

#[async_trait::async_trait]
impl<R: ResultRepository + Send + Sync + 'static, G: GuildDirectory + Send + Sync + 'static>
    GuildDetailsUseCase for GuildDetailsUseCaseImpl<R, G>
{
    async fn get_details(&self, guild_id: GuildId) -> Result<GuildDetails, GuildDetailsError> {
        let (results, name) = tokio::join!(
            self.result_repository.get_results(guild_id),
            self.guild_directory.get_guild_name(guild_id),
        );
        let results = require_results(guild_id, results)?;
        let Some(name) = optional_name(guild_id, name)? else {
            return Err(GuildDetailsError::NotFound);
        };
        Ok(GuildDetails {
            guild_id,
            name,
            results: annotate_all(&results),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::result::{MockResultRepository, game},
        ports::guild_directory::MockGuildDirectory,
    };

    use super::*;

    #[tokio::test]
    async fn test_details_hold_every_result() {
        let guild = GuildId(3);
        let use_case = GuildDetailsUseCaseImpl::new(
            Arc::new(MockResultRepository::with(
                guild,
                vec![game(1, 0, "Foo"), game(0, 1, "Bar"), game(2, 2, "Baz")],
            )),
            Arc::new(MockGuildDirectory::with(guild, "Alpha")),
        );

        let details = use_case.get_details(guild).await.unwrap();
        assert_eq!(details.name, "Alpha");
        assert_eq!(
            details
                .results
                .iter()
                .map(|r| (r.idx, r.diff))
                .collect::<Vec<_>>(),
            vec![(0, 1), (1, -1), (2, 0)]
        );
    }

    #[tokio::test]
    async fn test_details_of_unknown_guild() {
        let use_case = GuildDetailsUseCaseImpl::new(
            Arc::new(MockResultRepository::default()),
            Arc::new(MockGuildDirectory::default()),
        );
        assert!(matches!(
            use_case.get_details(GuildId(3)).await,
            Err(GuildDetailsError::NotFound)
        ));
    }
}

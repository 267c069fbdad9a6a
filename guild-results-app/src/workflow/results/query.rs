use std::sync::Arc;

use crate::{
    domain::{
        GuildId,
        result::{ResultPage, ResultQuery, ResultRepository, query_results},
    },
    ports::guild_directory::GuildDirectory,
    workflow::{LookupError, optional_name, require_results},
};

#[async_trait::async_trait]
pub trait QueryResultsUseCase {
    async fn query_results(
        &self,
        guild_id: GuildId,
        query: ResultQuery,
    ) -> Result<GuildResultsPage, QueryResultsError>;
}

#[derive(Debug)]
pub struct GuildResultsPage {
    pub page: ResultPage,
    pub name: Option<String>,
}

#[derive(Debug)]
pub enum QueryResultsError {
    NotFound,
    RepositoryError,
}

impl From<LookupError> for QueryResultsError {
    fn from(value: LookupError) -> Self {
        match value {
            LookupError::NotFound => QueryResultsError::NotFound,
            LookupError::Storage => QueryResultsError::RepositoryError,
        }
    }
}

pub struct QueryResultsUseCaseImpl<R: ResultRepository, G: GuildDirectory> {
    result_repository: Arc<R>,
    guild_directory: Arc<G>,
}

impl<R: ResultRepository, G: GuildDirectory> QueryResultsUseCaseImpl<R, G> {
    pub fn new(result_repository: Arc<R>, guild_directory: Arc<G>) -> Self {
        Self {
            result_repository,
            guild_directory,
        }
    }
}

#[async_trait::async_trait]
impl<R: ResultRepository + Send + Sync + 'static, G: GuildDirectory + Send + Sync + 'static>
    QueryResultsUseCase for QueryResultsUseCaseImpl<R, G>
{
    async fn query_results(
        &self,
        guild_id: GuildId,
        query: ResultQuery,
    ) -> Result<GuildResultsPage, QueryResultsError> {
        let (results, name) = tokio::join!(
            self.result_repository.get_results(guild_id),
            self.guild_directory.get_guild_name(guild_id),
        );
        let results = require_results(guild_id, results)?;
        let name = optional_name(guild_id, name)?;
        if name.is_none() {
            log::warn!("Guild {} has results but no name", guild_id);
        }

        Ok(GuildResultsPage {
            page: query_results(&results, &query),
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::result::{MockResultRepository, OutcomeFilter, game},
        ports::guild_directory::MockGuildDirectory,
    };

    use super::*;

    const GUILD: GuildId = GuildId(42);

    fn build(
        repo: MockResultRepository,
        directory: MockGuildDirectory,
    ) -> QueryResultsUseCaseImpl<MockResultRepository, MockGuildDirectory> {
        QueryResultsUseCaseImpl::new(Arc::new(repo), Arc::new(directory))
    }

    #[tokio::test]
    async fn test_query_returns_page_and_name() {
        let use_case = build(
            MockResultRepository::with(GUILD, vec![game(3, 1, "Foo"), game(0, 2, "Bar")]),
            MockGuildDirectory::with(GUILD, "Alpha"),
        );
        let query = ResultQuery::new(None, OutcomeFilter::Lose, 0, 50).unwrap();

        let res = use_case.query_results(GUILD, query).await.unwrap();
        assert_eq!(res.name.as_deref(), Some("Alpha"));
        assert_eq!(res.page.total, 1);
        assert_eq!(res.page.items[0].idx, 1);
        assert_eq!(res.page.items[0].diff, -2);
    }

    #[tokio::test]
    async fn test_missing_name_is_not_an_error() {
        let use_case = build(
            MockResultRepository::with(GUILD, vec![game(1, 1, "Foo")]),
            MockGuildDirectory::default(),
        );

        let res = use_case
            .query_results(GUILD, ResultQuery::default())
            .await
            .unwrap();
        assert_eq!(res.name, None);
        assert_eq!(res.page.total, 1);
    }

    #[tokio::test]
    async fn test_missing_or_empty_results_are_not_found() {
        let use_case = build(
            MockResultRepository::with(GuildId(7), vec![]),
            MockGuildDirectory::with(GUILD, "Alpha"),
        );

        assert!(matches!(
            use_case.query_results(GUILD, ResultQuery::default()).await,
            Err(QueryResultsError::NotFound)
        ));
        assert!(matches!(
            use_case
                .query_results(GuildId(7), ResultQuery::default())
                .await,
            Err(QueryResultsError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_storage_failure() {
        let mut repo = MockResultRepository::with(GUILD, vec![game(1, 0, "Foo")]);
        repo.broken = true;
        let use_case = build(repo, MockGuildDirectory::with(GUILD, "Alpha"));
        assert!(matches!(
            use_case.query_results(GUILD, ResultQuery::default()).await,
            Err(QueryResultsError::RepositoryError)
        ));

        let mut directory = MockGuildDirectory::with(GUILD, "Alpha");
        directory.broken = true;
        let use_case = build_with_directory(directory);
        assert!(matches!(
            use_case.query_results(GUILD, ResultQuery::default()).await,
            Err(QueryResultsError::RepositoryError)
        ));
    }

    fn build_with_directory(
        directory: MockGuildDirectory,
    ) -> QueryResultsUseCaseImpl<MockResultRepository, MockGuildDirectory> {
        build(
            MockResultRepository::with(GUILD, vec![game(1, 0, "Foo")]),
            directory,
        )
    }
}

use std::sync::Arc;

use crate::{
    domain::result::ResultRepository,
    ports::guild_directory::GuildDirectory,
    workflow::{
        guild::{
            details::{GuildDetailsUseCase, GuildDetailsUseCaseImpl},
            get_name::{GetGuildNameUseCase, GetGuildNameUseCaseImpl},
        },
        results::{
            export::{ExportResultsUseCase, ExportResultsUseCaseImpl},
            query::{QueryResultsUseCase, QueryResultsUseCaseImpl},
        },
    },
};

pub mod domain;
pub mod ports;
pub mod workflow;

pub struct Application {
    pub results_query_use_case: Box<dyn QueryResultsUseCase + Send + Sync + 'static>,
    pub results_export_use_case: Box<dyn ExportResultsUseCase + Send + Sync + 'static>,

    pub guild_get_name_use_case: Box<dyn GetGuildNameUseCase + Send + Sync + 'static>,
    pub guild_details_use_case: Box<dyn GuildDetailsUseCase + Send + Sync + 'static>,
}

pub fn build_application<
    R: ResultRepository + Send + Sync + 'static,
    G: GuildDirectory + Send + Sync + 'static,
>(
    result_repository: Arc<R>,
    guild_directory: Arc<G>,
) -> Application {
    Application {
        results_query_use_case: Box::new(QueryResultsUseCaseImpl::new(
            result_repository.clone(),
            guild_directory.clone(),
        )),
        results_export_use_case: Box::new(ExportResultsUseCaseImpl::new(
            result_repository.clone(),
            guild_directory.clone(),
        )),

        guild_get_name_use_case: Box::new(GetGuildNameUseCaseImpl::new(guild_directory.clone())),
        guild_details_use_case: Box::new(GuildDetailsUseCaseImpl::new(
            result_repository,
            guild_directory,
        )),
    }
}

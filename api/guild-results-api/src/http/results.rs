use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::header,
    response::{IntoResponse, Response},
};
use guild_results_app::{
    domain::result::{AnnotatedGameResult, MAX_PAGE_SIZE, OutcomeFilter, ResultQuery, ResultQueryError},
    workflow::results::{export::ExportResultsError, query::QueryResultsError},
};

use crate::{
    ServiceError,
    http::{AppState, parse_guild_id},
};

/// `skip` counts pages of `pageSize` records, not single records.
///
/// Every field is taken as text so that an empty parameter means the default.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonResultsFilter {
    skip: Option<String>,
    page_size: Option<String>,
    name: Option<String>,
    filter: Option<String>,
}

fn parse_number(key: &str, raw: Option<&str>, default: i64) -> Result<i64, ResultQueryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            ResultQueryError::InvalidArgument(format!("{} must be an integer, got '{}'", key, raw))
        }),
    }
}

impl JsonResultsFilter {
    fn into_query(self) -> Result<ResultQuery, ResultQueryError> {
        let outcome = match self.filter.as_deref() {
            Some(filter) => filter.parse()?,
            None => OutcomeFilter::All,
        };
        let skip = parse_number("skip", self.skip.as_deref(), 0)?;
        let page_size = parse_number("pageSize", self.page_size.as_deref(), MAX_PAGE_SIZE as i64)?;
        ResultQuery::new(self.name, outcome, skip, page_size)
    }
}

#[derive(serde::Serialize)]
pub struct JsonResultsResponse {
    data: Vec<AnnotatedGameResult>,
    total: usize,
    name: Option<String>,
}

pub async fn get_results(
    Path(guild_id): Path<String>,
    State(app_state): State<AppState>,
    filter: Result<Query<JsonResultsFilter>, QueryRejection>,
) -> Result<Json<JsonResultsResponse>, ServiceError> {
    let guild_id = parse_guild_id(&guild_id)?;
    let Query(filter) = filter.map_err(|e| ServiceError::BadRequest(e.body_text()))?;
    let query = filter
        .into_query()
        .map_err(|ResultQueryError::InvalidArgument(msg)| ServiceError::BadRequest(msg))?;
    log::debug!("Querying results of guild {}: {:?}", guild_id, query);

    let res = match app_state
        .app
        .results_query_use_case
        .query_results(guild_id, query)
        .await
    {
        Ok(res) => res,
        Err(QueryResultsError::NotFound) => {
            return Err(ServiceError::NotFound("No results found".to_string()));
        }
        Err(QueryResultsError::RepositoryError) => {
            return Err(ServiceError::Internal("Error querying results".to_string()));
        }
    };

    Ok(Json(JsonResultsResponse {
        data: res.page.items,
        total: res.page.total,
        name: res.name,
    }))
}

pub async fn get_results_file(
    Path(guild_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Response, ServiceError> {
    let guild_id = parse_guild_id(&guild_id)?;
    let csv = match app_state
        .app
        .results_export_use_case
        .export_csv(guild_id)
        .await
    {
        Ok(csv) => csv,
        Err(ExportResultsError::NotFound) => {
            return Err(ServiceError::NotFound(format!(
                "No results found for guild {}",
                guild_id
            )));
        }
        Err(ExportResultsError::RepositoryError) => {
            return Err(ServiceError::Internal("Error exporting results".to_string()));
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"results_{}.csv\"", guild_id),
            ),
        ],
        csv,
    )
        .into_response())
}

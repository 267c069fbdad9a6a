use axum::{
    Json,
    extract::{Path, State},
    response::Html,
};
use guild_results_app::workflow::guild::{
    details::GuildDetailsError, get_name::GetGuildNameError,
};

use crate::{
    ServiceError,
    http::{AppState, html::render_details, parse_guild_id},
};

#[derive(serde::Serialize)]
pub struct JsonGuildName {
    name: String,
}

pub async fn get_name(
    Path(guild_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<JsonGuildName>, ServiceError> {
    let guild_id = parse_guild_id(&guild_id)?;
    match app_state.app.guild_get_name_use_case.get_name(guild_id).await {
        Ok(name) => Ok(Json(JsonGuildName { name })),
        Err(GetGuildNameError::NotFound) => {
            Err(ServiceError::NotFound("No guild name found".to_string()))
        }
        Err(GetGuildNameError::RepositoryError) => Err(ServiceError::Internal(
            "Error retrieving guild name".to_string(),
        )),
    }
}

pub async fn get_details(
    Path(guild_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Html<String>, ServiceError> {
    let guild_id = parse_guild_id(&guild_id)?;
    match app_state
        .app
        .guild_details_use_case
        .get_details(guild_id)
        .await
    {
        Ok(details) => Ok(Html(render_details(&details))),
        Err(GuildDetailsError::NotFound) => Err(ServiceError::NotFound(format!(
            "Guild {} not found",
            guild_id
        ))),
        Err(GuildDetailsError::RepositoryError) => Err(ServiceError::Internal(
            "Error retrieving guild details".to_string(),
        )),
    }
}

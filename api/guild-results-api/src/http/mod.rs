use std::sync::Arc;

use axum::{
    Json, Router,
    http::Method,
    routing::get,
};
use guild_results_app::{Application, domain::GuildId};
use log::info;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    services::ServeDir,
};

use crate::{ServiceError, config::HttpConfig};

mod guild;
mod html;
mod results;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
}

pub fn router(app: Arc<Application>, config: &HttpConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.cors_origins.clone()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let api: Router<AppState> = Router::new()
        .route("/guild/results/{id}", get(results::get_results))
        .route("/guild/results/file/{id}", get(results::get_results_file))
        .route("/guild/name/{id}", get(guild::get_name))
        .route("/guild/details/{id}", get(guild::get_details));

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(cors)
        .with_state(AppState { app })
}

pub async fn run(
    app: Arc<Application>,
    config: HttpConfig,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let router = router(app, &config);

    let address = config.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!("API server listening on {}", address);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP API shut down gracefully");
    Ok(())
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello World" }))
}

fn parse_guild_id(raw: &str) -> Result<GuildId, ServiceError> {
    raw.parse()
        .map_err(|e| ServiceError::BadRequest(format!("Invalid guild ID '{}': {}", raw, e)))
}

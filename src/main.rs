use std::{process::ExitCode, sync::Arc};

use guild_results_api::config::{ConfigError, HttpConfig};
use guild_results_app::{
    build_application, domain::result::ResultRepository, ports::guild_directory::GuildDirectory,
};
use guild_results_deta::{DetaConfig, DetaError, DetaGuildStore};
use guild_results_memory::{MemoryGuildStore, SnapshotError};
use log::{error, info};

mod logs;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown GUILD_STORE '{0}', expected 'deta' or 'file'")]
    UnknownStore(String),

    #[error("GUILD_DATA_FILE must be set when GUILD_STORE=file")]
    MissingDataFile,

    #[error("deta store: {0}")]
    Deta(#[from] DetaError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("http server: {0}")]
    Io(#[from] std::io::Error),
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

async fn serve<S>(store: Arc<S>, config: HttpConfig) -> Result<(), StartupError>
where
    S: ResultRepository + GuildDirectory + Send + Sync + 'static,
{
    let app = Arc::new(build_application(store.clone(), store));
    guild_results_api::http::run(app, config, shutdown_signal()).await?;
    Ok(())
}

async fn run() -> Result<(), StartupError> {
    let http_config = HttpConfig::from_env()?;

    let backend = std::env::var("GUILD_STORE").unwrap_or_else(|_| "deta".to_string());
    match backend.trim().to_lowercase().as_str() {
        "deta" => {
            let config = DetaConfig::from_env()?;
            info!("Using Deta Base store at {}", config.base_url);
            serve(Arc::new(DetaGuildStore::new(&config)?), http_config).await
        }
        "file" => {
            let path =
                std::env::var("GUILD_DATA_FILE").map_err(|_| StartupError::MissingDataFile)?;
            info!("Using snapshot store from {}", path);
            serve(Arc::new(MemoryGuildStore::load(&path)?), http_config).await
        }
        other => Err(StartupError::UnknownStore(other.to_string())),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();

    if let Err(e) = logs::init_logger() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    if let Err(e) = dotenv {
        info!("No .env file loaded: {}", e);
    }

    info!("Starting application");
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

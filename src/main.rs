use chat_hub_lib::{config, db, routes, state::AppState};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{Level, error, info, warn};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

fn load_config() -> anyhow::Result<config::models::Config> {
    let config_path =
        std::env::var("CONFIG_FILE_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = config::load_config(&config_path).map_err(|e| {
        anyhow::anyhow!("Failed to load YAML configuration from {}: {}", config_path, e)
    })?;
    config::apply_env_overrides(&mut config);
    Ok(config)
}

fn init_tracing(log_level: &str) {
    let level = Level::from_str(log_level).unwrap_or_else(|_| {
        eprintln!("Unknown log level '{log_level}', falling back to info");
        Level::INFO
    });
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.general.log_level);

    if let Err(val_errors) = config::validation::validate_config(&config) {
        error!("Configuration is invalid: {:?}. Halting.", val_errors);
        return Err(anyhow::anyhow!("Invalid config: {:?}", val_errors));
    }
    info!("Configuration validated successfully.");

    info!(
        "Starting chat hub with {} provider '{}' (model {})",
        config.provider.r#type, config.provider.key, config.provider.model
    );
    if config.web_search.is_none() {
        warn!("Web search is not configured; search requests will report that");
    }

    let pool = db::connect(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
    db::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {}", e))?;

    let bind_addr = format!("{}:{}", config.general.host, config.general.port);
    let app_state = Arc::new(
        AppState::new(config, pool)
            .map_err(|e| anyhow::anyhow!("Failed to create app state: {}", e))?,
    );
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", bind_addr, e))?;

    info!("Server is running on {}", bind_addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use server::config::{env_var, load_config};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config();

    let telemetry = config.features.telemetry
        && match server::telemetry::init_telemetry() {
            Ok(enabled) => enabled,
            Err(e) => {
                tracing::error!(error = %e, "Telemetry setup failed, continuing without it");
                false
            }
        };
    server::health::record_start_time();

    let state = match server::db::build_state(config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize application state");
            std::process::exit(1);
        }
    };

    let router = server::openapi::api_router(state, telemetry);

    let addr = env_var("BIND_ADDR").unwrap_or_else(|| config.app.bind_addr.clone());
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "Arrest review service listening");

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

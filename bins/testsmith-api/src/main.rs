mod handlers;
mod metrics;
mod routes;

use axum::Router;
use std::sync::Arc;
use testsmith_common::config::{JudgeSettings, LanguageCatalog};
use testsmith_common::judge::JudgeClient;
use testsmith_runner::Executor;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub struct AppState {
    pub executor: Executor,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false);
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).with_target(false).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("testsmith API booting...");

    let catalog = LanguageCatalog::load_default().unwrap_or_else(|e| {
        warn!(error = %e, "Language catalog unavailable, using built-in judge ids");
        LanguageCatalog::builtin()
    });
    info!("Judge languages: {:?}", catalog.list_languages());

    let settings = JudgeSettings::from_env();
    info!(judge = %settings.base_url, timeout_ms = settings.timeout.as_millis() as u64, "Judge configured");

    let state = Arc::new(AppState {
        executor: Executor::new(JudgeClient::new(&settings), catalog),
    });

    // Build router
    let app = Router::new().merge(routes::routes()).with_state(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

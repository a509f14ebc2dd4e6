use axum::http::{header, HeaderValue, Method};
use gateway::api;
use gateway::app_state::AppState;
use gateway::assistants::HttpAssistantsClient;
use gateway::ledger::ThreadLedger;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

fn load_env_file() {
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!(error = %e, "Could not determine current directory for .env lookup");
            return;
        }
    };

    let mut current = cwd.clone();
    loop {
        let candidate = current.join(".env");
        if candidate.exists() {
            match dotenvy::from_path(&candidate) {
                Ok(_) => {
                    tracing::info!(path = %candidate.display(), "Loaded environment from .env");
                }
                Err(e) => {
                    tracing::warn!(
                        path = %candidate.display(),
                        error = %e,
                        "Failed to load .env file"
                    );
                }
            }
            return;
        }

        if !current.pop() {
            break;
        }
    }

    tracing::info!(
        cwd = %cwd.display(),
        "No .env file found in current directory or ancestors; using process environment only"
    );
}

/// Build the CORS layer from `GATEWAY_ALLOWED_ORIGINS` (comma-separated).
/// Absent or empty, any origin is allowed.
fn cors_layer() -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let headers = [header::CONTENT_TYPE, header::ACCEPT];

    let origins = std::env::var("GATEWAY_ALLOWED_ORIGINS")
        .ok()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(|origin| HeaderValue::from_str(origin).expect("Invalid CORS origin"))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(methods)
            .allow_headers(headers)
            .max_age(std::time::Duration::from_secs(3600))
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load .env values early so the API key is available before the client
    // is constructed. Search ancestors so running from `gateway/` still
    // picks up a repo-root `.env`.
    load_env_file();

    tracing::info!("Starting Assistant Gateway");

    let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set");
    let base_url = std::env::var("OPENAI_BASE_URL").ok();
    let client =
        HttpAssistantsClient::new(api_key, base_url).expect("Failed to create assistants client");

    let ledger_path = std::env::var("GATEWAY_LEDGER_PATH")
        .unwrap_or_else(|_| "data/threads.json".to_string());
    tracing::info!(path = %ledger_path, "Opening thread ledger");
    let ledger = ThreadLedger::open(ledger_path)
        .await
        .expect("Failed to open thread ledger");

    let app_state = AppState::new(Arc::new(client), ledger);
    let app = api::router().with_state(app_state).layer(cors_layer());

    let addr = std::env::var("GATEWAY_ADDR").unwrap_or_else(|_| "0.0.0.0:8283".to_string());
    tracing::info!("Starting HTTP server on http://{addr}");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}

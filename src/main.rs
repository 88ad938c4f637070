//! claimcheck server — web UI for PDF fact checking.
//!
//! Thin axum server wrapping the claimcheck_lib pipeline. One POST runs the
//! whole verification sequentially and returns every verdict at once.
//!
//! Usage:
//!   ANTHROPIC_API_KEY=... TAVILY_API_KEY=... claimcheck
//!
//! Or with args:
//!   claimcheck --bind 127.0.0.1:8080

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use claimcheck_lib::llm::AnthropicClient;
use claimcheck_lib::pipeline;
use claimcheck_lib::report::{self, VerdictCounts};
use claimcheck_lib::search::TavilyClient;
use claimcheck_lib::settings;
use claimcheck_lib::verdict::VerificationResult;
use serde::Serialize;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

/// Uploaded PDFs larger than this are rejected outright
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// ============================================================================
// AppState
// ============================================================================

#[derive(Clone)]
struct AppState {
    start_time: Instant,
}

// ============================================================================
// Error type
// ============================================================================

struct AppError(StatusCode, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({"error": self.1}))).into_response()
    }
}

fn bad_request(msg: impl Into<String>) -> AppError {
    AppError(StatusCode::BAD_REQUEST, msg.into())
}

fn server_error(msg: impl Into<String>) -> AppError {
    AppError(StatusCode::INTERNAL_SERVER_ERROR, msg.into())
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Serialize)]
struct VerifyResponse {
    results: Vec<VerificationResult>,
    counts: VerdictCounts,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
    keys_configured: bool,
}

// ============================================================================
// Handlers
// ============================================================================

// GET /
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

// POST /api/verify — PDF bytes in, full verification run out
async fn verify_handler(body: Bytes) -> Result<Json<VerifyResponse>, AppError> {
    if body.is_empty() {
        return Err(bad_request("No PDF uploaded"));
    }

    let model = AnthropicClient::from_settings().ok_or_else(|| {
        server_error("API keys not configured. Set ANTHROPIC_API_KEY and TAVILY_API_KEY.")
    })?;
    let search = TavilyClient::from_settings().ok_or_else(|| {
        server_error("API keys not configured. Set ANTHROPIC_API_KEY and TAVILY_API_KEY.")
    })?;

    println!("[Server] Verifying uploaded PDF ({} KB)", body.len() / 1024);

    let results = pipeline::verify_document(&body, &model, &search)
        .await
        .map_err(|e| bad_request(e.to_string()))?;

    let counts = VerdictCounts::tally(&results);
    println!("[Server] Verification complete: {} claims", results.len());

    Ok(Json(VerifyResponse { results, counts }))
}

// POST /api/export — results JSON in, CSV attachment out
async fn export_handler(
    Json(results): Json<Vec<VerificationResult>>,
) -> Result<Response, AppError> {
    let csv = report::to_csv(&results).map_err(server_error)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"fact_check_results.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        keys_configured: settings::get_anthropic_api_key().is_some()
            && settings::get_tavily_api_key().is_some(),
    })
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    // Parse simple args (no clap to keep the binary small)
    let args: Vec<String> = std::env::args().collect();
    let mut bind_arg: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" if i + 1 < args.len() => {
                bind_arg = Some(&args[i + 1]);
                i += 2;
            }
            "--help" | "-h" => {
                println!("claimcheck — PDF fact-checking web app");
                println!();
                println!("Usage: claimcheck [--bind ADDR:PORT]");
                println!();
                println!("Environment variables:");
                println!("  CLAIMCHECK_BIND    Bind address (default: 127.0.0.1:8080)");
                println!("  ANTHROPIC_API_KEY  Model provider key");
                println!("  TAVILY_API_KEY     Search provider key");
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    let bind_addr = bind_arg
        .map(|s| s.to_string())
        .or_else(|| std::env::var("CLAIMCHECK_BIND").ok())
        .unwrap_or_else(|| "127.0.0.1:8080".to_string());

    // Initialize settings
    settings::init(settings::default_config_dir());

    if settings::get_anthropic_api_key().is_none() || settings::get_tavily_api_key().is_none() {
        eprintln!("[Server] Warning: API keys not configured; verification requests will fail");
        eprintln!("[Server] Set ANTHROPIC_API_KEY and TAVILY_API_KEY");
    }

    let state = AppState {
        start_time: Instant::now(),
    };

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/api/verify", post(verify_handler))
        .route("/api/export", post(export_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("[Server] Failed to bind to {}: {}", bind_addr, e);
            std::process::exit(1);
        }
    };

    println!("[Server] Listening on http://{}", bind_addr);
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("[Server] Server error: {}", e);
        std::process::exit(1);
    }
}

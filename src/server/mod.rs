//! HTTP service: the dream form at `/` and the JSON API under `/api`.
//!
//! Endpoints:
//!   GET  /                              → dream form (HTML)
//!   GET  /api/                          → API banner
//!   GET  /api/health                    → liveness check
//!   POST /api/generate-dream            → run the generation pipeline
//!   GET  /api/dream/:dream_id           → single generation
//!   GET  /api/dreams/session/:session   → generations for a session (≤100)
//!   POST /api/status                    → record a status check
//!   GET  /api/status                    → list status checks (≤1000)

mod handlers;
mod page;

use crate::config::Config;
use crate::generation::DreamGenerator;
use crate::llm::{ChatStoryWriter, StoryWriter};
use crate::store::{DreamStore, JournalStore, MemoryStore};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

pub use page::{render_form, FORM_HTML, SESSION_PLACEHOLDER};

pub struct AppState {
    pub generator: DreamGenerator,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(writer: Arc<dyn StoryWriter>, store: Arc<dyn DreamStore>, config: &Config) -> Self {
        Self {
            generator: DreamGenerator::new(writer, store, &config.generation),
        }
    }

    /// Wire the production writer and whichever store the config selects.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let writer = Arc::new(ChatStoryWriter::new(config.llm.clone())?);
        if !writer.is_configured() {
            warn!("LLM API key not configured; dream generation will fail until LLM_API_KEY is set");
        }

        let store: Arc<dyn DreamStore> = match &config.server.data_file {
            Some(path) => Arc::new(JournalStore::open(path).await?),
            None => {
                info!("No DREAMTELLER_DATA_FILE set, keeping dreams in memory");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::new(writer, store, config))
    }

    pub fn store(&self) -> &Arc<dyn DreamStore> {
        self.generator.store()
    }
}

pub fn router(state: SharedState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::form_page))
        .route("/api", get(handlers::api_root))
        .route("/api/", get(handlers::api_root))
        .route("/api/health", get(handlers::health))
        .route("/api/generate-dream", post(handlers::generate_dream))
        .route("/api/dream/:dream_id", get(handlers::get_dream))
        .route("/api/dreams/session/:session_id", get(handlers::session_dreams))
        .route(
            "/api/status",
            post(handlers::create_status).get(handlers::list_status),
        )
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Serve until the listener fails or the process receives Ctrl-C.
pub async fn serve(listener: TcpListener, state: SharedState, config: &Config) -> anyhow::Result<()> {
    let app = router(state, &config.server.cors_origins);
    info!(addr = %listener.local_addr()?, "Dream Teller listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}

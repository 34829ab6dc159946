// Todo list backend - REST API and server-rendered page over a single Todo resource

use axum::Router;
use std::fmt::Write as FmtWrite;
use std::fs::OpenOptions;
use std::io::LineWriter;
use std::sync::Arc;
use tera::Tera;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Custom time formatter: [HH:mm:ss] [todolist]
#[derive(Clone)]
struct BackendTimer;

impl FormatTime for BackendTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Local::now();
        write!(w, "[{}] [todolist]", now.format("%H:%M:%S"))
    }
}

mod config;
mod models;
mod routes;
mod services;

use config::Config;
use routes::{health_routes, load_templates, todos_routes, web_routes};
use services::{JsonFileStore, MemoryStore, TodoService, TodoStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<TodoService>,
    pub templates: Arc<Tera>,
}

/// Full router with CORS and request tracing
fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health_routes())
        .merge(todos_routes())
        .merge(web_routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // LineWriter flushes after each line so the file tails cleanly
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    let (non_blocking, _guard) = tracing_appender::non_blocking(LineWriter::new(log_file));

    // Format: [HH:mm:ss] [todolist] message
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todolist_backend=info,tower_http=info".into()),
        )
        // Stdout layer
        .with(
            fmt::layer()
                .with_timer(BackendTimer)
                .with_target(false)
                .with_ansi(true),
        )
        // File layer (same format, no ANSI colors)
        .with(
            fmt::layer()
                .with_timer(BackendTimer)
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    if let Err(e) = config.validate() {
        tracing::error!("Configuration error: {}", e);
    }

    let store: Arc<dyn TodoStore> = match &config.data_file {
        Some(path) => {
            tracing::info!("Persisting todos to {}", path.display());
            Arc::new(JsonFileStore::open(path).await?)
        }
        None => Arc::new(MemoryStore::new()),
    };

    let state = AppState {
        todos: Arc::new(TodoService::new(store)),
        templates: Arc::new(load_templates()?),
    };

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting todo list backend on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}

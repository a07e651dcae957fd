//! Grocery Server - HTTP API and UI
//!
//! JSON endpoints under `/grocery-list` plus the single-page UI that drives
//! them.

pub mod error;
pub mod http;
pub mod ui;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use grocery_core::{
    EventSink, GroceryConfig, GroceryError, GroceryList, KeyValueStore, MemoryStore,
    NoopSink, StorageBackend, TracingSink,
};

/// Shared application state
pub struct AppState {
    pub list: GroceryList,
    pub permissive_cors: bool,
}

impl AppState {
    pub fn new(list: GroceryList) -> Self {
        Self {
            list,
            permissive_cors: true,
        }
    }

    /// State over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(GroceryList::new(Arc::new(MemoryStore::new())))
    }

    /// Build the store and event sink described by `config`
    pub fn from_config(config: &GroceryConfig) -> Result<Self, GroceryError> {
        let store = open_store(config)?;
        let events: Arc<dyn EventSink> = if config.events.log {
            Arc::new(TracingSink)
        } else {
            Arc::new(NoopSink)
        };

        Ok(Self {
            list: GroceryList::new(store).with_events(events),
            permissive_cors: config.server.permissive_cors,
        })
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn open_store(config: &GroceryConfig) -> Result<Arc<dyn KeyValueStore>, GroceryError> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; the list is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite => {
            let path = config.storage.resolved_path();
            let store = grocery_core::SqliteStore::open(&path)?;
            tracing::info!("Opened grocery list database at {:?}", path);
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageBackend::Sqlite => Err(grocery_core::ConfigError::InvalidValue(
            "SQLite support not enabled. Enable the 'sqlite' feature.".to_string(),
        )
        .into()),
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = if state.permissive_cors {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        // Grocery list endpoints
        .route("/grocery-list/add-item", post(http::add_item))
        .route("/grocery-list/delete-item", post(http::delete_item))
        .route("/grocery-list/get-list", get(http::get_list))
        .route("/grocery-list/update-item", post(http::update_item))
        .route("/grocery-list/rename-item", post(http::rename_item))
        // UI
        .route("/", get(ui::index))
        .route("/grocery-list", get(ui::index))
        // System endpoints
        .route("/health", get(http::health))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Start the server and run until Ctrl-C
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Grocery server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

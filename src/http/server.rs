//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, body limit)
//! - Build the conversion adapter once and share it through `AppState`
//! - Serve until the shutdown signal fires

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::adapter::ConversionAdapter;
use crate::config::ServiceConfig;
use crate::convert::{ConverterError, DocumentConverter, MarkdownEngine};
use crate::http::handlers;
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::upload::UploadHandler;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub adapter: ConversionAdapter,
    pub uploads: Arc<UploadHandler>,
}

/// HTTP server for the conversion service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server backed by the default [`MarkdownEngine`].
    pub fn new(config: ServiceConfig) -> Result<Self, ConverterError> {
        let engine = MarkdownEngine::new(&config.converter)?;
        Ok(Self::with_converter(config, Arc::new(engine)))
    }

    /// Create a server backed by any converter.
    pub fn with_converter(config: ServiceConfig, converter: Arc<dyn DocumentConverter>) -> Self {
        let adapter = ConversionAdapter::new(converter);
        let uploads = Arc::new(UploadHandler::new(
            adapter.clone(),
            config.limits.max_upload_bytes,
            config.converter.temp_dir.clone(),
        ));

        let state = AppState { adapter, uploads };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/", get(handlers::landing_page))
            .route(
                "/convert",
                get(handlers::convert_url_query).post(handlers::convert_file),
            )
            .route("/convert/", get(handlers::convert_url_empty))
            .route("/convert/{*url}", get(handlers::convert_url_path))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_request_bytes))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_upload_bytes = self.config.limits.max_upload_bytes,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

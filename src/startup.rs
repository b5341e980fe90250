// invoice-pdf-service/src/startup.rs

use crate::config::{Config, CorsConfig};
use crate::http;
use crate::pipeline::InvoicePipeline;
use crate::renderers::{HtmlRenderer, PdfConverter, WeasyPrintConverter};
use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub service_name: Arc<str>,
    pub pipeline: Arc<InvoicePipeline>,
}

impl AppState {
    pub fn new(service_name: impl Into<Arc<str>>, pipeline: InvoicePipeline) -> Self {
        Self {
            service_name: service_name.into(),
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(http::health_check))
        .route("/generate-invoice", post(http::generate_invoice))
        .layer(cors_layer(cors))
        .layer(middleware::from_fn(http::preflight_no_content))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Credentials rule out `*`, so methods and headers are mirrored instead.
fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                error!("Invalid CORS origin '{}': {}. Skipping.", origin, e);
                None
            }
        })
        .collect::<Vec<HeaderValue>>();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Loads the template and binds the listener. A bad template stops
    /// startup here.
    pub async fn build(config: &Config) -> anyhow::Result<Self> {
        let renderer =
            HtmlRenderer::from_file(&config.templates.path, config.templates.escape_html)
                .map_err(|e| {
                    error!(path = %config.templates.path, error = %e, "Failed to load invoice template");
                    e
                })?;
        let converter: Arc<dyn PdfConverter> = Arc::new(WeasyPrintConverter::new(&config.pdf));

        info!(engine = converter.engine(), "PDF converter configured");

        let state = AppState::new(
            config.service.name.as_str(),
            InvoicePipeline::new(renderer, converter),
        );
        let router = build_router(state, &config.cors);

        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(addr.as_str()).await.map_err(|e| {
            error!("Failed to bind TCP listener to {}: {}", addr, e);
            e
        })?;
        let port = listener.local_addr()?.port();

        info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

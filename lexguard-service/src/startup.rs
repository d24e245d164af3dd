//! Application startup and lifecycle management.

use crate::config::{CorsConfig, LexguardConfig, ProviderKind};
use crate::handlers::{check_content, generate_content, health_check, welcome};
use crate::services::providers::{mock::MockProvider, openai::OpenAiProvider};
use crate::services::CompletionProvider;
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use service_core::error::AppError;
use service_core::middleware::{http_trace_layer, request_id_middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowHeaders, CorsLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }
}

pub fn build_router(state: AppState, cors: &CorsConfig) -> Result<Router, AppError> {
    let router = Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route("/generate", post(generate_content))
        .route("/check", post(check_content))
        .with_state(state)
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .layer(cors_layer(cors)?);

    Ok(router)
}

fn cors_layer(cors: &CorsConfig) -> Result<CorsLayer, AppError> {
    match cors {
        CorsConfig::Permissive => Ok(CorsLayer::very_permissive()),
        CorsConfig::AllowList(origins) => {
            let origins = origins
                .iter()
                .map(|o| {
                    o.parse::<HeaderValue>().map_err(|e| {
                        AppError::ConfigError(anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true))
        }
    }
}

fn build_provider(config: &LexguardConfig) -> Result<Arc<dyn CompletionProvider>, AppError> {
    let provider: Arc<dyn CompletionProvider> = match config.provider {
        ProviderKind::OpenAi => Arc::new(
            OpenAiProvider::new(config.openai.clone())
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        ),
        ProviderKind::Mock => {
            tracing::warn!("Using mock completion provider; responses are canned");
            Arc::new(MockProvider::echo().without_recording())
        }
    };

    tracing::info!(model = %provider.model(), "Initialized completion provider");
    Ok(provider)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the provider selected by `config`.
    pub async fn build(config: LexguardConfig) -> Result<Self, AppError> {
        let provider = build_provider(&config)?;
        Self::build_with_provider(config, provider).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: LexguardConfig,
        provider: Arc<dyn CompletionProvider>,
    ) -> Result<Self, AppError> {
        let router = build_router(AppState::new(provider), &config.cors)?;

        // Port 0 = random port for testing
        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("LexGuard service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

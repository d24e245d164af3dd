use lexguard_service::config::LexguardConfig;
use lexguard_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = LexguardConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("lexguard-service", "info", config.otlp_endpoint.as_deref())?;

    tracing::info!(
        model = %config.openai.model,
        provider = ?config.provider,
        cors = ?config.cors,
        "Starting lexguard-service"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    app.run_until_stopped().await?;

    tracing::info!("lexguard-service stopped");
    Ok(())
}

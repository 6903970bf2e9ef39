use anyhow::Context;
use gistr::{
    api, config, logging,
    summarization::SummarizationOrchestrator,
    transport::{GeminiTransport, ModelTransport},
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing("info", true);
    let config = config::init_config().context("Failed to load configuration")?;

    let transport = GeminiTransport::from_config(config)
        .context("Failed to build Gemini transport")?
        .map(|transport| Arc::new(transport) as Arc<dyn ModelTransport>);
    if transport.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; every summary will be extractive");
    }

    let orchestrator = SummarizationOrchestrator::new(config.summarizer_settings(), transport)
        .context("Invalid summarizer settings")?;
    let app = api::create_router(Arc::new(api::AppState::new(orchestrator)));

    let (listener, port) = bind_listener(config.server_port)
        .await
        .context("Failed to bind listener")?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn bind_listener(server_port: Option<u16>) -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    if let Some(port) = server_port {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 4200..=4299;
    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 4200-4299",
    ))
}

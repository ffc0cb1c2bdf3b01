use std::sync::Arc;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use device_client::{IndicatorDevice, UfoClient};
use shared::{
    error::ApiError,
    protocol::{IntakeResponse, KeptnEnvelope},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, info_span, warn};
use tracing_subscriber::EnvFilter;
use translator::Translator;

mod app_state;
mod config;
mod intake;

use app_state::AppState;
use config::{load_settings, Settings};
use intake::EventIntake;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings().map_err(|error| {
        error!(%error, "invalid configuration");
        error
    })?;
    let app = start(&settings).await?;

    let listener = tokio::net::TcpListener::bind(settings.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr()))?;
    info!(addr = %listener.local_addr()?, ufo = %settings.ufo_address, "UFO service started");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("UFO service stopped");
    Ok(())
}

async fn start(settings: &Settings) -> anyhow::Result<Router> {
    let device: Arc<dyn IndicatorDevice> = Arc::new(UfoClient::new(
        settings.ufo_address.clone(),
        settings.timeout,
    )?);
    if let Err(error) = device.initialize().await {
        error!(%error, ufo = %settings.ufo_address, "failed to initialize UFO");
    }

    let intake = EventIntake::new(Translator::new(settings.ring_policy), device);
    Ok(build_router(
        Arc::new(AppState { intake }),
        settings.max_event_bytes,
    ))
}

fn build_router(state: Arc<AppState>, max_event_bytes: usize) -> Router {
    Router::new()
        .route("/", post(receive_event))
        .route("/healthz", get(healthz))
        .layer(RequestBodyLimitLayer::new(max_event_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Accepts a Keptn event. The body is decoded by hand so any content type
/// works, including `application/cloudevents+json`.
async fn receive_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<IntakeResponse>), (StatusCode, Json<ApiError>)> {
    let envelope = KeptnEnvelope::decode(&body).map_err(|error| {
        warn!(%error, bytes = body.len(), "error while parsing JSON payload");
        (StatusCode::BAD_REQUEST, Json(ApiError::from(error)))
    })?;

    let span = info_span!(
        "event",
        kind = %envelope.kind,
        context = envelope.shkeptncontext.as_deref().unwrap_or_default(),
        project = envelope.project().unwrap_or_default(),
        service = envelope.service().unwrap_or_default(),
    );
    let event = envelope.to_event();
    match span.in_scope(|| state.intake.accept(&event)) {
        Some(command) => Ok((
            StatusCode::ACCEPTED,
            Json(IntakeResponse::Dispatched { command }),
        )),
        None => Ok((
            StatusCode::OK,
            Json(IntakeResponse::Ignored {
                kind: envelope.kind,
            }),
        )),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!(%error, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match terminate_signal() {
            Ok(sigterm) => sigterm.await,
            Err(error) => {
                error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

/// The handler is installed on return, before the future is first polled.
#[cfg(unix)]
fn terminate_signal() -> std::io::Result<impl std::future::Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    Ok(async move {
        sigterm.recv().await;
    })
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

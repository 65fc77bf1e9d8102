//! # incident-gateway
//!
//! Assembles the gateway from configuration: settings, logging, the HTTP
//! upstream client, services and the axum router.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::http::{build_router, AppState};
use configs::{LogFormat, LogSettings, Settings};
use services::{RelayPolicy, Services};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use upstream_adapters::HttpUpstream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings.log);

    let state = match settings.upstream.base_url() {
        Some(base_url) => {
            let upstream = HttpUpstream::new(base_url, settings.upstream.request_timeout())
                .with_context(|| format!("building upstream client for {base_url}"))?;
            let policy = RelayPolicy::new(base_url)
                .with_list_timeout(settings.upstream.list_timeout())
                .with_dev_token_fallback(settings.upstream.dev_token_fallback);

            if policy.dev_token_fallback {
                warn!("development token fallback is enabled; logins may bypass the upstream");
            }
            info!(%base_url, "relaying to upstream");
            AppState::new(Services::new(Arc::new(upstream), policy))
        }
        None => {
            error!("API_BASE_URL is not configured; proxied routes will answer 500");
            AppState::unconfigured()
        }
    };

    let addr = settings.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "incident gateway listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("incident gateway stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(err) => {
                error!(error = %err, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                error!(error = %err, "failed to install terminate handler");
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
}

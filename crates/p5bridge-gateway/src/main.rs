//! p5bridge: relay between one MCP controller (stdio) and p5.js editor sessions (WebSocket).
//!
//! - Bind the first free candidate port, or exit non-zero
//! - Heartbeat sweep on a fixed cadence
//! - Controller tools on stdin/stdout until the controller goes away or a signal arrives

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use p5bridge_core::error::Result;
use p5bridge_gateway::{app_state::AppState, config, controller::ControllerServer, router};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // stdout belongs to the controller protocol
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind().as_str(), "bridge failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let state = AppState::new(config::load()?)?;
    let candidates = state.cfg().bridge.ports.clone();
    let app = router::build_router(state.clone());
    let listener = state.listener();

    tracing::info!(?candidates, "p5bridge starting");
    let port = listener.start(&candidates, app).await?;
    tracing::info!(
        url = %format!("ws://{}:{port}/ws", listener.host()),
        "bridge ready; enable the bridge in the editor to connect"
    );

    let monitor = state.monitor().spawn(listener.shutdown_signal());
    let controller = ControllerServer::new(state.gateway());

    tokio::select! {
        res = controller.run_stdio() => {
            if let Err(e) = res {
                tracing::error!(error = %e, "controller channel failed");
            }
        }
        _ = shutdown_signal() => {}
    }

    listener.stop().await;
    if let Err(e) = monitor.await {
        tracing::warn!(error = %e, "heartbeat monitor ended abnormally");
    }
    tracing::info!("p5bridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("signal received, shutting down");
}

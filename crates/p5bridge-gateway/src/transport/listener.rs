//! Transport listener: port-fallback bind and server lifecycle.
//!
//! State machine:
//! `Idle -> Binding -> Running -> Stopped`, with `Binding -> Failed` (absorbing)
//! once every candidate is exhausted. An address-in-use failure advances to the
//! next candidate; any other bind error aborts the sequence.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Mutex, MutexGuard, PoisonError};

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use p5bridge_core::error::{BridgeError, Result};

/// Observable lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerPhase {
    Idle,
    Binding,
    Running,
    Stopped,
    Failed,
}

impl ListenerPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ListenerPhase::Idle => "idle",
            ListenerPhase::Binding => "binding",
            ListenerPhase::Running => "running",
            ListenerPhase::Stopped => "stopped",
            ListenerPhase::Failed => "failed",
        }
    }
}

enum State {
    Idle,
    Binding,
    Running { port: u16, server: JoinHandle<()> },
    Stopped,
    Failed { candidates: Vec<u16> },
}

impl State {
    fn phase(&self) -> ListenerPhase {
        match self {
            State::Idle => ListenerPhase::Idle,
            State::Binding => ListenerPhase::Binding,
            State::Running { .. } => ListenerPhase::Running,
            State::Stopped => ListenerPhase::Stopped,
            State::Failed { .. } => ListenerPhase::Failed,
        }
    }
}

/// Sole owner of the bound endpoint.
pub struct TransportListener {
    host: IpAddr,
    state: Mutex<State>,
    shutdown: watch::Sender<bool>,
}

impl TransportListener {
    pub fn new(host: IpAddr) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            host,
            state: Mutex::new(State::Idle),
            shutdown,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn phase(&self) -> ListenerPhase {
        self.lock().phase()
    }

    pub fn bound_port(&self) -> Option<u16> {
        match &*self.lock() {
            State::Running { port, .. } => Some(*port),
            _ => None,
        }
    }

    /// Flips to `true` when `stop` runs. Session loops and background tasks
    /// select on it.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Bind the first free candidate and serve `app` on it.
    pub async fn start(&self, candidates: &[u16], app: Router) -> Result<u16> {
        {
            let mut state = self.lock();
            match &*state {
                State::Idle => {}
                State::Running { port, .. } => return Ok(*port),
                State::Binding => {
                    return Err(BridgeError::TransportFailure("bind already in progress".into()))
                }
                State::Stopped => {
                    return Err(BridgeError::TransportFailure("listener stopped".into()))
                }
                State::Failed { candidates } => {
                    return Err(BridgeError::BindExhausted {
                        candidates: candidates.clone(),
                    })
                }
            }
            *state = State::Binding;
        }

        let (listener, port) = match self.bind_first(candidates).await {
            Ok(bound) => bound,
            Err(e) => {
                let mut state = self.lock();
                // a concurrent stop wins over the failure
                if matches!(*state, State::Binding) {
                    *state = State::Failed {
                        candidates: candidates.to_vec(),
                    };
                }
                return Err(e);
            }
        };

        let mut state = self.lock();
        if !matches!(*state, State::Binding) {
            // stopped while binding: drop the socket, accept nothing
            return Err(BridgeError::TransportFailure("listener stopped".into()));
        }

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "bridge server failed");
            }
        });
        *state = State::Running { port, server };

        tracing::info!(host = %self.host, port, "bridge listener running");
        if candidates.first().is_some_and(|first| *first != port) {
            tracing::info!(port, "using fallback port (earlier candidates in use)");
        }
        Ok(port)
    }

    async fn bind_first(&self, candidates: &[u16]) -> Result<(TcpListener, u16)> {
        for &port in candidates {
            let addr = SocketAddr::new(self.host, port);
            match TcpListener::bind(addr).await {
                Ok(l) => return Ok((l, port)),
                Err(e) if is_addr_in_use(&e) => {
                    tracing::warn!(port, "port in use, trying next candidate");
                }
                Err(e) => {
                    tracing::error!(port, error = %e, "bind failed");
                    return Err(BridgeError::TransportFailure(format!("bind {addr} failed: {e}")));
                }
            }
        }
        tracing::error!(?candidates, "no candidate port could be bound");
        Err(BridgeError::BindExhausted {
            candidates: candidates.to_vec(),
        })
    }

    /// Release the endpoint. Idempotent; fine to call before `start`.
    ///
    /// When this returns the listening socket is closed and open sessions have
    /// been told to close.
    pub async fn stop(&self) {
        let server = {
            let mut state = self.lock();
            match std::mem::replace(&mut *state, State::Stopped) {
                State::Running { server, .. } => Some(server),
                State::Failed { candidates } => {
                    *state = State::Failed { candidates };
                    None
                }
                _ => None,
            }
        };

        self.shutdown.send_replace(true);

        if let Some(server) = server {
            server.abort();
            if let Err(e) = server.await {
                if !e.is_cancelled() {
                    tracing::warn!(error = %e, "bridge server task ended abnormally");
                }
            }
            tracing::info!("bridge listener stopped");
        }
    }
}

fn is_addr_in_use(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::AddrInUse
}

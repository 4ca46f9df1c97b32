//! Test utilities for chairlink-client
//!
//! Provides an in-process simulator of the device firmware for integration
//! tests: `GET /{command}` answers a JSON `{"status": ...}` payload, with
//! hooks for failure injection and a log of every received token.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use tokio::net::TcpListener;

use chairlink_core::{DriveCommand, TransportError};

use crate::transport::HttpTransport;

/// Behavior of the simulated device, shared with the request handlers.
#[derive(Default)]
struct DeviceSim {
    /// Canned status per wire token; unknown tokens answer 404.
    statuses: Mutex<HashMap<String, String>>,
    /// Tokens that answer HTTP 500 instead of a status.
    failing: Mutex<HashSet<String>>,
    /// Tokens that answer 200 with a non-JSON body.
    garbled: Mutex<HashSet<String>>,
    /// Every token received, in order.
    received: Mutex<Vec<String>>,
}

async fn handle_root() -> &'static str {
    "OK"
}

async fn handle_command(
    State(sim): State<Arc<DeviceSim>>,
    Path(token): Path<String>,
) -> Response {
    sim.received.lock().push(token.clone());

    if sim.failing.lock().contains(&token) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if sim.garbled.lock().contains(&token) {
        return (StatusCode::OK, "##garbled##").into_response();
    }
    match sim.statuses.lock().get(&token) {
        Some(status) => Json(serde_json::json!({ "status": status })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// An in-process device simulator that shuts down when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    sim: Arc<DeviceSim>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Start a simulator with a canned status for every command.
    pub async fn start() -> std::io::Result<Self> {
        let sim = Arc::new(DeviceSim::default());
        {
            let mut statuses = sim.statuses.lock();
            for (command, status) in [
                (DriveCommand::Front, "moving forward"),
                (DriveCommand::Back, "moving backward"),
                (DriveCommand::Left, "turning left"),
                (DriveCommand::Right, "turning right"),
                (DriveCommand::Stop, "stopped"),
                (DriveCommand::GestureOn, "gesture control enabled"),
                (DriveCommand::GestureOff, "gesture control disabled"),
            ] {
                statuses.insert(command.wire_name().to_string(), status.to_string());
            }
        }

        let router = Router::new()
            .route("/", get(handle_root))
            .route("/{token}", get(handle_command))
            .with_state(Arc::clone(&sim));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give the server a moment to start.
        tokio::time::sleep(Duration::from_millis(10)).await;

        Ok(Self {
            addr,
            sim,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Base URL of the simulated device.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A transport pointed at the simulated device.
    pub fn transport(&self) -> Result<HttpTransport, TransportError> {
        HttpTransport::new(&self.base_url())
    }

    /// Override the canned status for one command.
    pub fn set_status(&self, command: DriveCommand, status: &str) {
        self.sim
            .statuses
            .lock()
            .insert(command.wire_name().to_string(), status.to_string());
    }

    /// Make one command answer HTTP 500.
    pub fn fail_with_500(&self, command: DriveCommand) {
        self.sim
            .failing
            .lock()
            .insert(command.wire_name().to_string());
    }

    /// Make one command answer 200 with a non-JSON body.
    pub fn garble(&self, command: DriveCommand) {
        self.sim
            .garbled
            .lock()
            .insert(command.wire_name().to_string());
    }

    /// Every wire token received so far, in order.
    pub fn received(&self) -> Vec<String> {
        self.sim.received.lock().clone()
    }

    /// Shut the simulator down gracefully.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

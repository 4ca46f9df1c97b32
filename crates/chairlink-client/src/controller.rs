//! Dispatch controller
//!
//! Owns the session state (mode, status text, warning, telemetry), gates
//! every command through the interlock, serializes allowed commands to the
//! device transport and folds results back into the observable state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use chairlink_core::{
    interlock, ControlMode, ControllerConfig, ControllerState, DispatchOutcome, DriveCommand,
    DriveMode, TelemetrySnapshot, TransportError, Verdict, WarningLifecycle, MAX_SPEED,
    SEND_FAILURE_STATUS,
};

use crate::telemetry::TelemetryProvider;
use crate::transport::DeviceTransport;

/// Orchestrates command dispatch for one operator session.
///
/// All state transitions go through this controller; presentation layers
/// observe snapshots via [`subscribe`](Self::subscribe) or
/// [`state`](Self::state) and never mutate state directly.
///
/// Concurrent dispatches are not queued or cancelled. Each dispatch carries
/// a sequence number and responses are applied last-writer-wins: a response
/// arriving after a newer one has been applied is dropped.
pub struct DispatchController {
    transport: Arc<dyn DeviceTransport>,
    telemetry: Option<Arc<dyn TelemetryProvider>>,
    warning_duration: Duration,
    inner: Arc<Inner>,
}

struct Inner {
    cell: Mutex<StateCell>,
    state_tx: watch::Sender<ControllerState>,
    next_seq: AtomicU64,
}

struct StateCell {
    state: ControllerState,
    warning: WarningLifecycle,
    /// Highest sequence number whose response has been applied.
    applied_seq: u64,
    /// The single scheduled warning expiry, if any.
    expiry: Option<JoinHandle<()>>,
}

impl Inner {
    fn publish(&self, cell: &mut StateCell) {
        cell.state.updated_at = Utc::now();
        self.state_tx.send_replace(cell.state.clone());
    }
}

impl DispatchController {
    /// Create a controller over `transport`, without a telemetry provider.
    ///
    /// Must be called within a Tokio runtime: the startup warning grace
    /// period (if configured) schedules its expiry immediately.
    pub fn new(config: &ControllerConfig, transport: Arc<dyn DeviceTransport>) -> Self {
        Self::with_telemetry(config, transport, None)
    }

    /// Create a controller with an optional telemetry provider.
    pub fn with_telemetry(
        config: &ControllerConfig,
        transport: Arc<dyn DeviceTransport>,
        telemetry: Option<Arc<dyn TelemetryProvider>>,
    ) -> Self {
        let warning = WarningLifecycle::new();
        let state = ControllerState {
            mode: ControlMode {
                gesture_enabled: config.gesture_enabled_at_start,
            },
            status: String::new(),
            last_outcome: None,
            warning: warning.state(),
            telemetry: TelemetrySnapshot::default(),
            updated_at: Utc::now(),
        };
        let (state_tx, _) = watch::channel(state.clone());

        let controller = Self {
            transport,
            telemetry,
            warning_duration: config.warning_duration,
            inner: Arc::new(Inner {
                cell: Mutex::new(StateCell {
                    state,
                    warning,
                    applied_seq: 0,
                    expiry: None,
                }),
                state_tx,
                next_seq: AtomicU64::new(0),
            }),
        };

        if config.warning_visible_at_start {
            let mut cell = controller.inner.cell.lock();
            controller.arm_warning(&mut cell);
            controller.inner.publish(&mut cell);
        }

        controller
    }

    /// Dispatch one command.
    ///
    /// Never returns an error: policy rejections and transport failures are
    /// folded into the returned [`DispatchOutcome`] and into the observable
    /// state. Mode changes happen only on confirmed transport success of a
    /// gesture toggle, never speculatively.
    pub async fn dispatch(&self, command: DriveCommand) -> DispatchOutcome {
        match interlock::evaluate(self.mode(), command) {
            Verdict::Reject { reason } => {
                debug!(command = command.wire_name(), %reason, "command rejected");
                let outcome = DispatchOutcome::Rejected { reason };
                let mut cell = self.inner.cell.lock();
                cell.state.status = outcome.status_text().to_string();
                cell.state.last_outcome = Some(outcome.clone());
                self.arm_warning(&mut cell);
                self.inner.publish(&mut cell);
                outcome
            }
            Verdict::Allow => {
                let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(command = command.wire_name(), seq, "dispatching");
                match self.transport.send(command).await {
                    Ok(reply) => self.apply_success(seq, command, reply.status),
                    Err(error) => self.apply_failure(seq, command, error),
                }
            }
        }
    }

    /// Toggle gesture mode: sends `gesture_off` while enabled, `gesture_on`
    /// while disabled (the front end's toggle control maps here).
    pub async fn toggle_gesture(&self) -> DispatchOutcome {
        let command = if self.mode().gesture_enabled {
            DriveCommand::GestureOff
        } else {
            DriveCommand::GestureOn
        };
        self.dispatch(command).await
    }

    /// Operator acknowledgment of the warning advisory.
    pub fn dismiss_warning(&self) {
        let mut cell = self.inner.cell.lock();
        self.clear_warning(&mut cell);
        self.inner.publish(&mut cell);
    }

    /// Set the operator speed selection, clamped to [`MAX_SPEED`].
    /// Local state only; nothing is transmitted.
    pub fn set_speed(&self, speed: u8) {
        let mut cell = self.inner.cell.lock();
        cell.state.telemetry.speed = speed.min(MAX_SPEED);
        self.inner.publish(&mut cell);
    }

    /// Set the operator drive profile. Local state only.
    pub fn set_drive_mode(&self, mode: DriveMode) {
        let mut cell = self.inner.cell.lock();
        cell.state.telemetry.drive_mode = mode;
        self.inner.publish(&mut cell);
    }

    /// Poll the telemetry provider, if any, and fold the reading in.
    /// Provider failures are logged and leave the snapshot untouched.
    pub async fn refresh_telemetry(&self) {
        let Some(provider) = &self.telemetry else {
            return;
        };
        match provider.sample().await {
            Ok(reading) => {
                let mut cell = self.inner.cell.lock();
                cell.state.telemetry.apply(reading);
                self.inner.publish(&mut cell);
            }
            Err(error) => warn!(%error, "telemetry sample failed"),
        }
    }

    /// The current state snapshot.
    pub fn state(&self) -> ControllerState {
        self.inner.cell.lock().state.clone()
    }

    /// Observe state snapshots; the receiver always holds the latest.
    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.inner.state_tx.subscribe()
    }

    fn mode(&self) -> ControlMode {
        self.inner.cell.lock().state.mode
    }

    fn apply_success(&self, seq: u64, command: DriveCommand, status: String) -> DispatchOutcome {
        let outcome = DispatchOutcome::Completed {
            status: status.clone(),
        };

        let mut cell = self.inner.cell.lock();
        if seq < cell.applied_seq {
            debug!(
                command = command.wire_name(),
                seq,
                applied = cell.applied_seq,
                "dropping stale response"
            );
            return outcome;
        }
        cell.applied_seq = seq;

        cell.state.status = status;
        match command {
            DriveCommand::GestureOff => {
                cell.state.mode.gesture_enabled = false;
                self.clear_warning(&mut cell);
            }
            DriveCommand::GestureOn => cell.state.mode.gesture_enabled = true,
            _ => {}
        }
        cell.state.last_outcome = Some(outcome.clone());
        self.inner.publish(&mut cell);
        outcome
    }

    fn apply_failure(&self, seq: u64, command: DriveCommand, error: TransportError) -> DispatchOutcome {
        warn!(command = command.wire_name(), %error, "transport failure");
        let outcome = DispatchOutcome::Failed { error };

        let mut cell = self.inner.cell.lock();
        if seq < cell.applied_seq {
            debug!(
                command = command.wire_name(),
                seq,
                applied = cell.applied_seq,
                "dropping stale response"
            );
            return outcome;
        }
        cell.applied_seq = seq;

        // A failed toggle must not be assumed to have taken effect on the
        // device, so the mode is left alone.
        cell.state.status = SEND_FAILURE_STATUS.to_string();
        cell.state.last_outcome = Some(outcome.clone());
        self.inner.publish(&mut cell);
        outcome
    }

    /// Show the warning and (re)schedule its expiry, replacing any pending
    /// one: at most one expiry is scheduled at a time.
    fn arm_warning(&self, cell: &mut StateCell) {
        let token = cell.warning.arm(Utc::now());
        cell.state.warning = cell.warning.state();

        if let Some(task) = cell.expiry.take() {
            task.abort();
        }

        let inner = Arc::clone(&self.inner);
        let duration = self.warning_duration;
        cell.expiry = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut cell = inner.cell.lock();
            if cell.warning.expire(token) {
                cell.state.warning = cell.warning.state();
                cell.expiry = None;
                inner.publish(&mut cell);
            }
        }));
    }

    fn clear_warning(&self, cell: &mut StateCell) {
        cell.warning.dismiss();
        cell.state.warning = cell.warning.state();
        if let Some(task) = cell.expiry.take() {
            task.abort();
        }
    }
}

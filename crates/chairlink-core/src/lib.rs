//! chairlink-core - Core types and decision logic for the chairlink controller
//!
//! This crate is I/O-free: the command vocabulary, the interlock policy, the
//! warning state machine, the configuration types and the observable state
//! models live here. Everything asynchronous (device transport, dispatch,
//! timers) lives in `chairlink-client`.

pub mod command;
pub mod config;
pub mod error;
pub mod interlock;
pub mod state;
pub mod telemetry;
pub mod warning;

pub use command::DriveCommand;
pub use config::{ControllerConfig, DEVICE_URL_ENV};
pub use error::{CommandParseError, ConfigError, TransportError};
pub use interlock::{evaluate, Verdict, GESTURE_LOCK_REASON};
pub use state::{ControlMode, ControllerState, DeviceStatus, DispatchOutcome, SEND_FAILURE_STATUS};
pub use telemetry::{DriveMode, TelemetryReading, TelemetrySnapshot, MAX_SIGNAL_BARS, MAX_SPEED};
pub use warning::{WarningLifecycle, WarningState};

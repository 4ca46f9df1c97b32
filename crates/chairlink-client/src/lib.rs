//! chairlink-client - Dispatch controller and device transport
//!
//! The asynchronous half of chairlink: the [`DeviceTransport`] seam with its
//! reqwest implementation, the [`DispatchController`] that owns the session
//! state, and an in-process device simulator for tests.

pub mod controller;
pub mod telemetry;
pub mod testing;
pub mod transport;

pub use controller::DispatchController;
pub use telemetry::{StaticTelemetry, TelemetryProvider};
pub use transport::{DeviceTransport, HttpTransport};

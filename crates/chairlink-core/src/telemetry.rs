//! Telemetry placeholders
//!
//! Battery, signal, speed and drive mode are cosmetic session state: speed
//! and drive mode are mutated locally by the operator and never transmitted;
//! battery and signal come from an optional provider. None of this feeds
//! the interlock or the dispatch path.

use serde::{Deserialize, Serialize};

/// Maximum operator-selectable speed.
pub const MAX_SPEED: u8 = 100;
/// Maximum signal strength, in bars.
pub const MAX_SIGNAL_BARS: u8 = 4;

/// Operator-selected drive profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveMode {
    Indoor,
    Outdoor,
}

/// One reading from a telemetry provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryReading {
    /// Battery level, percent.
    pub battery_percent: u8,
    /// Signal strength, 0..=4 bars.
    pub signal_bars: u8,
}

/// Cosmetic telemetry block of the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Battery level, percent.
    pub battery_percent: u8,
    /// Signal strength, 0..=4 bars.
    pub signal_bars: u8,
    /// Operator-selected speed, 0..=100. Local only, never transmitted.
    pub speed: u8,
    /// Operator-selected drive profile. Local only, never transmitted.
    pub drive_mode: DriveMode,
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self {
            battery_percent: 0,
            signal_bars: MAX_SIGNAL_BARS,
            speed: 50,
            drive_mode: DriveMode::Indoor,
        }
    }
}

impl TelemetrySnapshot {
    /// Fold a provider reading in, leaving the operator-owned fields alone.
    pub fn apply(&mut self, reading: TelemetryReading) {
        self.battery_percent = reading.battery_percent.min(100);
        self.signal_bars = reading.signal_bars.min(MAX_SIGNAL_BARS);
    }
}

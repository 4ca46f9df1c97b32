//! Observable controller state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::telemetry::TelemetrySnapshot;
use crate::warning::WarningState;

/// Generic failure indicator for the status slot when a request fails.
pub const SEND_FAILURE_STATUS: &str = "error sending command";

/// Which input source currently owns the motors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMode {
    /// While true, the motion-sensor input owns the motors and the interlock
    /// rejects manual motion commands.
    pub gesture_enabled: bool,
}

/// Reply payload of one device request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// Device-reported status text, e.g. "moving forward".
    pub status: String,
}

/// Result of one dispatch attempt, tagged so presentation layers can style
/// policy rejections and transport failures differently. The untagged
/// human-readable text for the single status slot comes from
/// [`status_text`](Self::status_text).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The device confirmed the command.
    Completed { status: String },
    /// The interlock refused the command; no request was made.
    Rejected { reason: String },
    /// The request was made but failed.
    Failed { error: TransportError },
}

impl DispatchOutcome {
    /// The text shown in the session status slot for this outcome.
    pub fn status_text(&self) -> &str {
        match self {
            DispatchOutcome::Completed { status } => status,
            DispatchOutcome::Rejected { reason } => reason,
            DispatchOutcome::Failed { .. } => SEND_FAILURE_STATUS,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, DispatchOutcome::Completed { .. })
    }
}

/// Snapshot of everything a presentation layer may observe.
///
/// Owned and mutated exclusively by the dispatch controller; observers get
/// clones over the subscription interface and never write back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerState {
    /// Current control mode.
    pub mode: ControlMode,
    /// Last-known status text; empty until the first dispatch resolves.
    pub status: String,
    /// Tagged result of the most recent dispatch, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_outcome: Option<DispatchOutcome>,
    /// Warning advisory state.
    pub warning: WarningState,
    /// Cosmetic telemetry block.
    pub telemetry: TelemetrySnapshot,
    /// When this snapshot was produced.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn outcome_status_text() {
        let completed = DispatchOutcome::Completed {
            status: "ok".into(),
        };
        assert_eq!(completed.status_text(), "ok");

        let rejected = DispatchOutcome::Rejected {
            reason: "nope".into(),
        };
        assert_eq!(rejected.status_text(), "nope");

        let failed = DispatchOutcome::Failed {
            error: TransportError::Timeout,
        };
        assert_eq!(failed.status_text(), SEND_FAILURE_STATUS);
    }

    #[test]
    fn outcome_serializes_tagged() {
        let failed = DispatchOutcome::Failed {
            error: TransportError::Status(500),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["error"]["status"], 500);
    }

    #[test]
    fn device_status_deserializes_from_wire_payload() {
        let status: DeviceStatus = serde_json::from_str(r#"{"status":"moving forward"}"#).unwrap();
        assert_eq!(status.status, "moving forward");
        // Extra fields from newer firmware are tolerated.
        let status: DeviceStatus =
            serde_json::from_str(r#"{"status":"ok","uptime":12}"#).unwrap();
        assert_eq!(status.status, "ok");
    }
}

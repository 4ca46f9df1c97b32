//! Command interlock
//!
//! The policy function that decides whether a command may be dispatched
//! under the current control mode. Deterministic and side-effect-free so it
//! is testable in isolation; the dispatch controller owns every side effect
//! of a rejection (status text, warning timer).

use crate::command::DriveCommand;
use crate::state::ControlMode;

/// Rejection reason shown while gesture mode owns the motors.
pub const GESTURE_LOCK_REASON: &str = "gesture control must be disabled before manual control";

/// Outcome of an interlock evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The command may be sent to the device.
    Allow,
    /// The command must not be sent; the reason is operator-facing text.
    Reject { reason: String },
}

impl Verdict {
    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow)
    }
}

/// Evaluate whether `cmd` is legal under `mode`.
///
/// Gesture toggles are always legal: `gesture_off` is the only way out of
/// gesture mode, and a redundant `gesture_on` is passed through rather than
/// deduplicated. Motion commands are legal only while gesture mode is off;
/// while it is on, the motion-sensor input must exclusively own the motors.
pub fn evaluate(mode: ControlMode, cmd: DriveCommand) -> Verdict {
    if cmd.is_mode_toggle() {
        return Verdict::Allow;
    }
    if mode.gesture_enabled {
        return Verdict::Reject {
            reason: GESTURE_LOCK_REASON.to_string(),
        };
    }
    Verdict::Allow
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const GESTURE_ON: ControlMode = ControlMode {
        gesture_enabled: true,
    };
    const GESTURE_OFF: ControlMode = ControlMode {
        gesture_enabled: false,
    };

    #[rstest]
    #[case(DriveCommand::Front)]
    #[case(DriveCommand::Back)]
    #[case(DriveCommand::Left)]
    #[case(DriveCommand::Right)]
    #[case(DriveCommand::Stop)]
    fn motion_rejected_while_gesture_enabled(#[case] cmd: DriveCommand) {
        assert_eq!(
            evaluate(GESTURE_ON, cmd),
            Verdict::Reject {
                reason: GESTURE_LOCK_REASON.to_string()
            }
        );
    }

    #[rstest]
    #[case(DriveCommand::Front)]
    #[case(DriveCommand::Back)]
    #[case(DriveCommand::Left)]
    #[case(DriveCommand::Right)]
    #[case(DriveCommand::Stop)]
    fn motion_allowed_while_gesture_disabled(#[case] cmd: DriveCommand) {
        assert_eq!(evaluate(GESTURE_OFF, cmd), Verdict::Allow);
    }

    #[rstest]
    #[case(GESTURE_ON, DriveCommand::GestureOn)]
    #[case(GESTURE_ON, DriveCommand::GestureOff)]
    #[case(GESTURE_OFF, DriveCommand::GestureOn)]
    #[case(GESTURE_OFF, DriveCommand::GestureOff)]
    fn toggles_always_allowed(#[case] mode: ControlMode, #[case] cmd: DriveCommand) {
        assert_eq!(evaluate(mode, cmd), Verdict::Allow);
    }

    #[test]
    fn evaluation_is_deterministic() {
        for _ in 0..3 {
            assert!(evaluate(GESTURE_OFF, DriveCommand::Front).is_allow());
            assert!(!evaluate(GESTURE_ON, DriveCommand::Front).is_allow());
        }
    }
}

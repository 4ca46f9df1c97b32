//! Drive command vocabulary

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommandParseError;

/// A single command the operator can issue to the device.
///
/// The set is closed: the device firmware understands exactly these seven
/// tokens, sent case-sensitively as the trailing path segment of the
/// transport request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveCommand {
    /// Drive forward
    Front,
    /// Drive backward
    Back,
    /// Turn left
    Left,
    /// Turn right
    Right,
    /// Stop the motors
    Stop,
    /// Hand motor control to the motion-sensor input
    GestureOn,
    /// Take motor control back from the motion-sensor input
    GestureOff,
}

impl DriveCommand {
    /// Every command, in wire order.
    pub const ALL: [DriveCommand; 7] = [
        DriveCommand::Front,
        DriveCommand::Back,
        DriveCommand::Left,
        DriveCommand::Right,
        DriveCommand::Stop,
        DriveCommand::GestureOn,
        DriveCommand::GestureOff,
    ];

    /// The wire token for this command.
    pub fn wire_name(&self) -> &'static str {
        match self {
            DriveCommand::Front => "front",
            DriveCommand::Back => "back",
            DriveCommand::Left => "left",
            DriveCommand::Right => "right",
            DriveCommand::Stop => "stop",
            DriveCommand::GestureOn => "gesture_on",
            DriveCommand::GestureOff => "gesture_off",
        }
    }

    /// Directional and stop commands, i.e. everything the interlock gates
    /// while gesture mode owns the motors.
    pub fn is_motion(&self) -> bool {
        !self.is_mode_toggle()
    }

    /// `gesture_on` / `gesture_off`.
    pub fn is_mode_toggle(&self) -> bool {
        matches!(self, DriveCommand::GestureOn | DriveCommand::GestureOff)
    }
}

impl fmt::Display for DriveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for DriveCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DriveCommand::ALL
            .iter()
            .copied()
            .find(|cmd| cmd.wire_name() == s)
            .ok_or_else(|| CommandParseError(s.to_string()))
    }
}

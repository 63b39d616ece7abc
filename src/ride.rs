//! Ride lifecycle and online status.
//!
//! [`RideStateMachine`] is driven only by explicit driver actions, never by
//! time. The transition table:
//!
//! | From | Command | To | Guard |
//! |------|---------|----|-------|
//! | any | `toggle_online` | (same) | going offline forces `Idle` |
//! | `Idle` | `accept_ride` | `PickingUp` | must be online |
//! | `PickingUp` | `start_ride` | `InRide` | |
//! | `InRide` | `end_ride` | `Idle` | |
//!
//! Out-of-state commands return a [`RideError`] and leave the state untouched.
//! [`RideStatus::DroppingOff`] is representable but no command enters it.
//!
//! # Example
//!
//! ```rust
//! use ride_console::ride::{RideStateMachine, RideStatus};
//!
//! let mut ride = RideStateMachine::new();
//! assert!(ride.accept_ride().is_err()); // offline
//!
//! ride.toggle_online();
//! ride.accept_ride().unwrap();
//! ride.start_ride().unwrap();
//! ride.end_ride().unwrap();
//!
//! assert_eq!(ride.state().status, RideStatus::Idle);
//! assert!(ride.state().is_online);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ride lifecycle stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    /// Available for a new ride.
    #[default]
    Idle,
    /// Driving to the pickup point.
    PickingUp,
    /// Passenger on board.
    InRide,
    /// Approaching the destination. Reserved: no command enters this state.
    DroppingOff,
}

impl RideStatus {
    /// Returns the status as a snake_case string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PickingUp => "picking_up",
            Self::InRide => "in_ride",
            Self::DroppingOff => "dropping_off",
        }
    }

    /// Headline shown to the driver.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Available",
            Self::PickingUp => "En Route to Pickup",
            Self::InRide => "Passenger On Board",
            Self::DroppingOff => "Approaching Destination",
        }
    }

    /// Secondary line shown under the headline.
    pub const fn detail(&self) -> &'static str {
        match self {
            Self::Idle => "Ready for new rides",
            Self::PickingUp => "ETA: 5 minutes",
            Self::InRide => "Destination: Downtown",
            Self::DroppingOff => "ETA: 2 minutes",
        }
    }
}

/// Driver action on the ride state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideCommand {
    /// Go online or offline.
    ToggleOnline,
    /// Accept the pending ride request.
    AcceptRide,
    /// Passenger picked up.
    StartRide,
    /// Passenger dropped off.
    EndRide,
}

impl RideCommand {
    /// Returns the command as a snake_case string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ToggleOnline => "toggle_online",
            Self::AcceptRide => "accept_ride",
            Self::StartRide => "start_ride",
            Self::EndRide => "end_ride",
        }
    }
}

/// Reasons a ride command was refused.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RideError {
    /// The command is not valid in the current status.
    #[error("cannot {} while {}", .command.as_str(), .from.as_str())]
    InvalidTransition {
        /// Status when the command arrived.
        from: RideStatus,
        /// Refused command.
        command: RideCommand,
    },

    /// Rides can only be accepted while online.
    #[error("driver is offline")]
    Offline,
}

/// Observable ride state.
///
/// Invariant: `!is_online` implies `status == RideStatus::Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RideState {
    /// Lifecycle stage.
    pub status: RideStatus,
    /// Whether the driver accepts rides.
    pub is_online: bool,
}

/// A completed state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideTransition {
    /// State before the command.
    pub from: RideState,
    /// State after the command.
    pub to: RideState,
    /// Command that caused it.
    pub command: RideCommand,
}

/// Owns the driver's online flag and ride lifecycle.
#[derive(Clone, Debug, Default)]
pub struct RideStateMachine {
    state: RideState,
}

impl RideStateMachine {
    /// Start offline and idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply any ride command.
    pub fn apply(&mut self, command: RideCommand) -> Result<RideTransition, RideError> {
        let from = self.state;
        let next = match command {
            RideCommand::ToggleOnline => return Ok(self.toggle_online()),
            RideCommand::AcceptRide => match from.status {
                RideStatus::Idle if !from.is_online => return Err(RideError::Offline),
                RideStatus::Idle => RideState {
                    status: RideStatus::PickingUp,
                    ..from
                },
                status => return Err(invalid(status, command)),
            },
            RideCommand::StartRide => match from.status {
                RideStatus::PickingUp => RideState {
                    status: RideStatus::InRide,
                    ..from
                },
                status => return Err(invalid(status, command)),
            },
            RideCommand::EndRide => match from.status {
                RideStatus::InRide => RideState {
                    status: RideStatus::Idle,
                    ..from
                },
                status => return Err(invalid(status, command)),
            },
        };

        Ok(self.commit(from, next, command))
    }

    /// Go online, or go offline and abandon any ride in progress.
    pub fn toggle_online(&mut self) -> RideTransition {
        let from = self.state;
        let is_online = !from.is_online;
        let next = RideState {
            status: if is_online { from.status } else { RideStatus::Idle },
            is_online,
        };
        self.commit(from, next, RideCommand::ToggleOnline)
    }

    fn commit(&mut self, from: RideState, to: RideState, command: RideCommand) -> RideTransition {
        self.state = to;
        tracing::debug!(
            command = command.as_str(),
            from = from.status.as_str(),
            to = to.status.as_str(),
            online = to.is_online,
            "ride transition"
        );
        RideTransition { from, to, command }
    }

    /// `Idle` (online) to `PickingUp`.
    pub fn accept_ride(&mut self) -> Result<RideTransition, RideError> {
        self.apply(RideCommand::AcceptRide)
    }

    /// `PickingUp` to `InRide`.
    pub fn start_ride(&mut self) -> Result<RideTransition, RideError> {
        self.apply(RideCommand::StartRide)
    }

    /// `InRide` to `Idle`.
    pub fn end_ride(&mut self) -> Result<RideTransition, RideError> {
        self.apply(RideCommand::EndRide)
    }

    /// Current state.
    pub fn state(&self) -> RideState {
        self.state
    }

    /// Commands that would succeed right now, for renderers that only expose valid actions.
    pub fn available_commands(&self) -> Vec<RideCommand> {
        let mut commands = vec![RideCommand::ToggleOnline];
        match self.state.status {
            RideStatus::Idle if self.state.is_online => commands.push(RideCommand::AcceptRide),
            RideStatus::PickingUp => commands.push(RideCommand::StartRide),
            RideStatus::InRide => commands.push(RideCommand::EndRide),
            _ => {}
        }
        commands
    }
}

fn invalid(from: RideStatus, command: RideCommand) -> RideError {
    RideError::InvalidTransition { from, command }
}

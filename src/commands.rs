//! Command types and outcomes for the driver console.
//!
//! Every user action reaches the core as a [`DashboardCommand`], whether it
//! comes from an in-process renderer, the terminal, or the web API. Applying a
//! command yields a [`CommandOutcome`]; nothing a driver can do is fatal.
//!
//! # Text Form
//!
//! Commands also parse from a short text form, used by the terminal binary:
//!
//! ```rust
//! use ride_console::DashboardCommand;
//!
//! let cmd: DashboardCommand = "go_to 2".parse().unwrap();
//! assert_eq!(cmd, DashboardCommand::CarouselGoTo { index: 2 });
//!
//! let cmd: DashboardCommand = "swipe 100 40".parse().unwrap();
//! assert_eq!(cmd, DashboardCommand::Swipe { start_x: 100.0, end_x: 40.0 });
//!
//! assert!("warp_speed".parse::<DashboardCommand>().is_err());
//! ```
//!
//! # JSON Form
//!
//! The web API uses the same names with a `command` tag:
//! `{"command": "accept_ride"}`, `{"command": "go_to", "index": 2}`.

use core::str::{FromStr, SplitWhitespace};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::carousel::CarouselError;
use crate::ride::{RideCommand, RideError};

// ============================================================================
// Command Source
// ============================================================================

/// Where a command came from. Used for logging only; all sources are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandSource {
    /// In-process renderer or terminal input.
    Local,
    /// HTTP API.
    WebApi,
}

// ============================================================================
// Commands
// ============================================================================

/// A driver action.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DashboardCommand {
    /// Plug in or unplug the charger.
    ToggleCharging,
    /// Begin a battery swap. Ignored while one is running.
    StartBatterySwap,
    /// Go online or offline.
    ToggleOnline,
    /// Accept the pending ride request.
    AcceptRide,
    /// Passenger picked up.
    StartRide,
    /// Passenger dropped off.
    EndRide,
    /// Next info panel.
    #[serde(rename = "next")]
    CarouselNext,
    /// Previous info panel.
    #[serde(rename = "prev")]
    CarouselPrev,
    /// Jump to a panel.
    #[serde(rename = "go_to")]
    CarouselGoTo {
        /// Target panel index.
        index: usize,
    },
    /// A complete horizontal gesture.
    Swipe {
        /// X where the finger went down.
        start_x: f64,
        /// X where the finger lifted.
        end_x: f64,
    },
    /// Finger down.
    TouchStart {
        /// Horizontal position.
        x: f64,
    },
    /// Finger moved.
    TouchMove {
        /// Horizontal position.
        x: f64,
    },
    /// Finger lifted.
    TouchEnd,
}

impl DashboardCommand {
    /// Text name, as accepted by [`FromStr`] and the web API.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ToggleCharging => "toggle_charging",
            Self::StartBatterySwap => "start_battery_swap",
            Self::ToggleOnline => "toggle_online",
            Self::AcceptRide => "accept_ride",
            Self::StartRide => "start_ride",
            Self::EndRide => "end_ride",
            Self::CarouselNext => "next",
            Self::CarouselPrev => "prev",
            Self::CarouselGoTo { .. } => "go_to",
            Self::Swipe { .. } => "swipe",
            Self::TouchStart { .. } => "touch_start",
            Self::TouchMove { .. } => "touch_move",
            Self::TouchEnd => "touch_end",
        }
    }

    /// The ride state machine command, if this is one.
    pub const fn ride_command(&self) -> Option<RideCommand> {
        match self {
            Self::ToggleOnline => Some(RideCommand::ToggleOnline),
            Self::AcceptRide => Some(RideCommand::AcceptRide),
            Self::StartRide => Some(RideCommand::StartRide),
            Self::EndRide => Some(RideCommand::EndRide),
            _ => None,
        }
    }
}

impl From<RideCommand> for DashboardCommand {
    fn from(cmd: RideCommand) -> Self {
        match cmd {
            RideCommand::ToggleOnline => Self::ToggleOnline,
            RideCommand::AcceptRide => Self::AcceptRide,
            RideCommand::StartRide => Self::StartRide,
            RideCommand::EndRide => Self::EndRide,
        }
    }
}

// ============================================================================
// Text Parsing
// ============================================================================

/// Errors from parsing the text form of a command.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum CommandParseError {
    /// Input was blank.
    #[error("empty command")]
    Empty,

    /// First word is not a command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A required argument was not given.
    #[error("{command}: missing {argument}")]
    MissingArgument {
        /// Command name.
        command: &'static str,
        /// Argument name.
        argument: &'static str,
    },

    /// An argument did not parse.
    #[error("{command}: invalid {argument} '{value}'")]
    InvalidArgument {
        /// Command name.
        command: &'static str,
        /// Argument name.
        argument: &'static str,
        /// Offending text.
        value: String,
    },

    /// More words than the command takes.
    #[error("{command}: unexpected argument '{value}'")]
    UnexpectedArgument {
        /// Command name.
        command: &'static str,
        /// First extra word.
        value: String,
    },
}

impl FromStr for DashboardCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let word = parts.next().ok_or(CommandParseError::Empty)?;
        let word = word.to_ascii_lowercase().replace('-', "_");

        let cmd = match word.as_str() {
            "toggle_charging" | "charge" => Self::ToggleCharging,
            "start_battery_swap" | "swap" => Self::StartBatterySwap,
            "toggle_online" | "online" => Self::ToggleOnline,
            "accept_ride" | "accept" => Self::AcceptRide,
            "start_ride" | "start" => Self::StartRide,
            "end_ride" | "end" => Self::EndRide,
            "next" => Self::CarouselNext,
            "prev" | "previous" => Self::CarouselPrev,
            "go_to" | "goto" => Self::CarouselGoTo {
                index: argument(&mut parts, "go_to", "index")?,
            },
            "swipe" => Self::Swipe {
                start_x: argument(&mut parts, "swipe", "start_x")?,
                end_x: argument(&mut parts, "swipe", "end_x")?,
            },
            "touch_start" => Self::TouchStart {
                x: argument(&mut parts, "touch_start", "x")?,
            },
            "touch_move" => Self::TouchMove {
                x: argument(&mut parts, "touch_move", "x")?,
            },
            "touch_end" => Self::TouchEnd,
            _ => return Err(CommandParseError::UnknownCommand(word)),
        };

        if let Some(extra) = parts.next() {
            return Err(CommandParseError::UnexpectedArgument {
                command: cmd.name(),
                value: extra.to_string(),
            });
        }
        Ok(cmd)
    }
}

fn argument<T: FromStr>(
    parts: &mut SplitWhitespace<'_>,
    command: &'static str,
    name: &'static str,
) -> Result<T, CommandParseError> {
    let raw = parts.next().ok_or(CommandParseError::MissingArgument {
        command,
        argument: name,
    })?;
    raw.parse().map_err(|_| CommandParseError::InvalidArgument {
        command,
        argument: name,
        value: raw.to_string(),
    })
}

// ============================================================================
// Command Outcomes
// ============================================================================

/// Result of applying a command.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// State changed (or input was recorded).
    Applied,
    /// Valid input with nothing to do, e.g. a swipe below the threshold.
    Ignored,
    /// Refused; state untouched.
    Rejected(RejectReason),
}

impl CommandOutcome {
    /// Whether the command changed anything.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Whether the command was refused.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Why a command was refused.
#[derive(Error, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", content = "error", rename_all = "snake_case")]
pub enum RejectReason {
    /// Ride lifecycle refused the transition.
    #[error(transparent)]
    Ride(#[from] RideError),

    /// Carousel refused the navigation.
    #[error(transparent)]
    Carousel(#[from] CarouselError),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ride::RideStatus;

    // === Text parsing ===

    #[test]
    fn parse_simple_names() {
        assert_eq!("accept_ride".parse::<DashboardCommand>(), Ok(DashboardCommand::AcceptRide));
        assert_eq!("ACCEPT".parse::<DashboardCommand>(), Ok(DashboardCommand::AcceptRide));
        assert_eq!("toggle-online".parse::<DashboardCommand>(), Ok(DashboardCommand::ToggleOnline));
        assert_eq!("  next  ".parse::<DashboardCommand>(), Ok(DashboardCommand::CarouselNext));
        assert_eq!("swap".parse::<DashboardCommand>(), Ok(DashboardCommand::StartBatterySwap));
    }

    #[test]
    fn parse_arguments() {
        assert_eq!(
            "touch_move 12.5".parse::<DashboardCommand>(),
            Ok(DashboardCommand::TouchMove { x: 12.5 })
        );
        assert_eq!(
            "goto 3".parse::<DashboardCommand>(),
            Ok(DashboardCommand::CarouselGoTo { index: 3 })
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<DashboardCommand>(), Err(CommandParseError::Empty));
        assert_eq!(
            "fly".parse::<DashboardCommand>(),
            Err(CommandParseError::UnknownCommand("fly".into()))
        );
        assert_eq!(
            "swipe 10".parse::<DashboardCommand>(),
            Err(CommandParseError::MissingArgument {
                command: "swipe",
                argument: "end_x"
            })
        );
        assert!(matches!(
            "go_to -1".parse::<DashboardCommand>(),
            Err(CommandParseError::InvalidArgument { argument: "index", .. })
        ));
        assert!(matches!(
            "next 1".parse::<DashboardCommand>(),
            Err(CommandParseError::UnexpectedArgument { command: "next", .. })
        ));
    }

    #[test]
    fn names_round_trip_through_parser() {
        let commands = [
            DashboardCommand::ToggleCharging,
            DashboardCommand::StartBatterySwap,
            DashboardCommand::ToggleOnline,
            DashboardCommand::AcceptRide,
            DashboardCommand::StartRide,
            DashboardCommand::EndRide,
            DashboardCommand::CarouselNext,
            DashboardCommand::CarouselPrev,
            DashboardCommand::TouchEnd,
        ];
        for cmd in commands {
            assert_eq!(cmd.name().parse::<DashboardCommand>(), Ok(cmd));
        }
    }

    // === JSON form ===

    #[test]
    fn json_tagged_by_command() {
        let cmd: DashboardCommand =
            serde_json::from_str(r#"{"command": "go_to", "index": 2}"#).unwrap();
        assert_eq!(cmd, DashboardCommand::CarouselGoTo { index: 2 });

        let cmd: DashboardCommand =
            serde_json::from_str(r#"{"command": "swipe", "start_x": 100, "end_x": 40}"#).unwrap();
        assert_eq!(
            cmd,
            DashboardCommand::Swipe {
                start_x: 100.0,
                end_x: 40.0
            }
        );

        let json = serde_json::to_value(DashboardCommand::AcceptRide).unwrap();
        assert_eq!(json, serde_json::json!({"command": "accept_ride"}));
    }

    #[test]
    fn ride_commands_map_both_ways() {
        for cmd in [
            RideCommand::ToggleOnline,
            RideCommand::AcceptRide,
            RideCommand::StartRide,
            RideCommand::EndRide,
        ] {
            assert_eq!(DashboardCommand::from(cmd).ride_command(), Some(cmd));
        }
        assert_eq!(DashboardCommand::CarouselNext.ride_command(), None);
    }

    // === Outcomes ===

    #[test]
    fn reject_reason_from_errors() {
        let reason: RejectReason = RideError::Offline.into();
        assert_eq!(reason.to_string(), "driver is offline");

        let reason: RejectReason = RideError::InvalidTransition {
            from: RideStatus::Idle,
            command: RideCommand::EndRide,
        }
        .into();
        assert!(CommandOutcome::Rejected(reason).is_rejected());
        assert!(CommandOutcome::Applied.is_applied());
        assert!(!CommandOutcome::Ignored.is_applied());
    }

    #[test]
    fn outcome_json_shape() {
        let json = serde_json::to_value(CommandOutcome::Rejected(RideError::Offline.into())).unwrap();
        assert_eq!(json["outcome"], "rejected");
        assert_eq!(json["reason"]["component"], "ride");
        assert_eq!(json["reason"]["error"]["kind"], "offline");
    }
}

//! API request and response types for the HTTP service.

use serde::{Deserialize, Serialize};

use crate::commands::{CommandOutcome, CommandParseError, DashboardCommand};
use crate::dashboard::GaugeReading;
use crate::gauge::ScaleMark;

/// Number of scale marks returned with a gauge.
pub const SCALE_MARK_COUNT: usize = 7;

// ============================================================================
// Request Types
// ============================================================================

/// Errors decoding a `POST /api/command` body.
#[derive(Debug, thiserror::Error)]
pub enum CommandRequestError {
    /// Body was not valid UTF-8.
    #[error("request body is not UTF-8")]
    Encoding,

    /// JSON body did not describe a command.
    #[error("invalid command JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Text body did not parse.
    #[error(transparent)]
    Text(#[from] CommandParseError),
}

/// Decode a command body.
///
/// JSON objects use the tagged form (`{"command": "go_to", "index": 2}`);
/// anything else is read as the text form (`go_to 2`).
pub fn parse_command_body(body: &[u8]) -> Result<DashboardCommand, CommandRequestError> {
    let text = std::str::from_utf8(body).map_err(|_| CommandRequestError::Encoding)?;
    if text.trim_start().starts_with('{') {
        Ok(serde_json::from_str(text)?)
    } else {
        Ok(text.parse()?)
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// API response wrapper for consistent JSON structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (present when success=true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present when success=false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Result of a command request.
///
/// A refused command is still a successful request: `accepted` is false and
/// `reason` says why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Command name as understood by the server
    pub command: String,
    /// Whether the command was accepted (applied or harmlessly ignored)
    pub accepted: bool,
    /// Outcome in detail
    pub outcome: CommandOutcome,
    /// Human-readable rejection reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CommandResponse {
    /// Describe the outcome of `command`.
    pub fn new(command: &DashboardCommand, outcome: CommandOutcome) -> Self {
        let reason = match &outcome {
            CommandOutcome::Rejected(reason) => Some(reason.to_string()),
            _ => None,
        };
        Self {
            command: command.name().to_string(),
            accepted: !outcome.is_rejected(),
            outcome,
            reason,
        }
    }
}

/// A gauge with its scale.
#[derive(Debug, Clone, Serialize)]
pub struct GaugeResponse {
    /// Current reading and geometry
    #[serde(flatten)]
    pub gauge: GaugeReading,
    /// Evenly spaced labelled marks from min to max
    pub scale_marks: Vec<ScaleMark>,
}

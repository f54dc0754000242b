pub mod config;
pub mod doctor;
pub mod quote;
pub mod weight;

use serde::Serialize;

use tapparelle_core::errors::{FailureKind, InterfaceError};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    correlation_id: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            correlation_id: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            correlation_id: None,
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Failure carrying the user-safe message and correlation id of an interface error.
    pub fn from_interface(command: &str, error: &InterfaceError) -> Self {
        let (error_class, exit_code) = match error.kind() {
            FailureKind::InvalidInputFormat => ("invalid_input", 2),
            FailureKind::CatalogUnavailable => ("catalog_unavailable", 3),
            FailureKind::NoMatchFound => ("no_match_found", 4),
            FailureKind::Internal => ("internal", 1),
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            correlation_id: Some(error.correlation_id().to_string()),
            message: error.user_message().to_string(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

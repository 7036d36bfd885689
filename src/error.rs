// SPDX-License-Identifier: MIT

//! Typed error handling for trial-portal
//!
//! Server and transport failures, validation failures and wizard misuse all
//! flow through [`PortalError`]. Wizard operations catch server failures
//! themselves and report them as outcomes; only state-machine misuse and
//! client setup problems surface as `Err`.

use crate::forms::validation::ValidationErrors;
use thiserror::Error;

/// Message shown when neither the server nor the transport gave anything better.
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// Top-level error type for trial-portal
#[derive(Debug, Error)]
pub enum PortalError {
    /// Non-success response from the portal backend
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A 401 could not be recovered by refreshing the token
    #[error("Session expired, log in again")]
    SessionExpired,

    /// A section save was attempted before the study was initiated
    #[error("No study id: initiate the study before saving sections")]
    MissingStudyId,

    /// Client-side validation rejected the form
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Wizard state-machine misuse
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// The signed-in user holds no role that may decide on a request
    #[error("Unsupported role")]
    UnsupportedRole,

    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Invalid base URL or endpoint path
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// Generic error wrapper
    #[error("{0}")]
    Other(String),
}

/// Wizard state-machine misuse
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Back is not available on the first step
    #[error("Already at the first step")]
    AtFirstStep,

    /// The flow reached its terminal screen; no further transitions
    #[error("The flow has already finished")]
    FlowFinished,

    /// The wizard has not been started yet
    #[error("The wizard has not been started")]
    NotStarted,

    /// Registration flow used before a user type was chosen
    #[error("No registration type selected")]
    NoFlowSelected,

    /// Registration type is fixed once chosen
    #[error("Registration type already selected")]
    FlowAlreadySelected,

    /// The step has no field with this name
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// The step only displays data
    #[error("Step '{0}' is read-only")]
    ReadOnly(String),

    /// Registration steps are only ever submitted
    #[error("Step '{0}' does not keep drafts")]
    DraftsUnsupported(String),

    /// The last review step only accepts approve or reject
    #[error("A decision is required on the last step")]
    DecisionRequired,

    /// Approve/reject offered on a step that is not the last one
    #[error("Decisions are only available on the last step")]
    DecisionUnavailable,

    /// Requested step is outside the flow
    #[error("Step {0} is outside the flow")]
    StepOutOfRange(usize),
}

impl PortalError {
    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create from a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Text suitable for a notification: the server's message when it sent
    /// one, otherwise the error's own message, otherwise a generic fallback.
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Api { message, .. } => message.trim().to_string(),
            other => other.to_string(),
        };
        if message.is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message
        }
    }

    /// True for HTTP 401 that could not be refreshed
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

impl From<ValidationErrors> for PortalError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<&str> for PortalError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<String> for PortalError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;

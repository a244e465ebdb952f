//! Error types for directory synchronization.
//!
//! Every failure that reaches a caller of this crate is a [`DirectoryError`].
//! Remote failures (anything the SCIM endpoint, the Workspace directory API or
//! the Identity Store rejected) are carried as a [`StructuredError`], which
//! holds a user-facing message, an ordered list of remediation suggestions and
//! the original cause. Malformed local data is reported separately as a
//! [`ContractViolation`] so callers can tell "the server rejected this" apart
//! from "our own records are broken".

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Shared handle to the error an upstream client returned.
///
/// Classification keeps this handle as-is; it is never rewrapped, so the same
/// allocation can be inspected by callers after the error has been classified.
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Upstream service a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    /// SCIM provisioning endpoint (HTTP status based errors).
    Scim,
    /// Workspace directory API (typed `{code, message}` errors).
    WorkspaceDirectory,
    /// Identity Store SDK (string error codes).
    IdentityStore,
}

impl Service {
    /// Display name used in summaries and log entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Scim => "SCIM",
            Service::WorkspaceDirectory => "Workspace Directory",
            Service::IdentityStore => "Identity Store",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure taxonomy shared by all three upstream services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Credentials missing, expired or rejected.
    Authentication,
    /// Authenticated, but not permitted to perform the operation.
    Authorization,
    /// The addressed resource or store does not exist.
    NotFound,
    /// The resource already exists or was modified concurrently.
    Conflict,
    /// Throttled or over quota.
    RateLimited,
    /// The service failed while handling a valid request.
    ServerError,
    /// The service or a gateway in front of it is temporarily unavailable.
    ServiceUnavailable,
    /// The service rejected the request payload.
    ValidationFailure,
    /// The request did not complete at the transport level.
    ConnectivityFailure,
    /// Malformed local data, never a remote rejection.
    ContractViolation,
    /// A 4xx status with no dedicated bucket.
    UnknownClientError,
    /// A 5xx status with no dedicated bucket.
    UnknownServerError,
    /// HTTP status below 400 handed to the classifier.
    UnexpectedStatus,
    /// SDK error code outside the recognized set.
    Unclassified,
}

impl ErrorKind {
    /// Whether this kind describes a failure reported by a remote service.
    pub fn is_remote(&self) -> bool {
        !matches!(self, ErrorKind::ContractViolation)
    }
}

/// Uniform diagnostic record produced by the classifier.
///
/// The `Display` output is the one-line summary
/// `"<service> <operation> failed: <message>"`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{service} {operation} failed: {user_message}")]
pub struct StructuredError {
    service: Service,
    operation: String,
    status_code: u16,
    kind: ErrorKind,
    user_message: String,
    suggestions: Vec<String>,
    #[source]
    original_cause: Option<Cause>,
}

impl StructuredError {
    /// Create a structured error from its parts.
    pub fn new(
        service: Service,
        operation: impl Into<String>,
        status_code: u16,
        kind: ErrorKind,
        user_message: impl Into<String>,
        suggestions: Vec<String>,
        original_cause: Option<Cause>,
    ) -> Self {
        Self {
            service,
            operation: operation.into(),
            status_code,
            kind,
            user_message: user_message.into(),
            suggestions,
            original_cause,
        }
    }

    /// Upstream service that reported the failure.
    pub fn service(&self) -> Service {
        self.service
    }

    /// Name of the failed call, e.g. `"ListUsers"`.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// HTTP status of the failure, or 0 when the origin is not HTTP based.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Short explanation suitable for end users.
    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    /// Remediation steps, most relevant first.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// The error the upstream client returned, if any.
    pub fn original_cause(&self) -> Option<&Cause> {
        self.original_cause.as_ref()
    }

    /// One-line summary: `"<service> <operation> failed: <message>"`.
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// Summary followed by the numbered suggestion list.
    pub fn describe(&self) -> String {
        let mut text = self.summary();
        for (index, suggestion) in self.suggestions.iter().enumerate() {
            text.push_str(&format!("\n  {}. {}", index + 1, suggestion));
        }
        text
    }

    /// Serializable snapshot for machine-readable output.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            service: self.service,
            operation: self.operation.clone(),
            status_code: self.status_code,
            kind: self.kind,
            message: self.user_message.clone(),
            suggestions: self.suggestions.clone(),
            cause: self.original_cause.as_ref().map(|cause| cause.to_string()),
        }
    }
}

/// Serializable view of a [`StructuredError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub service: Service,
    pub operation: String,
    pub status_code: u16,
    pub kind: ErrorKind,
    pub message: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

/// Local data that breaks an invariant the adapters rely on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    /// A member identifier whose variant is not a user id.
    #[error("member identifier is not a user id")]
    UnrecognizedMemberId,

    /// A request field that must be present was empty.
    #[error("required field '{field}' is empty")]
    EmptyField { field: Cow<'static, str> },
}

/// Error returned by every adapter operation.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// A remote service rejected the call, classified for display.
    #[error(transparent)]
    Remote(#[from] StructuredError),

    /// Malformed local data; no remote call was involved.
    #[error("contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),
}

impl DirectoryError {
    /// Create an empty-field contract violation.
    pub fn empty_field(field: impl Into<Cow<'static, str>>) -> Self {
        Self::ContractViolation(ContractViolation::EmptyField {
            field: field.into(),
        })
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DirectoryError::Remote(error) => error.kind(),
            DirectoryError::ContractViolation(_) => ErrorKind::ContractViolation,
        }
    }

    /// The structured diagnostic, when the failure came from a remote service.
    pub fn structured(&self) -> Option<&StructuredError> {
        match self {
            DirectoryError::Remote(error) => Some(error),
            DirectoryError::ContractViolation(_) => None,
        }
    }

    pub fn is_contract_violation(&self) -> bool {
        matches!(self, DirectoryError::ContractViolation(_))
    }
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

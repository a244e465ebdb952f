//! Classification of Identity Store SDK failures.
//!
//! SDK errors carry a string code (`ThrottlingException`, `AccessDenied`, ...)
//! and a message. The code is parsed into [`SdkErrorCode`] once, and the
//! classifier matches on that enum exhaustively.

use super::{Bucket, find_in_chain};
use crate::error::{Cause, ErrorKind, Service, StructuredError};
use std::fmt;

/// Error returned by the Identity Store SDK.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct SdkError {
    code: String,
    message: String,
}

impl SdkError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &str {
        &self.code
    }

    pub fn error_message(&self) -> &str {
        &self.message
    }
}

/// Recognized SDK error codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SdkErrorCode {
    AccessDenied,
    UnauthorizedOperation,
    ResourceNotFound,
    ResourceNotFoundException,
    ConflictException,
    ThrottlingException,
    ValidationException,
    InternalServerException,
    ServiceUnavailableException,
    /// Any code outside the recognized set, kept verbatim.
    Other(String),
}

impl SdkErrorCode {
    /// Parse a code by exact, case-sensitive match.
    pub fn parse(code: &str) -> Self {
        match code {
            "AccessDenied" => SdkErrorCode::AccessDenied,
            "UnauthorizedOperation" => SdkErrorCode::UnauthorizedOperation,
            "ResourceNotFound" => SdkErrorCode::ResourceNotFound,
            "ResourceNotFoundException" => SdkErrorCode::ResourceNotFoundException,
            "ConflictException" => SdkErrorCode::ConflictException,
            "ThrottlingException" => SdkErrorCode::ThrottlingException,
            "ValidationException" => SdkErrorCode::ValidationException,
            "InternalServerException" => SdkErrorCode::InternalServerException,
            "ServiceUnavailableException" => SdkErrorCode::ServiceUnavailableException,
            other => SdkErrorCode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SdkErrorCode::AccessDenied => "AccessDenied",
            SdkErrorCode::UnauthorizedOperation => "UnauthorizedOperation",
            SdkErrorCode::ResourceNotFound => "ResourceNotFound",
            SdkErrorCode::ResourceNotFoundException => "ResourceNotFoundException",
            SdkErrorCode::ConflictException => "ConflictException",
            SdkErrorCode::ThrottlingException => "ThrottlingException",
            SdkErrorCode::ValidationException => "ValidationException",
            SdkErrorCode::InternalServerException => "InternalServerException",
            SdkErrorCode::ServiceUnavailableException => "ServiceUnavailableException",
            SdkErrorCode::Other(code) => code,
        }
    }
}

impl fmt::Display for SdkErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An SDK failure after parsing its cause.
#[derive(Debug, Clone)]
pub enum SdkFailure {
    /// The cause chain contains an [`SdkError`].
    Coded {
        code: SdkErrorCode,
        message: String,
        cause: Cause,
    },
    /// No coded error could be recovered.
    Uncoded(Option<Cause>),
}

impl SdkFailure {
    pub fn parse(cause: Option<Cause>) -> Self {
        let Some(cause) = cause else {
            return SdkFailure::Uncoded(None);
        };
        let coded = find_in_chain::<SdkError>(&cause)
            .map(|error| (SdkErrorCode::parse(&error.code), error.message.clone()));
        match coded {
            Some((code, message)) => SdkFailure::Coded {
                code,
                message,
                cause,
            },
            None => SdkFailure::Uncoded(Some(cause)),
        }
    }
}

const ACCESS_DENIED: Bucket = Bucket::fixed(
    ErrorKind::Authorization,
    "Access denied - the credentials are not permitted to call the Identity Store",
    &[
        "Check that the IAM policy grants the required identitystore actions",
        "Verify the identity store ID belongs to this account and region",
        "Make sure the credentials in use are the ones you expect",
    ],
);

const NOT_FOUND: Bucket = Bucket::fixed(
    ErrorKind::NotFound,
    "Identity Store resource not found",
    &[
        "Verify the identity store ID is correct",
        "Check that the user, group or membership still exists",
        "Run the sync again to refresh stale identifiers",
    ],
);

const CONFLICT: Bucket = Bucket::fixed(
    ErrorKind::Conflict,
    "Identity Store resource conflict - the resource already exists or is being modified",
    &[
        "Check for an existing user, group or membership with the same identifiers",
        "Wait for concurrent changes to finish and run the sync again",
        "Verify that group display names are unique",
    ],
);

const THROTTLED: Bucket = Bucket::fixed(
    ErrorKind::RateLimited,
    "Identity Store request was throttled",
    &[
        "Wait a few minutes before running the sync again",
        "Reduce the number of changes applied per run",
        "Request a higher Identity Store request quota",
    ],
);

const VALIDATION: Bucket = Bucket::fixed(
    ErrorKind::ValidationFailure,
    "Identity Store rejected the request parameters",
    &[
        "Check that identifiers and display names are well formed",
        "Verify required attributes are present on the user or group",
        "Enable debug logging to inspect the failing request",
    ],
);

const INTERNAL_SERVER_ERROR: Bucket = Bucket::fixed(
    ErrorKind::ServerError,
    "Identity Store encountered an internal server error",
    &[
        "Retry the operation after a short delay",
        "Check the provider status page for ongoing incidents",
        "Contact the provider's support if the error persists",
    ],
);

const UNAVAILABLE: Bucket = Bucket::fixed(
    ErrorKind::ServiceUnavailable,
    "Identity Store is temporarily unavailable",
    &[
        "Retry the operation in a few minutes",
        "Check the provider status page for ongoing incidents",
        "Verify network connectivity to the Identity Store endpoint",
    ],
);

const OTHER_SUGGESTIONS: &[&str] = &[
    "Review the error message for details",
    "Look up the error code in the Identity Store documentation",
    "Enable debug logging to inspect the failing request",
];

const CONNECTIVITY: Bucket = Bucket::fixed(
    ErrorKind::ConnectivityFailure,
    "Failed to connect to the Identity Store",
    &[
        "Check network connectivity and proxy settings",
        "Verify the configured region and endpoint",
        "Make sure credentials can be loaded from the environment",
    ],
);

/// Classify an Identity Store failure from its raw cause.
///
/// The status code of the result is always 0.
pub fn classify_sdk_error(operation: &str, cause: Option<Cause>) -> StructuredError {
    classify_sdk_failure(operation, SdkFailure::parse(cause))
}

/// Classify an already parsed Identity Store failure.
pub fn classify_sdk_failure(operation: &str, failure: SdkFailure) -> StructuredError {
    let (bucket, cause) = match failure {
        SdkFailure::Coded {
            code,
            message,
            cause,
        } => {
            let bucket = match code {
                SdkErrorCode::AccessDenied | SdkErrorCode::UnauthorizedOperation => ACCESS_DENIED,
                SdkErrorCode::ResourceNotFound | SdkErrorCode::ResourceNotFoundException => {
                    NOT_FOUND
                }
                SdkErrorCode::ConflictException => CONFLICT,
                SdkErrorCode::ThrottlingException => THROTTLED,
                SdkErrorCode::ValidationException => VALIDATION,
                SdkErrorCode::InternalServerException => INTERNAL_SERVER_ERROR,
                SdkErrorCode::ServiceUnavailableException => UNAVAILABLE,
                SdkErrorCode::Other(_) => Bucket::formatted(
                    ErrorKind::Unclassified,
                    format!("Identity Store request failed: {}", message),
                    OTHER_SUGGESTIONS,
                ),
            };
            (bucket, Some(cause))
        }
        SdkFailure::Uncoded(cause) => (CONNECTIVITY, cause),
    };
    bucket.into_error(Service::IdentityStore, operation, 0, cause)
}

//! Classification of Workspace directory API failures.
//!
//! The directory API reports failures as an [`ApiError`] carrying an HTTP-like
//! numeric code and a free-form message. A cause that does not contain one
//! (transport errors, credential loading failures, ...) is treated as a
//! connectivity failure.

use super::{Bucket, StatusFamily, find_in_chain};
use crate::error::{Cause, ErrorKind, Service, StructuredError};

/// Error body returned by the Workspace directory API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("directory API error {code}: {message}")]
pub struct ApiError {
    code: u16,
    message: String,
}

impl ApiError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Code and message recovered from an [`ApiError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorDetails {
    pub code: u16,
    pub message: String,
}

/// A directory API failure after parsing its cause.
#[derive(Debug, Clone)]
pub enum ApiFailure {
    /// The cause chain contains an [`ApiError`].
    Api {
        details: ApiErrorDetails,
        cause: Cause,
    },
    /// No typed error could be recovered.
    Unrecognized(Option<Cause>),
}

impl ApiFailure {
    /// Parse a raw cause into its typed shape.
    pub fn parse(cause: Option<Cause>) -> Self {
        let Some(cause) = cause else {
            return ApiFailure::Unrecognized(None);
        };
        let details = find_in_chain::<ApiError>(&cause).map(|error| ApiErrorDetails {
            code: error.code,
            message: error.message.clone(),
        });
        match details {
            Some(details) => ApiFailure::Api { details, cause },
            None => ApiFailure::Unrecognized(Some(cause)),
        }
    }
}

const UNAUTHORIZED: Bucket = Bucket::fixed(
    ErrorKind::Authentication,
    "Authentication failed - the service account credentials are invalid",
    &[
        "Check that the service account key file is valid and has not been revoked",
        "Verify the service account still exists in its cloud project",
        "Make sure the impersonated administrator email is correct",
    ],
);

const DELEGATION_MISCONFIGURED: Bucket = Bucket::fixed(
    ErrorKind::Authorization,
    "Domain-wide delegation not properly configured",
    &[
        "Enable domain-wide delegation for the service account",
        "Authorize the service account client ID for the directory read-only scopes in the admin console",
        "Verify the impersonated user is a directory administrator",
        "Allow time for delegation changes to propagate before retrying",
    ],
);

const QUOTA_EXCEEDED: Bucket = Bucket::fixed(
    ErrorKind::RateLimited,
    "Directory API quota exceeded",
    &[
        "Wait for the quota window to reset before retrying",
        "Reduce the number of directory queries per sync",
        "Request a higher directory API quota for the project",
    ],
);

const FORBIDDEN: Bucket = Bucket::fixed(
    ErrorKind::Authorization,
    "Access denied to the Workspace directory",
    &[
        "Verify the impersonated user has directory read access",
        "Check that the directory API is enabled for the project",
        "Confirm the OAuth scopes granted to the service account",
    ],
);

const NOT_FOUND: Bucket = Bucket::fixed(
    ErrorKind::NotFound,
    "Workspace directory resource not found",
    &[
        "Check the user, group or customer identifier",
        "Verify the user and group filter queries",
        "Make sure the resource has not been deleted",
    ],
);

const CONFLICT: Bucket = Bucket::fixed(
    ErrorKind::Conflict,
    "Workspace directory resource conflict",
    &[
        "Check whether the resource was modified concurrently",
        "Run the sync again once the conflicting change has settled",
        "Verify that group and user keys are unique",
    ],
);

const TOO_MANY_REQUESTS: Bucket = Bucket::fixed(
    ErrorKind::RateLimited,
    "Rate limit exceeded for the Workspace directory API",
    &[
        "Wait a few minutes before running the sync again",
        "Narrow the user and group filter queries",
        "Schedule syncs less frequently",
    ],
);

const INTERNAL_SERVER_ERROR: Bucket = Bucket::fixed(
    ErrorKind::ServerError,
    "Workspace directory API internal server error",
    &[
        "Retry the operation after a short delay",
        "Check the provider status page for ongoing incidents",
        "Contact the provider's support if the error persists",
    ],
);

const UNAVAILABLE: Bucket = Bucket::fixed(
    ErrorKind::ServiceUnavailable,
    "Workspace directory API is temporarily unavailable",
    &[
        "Retry the operation in a few minutes",
        "Check the provider status page for ongoing incidents",
        "Verify network connectivity to the directory API",
    ],
);

const OTHER_CLIENT_ERROR: Bucket = Bucket::fixed(
    ErrorKind::UnknownClientError,
    "Workspace directory request failed with a client error - check the request parameters",
    &[
        "Check the user and group filter queries",
        "Verify the customer and domain settings",
        "Enable debug logging to inspect the failing request",
    ],
);

const OTHER_SERVER_ERROR: Bucket = Bucket::fixed(
    ErrorKind::UnknownServerError,
    "Workspace directory API returned a server error - retry later",
    &[
        "Retry the operation later",
        "Check the provider status page for ongoing incidents",
        "Contact the provider's support if the error persists",
    ],
);

const UNEXPECTED: Bucket = Bucket::fixed(
    ErrorKind::UnexpectedStatus,
    "Unexpected response from the Workspace directory API",
    &[
        "Enable debug logging to inspect the response",
        "Check for known issues with the directory API",
        "Report the error code if the problem persists",
    ],
);

const CONNECTIVITY: Bucket = Bucket::fixed(
    ErrorKind::ConnectivityFailure,
    "Failed to connect to the Workspace directory API",
    &[
        "Check network connectivity and proxy settings",
        "Verify the service account credentials can be loaded",
        "Enable debug logging to inspect the underlying error",
    ],
);

/// Pick the 403 bucket from the error message.
///
/// The delegation check must run before the quota check: delegation errors
/// can mention rate limits too.
fn forbidden_bucket(message: &str) -> Bucket {
    if message.contains("domain-wide delegation") {
        DELEGATION_MISCONFIGURED
    } else if message.contains("quota") || message.contains("rate") {
        QUOTA_EXCEEDED
    } else {
        FORBIDDEN
    }
}

/// Classify a directory API failure from its raw cause.
pub fn classify_api_error(operation: &str, cause: Option<Cause>) -> StructuredError {
    classify_api_failure(operation, ApiFailure::parse(cause))
}

/// Classify an already parsed directory API failure.
pub fn classify_api_failure(operation: &str, failure: ApiFailure) -> StructuredError {
    match failure {
        ApiFailure::Api { details, cause } => {
            let bucket = match StatusFamily::of(details.code) {
                StatusFamily::Unauthorized => UNAUTHORIZED,
                StatusFamily::Forbidden => forbidden_bucket(&details.message),
                StatusFamily::NotFound => NOT_FOUND,
                StatusFamily::Conflict => CONFLICT,
                StatusFamily::TooManyRequests => TOO_MANY_REQUESTS,
                StatusFamily::InternalServerError => INTERNAL_SERVER_ERROR,
                StatusFamily::Unavailable => UNAVAILABLE,
                StatusFamily::OtherClientError => OTHER_CLIENT_ERROR,
                StatusFamily::OtherServerError => OTHER_SERVER_ERROR,
                StatusFamily::Unexpected => UNEXPECTED,
            };
            bucket.into_error(
                Service::WorkspaceDirectory,
                operation,
                details.code,
                Some(cause),
            )
        }
        ApiFailure::Unrecognized(cause) => {
            CONNECTIVITY.into_error(Service::WorkspaceDirectory, operation, 0, cause)
        }
    }
}

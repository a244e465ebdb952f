//! Classification of SCIM endpoint failures by HTTP status.

use super::{Bucket, StatusFamily};
use crate::error::{Cause, ErrorKind, Service, StructuredError};

const UNAUTHORIZED: Bucket = Bucket::fixed(
    ErrorKind::Authentication,
    "Authentication failed - the SCIM access token is invalid or expired",
    &[
        "Check that the SCIM access token is correct",
        "Generate a new SCIM access token in the identity center console",
        "Verify the token has not expired (SCIM access tokens are valid for one year)",
        "Make sure the SCIM endpoint URL belongs to the same identity center instance as the token",
    ],
);

const FORBIDDEN: Bucket = Bucket::fixed(
    ErrorKind::Authorization,
    "Access denied - the SCIM access token is not permitted to perform this operation",
    &[
        "Verify that automatic provisioning is enabled in the identity center settings",
        "Confirm the SCIM access token was issued for this identity center instance",
        "Check that the user or group is not managed by another provisioning source",
    ],
);

const NOT_FOUND: Bucket = Bucket::fixed(
    ErrorKind::NotFound,
    "SCIM endpoint or resource not found",
    &[
        "Check that the SCIM endpoint URL is correct and ends with the SCIM version path",
        "Verify the user or group still exists in the identity center",
        "Run the sync again to refresh stale resource identifiers",
    ],
);

const CONFLICT: Bucket = Bucket::fixed(
    ErrorKind::Conflict,
    "Resource conflict - the user or group already exists",
    &[
        "Check for an existing user or group with the same name",
        "Remove the duplicate manually or let the next sync reconcile it",
        "Verify that user names and group names are unique across sources",
    ],
);

const TOO_MANY_REQUESTS: Bucket = Bucket::fixed(
    ErrorKind::RateLimited,
    "Rate limit exceeded - too many requests to the SCIM endpoint",
    &[
        "Wait a few minutes before running the sync again",
        "Reduce the number of users or groups synced per run",
        "Schedule syncs less frequently",
    ],
);

const INTERNAL_SERVER_ERROR: Bucket = Bucket::fixed(
    ErrorKind::ServerError,
    "SCIM service encountered an internal server error",
    &[
        "Retry the operation after a short delay",
        "Check the provider status page for ongoing incidents",
        "Contact the provider's support if the error persists",
    ],
);

const UNAVAILABLE: Bucket = Bucket::fixed(
    ErrorKind::ServiceUnavailable,
    "SCIM service is temporarily unavailable",
    &[
        "Retry the operation in a few minutes",
        "Check the provider status page for ongoing incidents",
        "Verify network connectivity to the SCIM endpoint",
    ],
);

const OTHER_CLIENT_ERROR: Bucket = Bucket::fixed(
    ErrorKind::UnknownClientError,
    "SCIM request failed with a client error - check the request parameters",
    &[
        "Check the request parameters and payload",
        "Verify the user and group attributes are valid for SCIM",
        "Enable debug logging to inspect the failing request",
    ],
);

const OTHER_SERVER_ERROR: Bucket = Bucket::fixed(
    ErrorKind::UnknownServerError,
    "SCIM service returned a server error - retry later",
    &[
        "Retry the operation later",
        "Check the provider status page for ongoing incidents",
        "Contact the provider's support if the error persists",
    ],
);

const UNEXPECTED: Bucket = Bucket::fixed(
    ErrorKind::UnexpectedStatus,
    "Unexpected response status from the SCIM endpoint",
    &[
        "Check that the SCIM endpoint URL is correct",
        "Enable debug logging to inspect the response",
        "Report the status code if the problem persists",
    ],
);

/// Classify a failed SCIM call by its HTTP status.
///
/// Statuses below 400 are only reached by misuse and land in the
/// unexpected-status bucket.
pub fn classify_http_status(
    operation: &str,
    status_code: u16,
    cause: Option<Cause>,
) -> StructuredError {
    let bucket = match StatusFamily::of(status_code) {
        StatusFamily::Unauthorized => UNAUTHORIZED,
        StatusFamily::Forbidden => FORBIDDEN,
        StatusFamily::NotFound => NOT_FOUND,
        StatusFamily::Conflict => CONFLICT,
        StatusFamily::TooManyRequests => TOO_MANY_REQUESTS,
        StatusFamily::InternalServerError => INTERNAL_SERVER_ERROR,
        StatusFamily::Unavailable => UNAVAILABLE,
        StatusFamily::OtherClientError => OTHER_CLIENT_ERROR,
        StatusFamily::OtherServerError => OTHER_SERVER_ERROR,
        StatusFamily::Unexpected => UNEXPECTED,
    };
    bucket.into_error(Service::Scim, operation, status_code, cause)
}

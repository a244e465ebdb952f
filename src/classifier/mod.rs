//! Failure classification for the three upstream error shapes.
//!
//! Each upstream reports failures differently:
//!
//! - the SCIM endpoint answers with an HTTP status ([`classify_http_status`]),
//! - the Workspace directory API returns a typed [`ApiError`] with a numeric
//!   code and a message ([`classify_api_error`]),
//! - the Identity Store SDK returns an [`SdkError`] carrying a string code
//!   ([`classify_sdk_error`]).
//!
//! All three entry points are pure and total: any input, including an absent
//! cause, yields a populated [`StructuredError`](crate::error::StructuredError)
//! whose message and suggestion list come from a fixed table. The tables are a
//! display contract; other layers match on the exact texts.

pub mod api;
pub mod http;
pub mod sdk;

pub use api::{ApiError, ApiErrorDetails, ApiFailure, classify_api_error, classify_api_failure};
pub use http::classify_http_status;
pub use sdk::{SdkError, SdkErrorCode, SdkFailure, classify_sdk_error, classify_sdk_failure};

use crate::error::{Cause, ErrorKind, Service, StructuredError};
use std::borrow::Cow;

/// One row of a classification table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Bucket {
    kind: ErrorKind,
    message: Cow<'static, str>,
    suggestions: &'static [&'static str],
}

impl Bucket {
    pub(crate) const fn fixed(
        kind: ErrorKind,
        message: &'static str,
        suggestions: &'static [&'static str],
    ) -> Self {
        Self {
            kind,
            message: Cow::Borrowed(message),
            suggestions,
        }
    }

    pub(crate) fn formatted(
        kind: ErrorKind,
        message: String,
        suggestions: &'static [&'static str],
    ) -> Self {
        Self {
            kind,
            message: Cow::Owned(message),
            suggestions,
        }
    }

    pub(crate) fn into_error(
        self,
        service: Service,
        operation: &str,
        status_code: u16,
        cause: Option<Cause>,
    ) -> StructuredError {
        StructuredError::new(
            service,
            operation,
            status_code,
            self.kind,
            self.message,
            self.suggestions.iter().map(|s| s.to_string()).collect(),
            cause,
        )
    }
}

/// HTTP status families shared by the SCIM and Workspace tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusFamily {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    TooManyRequests,
    InternalServerError,
    Unavailable,
    OtherClientError,
    OtherServerError,
    Unexpected,
}

impl StatusFamily {
    pub(crate) fn of(status: u16) -> Self {
        match status {
            401 => StatusFamily::Unauthorized,
            403 => StatusFamily::Forbidden,
            404 => StatusFamily::NotFound,
            409 => StatusFamily::Conflict,
            429 => StatusFamily::TooManyRequests,
            500 => StatusFamily::InternalServerError,
            502..=504 => StatusFamily::Unavailable,
            400..=499 => StatusFamily::OtherClientError,
            500..=u16::MAX => StatusFamily::OtherServerError,
            _ => StatusFamily::Unexpected,
        }
    }
}

/// Find the first error of type `T` in the cause chain.
pub(crate) fn find_in_chain<T>(cause: &Cause) -> Option<&T>
where
    T: std::error::Error + 'static,
{
    let root: &(dyn std::error::Error + 'static) = &**cause;
    let mut current = Some(root);
    while let Some(error) = current {
        if let Some(found) = error.downcast_ref::<T>() {
            return Some(found);
        }
        current = error.source();
    }
    None
}

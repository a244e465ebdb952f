//! Classification tables exercised through the public entry points.

use directory_sync::classifier::{
    ApiError, SdkError, classify_api_error, classify_http_status, classify_sdk_error,
};
use directory_sync::{Cause, ErrorKind, Service};
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
#[error("dispatch failure")]
struct DispatchFailure {
    #[source]
    source: SdkError,
}

#[derive(Debug, thiserror::Error)]
#[error("request failed")]
struct RequestFailure {
    #[source]
    source: ApiError,
}

#[derive(Debug, thiserror::Error)]
#[error("connection reset by peer")]
struct TransportFailure;

fn sdk(code: &str, message: &str) -> Option<Cause> {
    Some(Arc::new(SdkError::new(code, message)))
}

fn api(code: u16, message: &str) -> Option<Cause> {
    Some(Arc::new(ApiError::new(code, message)))
}

#[test]
fn test_scim_unauthorized_scenario() {
    let error = classify_http_status("CreateUser", 401, None);

    assert_eq!(error.service(), Service::Scim);
    assert_eq!(error.operation(), "CreateUser");
    assert_eq!(error.status_code(), 401);
    assert_eq!(error.kind(), ErrorKind::Authentication);
    assert_eq!(
        error.user_message(),
        "Authentication failed - the SCIM access token is invalid or expired"
    );
    assert_eq!(error.suggestions().len(), 4);
    assert_eq!(
        error.suggestions()[0],
        "Check that the SCIM access token is correct"
    );
    assert!(error.original_cause().is_none());
}

#[test]
fn test_scim_known_statuses() {
    let cases = [
        (403, ErrorKind::Authorization),
        (404, ErrorKind::NotFound),
        (409, ErrorKind::Conflict),
        (429, ErrorKind::RateLimited),
        (500, ErrorKind::ServerError),
        (502, ErrorKind::ServiceUnavailable),
        (503, ErrorKind::ServiceUnavailable),
        (504, ErrorKind::ServiceUnavailable),
    ];
    for (status, kind) in cases {
        let error = classify_http_status("PatchGroup", status, None);
        assert_eq!(error.kind(), kind, "status {}", status);
        assert_eq!(error.status_code(), status);
        assert!(!error.suggestions().is_empty());
    }
}

#[test]
fn test_scim_status_below_client_range() {
    let error = classify_http_status("CreateUser", 200, None);
    assert_eq!(error.kind(), ErrorKind::UnexpectedStatus);
    assert_eq!(error.status_code(), 200);
}

#[test]
fn test_workspace_delegation_scenario() {
    let error = classify_api_error("GetUsers", api(403, "domain-wide delegation not enabled"));

    assert_eq!(error.service(), Service::WorkspaceDirectory);
    assert_eq!(error.status_code(), 403);
    assert_eq!(
        error.user_message(),
        "Domain-wide delegation not properly configured"
    );
    assert_eq!(error.suggestions().len(), 4);
}

#[test]
fn test_workspace_forbidden_match_is_case_sensitive() {
    let error = classify_api_error("GetUsers", api(403, "Domain-Wide Delegation missing"));
    assert_eq!(error.user_message(), "Access denied to the Workspace directory");

    let error = classify_api_error("GetUsers", api(403, "Quota Exceeded"));
    assert_eq!(error.user_message(), "Access denied to the Workspace directory");
}

#[test]
fn test_workspace_error_found_behind_wrapper() {
    let cause: Cause = Arc::new(RequestFailure {
        source: ApiError::new(404, "Resource Not Found: groupKey"),
    });
    let error = classify_api_error("GetGroupMembers", Some(cause));
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(error.status_code(), 404);
}

#[test]
fn test_workspace_without_typed_error_is_connectivity() {
    let error = classify_api_error("GetGroups", None);
    assert_eq!(error.kind(), ErrorKind::ConnectivityFailure);
    assert_eq!(error.status_code(), 0);
    assert_eq!(
        error.user_message(),
        "Failed to connect to the Workspace directory API"
    );

    let cause: Cause = Arc::new(TransportFailure);
    let error = classify_api_error("GetGroups", Some(cause));
    assert_eq!(error.kind(), ErrorKind::ConnectivityFailure);
    assert!(error.original_cause().is_some());
}

#[test]
fn test_identity_store_throttling_scenario() {
    let error = classify_sdk_error("ListUsers", sdk("ThrottlingException", "Rate exceeded"));

    assert_eq!(error.service(), Service::IdentityStore);
    assert_eq!(error.status_code(), 0);
    assert_eq!(error.kind(), ErrorKind::RateLimited);
}

#[test]
fn test_identity_store_code_aliases() {
    for (code, kind) in [
        ("AccessDenied", ErrorKind::Authorization),
        ("UnauthorizedOperation", ErrorKind::Authorization),
        ("ResourceNotFound", ErrorKind::NotFound),
        ("ResourceNotFoundException", ErrorKind::NotFound),
        ("ConflictException", ErrorKind::Conflict),
        ("ValidationException", ErrorKind::ValidationFailure),
        ("InternalServerException", ErrorKind::ServerError),
        ("ServiceUnavailableException", ErrorKind::ServiceUnavailable),
    ] {
        let error = classify_sdk_error("DeleteUser", sdk(code, "failed"));
        assert_eq!(error.kind(), kind, "code {}", code);
        assert_eq!(error.status_code(), 0);
    }
}

#[test]
fn test_identity_store_unknown_code_keeps_message() {
    let error = classify_sdk_error("CreateGroup", sdk("ServiceQuotaExceededException", "too many groups"));
    assert_eq!(error.kind(), ErrorKind::Unclassified);
    assert_eq!(
        error.user_message(),
        "Identity Store request failed: too many groups"
    );
}

#[test]
fn test_identity_store_error_found_behind_wrapper() {
    let cause: Cause = Arc::new(DispatchFailure {
        source: SdkError::new("ConflictException", "already exists"),
    });
    let error = classify_sdk_error("CreateGroup", Some(cause));
    assert_eq!(error.kind(), ErrorKind::Conflict);
}

#[test]
fn test_identity_store_without_code_is_connectivity() {
    let error = classify_sdk_error("ListGroups", None);
    assert_eq!(error.kind(), ErrorKind::ConnectivityFailure);
    assert_eq!(error.user_message(), "Failed to connect to the Identity Store");
}

#[test]
fn test_cause_is_preserved_by_identity() {
    let cause: Cause = Arc::new(SdkError::new("AccessDenied", "nope"));
    let error = classify_sdk_error("ListGroups", Some(Arc::clone(&cause)));
    let kept = error.original_cause().expect("cause is kept");
    assert!(Arc::ptr_eq(kept, &cause));

    let cause: Cause = Arc::new(TransportFailure);
    let error = classify_http_status("CreateUser", 502, Some(Arc::clone(&cause)));
    assert!(Arc::ptr_eq(error.original_cause().unwrap(), &cause));
}

#[test]
fn test_classification_is_repeatable() {
    let first = classify_http_status("CreateGroup", 409, None);
    let second = classify_http_status("CreateGroup", 409, None);
    assert_eq!(first.report(), second.report());
}

#[test]
fn test_report_serializes_for_machine_output() {
    let error = classify_sdk_error("ListUsers", sdk("ThrottlingException", "Rate exceeded"));
    let json = serde_json::to_value(error.report()).unwrap();
    assert_eq!(json["operation"], "ListUsers");
    assert_eq!(json["status_code"], 0);
    assert_eq!(json["cause"], "ThrottlingException: Rate exceeded");
    assert!(json["suggestions"].as_array().unwrap().len() >= 3);
}

fn is_named_client_status(status: u16) -> bool {
    matches!(status, 401 | 403 | 404 | 409 | 429)
}

fn is_named_server_status(status: u16) -> bool {
    matches!(status, 500 | 502 | 503 | 504)
}

proptest! {
    #[test]
    fn prop_unlisted_client_statuses_share_a_message(
        status in (400u16..500).prop_filter("named status", |s| !is_named_client_status(*s))
    ) {
        let error = classify_http_status("CreateUser", status, None);
        prop_assert_eq!(error.kind(), ErrorKind::UnknownClientError);
        prop_assert_eq!(
            error.user_message(),
            "SCIM request failed with a client error - check the request parameters"
        );
        prop_assert_eq!(error.status_code(), status);
    }

    #[test]
    fn prop_unlisted_server_statuses_share_a_message(
        status in (500u16..600).prop_filter("named status", |s| !is_named_server_status(*s))
    ) {
        let error = classify_http_status("CreateUser", status, None);
        prop_assert_eq!(error.kind(), ErrorKind::UnknownServerError);
        prop_assert_eq!(
            error.user_message(),
            "SCIM service returned a server error - retry later"
        );
    }

    #[test]
    fn prop_every_status_is_classified(status in any::<u16>(), op in "[A-Za-z]{1,16}") {
        let error = classify_http_status(&op, status, None);
        prop_assert_eq!(error.operation(), op.as_str());
        prop_assert!(!error.user_message().is_empty());
        prop_assert!(!error.suggestions().is_empty());
    }

    #[test]
    fn prop_every_api_code_is_classified(code in any::<u16>(), message in ".{0,40}") {
        let error = classify_api_error("GetUsers", api(code, &message));
        prop_assert_eq!(error.status_code(), code);
        prop_assert!(!error.user_message().is_empty());
        prop_assert!(!error.suggestions().is_empty());
    }

    #[test]
    fn prop_every_sdk_code_is_classified(code in "[A-Za-z]{0,32}", message in ".{0,40}") {
        let error = classify_sdk_error("ListUsers", sdk(&code, &message));
        prop_assert_eq!(error.status_code(), 0);
        prop_assert!(!error.user_message().is_empty());
        prop_assert!(!error.suggestions().is_empty());
    }
}

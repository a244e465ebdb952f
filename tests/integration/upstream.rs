//! Workspace source and SCIM provisioner over fake upstream clients.

use crate::common::{capture, quiet_policy, verbose_policy};
use directory_sync::classifier::ApiError;
use directory_sync::scim::{
    HttpFailure, MemberPatch, ScimClient, ScimGroup, ScimProvisioner, ScimUser,
};
use directory_sync::workspace::{
    WorkspaceClient, WorkspaceGroup, WorkspaceMember, WorkspaceMemberType, WorkspaceSource,
    WorkspaceUser,
};
use directory_sync::{Cause, ErrorKind, Service};
use log::Level;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct FakeWorkspace {
    users: Vec<WorkspaceUser>,
    failure: Option<ApiError>,
}

impl FakeWorkspace {
    fn answer<T: Clone>(&self, items: &[T]) -> Result<Vec<T>, ApiError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(items.to_vec()),
        }
    }
}

impl WorkspaceClient for FakeWorkspace {
    type Error = ApiError;

    async fn users(&self, _query: &str) -> Result<Vec<WorkspaceUser>, ApiError> {
        self.answer(&self.users)
    }

    async fn groups(&self, _query: &str) -> Result<Vec<WorkspaceGroup>, ApiError> {
        self.answer(&[WorkspaceGroup {
            id: "wg-1".to_string(),
            email: "admins@example.com".to_string(),
            name: "admins".to_string(),
        }])
    }

    async fn group_members(&self, _group_key: &str) -> Result<Vec<WorkspaceMember>, ApiError> {
        self.answer(&[WorkspaceMember {
            id: "wu-1".to_string(),
            email: "ann@example.com".to_string(),
            member_type: WorkspaceMemberType::User,
        }])
    }
}

fn workspace_user(id: &str, suspended: bool) -> WorkspaceUser {
    WorkspaceUser {
        id: id.to_string(),
        primary_email: format!("{}@example.com", id),
        full_name: None,
        suspended,
    }
}

#[derive(Debug, Default)]
struct FakeScim {
    status: Option<u16>,
    calls: AtomicUsize,
}

#[derive(Debug, thiserror::Error)]
#[error("upstream said no")]
struct ResponseBody;

impl FakeScim {
    fn failing(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    fn call(&self) -> Result<(), HttpFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.status {
            Some(status) => Err(HttpFailure::new(status, Some(Arc::new(ResponseBody)))),
            None => Ok(()),
        }
    }
}

impl ScimClient for FakeScim {
    async fn create_user(&self, user: &ScimUser) -> Result<ScimUser, HttpFailure> {
        self.call()?;
        Ok(ScimUser {
            id: Some("su-1".to_string()),
            ..user.clone()
        })
    }

    async fn delete_user(&self, _id: &str) -> Result<(), HttpFailure> {
        self.call()
    }

    async fn create_group(&self, group: &ScimGroup) -> Result<ScimGroup, HttpFailure> {
        self.call()?;
        Ok(ScimGroup {
            id: Some("sg-1".to_string()),
            ..group.clone()
        })
    }

    async fn delete_group(&self, _id: &str) -> Result<(), HttpFailure> {
        self.call()
    }

    async fn patch_group_members(
        &self,
        _group_id: &str,
        _patch: &MemberPatch,
    ) -> Result<(), HttpFailure> {
        self.call()
    }
}

fn scim_user() -> ScimUser {
    ScimUser {
        id: None,
        user_name: "ann@example.com".to_string(),
        display_name: Some("Ann".to_string()),
        email: Some("ann@example.com".to_string()),
        active: true,
    }
}

#[tokio::test]
async fn test_workspace_reads_succeed() {
    let source = WorkspaceSource::with_policy(
        FakeWorkspace {
            users: vec![workspace_user("a", false), workspace_user("b", true)],
            failure: None,
        },
        quiet_policy(),
    );

    assert_eq!(source.get_users("").await.unwrap().len(), 2);
    assert_eq!(source.get_active_users("").await.unwrap().len(), 1);
    assert_eq!(source.get_groups("email:admins*").await.unwrap()[0].name, "admins");
    assert_eq!(
        source.get_group_members("wg-1").await.unwrap()[0].member_type,
        WorkspaceMemberType::User
    );
}

#[tokio::test]
async fn test_workspace_failures_are_classified_per_operation() {
    let source = WorkspaceSource::with_policy(
        FakeWorkspace {
            users: Vec::new(),
            failure: Some(ApiError::new(403, "domain-wide delegation not enabled")),
        },
        quiet_policy(),
    );

    for (operation, error) in [
        ("GetUsers", source.get_users("").await.unwrap_err()),
        ("GetGroups", source.get_groups("").await.unwrap_err()),
        ("GetGroupMembers", source.get_group_members("wg-1").await.unwrap_err()),
    ] {
        let structured = error.structured().unwrap();
        assert_eq!(structured.service(), Service::WorkspaceDirectory);
        assert_eq!(structured.operation(), operation);
        assert_eq!(
            structured.user_message(),
            "Domain-wide delegation not properly configured"
        );
    }
}

#[tokio::test]
async fn test_scim_calls_return_client_response() {
    let provisioner = ScimProvisioner::with_policy(FakeScim::default(), quiet_policy());

    let user = provisioner.create_user(&scim_user()).await.unwrap();
    assert_eq!(user.id.as_deref(), Some("su-1"));

    let group = provisioner
        .create_group(&ScimGroup {
            id: None,
            display_name: "admins".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(group.id.as_deref(), Some("sg-1"));

    provisioner
        .patch_group_members("sg-1", &MemberPatch::Add(vec!["su-1".to_string()]))
        .await
        .unwrap();
    provisioner.delete_group("sg-1").await.unwrap();
    provisioner.delete_user("su-1").await.unwrap();

    assert_eq!(provisioner.client().calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_empty_patch_is_not_sent() {
    let provisioner = ScimProvisioner::with_policy(FakeScim::default(), quiet_policy());

    provisioner
        .patch_group_members("sg-1", &MemberPatch::Remove(Vec::new()))
        .await
        .unwrap();

    assert_eq!(provisioner.client().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scim_failure_is_classified_and_logged() {
    capture::start();
    let provisioner = ScimProvisioner::with_policy(FakeScim::failing(401), verbose_policy());

    let error = provisioner.create_user(&scim_user()).await.unwrap_err();

    let structured = error.structured().unwrap();
    assert_eq!(structured.service(), Service::Scim);
    assert_eq!(structured.operation(), "CreateUser");
    assert_eq!(structured.status_code(), 401);
    assert_eq!(structured.kind(), ErrorKind::Authentication);
    assert_eq!(
        structured.original_cause().map(|cause| cause.to_string()),
        Some("upstream said no".to_string())
    );

    let lines = capture::take();
    let errors: Vec<_> = lines.iter().filter(|l| l.level == Level::Error).collect();
    let infos: Vec<_> = lines.iter().filter(|l| l.level == Level::Info).collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].text.contains("status=401"));
    assert_eq!(infos.len(), structured.suggestions().len());
}

#[tokio::test]
async fn test_scim_patch_failure_names_patch_operation() {
    let provisioner = ScimProvisioner::with_policy(FakeScim::failing(429), quiet_policy());

    let error = provisioner
        .patch_group_members("sg-1", &MemberPatch::Add(vec!["su-1".to_string()]))
        .await
        .unwrap_err();

    assert_eq!(error.structured().unwrap().operation(), "PatchGroup");
    assert_eq!(error.kind(), ErrorKind::RateLimited);
}

#[test]
fn test_http_failure_exposes_cause_as_source() {
    let cause: Cause = Arc::new(ResponseBody);
    let failure = HttpFailure::new(500, Some(cause));

    assert_eq!(failure.status_code(), 500);
    assert_eq!(failure.to_string(), "HTTP 500: upstream said no");
    let source = std::error::Error::source(&failure).unwrap();
    assert!(source.downcast_ref::<ResponseBody>().is_some());
    assert_eq!(HttpFailure::status(404).to_string(), "HTTP 404");
}

//! SCIM provisioning endpoint.
//!
//! [`ScimProvisioner`] pushes users and groups to a SCIM endpoint. A failed
//! call is reported by the client as an [`HttpFailure`] (status plus optional
//! underlying error) and classified by status with
//! [`LoggingPolicy::handle_http_error`].

use crate::error::{Cause, DirectoryResult, StructuredError};
use crate::logging::LoggingPolicy;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Failed SCIM call.
#[derive(Debug, Clone)]
pub struct HttpFailure {
    status: u16,
    cause: Option<Cause>,
}

impl HttpFailure {
    pub fn new(status: u16, cause: Option<Cause>) -> Self {
        Self { status, cause }
    }

    /// Failure with a status and no further detail.
    pub fn status(status: u16) -> Self {
        Self::new(status, None)
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "HTTP {}: {}", self.status, cause),
            None => write!(f, "HTTP {}", self.status),
        }
    }
}

impl std::error::Error for HttpFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub display_name: String,
}

/// Membership change applied with a single PATCH.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberPatch {
    Add(Vec<String>),
    Remove(Vec<String>),
}

impl MemberPatch {
    pub fn user_ids(&self) -> &[String] {
        match self {
            MemberPatch::Add(ids) | MemberPatch::Remove(ids) => ids,
        }
    }
}

/// SCIM endpoint surface used by [`ScimProvisioner`].
pub trait ScimClient: Send + Sync {
    fn create_user(
        &self,
        user: &ScimUser,
    ) -> impl Future<Output = Result<ScimUser, HttpFailure>> + Send;

    fn delete_user(&self, id: &str) -> impl Future<Output = Result<(), HttpFailure>> + Send;

    fn create_group(
        &self,
        group: &ScimGroup,
    ) -> impl Future<Output = Result<ScimGroup, HttpFailure>> + Send;

    fn delete_group(&self, id: &str) -> impl Future<Output = Result<(), HttpFailure>> + Send;

    fn patch_group_members(
        &self,
        group_id: &str,
        patch: &MemberPatch,
    ) -> impl Future<Output = Result<(), HttpFailure>> + Send;
}

/// Classified write access to a SCIM endpoint.
#[derive(Debug)]
pub struct ScimProvisioner<C> {
    client: C,
    policy: Arc<LoggingPolicy>,
}

impl<C: ScimClient> ScimProvisioner<C> {
    pub fn new(client: C) -> Self {
        Self::with_policy(client, LoggingPolicy::shared())
    }

    pub fn with_policy(client: C, policy: Arc<LoggingPolicy>) -> Self {
        Self { client, policy }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn remote_failure(&self, operation: &str, failure: HttpFailure) -> StructuredError {
        self.policy
            .handle_http_error(operation, failure.status, failure.cause)
    }

    pub async fn create_user(&self, user: &ScimUser) -> DirectoryResult<ScimUser> {
        debug!("CreateUser: {}", user.user_name);
        self.client
            .create_user(user)
            .await
            .map_err(|failure| self.remote_failure("CreateUser", failure).into())
    }

    pub async fn delete_user(&self, id: &str) -> DirectoryResult<()> {
        debug!("DeleteUser: {}", id);
        self.client
            .delete_user(id)
            .await
            .map_err(|failure| self.remote_failure("DeleteUser", failure).into())
    }

    pub async fn create_group(&self, group: &ScimGroup) -> DirectoryResult<ScimGroup> {
        debug!("CreateGroup: {}", group.display_name);
        self.client
            .create_group(group)
            .await
            .map_err(|failure| self.remote_failure("CreateGroup", failure).into())
    }

    pub async fn delete_group(&self, id: &str) -> DirectoryResult<()> {
        debug!("DeleteGroup: {}", id);
        self.client
            .delete_group(id)
            .await
            .map_err(|failure| self.remote_failure("DeleteGroup", failure).into())
    }

    /// Apply a membership change; an empty patch is a no-op and is not sent.
    pub async fn patch_group_members(
        &self,
        group_id: &str,
        patch: &MemberPatch,
    ) -> DirectoryResult<()> {
        if patch.user_ids().is_empty() {
            return Ok(());
        }
        debug!(
            "PatchGroup: {} member change(s) for {}",
            patch.user_ids().len(),
            group_id
        );
        self.client
            .patch_group_members(group_id, patch)
            .await
            .map_err(|failure| self.remote_failure("PatchGroup", failure).into())
    }
}

//! Workspace directory source.
//!
//! [`WorkspaceSource`] reads users, groups and group members from the upstream
//! Workspace directory. Failures are classified with
//! [`LoggingPolicy::handle_api_error`], which recognizes the API's typed
//! [`ApiError`](crate::classifier::ApiError) anywhere in the cause chain.

use crate::error::{Cause, DirectoryResult, StructuredError};
use crate::logging::LoggingPolicy;
use log::debug;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceUser {
    pub id: String,
    pub primary_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub suspended: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceGroup {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Kind of principal in a Workspace group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceMemberType {
    User,
    Group,
    Customer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMember {
    pub id: String,
    pub email: String,
    pub member_type: WorkspaceMemberType,
}

/// Workspace directory API surface used by [`WorkspaceSource`].
///
/// Implementations drain the API's own pagination and return complete
/// result sets.
pub trait WorkspaceClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Users matching `query` (empty query: all users).
    fn users(&self, query: &str)
    -> impl Future<Output = Result<Vec<WorkspaceUser>, Self::Error>> + Send;

    /// Groups matching `query` (empty query: all groups).
    fn groups(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<WorkspaceGroup>, Self::Error>> + Send;

    /// Direct members of the group identified by `group_key`.
    fn group_members(
        &self,
        group_key: &str,
    ) -> impl Future<Output = Result<Vec<WorkspaceMember>, Self::Error>> + Send;
}

/// Classified read access to the Workspace directory.
#[derive(Debug)]
pub struct WorkspaceSource<C> {
    client: C,
    policy: Arc<LoggingPolicy>,
}

impl<C: WorkspaceClient> WorkspaceSource<C> {
    pub fn new(client: C) -> Self {
        Self::with_policy(client, LoggingPolicy::shared())
    }

    pub fn with_policy(client: C, policy: Arc<LoggingPolicy>) -> Self {
        Self { client, policy }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn remote_failure(&self, operation: &str, error: C::Error) -> StructuredError {
        let cause: Cause = Arc::new(error);
        self.policy.handle_api_error(operation, Some(cause))
    }

    pub async fn get_users(&self, query: &str) -> DirectoryResult<Vec<WorkspaceUser>> {
        let users = self
            .client
            .users(query)
            .await
            .map_err(|error| self.remote_failure("GetUsers", error))?;
        debug!("GetUsers: {} user(s) for query '{}'", users.len(), query);
        Ok(users)
    }

    /// Users matching `query`, without suspended accounts.
    pub async fn get_active_users(&self, query: &str) -> DirectoryResult<Vec<WorkspaceUser>> {
        let mut users = self.get_users(query).await?;
        users.retain(|user| !user.suspended);
        Ok(users)
    }

    pub async fn get_groups(&self, query: &str) -> DirectoryResult<Vec<WorkspaceGroup>> {
        let groups = self
            .client
            .groups(query)
            .await
            .map_err(|error| self.remote_failure("GetGroups", error))?;
        debug!("GetGroups: {} group(s) for query '{}'", groups.len(), query);
        Ok(groups)
    }

    pub async fn get_group_members(&self, group_key: &str) -> DirectoryResult<Vec<WorkspaceMember>> {
        let members = self
            .client
            .group_members(group_key)
            .await
            .map_err(|error| self.remote_failure("GetGroupMembers", error))?;
        debug!("GetGroupMembers: {} member(s) in {}", members.len(), group_key);
        Ok(members)
    }
}

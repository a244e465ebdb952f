//! Directory adapter over an Identity Store client.
//!
//! Every remote failure is classified with
//! [`LoggingPolicy::handle_sdk_error`] before it is returned, so callers always
//! receive a [`DirectoryError::Remote`](crate::error::DirectoryError::Remote)
//! with a user-facing message and suggestions. Requests that fail local
//! validation are rejected with a contract violation before any call is made.
//! The adapter performs no retries.

use super::client::{IdentityStoreClient, Paginator};
use super::model::{
    CreateGroupMembershipOutput, CreateGroupMembershipRequest, CreateGroupOutput,
    CreateGroupRequest, DeleteGroupMembershipRequest, DeleteGroupRequest, DeleteUserRequest,
    Group, GroupMembership, IsMemberInGroupsRequest, User,
};
use super::{DirectoryReader, DirectoryWriter, MemberId};
use crate::error::{Cause, DirectoryResult, StructuredError};
use crate::logging::LoggingPolicy;
use log::{debug, warn};
use std::sync::Arc;

/// Identity Store adapter implementing both directory capabilities.
#[derive(Debug)]
pub struct DirectoryAdapter<C> {
    client: C,
    identity_store_id: String,
    policy: Arc<LoggingPolicy>,
}

impl<C: IdentityStoreClient> DirectoryAdapter<C> {
    /// Create an adapter reporting through the process-wide logging policy.
    pub fn new(client: C, identity_store_id: impl Into<String>) -> Self {
        Self::with_policy(client, identity_store_id, LoggingPolicy::shared())
    }

    /// Create an adapter reporting through `policy`.
    pub fn with_policy(
        client: C,
        identity_store_id: impl Into<String>,
        policy: Arc<LoggingPolicy>,
    ) -> Self {
        Self {
            client,
            identity_store_id: identity_store_id.into(),
            policy,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn policy(&self) -> &Arc<LoggingPolicy> {
        &self.policy
    }

    fn remote_failure<E>(&self, operation: &str, error: E) -> StructuredError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let cause: Cause = Arc::new(error);
        self.policy.handle_sdk_error(operation, Some(cause))
    }

    /// Drain `paginator`, converting each record with `convert`.
    ///
    /// Records for which `convert` returns `None` are dropped. Pages are
    /// fetched strictly in order; if any page fails, the classified error is
    /// returned and everything collected so far is discarded.
    pub async fn list_paged<P, T, F>(
        &self,
        operation: &str,
        mut paginator: P,
        mut convert: F,
    ) -> DirectoryResult<Vec<T>>
    where
        P: Paginator,
        F: FnMut(P::Item) -> Option<T> + Send,
        T: Send,
    {
        let mut records = Vec::new();
        let mut skipped = 0usize;
        let mut pages = 0usize;

        while paginator.has_more_pages() {
            let page = paginator
                .next_page()
                .await
                .map_err(|error| self.remote_failure(operation, error))?;
            pages += 1;

            for item in page.into_items() {
                match convert(item) {
                    Some(record) => records.push(record),
                    None => skipped += 1,
                }
            }
        }

        if skipped > 0 {
            warn!(
                "{}: skipped {} record(s) that could not be converted",
                operation, skipped
            );
        }
        debug!(
            "{}: collected {} record(s) from {} page(s)",
            operation,
            records.len(),
            pages
        );
        Ok(records)
    }

    /// The user id wrapped by `member_id`.
    ///
    /// Unrecognized variants fail with a contract violation, never with a
    /// remote failure. The rejection is reported through the policy.
    pub fn resolve_member_id<'a>(&self, member_id: &'a MemberId) -> DirectoryResult<&'a str> {
        member_id
            .resolve()
            .inspect_err(|e| self.policy.report_contract_violation("ResolveMemberId", e))
    }

    fn reject_invalid(
        &self,
        operation: &str,
        checked: DirectoryResult<()>,
    ) -> DirectoryResult<()> {
        checked.inspect_err(|e| self.policy.report_contract_violation(operation, e))
    }
}

impl<C: IdentityStoreClient> DirectoryReader for DirectoryAdapter<C> {
    fn identity_store_id(&self) -> &str {
        &self.identity_store_id
    }

    async fn check_membership(&self, group_ids: &[String], user_id: &str) -> DirectoryResult<bool> {
        if group_ids.is_empty() {
            return Ok(false);
        }

        let member_id = MemberId::user(user_id);
        self.resolve_member_id(&member_id)?;

        let request = IsMemberInGroupsRequest {
            identity_store_id: self.identity_store_id.clone(),
            member_id,
            group_ids: group_ids.to_vec(),
        };
        let output = self
            .client
            .is_member_in_groups(request)
            .await
            .map_err(|error| self.remote_failure("IsMemberInGroups", error))?;

        Ok(output.results.iter().any(|result| result.membership_exists))
    }

    async fn list_groups(&self) -> DirectoryResult<Vec<Group>> {
        let pages = self.client.list_groups(&self.identity_store_id);
        self.list_paged("ListGroups", pages, Group::from_raw).await
    }

    async fn list_users(&self) -> DirectoryResult<Vec<User>> {
        let pages = self.client.list_users(&self.identity_store_id);
        self.list_paged("ListUsers", pages, User::from_raw).await
    }

    async fn list_group_memberships(&self, group_id: &str) -> DirectoryResult<Vec<GroupMembership>> {
        let pages = self
            .client
            .list_group_memberships(&self.identity_store_id, group_id);
        self.list_paged("ListGroupMemberships", pages, |raw| {
            GroupMembership::from_raw(raw, group_id)
        })
        .await
    }
}

impl<C: IdentityStoreClient> DirectoryWriter for DirectoryAdapter<C> {
    async fn create_group(&self, request: CreateGroupRequest) -> DirectoryResult<CreateGroupOutput> {
        self.reject_invalid("CreateGroup", request.validate())?;
        debug!("CreateGroup: {}", request.display_name);
        self.client
            .create_group(request)
            .await
            .map_err(|error| self.remote_failure("CreateGroup", error).into())
    }

    async fn delete_group(&self, request: DeleteGroupRequest) -> DirectoryResult<()> {
        self.reject_invalid("DeleteGroup", request.validate())?;
        debug!("DeleteGroup: {}", request.group_id);
        self.client
            .delete_group(request)
            .await
            .map_err(|error| self.remote_failure("DeleteGroup", error).into())
    }

    async fn create_group_membership(
        &self,
        request: CreateGroupMembershipRequest,
    ) -> DirectoryResult<CreateGroupMembershipOutput> {
        self.reject_invalid("CreateGroupMembership", request.validate())?;
        let user_id = request.member_id.resolve()?;
        debug!("CreateGroupMembership: {} -> {}", user_id, request.group_id);
        self.client
            .create_group_membership(request)
            .await
            .map_err(|error| self.remote_failure("CreateGroupMembership", error).into())
    }

    async fn delete_group_membership(
        &self,
        request: DeleteGroupMembershipRequest,
    ) -> DirectoryResult<()> {
        self.reject_invalid("DeleteGroupMembership", request.validate())?;
        debug!("DeleteGroupMembership: {}", request.membership_id);
        self.client
            .delete_group_membership(request)
            .await
            .map_err(|error| self.remote_failure("DeleteGroupMembership", error).into())
    }

    async fn delete_user(&self, request: DeleteUserRequest) -> DirectoryResult<()> {
        self.reject_invalid("DeleteUser", request.validate())?;
        debug!("DeleteUser: {}", request.user_id);
        self.client
            .delete_user(request)
            .await
            .map_err(|error| self.remote_failure("DeleteUser", error).into())
    }
}

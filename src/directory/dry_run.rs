//! Dry-run directory adapter.
//!
//! Reads go to the wrapped reader unchanged. Writes are never forwarded;
//! each one is logged and answered with a result built from the request:
//! the identity store id is echoed back and new ids are derived from a hash
//! of the request fields, so the same request always yields the same id.
//! Requests are validated exactly as the live adapter validates them, so a
//! request that a real run would reject fails here with the same error.

use super::model::{
    CreateGroupMembershipOutput, CreateGroupMembershipRequest, CreateGroupOutput,
    CreateGroupRequest, DeleteGroupMembershipRequest, DeleteGroupRequest, DeleteUserRequest,
    Group, GroupMembership, User,
};
use super::{DirectoryReader, DirectoryWriter};
use crate::error::DirectoryResult;
use log::info;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Adapter that previews writes without performing them.
#[derive(Debug, Clone)]
pub struct DryRunAdapter<R> {
    reader: R,
}

impl<R: DirectoryReader> DryRunAdapter<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Derive a stable identifier from `parts`.
fn synthetic_id(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::from_bytes(bytes).to_string()
}

impl<R: DirectoryReader> DirectoryReader for DryRunAdapter<R> {
    fn identity_store_id(&self) -> &str {
        self.reader.identity_store_id()
    }

    async fn check_membership(&self, group_ids: &[String], user_id: &str) -> DirectoryResult<bool> {
        self.reader.check_membership(group_ids, user_id).await
    }

    async fn list_groups(&self) -> DirectoryResult<Vec<Group>> {
        self.reader.list_groups().await
    }

    async fn list_users(&self) -> DirectoryResult<Vec<User>> {
        self.reader.list_users().await
    }

    async fn list_group_memberships(&self, group_id: &str) -> DirectoryResult<Vec<GroupMembership>> {
        self.reader.list_group_memberships(group_id).await
    }
}

impl<R: DirectoryReader> DirectoryWriter for DryRunAdapter<R> {
    async fn create_group(&self, request: CreateGroupRequest) -> DirectoryResult<CreateGroupOutput> {
        request.validate()?;
        info!("[dry-run] CreateGroup: {}", request.display_name);
        Ok(CreateGroupOutput {
            group_id: synthetic_id(&["group", &request.identity_store_id, &request.display_name]),
            identity_store_id: request.identity_store_id,
        })
    }

    async fn delete_group(&self, request: DeleteGroupRequest) -> DirectoryResult<()> {
        request.validate()?;
        info!("[dry-run] DeleteGroup: {}", request.group_id);
        Ok(())
    }

    async fn create_group_membership(
        &self,
        request: CreateGroupMembershipRequest,
    ) -> DirectoryResult<CreateGroupMembershipOutput> {
        request.validate()?;
        let user_id = request.member_id.resolve()?;
        info!(
            "[dry-run] CreateGroupMembership: {} -> {}",
            user_id, request.group_id
        );
        let membership_id = synthetic_id(&[
            "membership",
            &request.identity_store_id,
            &request.group_id,
            user_id,
        ]);
        Ok(CreateGroupMembershipOutput {
            identity_store_id: request.identity_store_id.clone(),
            membership_id,
        })
    }

    async fn delete_group_membership(
        &self,
        request: DeleteGroupMembershipRequest,
    ) -> DirectoryResult<()> {
        request.validate()?;
        info!("[dry-run] DeleteGroupMembership: {}", request.membership_id);
        Ok(())
    }

    async fn delete_user(&self, request: DeleteUserRequest) -> DirectoryResult<()> {
        request.validate()?;
        info!("[dry-run] DeleteUser: {}", request.user_id);
        Ok(())
    }
}

//! Identity Store directory adapters.
//!
//! The directory surface is split into two small capabilities:
//!
//! - [`DirectoryReader`]: membership checks and the three listings,
//! - [`DirectoryWriter`]: group, membership and user mutations.
//!
//! [`DirectoryAdapter`] implements both over an [`IdentityStoreClient`].
//! [`DryRunAdapter`] implements both over any reader, passing reads through
//! and answering writes with synthesized results, so a sync run can be
//! previewed without touching the directory.
//!
//! ```rust
//! use directory_sync::directory::{
//!     CreateGroupRequest, DirectoryAdapter, DirectoryReader, DirectoryWriter, DryRunAdapter,
//!     InMemoryIdentityStore,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let adapter = DirectoryAdapter::new(InMemoryIdentityStore::new("d-1234"), "d-1234");
//! let dry_run = DryRunAdapter::new(adapter);
//!
//! let output = dry_run
//!     .create_group(CreateGroupRequest::new("d-1234", "engineering"))
//!     .await?;
//! assert_eq!(output.identity_store_id, "d-1234");
//! assert!(dry_run.list_groups().await?.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod client;
pub mod dry_run;
pub mod in_memory;
mod member_id;
pub mod model;

pub use adapter::DirectoryAdapter;
pub use client::{IdentityStoreClient, Page, Paginator};
pub use dry_run::DryRunAdapter;
pub use in_memory::{InMemoryIdentityStore, InMemoryPages};
pub use member_id::MemberId;
pub use model::{
    CreateGroupMembershipOutput, CreateGroupMembershipRequest, CreateGroupOutput,
    CreateGroupRequest, DeleteGroupMembershipRequest, DeleteGroupRequest, DeleteUserRequest,
    Group, GroupMembership, IsMemberInGroupsOutput, IsMemberInGroupsRequest, MembershipExistence,
    RawEmail, RawGroup, RawGroupMembership, RawUser, User,
};

use crate::error::DirectoryResult;
use std::future::Future;

/// Read-only directory operations.
pub trait DirectoryReader: Send + Sync {
    /// Identity store the reader is bound to.
    fn identity_store_id(&self) -> &str;

    /// Whether `user_id` belongs to at least one of `group_ids`.
    ///
    /// An empty group list is never a member.
    fn check_membership(
        &self,
        group_ids: &[String],
        user_id: &str,
    ) -> impl Future<Output = DirectoryResult<bool>> + Send;

    /// Every group in the store, across all pages.
    ///
    /// Groups without a display name are skipped. A failure on any page
    /// fails the whole listing.
    fn list_groups(&self) -> impl Future<Output = DirectoryResult<Vec<Group>>> + Send;

    /// Every user in the store. Users without a user name are skipped.
    fn list_users(&self) -> impl Future<Output = DirectoryResult<Vec<User>>> + Send;

    /// Memberships of `group_id`, with member ids left unresolved.
    fn list_group_memberships(
        &self,
        group_id: &str,
    ) -> impl Future<Output = DirectoryResult<Vec<GroupMembership>>> + Send;
}

/// Mutating directory operations.
pub trait DirectoryWriter: Send + Sync {
    fn create_group(
        &self,
        request: CreateGroupRequest,
    ) -> impl Future<Output = DirectoryResult<CreateGroupOutput>> + Send;

    fn delete_group(
        &self,
        request: DeleteGroupRequest,
    ) -> impl Future<Output = DirectoryResult<()>> + Send;

    fn create_group_membership(
        &self,
        request: CreateGroupMembershipRequest,
    ) -> impl Future<Output = DirectoryResult<CreateGroupMembershipOutput>> + Send;

    fn delete_group_membership(
        &self,
        request: DeleteGroupMembershipRequest,
    ) -> impl Future<Output = DirectoryResult<()>> + Send;

    fn delete_user(
        &self,
        request: DeleteUserRequest,
    ) -> impl Future<Output = DirectoryResult<()>> + Send;
}

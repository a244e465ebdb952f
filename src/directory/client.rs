//! Upstream Identity Store capabilities consumed by the adapter.
//!
//! Implementations wrap a real SDK client (or a fake, see
//! [`InMemoryIdentityStore`](super::InMemoryIdentityStore)). Each method
//! issues exactly one call and returns the raw response or the raw error; all
//! classification happens in the adapter.

use super::model::{
    CreateGroupMembershipOutput, CreateGroupMembershipRequest, CreateGroupOutput,
    CreateGroupRequest, DeleteGroupMembershipRequest, DeleteGroupRequest, DeleteUserRequest,
    IsMemberInGroupsOutput, IsMemberInGroupsRequest, RawGroup, RawGroupMembership, RawUser,
};
use std::future::Future;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Drains a multi-page result set one page at a time.
///
/// Cancellation is cooperative: dropping the future returned by
/// [`next_page`](Paginator::next_page) abandons the request, and a client that
/// notices cancellation reports it as an ordinary error.
pub trait Paginator: Send {
    type Item: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Whether another call to `next_page` is expected to yield a page.
    fn has_more_pages(&self) -> bool;

    /// Fetch the next page.
    fn next_page(&mut self) -> impl Future<Output = Result<Page<Self::Item>, Self::Error>> + Send;
}

/// Identity Store SDK surface used by [`DirectoryAdapter`](super::DirectoryAdapter).
pub trait IdentityStoreClient: Send + Sync {
    /// SDK error; an [`SdkError`](crate::classifier::SdkError) in its source
    /// chain is recognized by the classifier.
    type Error: std::error::Error + Send + Sync + 'static;

    type GroupPages: Paginator<Item = RawGroup, Error = Self::Error>;
    type UserPages: Paginator<Item = RawUser, Error = Self::Error>;
    type MembershipPages: Paginator<Item = RawGroupMembership, Error = Self::Error>;

    fn create_group(
        &self,
        request: CreateGroupRequest,
    ) -> impl Future<Output = Result<CreateGroupOutput, Self::Error>> + Send;

    fn delete_group(
        &self,
        request: DeleteGroupRequest,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn create_group_membership(
        &self,
        request: CreateGroupMembershipRequest,
    ) -> impl Future<Output = Result<CreateGroupMembershipOutput, Self::Error>> + Send;

    fn delete_group_membership(
        &self,
        request: DeleteGroupMembershipRequest,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn delete_user(
        &self,
        request: DeleteUserRequest,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn is_member_in_groups(
        &self,
        request: IsMemberInGroupsRequest,
    ) -> impl Future<Output = Result<IsMemberInGroupsOutput, Self::Error>> + Send;

    fn list_groups(&self, identity_store_id: &str) -> Self::GroupPages;

    fn list_users(&self, identity_store_id: &str) -> Self::UserPages;

    fn list_group_memberships(&self, identity_store_id: &str, group_id: &str)
    -> Self::MembershipPages;
}

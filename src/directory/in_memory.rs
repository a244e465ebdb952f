//! In-memory Identity Store.
//!
//! A thread-safe fake of the Identity Store SDK, useful for tests, local
//! development and as the read side of a dry run. It reports failures with the
//! same [`SdkError`] codes the real service uses, so the classifier sees
//! realistic input.
//!
//! Listings are served in pages of a configurable size from a snapshot taken
//! when the paginator is created.
//!
//! ```rust
//! use directory_sync::directory::{InMemoryIdentityStore, RawUser};
//!
//! let store = InMemoryIdentityStore::new("d-1234").with_page_size(2);
//! store.insert_user(RawUser {
//!     user_id: "u-1".to_string(),
//!     user_name: Some("jane".to_string()),
//!     display_name: None,
//!     emails: Vec::new(),
//! });
//! assert_eq!(store.user_count(), 1);
//! ```

use super::client::{IdentityStoreClient, Page, Paginator};
use super::model::{
    CreateGroupMembershipOutput, CreateGroupMembershipRequest, CreateGroupOutput,
    CreateGroupRequest, DeleteGroupMembershipRequest, DeleteGroupRequest, DeleteUserRequest,
    IsMemberInGroupsOutput, IsMemberInGroupsRequest, MembershipExistence, RawGroup,
    RawGroupMembership, RawUser,
};
use super::MemberId;
use crate::classifier::SdkError;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Default)]
struct StoreData {
    groups: BTreeMap<String, RawGroup>,
    users: BTreeMap<String, RawUser>,
    memberships: BTreeMap<String, RawGroupMembership>,
}

/// Thread-safe in-memory Identity Store.
///
/// Clones share the same underlying data.
#[derive(Debug, Clone)]
pub struct InMemoryIdentityStore {
    identity_store_id: String,
    page_size: usize,
    data: Arc<RwLock<StoreData>>,
}

impl InMemoryIdentityStore {
    pub fn new(identity_store_id: impl Into<String>) -> Self {
        Self {
            identity_store_id: identity_store_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
            data: Arc::new(RwLock::new(StoreData::default())),
        }
    }

    /// Serve listings in pages of `page_size` records (minimum 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn insert_user(&self, user: RawUser) {
        self.write().users.insert(user.user_id.clone(), user);
    }

    pub fn insert_group(&self, group: RawGroup) {
        self.write().groups.insert(group.group_id.clone(), group);
    }

    /// Insert a raw membership record as-is, bypassing validation.
    pub fn insert_membership(&self, membership_id: impl Into<String>, record: RawGroupMembership) {
        self.write().memberships.insert(membership_id.into(), record);
    }

    pub fn user_count(&self) -> usize {
        self.read().users.len()
    }

    pub fn group_count(&self) -> usize {
        self.read().groups.len()
    }

    pub fn membership_count(&self) -> usize {
        self.read().memberships.len()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_store(&self, identity_store_id: &str) -> Result<(), SdkError> {
        if identity_store_id == self.identity_store_id {
            Ok(())
        } else {
            Err(SdkError::new(
                "ResourceNotFoundException",
                format!("identity store {} does not exist", identity_store_id),
            ))
        }
    }

    fn paginate<T>(&self, items: Vec<T>) -> InMemoryPages<T> {
        let mut pages = VecDeque::new();
        let mut items = items.into_iter().peekable();
        while items.peek().is_some() {
            pages.push_back(items.by_ref().take(self.page_size).collect());
        }
        InMemoryPages {
            pages,
            pending_error: None,
        }
    }
}

impl IdentityStoreClient for InMemoryIdentityStore {
    type Error = SdkError;
    type GroupPages = InMemoryPages<RawGroup>;
    type UserPages = InMemoryPages<RawUser>;
    type MembershipPages = InMemoryPages<RawGroupMembership>;

    async fn create_group(&self, request: CreateGroupRequest) -> Result<CreateGroupOutput, SdkError> {
        self.check_store(&request.identity_store_id)?;
        if request.display_name.is_empty() {
            return Err(SdkError::new(
                "ValidationException",
                "DisplayName must not be empty",
            ));
        }

        let mut data = self.write();
        if data
            .groups
            .values()
            .any(|group| group.display_name.as_deref() == Some(request.display_name.as_str()))
        {
            return Err(SdkError::new(
                "ConflictException",
                format!("group {} already exists", request.display_name),
            ));
        }

        let group_id = uuid::Uuid::new_v4().to_string();
        data.groups.insert(
            group_id.clone(),
            RawGroup {
                group_id: group_id.clone(),
                display_name: Some(request.display_name),
                description: request.description,
            },
        );

        Ok(CreateGroupOutput {
            identity_store_id: request.identity_store_id,
            group_id,
        })
    }

    async fn delete_group(&self, request: DeleteGroupRequest) -> Result<(), SdkError> {
        self.check_store(&request.identity_store_id)?;
        let mut data = self.write();
        if data.groups.remove(&request.group_id).is_none() {
            return Err(SdkError::new(
                "ResourceNotFoundException",
                format!("group {} not found", request.group_id),
            ));
        }
        data.memberships
            .retain(|_, membership| membership.group_id.as_deref() != Some(request.group_id.as_str()));
        Ok(())
    }

    async fn create_group_membership(
        &self,
        request: CreateGroupMembershipRequest,
    ) -> Result<CreateGroupMembershipOutput, SdkError> {
        self.check_store(&request.identity_store_id)?;
        let MemberId::UserId(user_id) = &request.member_id else {
            return Err(SdkError::new(
                "ValidationException",
                "MemberId must reference a user",
            ));
        };

        let mut data = self.write();
        if !data.groups.contains_key(&request.group_id) {
            return Err(SdkError::new(
                "ResourceNotFoundException",
                format!("group {} not found", request.group_id),
            ));
        }
        if !data.users.contains_key(user_id) {
            return Err(SdkError::new(
                "ResourceNotFoundException",
                format!("user {} not found", user_id),
            ));
        }
        let duplicate = data.memberships.values().any(|membership| {
            membership.group_id.as_deref() == Some(request.group_id.as_str())
                && membership.member_id.as_ref() == Some(&request.member_id)
        });
        if duplicate {
            return Err(SdkError::new(
                "ConflictException",
                format!("user {} is already a member of {}", user_id, request.group_id),
            ));
        }

        let membership_id = uuid::Uuid::new_v4().to_string();
        data.memberships.insert(
            membership_id.clone(),
            RawGroupMembership {
                membership_id: Some(membership_id.clone()),
                group_id: Some(request.group_id.clone()),
                member_id: Some(request.member_id.clone()),
            },
        );

        Ok(CreateGroupMembershipOutput {
            identity_store_id: request.identity_store_id,
            membership_id,
        })
    }

    async fn delete_group_membership(
        &self,
        request: DeleteGroupMembershipRequest,
    ) -> Result<(), SdkError> {
        self.check_store(&request.identity_store_id)?;
        match self.write().memberships.remove(&request.membership_id) {
            Some(_) => Ok(()),
            None => Err(SdkError::new(
                "ResourceNotFoundException",
                format!("membership {} not found", request.membership_id),
            )),
        }
    }

    async fn delete_user(&self, request: DeleteUserRequest) -> Result<(), SdkError> {
        self.check_store(&request.identity_store_id)?;
        let mut data = self.write();
        if data.users.remove(&request.user_id).is_none() {
            return Err(SdkError::new(
                "ResourceNotFoundException",
                format!("user {} not found", request.user_id),
            ));
        }
        let member = MemberId::user(request.user_id);
        data.memberships
            .retain(|_, membership| membership.member_id.as_ref() != Some(&member));
        Ok(())
    }

    async fn is_member_in_groups(
        &self,
        request: IsMemberInGroupsRequest,
    ) -> Result<IsMemberInGroupsOutput, SdkError> {
        self.check_store(&request.identity_store_id)?;
        if request.group_ids.is_empty() {
            return Err(SdkError::new(
                "ValidationException",
                "GroupIds must contain at least one element",
            ));
        }

        let data = self.read();
        let results = request
            .group_ids
            .iter()
            .map(|group_id| MembershipExistence {
                group_id: group_id.clone(),
                member_id: request.member_id.clone(),
                membership_exists: data.memberships.values().any(|membership| {
                    membership.group_id.as_deref() == Some(group_id.as_str())
                        && membership.member_id.as_ref() == Some(&request.member_id)
                }),
            })
            .collect();

        Ok(IsMemberInGroupsOutput { results })
    }

    fn list_groups(&self, identity_store_id: &str) -> Self::GroupPages {
        if let Err(error) = self.check_store(identity_store_id) {
            return InMemoryPages::failed(error);
        }
        let groups = self.read().groups.values().cloned().collect();
        self.paginate(groups)
    }

    fn list_users(&self, identity_store_id: &str) -> Self::UserPages {
        if let Err(error) = self.check_store(identity_store_id) {
            return InMemoryPages::failed(error);
        }
        let users = self.read().users.values().cloned().collect();
        self.paginate(users)
    }

    fn list_group_memberships(
        &self,
        identity_store_id: &str,
        group_id: &str,
    ) -> Self::MembershipPages {
        if let Err(error) = self.check_store(identity_store_id) {
            return InMemoryPages::failed(error);
        }
        let memberships = self
            .read()
            .memberships
            .values()
            .filter(|membership| membership.group_id.as_deref() == Some(group_id))
            .cloned()
            .collect();
        self.paginate(memberships)
    }
}

/// Paginator over a snapshot of in-memory records.
///
/// A listing against an unknown identity store yields no pages; the first
/// `next_page` call reports the failure instead.
#[derive(Debug, Clone)]
pub struct InMemoryPages<T> {
    pages: VecDeque<Vec<T>>,
    pending_error: Option<SdkError>,
}

impl<T> InMemoryPages<T> {
    pub fn empty() -> Self {
        Self {
            pages: VecDeque::new(),
            pending_error: None,
        }
    }

    /// Paginator whose first request fails with `error`.
    pub fn failed(error: SdkError) -> Self {
        Self {
            pages: VecDeque::new(),
            pending_error: Some(error),
        }
    }

    pub fn remaining_pages(&self) -> usize {
        self.pages.len()
    }
}

impl<T: Send> Paginator for InMemoryPages<T> {
    type Item = T;
    type Error = SdkError;

    fn has_more_pages(&self) -> bool {
        self.pending_error.is_some() || !self.pages.is_empty()
    }

    async fn next_page(&mut self) -> Result<Page<T>, SdkError> {
        if let Some(error) = self.pending_error.take() {
            return Err(error);
        }
        self.pages
            .pop_front()
            .map(Page::new)
            .ok_or_else(|| SdkError::new("ValidationException", "no more pages"))
    }
}

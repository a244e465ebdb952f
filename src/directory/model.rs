//! Request, response and record types exchanged with the Identity Store.
//!
//! `Raw*` types are records as the Identity Store returns them in list pages;
//! [`Group`], [`User`] and [`GroupMembership`] are the converted records the
//! listings hand to callers.

use super::MemberId;
use crate::error::{DirectoryError, DirectoryResult};
use serde::{Deserialize, Serialize};

fn require(field: &'static str, value: &str) -> DirectoryResult<()> {
    if value.is_empty() {
        Err(DirectoryError::empty_field(field))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub identity_store_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateGroupRequest {
    pub fn new(identity_store_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identity_store_id: identity_store_id.into(),
            display_name: display_name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Reject requests that cannot be sent: the display name must be set.
    pub fn validate(&self) -> DirectoryResult<()> {
        require("display_name", &self.display_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroupOutput {
    pub identity_store_id: String,
    pub group_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteGroupRequest {
    pub identity_store_id: String,
    pub group_id: String,
}

impl DeleteGroupRequest {
    pub fn new(identity_store_id: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            identity_store_id: identity_store_id.into(),
            group_id: group_id.into(),
        }
    }

    pub fn validate(&self) -> DirectoryResult<()> {
        require("group_id", &self.group_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroupMembershipRequest {
    pub identity_store_id: String,
    pub group_id: String,
    pub member_id: MemberId,
}

impl CreateGroupMembershipRequest {
    pub fn new(
        identity_store_id: impl Into<String>,
        group_id: impl Into<String>,
        member_id: MemberId,
    ) -> Self {
        Self {
            identity_store_id: identity_store_id.into(),
            group_id: group_id.into(),
            member_id,
        }
    }

    /// The group id must be set and the member must resolve to a user id.
    pub fn validate(&self) -> DirectoryResult<()> {
        require("group_id", &self.group_id)?;
        self.member_id.resolve().map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroupMembershipOutput {
    pub identity_store_id: String,
    pub membership_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteGroupMembershipRequest {
    pub identity_store_id: String,
    pub membership_id: String,
}

impl DeleteGroupMembershipRequest {
    pub fn new(identity_store_id: impl Into<String>, membership_id: impl Into<String>) -> Self {
        Self {
            identity_store_id: identity_store_id.into(),
            membership_id: membership_id.into(),
        }
    }

    pub fn validate(&self) -> DirectoryResult<()> {
        require("membership_id", &self.membership_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteUserRequest {
    pub identity_store_id: String,
    pub user_id: String,
}

impl DeleteUserRequest {
    pub fn new(identity_store_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            identity_store_id: identity_store_id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn validate(&self) -> DirectoryResult<()> {
        require("user_id", &self.user_id)
    }
}

/// Batched membership existence query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsMemberInGroupsRequest {
    pub identity_store_id: String,
    pub member_id: MemberId,
    pub group_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipExistence {
    pub group_id: String,
    pub member_id: MemberId,
    pub membership_exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsMemberInGroupsOutput {
    pub results: Vec<MembershipExistence>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGroup {
    pub group_id: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEmail {
    pub value: Option<String>,
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUser {
    pub user_id: String,
    pub user_name: Option<String>,
    pub display_name: Option<String>,
    pub emails: Vec<RawEmail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGroupMembership {
    pub membership_id: Option<String>,
    pub group_id: Option<String>,
    pub member_id: Option<MemberId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Group {
    /// Convert a listed record; groups without a display name are skipped.
    pub fn from_raw(raw: RawGroup) -> Option<Self> {
        let display_name = raw.display_name.filter(|name| !name.is_empty())?;
        Some(Self {
            id: raw.group_id,
            display_name,
            description: raw.description,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    /// Convert a listed record; users without a user name are skipped.
    ///
    /// The primary email wins; otherwise the first email with a value.
    pub fn from_raw(raw: RawUser) -> Option<Self> {
        let user_name = raw.user_name.filter(|name| !name.is_empty())?;
        let email = raw
            .emails
            .iter()
            .find(|email| email.primary && email.value.is_some())
            .or_else(|| raw.emails.iter().find(|email| email.value.is_some()))
            .and_then(|email| email.value.clone());
        Some(Self {
            id: raw.user_id,
            user_name,
            display_name: raw.display_name,
            email,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembership {
    pub membership_id: String,
    pub group_id: String,
    pub member_id: MemberId,
}

impl GroupMembership {
    /// Convert a listed record.
    ///
    /// Records without a membership id or member id are skipped. The member id
    /// is kept unresolved; an unrecognized variant surfaces as a contract
    /// violation only when a caller resolves it.
    pub fn from_raw(raw: RawGroupMembership, listed_group_id: &str) -> Option<Self> {
        let membership_id = raw.membership_id.filter(|id| !id.is_empty())?;
        let member_id = raw.member_id?;
        Some(Self {
            membership_id,
            group_id: raw.group_id.unwrap_or_else(|| listed_group_id.to_string()),
            member_id,
        })
    }
}

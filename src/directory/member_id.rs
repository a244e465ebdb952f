//! Member identifiers referenced by group memberships.

use crate::error::{ContractViolation, DirectoryError, DirectoryResult};
use serde::{Deserialize, Serialize};

/// The principal a group membership points at.
///
/// Only [`MemberId::UserId`] is a valid principal. The Identity Store may add
/// new principal kinds; those decode as [`MemberId::Unrecognized`] and
/// resolving them is a contract violation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberId {
    UserId(String),
    Unrecognized,
}

impl MemberId {
    pub fn user(user_id: impl Into<String>) -> Self {
        MemberId::UserId(user_id.into())
    }

    /// The wrapped user id.
    ///
    /// Fails with a [`ContractViolation`], never a remote failure kind, when
    /// the variant is not a user id or the id is empty.
    pub fn resolve(&self) -> DirectoryResult<&str> {
        match self {
            MemberId::UserId(id) if id.is_empty() => {
                Err(DirectoryError::empty_field("member_id.user_id"))
            }
            MemberId::UserId(id) => Ok(id),
            MemberId::Unrecognized => Err(ContractViolation::UnrecognizedMemberId.into()),
        }
    }
}

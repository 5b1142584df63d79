//! Error types for the club manager
//!
//! One error enum per operation so callers match only the outcomes that
//! operation can produce. Every enum classifies itself into an
//! [`ErrorKind`]:
//! - not-found: referenced club or membership does not exist
//! - conflict: state precondition violated
//! - authorization: acting user lacks the required role
//! - invalid-request: disallowed role or self-reference
//! - internal: storage failure
//!
//! Business outcomes are final; only unavailable storage is retryable.

use crate::invariants::InvariantViolation;
use sc_model::{ClubId, Role, UserId};
use sc_store::StoreError;
use serde::Serialize;

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Referenced entity missing
    NotFound,
    /// State precondition violated
    Conflict,
    /// Acting user lacks authority
    Authorization,
    /// Malformed or disallowed request
    InvalidRequest,
    /// Storage failure
    Internal,
}

/// Claim errors
#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    /// Club does not exist
    #[error("club not found: {0}")]
    NotFound(ClubId),

    /// Someone else claimed the club first
    #[error("club {0} has already been claimed")]
    AlreadyClaimed(ClubId),

    /// Caller did not confirm the claim
    #[error("claiming a club must be explicitly confirmed")]
    NotConfirmed,

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClaimError {
    /// Error classification
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyClaimed(_) => ErrorKind::Conflict,
            Self::NotConfirmed => ErrorKind::InvalidRequest,
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }
}

/// Leadership transfer errors
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Club does not exist
    #[error("club not found: {0}")]
    NotFound(ClubId),

    /// Acting user is not the current president
    #[error("only the current president can transfer leadership")]
    NotPresident,

    /// Target has no membership in the club
    #[error("user {0} must join the club before receiving the presidency")]
    TargetNotMember(UserId),

    /// Acting user named themselves as target
    #[error("the president cannot transfer leadership to themselves")]
    SelfTransfer,

    /// Configured outgoing role would leave two presidents
    #[error("outgoing president role {0} is not allowed")]
    InvalidOutgoingRole(Role),

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TransferError {
    /// Error classification
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NotPresident => ErrorKind::Authorization,
            Self::TargetNotMember(_) => ErrorKind::Conflict,
            Self::SelfTransfer => ErrorKind::InvalidRequest,
            Self::InvalidOutgoingRole(_) | Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }
}

/// Promotion/demotion errors
#[derive(Debug, thiserror::Error)]
pub enum SetRoleError {
    /// Club does not exist
    #[error("club not found: {0}")]
    NotFound(ClubId),

    /// Acting user is not the current president
    #[error("only the current president can change member roles")]
    NotPresident,

    /// Role cannot be assigned through this path
    #[error("role {0} cannot be assigned directly; use a leadership transfer")]
    InvalidRole(Role),

    /// President tried to change their own role
    #[error("the president cannot change their own role; transfer leadership first")]
    SelfDemotion,

    /// Target has no membership in the club
    #[error("user {0} is not a member of the club")]
    TargetNotMember(UserId),

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SetRoleError {
    /// Error classification
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NotPresident => ErrorKind::Authorization,
            Self::InvalidRole(_) | Self::SelfDemotion => ErrorKind::InvalidRequest,
            Self::TargetNotMember(_) => ErrorKind::Conflict,
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }
}

/// Join errors
#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    /// Club does not exist
    #[error("club not found: {0}")]
    ClubNotFound(ClubId),

    /// User already has a membership
    #[error("already a member of club {0}")]
    AlreadyMember(ClubId),

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl JoinError {
    /// Error classification
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClubNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyMember(_) => ErrorKind::Conflict,
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }
}

/// Leave errors
#[derive(Debug, thiserror::Error)]
pub enum LeaveError {
    /// User has no membership in the club
    #[error("not a member of club {0}")]
    NotMember(ClubId),

    /// The president must transfer before leaving
    #[error("the president must transfer leadership before leaving")]
    IsPresident,

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LeaveError {
    /// Error classification
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotMember(_) => ErrorKind::NotFound,
            Self::IsPresident => ErrorKind::Conflict,
            Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }
}

/// Club creation errors
#[derive(Debug, thiserror::Error)]
pub enum CreateClubError {
    /// Name blank after trimming
    #[error("club name cannot be empty")]
    EmptyName,

    /// Name over the configured limit
    #[error("club name is {len} characters (max {max})")]
    NameTooLong { len: usize, max: usize },

    /// Too many distinct tags
    #[error("club has {count} tags (max {max})")]
    TooManyTags { count: usize, max: usize },

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CreateClubError {
    /// Error classification
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } | Self::TooManyTags { .. } => {
                ErrorKind::InvalidRequest
            }
            Self::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Read/verification errors
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Club does not exist
    #[error("club not found: {0}")]
    NotFound(ClubId),

    /// Stored state breaks the leadership invariant
    #[error("invariant violated: {0}")]
    Violation(#[from] InvariantViolation),

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    /// Error classification
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Violation(_) | Self::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Any manager error
#[derive(Debug, thiserror::Error)]
pub enum ClubError {
    #[error("claim failed: {0}")]
    Claim(#[from] ClaimError),

    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("role change failed: {0}")]
    SetRole(#[from] SetRoleError),

    #[error("join failed: {0}")]
    Join(#[from] JoinError),

    #[error("leave failed: {0}")]
    Leave(#[from] LeaveError),

    #[error("club creation failed: {0}")]
    Create(#[from] CreateClubError),

    #[error("query failed: {0}")]
    Query(#[from] QueryError),
}

impl ClubError {
    /// Error classification
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Claim(e) => e.kind(),
            Self::Transfer(e) => e.kind(),
            Self::SetRole(e) => e.kind(),
            Self::Join(e) => e.kind(),
            Self::Leave(e) => e.kind(),
            Self::Create(e) => e.kind(),
            Self::Query(e) => e.kind(),
        }
    }

    /// Check if error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Claim(e) => e.is_retryable(),
            Self::Transfer(e) => e.is_retryable(),
            Self::SetRole(e) => e.is_retryable(),
            Self::Join(e) => e.is_retryable(),
            Self::Leave(e) => e.is_retryable(),
            Self::Create(CreateClubError::Store(e)) | Self::Query(QueryError::Store(e)) => {
                e.is_retryable()
            }
            Self::Create(_) | Self::Query(_) => false,
        }
    }
}

//! Store traits

use crate::error::StoreError;
use async_trait::async_trait;
use sc_model::{Club, ClubId, Membership, Role, UserId};

/// Club and membership storage
#[async_trait]
pub trait ClubStore: Send + Sync {
    /// Open a unit of work
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError>;

    /// Read a club outside any transaction
    async fn club(&self, id: ClubId) -> Result<Option<Club>, StoreError>;

    /// All memberships of a club, in no particular order
    async fn members(&self, id: ClubId) -> Result<Vec<Membership>, StoreError>;

    /// All memberships held by a user, in no particular order
    async fn memberships_of(&self, user: UserId) -> Result<Vec<Membership>, StoreError>;
}

/// One atomic unit of work
///
/// Writes become visible to other transactions only after [`commit`](Self::commit).
/// Dropping the transaction discards them.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Read a club
    async fn club(&mut self, id: ClubId) -> Result<Option<Club>, StoreError>;

    /// Read one membership row
    async fn membership(
        &mut self,
        club: ClubId,
        user: UserId,
    ) -> Result<Option<Membership>, StoreError>;

    /// All memberships of a club
    async fn members(&mut self, club: ClubId) -> Result<Vec<Membership>, StoreError>;

    /// Insert a new club record
    async fn insert_club(&mut self, club: &Club) -> Result<(), StoreError>;

    /// Compare-and-set the club's president
    ///
    /// Succeeds only if the stored president equals `expected` (`None` meaning
    /// unclaimed). On success the club is marked claimed. Returns whether a
    /// row was updated.
    async fn set_president_if(
        &mut self,
        club: ClubId,
        expected: Option<UserId>,
        president: UserId,
    ) -> Result<bool, StoreError>;

    /// Insert a membership, or overwrite the role of the existing row
    async fn upsert_membership(&mut self, membership: &Membership) -> Result<(), StoreError>;

    /// Insert a membership if none exists; returns whether a row was inserted
    async fn insert_membership(&mut self, membership: &Membership) -> Result<bool, StoreError>;

    /// Change the role of an existing row; returns whether a row was updated
    async fn update_role(
        &mut self,
        club: ClubId,
        user: UserId,
        role: Role,
    ) -> Result<bool, StoreError>;

    /// Delete a membership row; returns whether a row was deleted
    async fn delete_membership(&mut self, club: ClubId, user: UserId) -> Result<bool, StoreError>;

    /// Publish all writes
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

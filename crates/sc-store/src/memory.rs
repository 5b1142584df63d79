//! In-memory store
//!
//! Transactions are serialized by an async mutex over the tables. Each
//! transaction stages its writes in a working copy that replaces the shared
//! tables on commit, so an uncommitted transaction leaves no trace.

use crate::error::StoreError;
use crate::store::{ClubStore, StoreTransaction};
use async_trait::async_trait;
use sc_model::{Club, ClubId, Membership, Role, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
struct Tables {
    clubs: HashMap<ClubId, Club>,
    memberships: HashMap<(ClubId, UserId), Membership>,
}

impl Tables {
    fn members(&self, club: ClubId) -> Vec<Membership> {
        self.memberships
            .values()
            .filter(|m| m.club_id == club)
            .cloned()
            .collect()
    }
}

/// Process-local store; clones share the same tables
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of clubs
    pub async fn club_count(&self) -> usize {
        self.tables.lock().await.clubs.len()
    }

    /// Number of membership rows across all clubs
    pub async fn membership_count(&self) -> usize {
        self.tables.lock().await.memberships.len()
    }
}

#[async_trait]
impl ClubStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let working = (*guard).clone();
        tracing::trace!("in-memory transaction started");
        Ok(Box::new(InMemoryTransaction { guard, working }))
    }

    async fn club(&self, id: ClubId) -> Result<Option<Club>, StoreError> {
        Ok(self.tables.lock().await.clubs.get(&id).cloned())
    }

    async fn members(&self, id: ClubId) -> Result<Vec<Membership>, StoreError> {
        Ok(self.tables.lock().await.members(id))
    }

    async fn memberships_of(&self, user: UserId) -> Result<Vec<Membership>, StoreError> {
        Ok(self
            .tables
            .lock()
            .await
            .memberships
            .values()
            .filter(|m| m.user_id == user)
            .cloned()
            .collect())
    }
}

/// Transaction over [`InMemoryStore`]
///
/// Holds the store lock for its whole lifetime.
#[derive(Debug)]
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn club(&mut self, id: ClubId) -> Result<Option<Club>, StoreError> {
        Ok(self.working.clubs.get(&id).cloned())
    }

    async fn membership(
        &mut self,
        club: ClubId,
        user: UserId,
    ) -> Result<Option<Membership>, StoreError> {
        Ok(self.working.memberships.get(&(club, user)).cloned())
    }

    async fn members(&mut self, club: ClubId) -> Result<Vec<Membership>, StoreError> {
        Ok(self.working.members(club))
    }

    async fn insert_club(&mut self, club: &Club) -> Result<(), StoreError> {
        if self.working.clubs.contains_key(&club.id) {
            return Err(StoreError::Constraint(format!("club {} exists", club.id)));
        }
        self.working.clubs.insert(club.id, club.clone());
        Ok(())
    }

    async fn set_president_if(
        &mut self,
        club: ClubId,
        expected: Option<UserId>,
        president: UserId,
    ) -> Result<bool, StoreError> {
        let Some(record) = self.working.clubs.get_mut(&club) else {
            return Ok(false);
        };
        if record.president != expected {
            return Ok(false);
        }
        record.president = Some(president);
        record.claimed = true;
        Ok(true)
    }

    async fn upsert_membership(&mut self, membership: &Membership) -> Result<(), StoreError> {
        self.working
            .memberships
            .entry((membership.club_id, membership.user_id))
            .and_modify(|existing| existing.role = membership.role)
            .or_insert_with(|| membership.clone());
        Ok(())
    }

    async fn insert_membership(&mut self, membership: &Membership) -> Result<bool, StoreError> {
        let key = (membership.club_id, membership.user_id);
        if self.working.memberships.contains_key(&key) {
            return Ok(false);
        }
        self.working.memberships.insert(key, membership.clone());
        Ok(true)
    }

    async fn update_role(
        &mut self,
        club: ClubId,
        user: UserId,
        role: Role,
    ) -> Result<bool, StoreError> {
        match self.working.memberships.get_mut(&(club, user)) {
            Some(membership) => {
                membership.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_membership(&mut self, club: ClubId, user: UserId) -> Result<bool, StoreError> {
        Ok(self.working.memberships.remove(&(club, user)).is_some())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let InMemoryTransaction { mut guard, working } = *self;
        *guard = working;
        tracing::trace!("in-memory transaction committed");
        Ok(())
    }
}

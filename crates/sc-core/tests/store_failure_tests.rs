use async_trait::async_trait;
use mockall::mock;
use sc_core::prelude::*;
use sc_core::{
    ClaimError, Club, ClubStore, JoinError, Membership, QueryError, StoreError, StoreTransaction,
    TransferError,
};
use sc_test_utils::{club_with_members, user};
use std::sync::Arc;

mock! {
    Store {}

    #[async_trait]
    impl ClubStore for Store {
        async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError>;
        async fn club(&self, id: ClubId) -> Result<Option<Club>, StoreError>;
        async fn members(&self, id: ClubId) -> Result<Vec<Membership>, StoreError>;
        async fn memberships_of(&self, user: UserId) -> Result<Vec<Membership>, StoreError>;
    }
}

/// Store whose transactions all fail to commit
#[derive(Clone, Default)]
struct CommitFailingStore {
    inner: InMemoryStore,
}

struct CommitFailingTx {
    inner: Box<dyn StoreTransaction>,
}

#[async_trait]
impl ClubStore for CommitFailingStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        let inner = self.inner.begin().await?;
        Ok(Box::new(CommitFailingTx { inner }))
    }

    async fn club(&self, id: ClubId) -> Result<Option<Club>, StoreError> {
        self.inner.club(id).await
    }

    async fn members(&self, id: ClubId) -> Result<Vec<Membership>, StoreError> {
        self.inner.members(id).await
    }

    async fn memberships_of(&self, user: UserId) -> Result<Vec<Membership>, StoreError> {
        self.inner.memberships_of(user).await
    }
}

#[async_trait]
impl StoreTransaction for CommitFailingTx {
    async fn club(&mut self, id: ClubId) -> Result<Option<Club>, StoreError> {
        self.inner.club(id).await
    }

    async fn membership(
        &mut self,
        club: ClubId,
        user: UserId,
    ) -> Result<Option<Membership>, StoreError> {
        self.inner.membership(club, user).await
    }

    async fn members(&mut self, club: ClubId) -> Result<Vec<Membership>, StoreError> {
        self.inner.members(club).await
    }

    async fn insert_club(&mut self, club: &Club) -> Result<(), StoreError> {
        self.inner.insert_club(club).await
    }

    async fn set_president_if(
        &mut self,
        club: ClubId,
        expected: Option<UserId>,
        president: UserId,
    ) -> Result<bool, StoreError> {
        self.inner.set_president_if(club, expected, president).await
    }

    async fn upsert_membership(&mut self, membership: &Membership) -> Result<(), StoreError> {
        self.inner.upsert_membership(membership).await
    }

    async fn insert_membership(&mut self, membership: &Membership) -> Result<bool, StoreError> {
        self.inner.insert_membership(membership).await
    }

    async fn update_role(
        &mut self,
        club: ClubId,
        user: UserId,
        role: Role,
    ) -> Result<bool, StoreError> {
        self.inner.update_role(club, user, role).await
    }

    async fn delete_membership(&mut self, club: ClubId, user: UserId) -> Result<bool, StoreError> {
        self.inner.delete_membership(club, user).await
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection reset during commit".to_string()))
    }
}

#[tokio::test]
async fn test_unavailable_store_is_retryable() {
    let mut store = MockStore::new();
    store
        .expect_begin()
        .times(1)
        .returning(|| Err(StoreError::Unavailable("pool exhausted".to_string())));
    let manager = ClubManager::new(Arc::new(store), ManagerConfig::default()).unwrap();

    let err = manager.claim(ClubId::new(), user(), true).await.unwrap_err();
    assert!(matches!(err, ClaimError::Store(StoreError::Unavailable(_))));
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.is_retryable());
    assert!(manager.audit().is_empty());
}

#[tokio::test]
async fn test_unconfirmed_claim_never_touches_store() {
    let mut store = MockStore::new();
    store.expect_begin().never();
    let manager = ClubManager::new(Arc::new(store), ManagerConfig::default()).unwrap();

    assert!(matches!(
        manager.claim(ClubId::new(), user(), false).await,
        Err(ClaimError::NotConfirmed)
    ));
}

#[tokio::test]
async fn test_backend_error_is_final() {
    let mut store = MockStore::new();
    store
        .expect_club()
        .returning(|_| Err(StoreError::Backend("syntax error".to_string())));
    let manager = ClubManager::new(Arc::new(store), ManagerConfig::default()).unwrap();

    let err = manager.club(ClubId::new()).await.unwrap_err();
    assert!(matches!(err, QueryError::Store(StoreError::Backend(_))));
    assert!(!ClubError::from(err).is_retryable());
}

#[tokio::test]
async fn test_failed_commit_leaves_state_unchanged() {
    let alice = user();
    let bob = user();

    // seed through a working manager, then route writes through the failing wrapper
    let store = CommitFailingStore::default();
    let seeding =
        ClubManager::new(Arc::new(store.inner.clone()), ManagerConfig::default()).unwrap();
    let club = club_with_members(&seeding, alice, &[bob]).await;
    let manager = ClubManager::new(Arc::new(store.clone()), ManagerConfig::default()).unwrap();

    let err = manager.transfer(club.id, alice, bob).await.unwrap_err();
    assert!(matches!(err, TransferError::Store(_)));
    assert!(err.is_retryable());

    let record = store.inner.club(club.id).await.unwrap().unwrap();
    assert_eq!(record.president, Some(alice));
    assert_eq!(
        manager.membership(club.id, bob).await.unwrap().map(|m| m.role),
        Some(Role::Member)
    );
    assert!(manager.audit().is_empty());

    let err = manager.join(club.id, user()).await.unwrap_err();
    assert!(matches!(err, JoinError::Store(_)));
    assert_eq!(store.inner.membership_count().await, 2);
}

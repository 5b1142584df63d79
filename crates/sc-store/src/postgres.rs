//! PostgreSQL store
//!
//! Claims and transfers are single conditional `UPDATE`s whose affected-row
//! count decides the outcome. Club rows read inside a transaction are locked
//! with `FOR UPDATE`.

use crate::error::StoreError;
use crate::store::{ClubStore, StoreTransaction};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sc_model::{Club, ClubId, ClubProfile, Membership, Role, UserId};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

/// Tables, constraints and indexes the store expects
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS clubs (
    id            UUID PRIMARY KEY,
    name          TEXT NOT NULL,
    claimed       BOOLEAN NOT NULL DEFAULT FALSE,
    president_id  UUID,
    category      TEXT,
    description   TEXT,
    meeting_time  TEXT,
    location      TEXT,
    image_url     TEXT,
    tags          TEXT[] NOT NULL DEFAULT '{}',
    created_at    TIMESTAMPTZ NOT NULL,
    CONSTRAINT clubs_claimed_has_president CHECK (claimed = (president_id IS NOT NULL))
);

CREATE TABLE IF NOT EXISTS club_memberships (
    club_id    UUID NOT NULL REFERENCES clubs (id) ON DELETE CASCADE,
    user_id    UUID NOT NULL,
    role       TEXT NOT NULL CHECK (role IN ('member', 'officer', 'vice_president', 'president')),
    joined_at  TIMESTAMPTZ NOT NULL,
    PRIMARY KEY (club_id, user_id)
);

CREATE UNIQUE INDEX IF NOT EXISTS club_memberships_one_president
    ON club_memberships (club_id) WHERE role = 'president';

CREATE INDEX IF NOT EXISTS club_memberships_by_user ON club_memberships (user_id);
";

const CLUB_COLUMNS: &str = "id, name, claimed, president_id, category, description, \
                            meeting_time, location, image_url, tags, created_at";

#[derive(Debug, sqlx::FromRow)]
struct ClubRow {
    id: Uuid,
    name: String,
    claimed: bool,
    president_id: Option<Uuid>,
    category: Option<String>,
    description: Option<String>,
    meeting_time: Option<String>,
    location: Option<String>,
    image_url: Option<String>,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<ClubRow> for Club {
    fn from(row: ClubRow) -> Self {
        Club {
            id: ClubId(row.id),
            name: row.name,
            claimed: row.claimed,
            president: row.president_id.map(UserId),
            profile: ClubProfile {
                category: row.category,
                description: row.description,
                meeting_time: row.meeting_time,
                location: row.location,
                image_url: row.image_url,
                tags: row.tags,
            },
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    club_id: Uuid,
    user_id: Uuid,
    role: String,
    joined_at: DateTime<Utc>,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = StoreError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e| {
                StoreError::Corrupt(format!("membership {}/{}: {e}", row.club_id, row.user_id))
            })?;
        Ok(Membership::new(
            ClubId(row.club_id),
            UserId(row.user_id),
            role,
            row.joined_at,
        ))
    }
}

fn into_memberships(rows: Vec<MembershipRow>) -> Result<Vec<Membership>, StoreError> {
    rows.into_iter().map(Membership::try_from).collect()
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool
    #[inline]
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url`
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if no connection can be made
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Create tables and indexes if missing
    ///
    /// # Errors
    /// Propagates backend failures
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        tracing::info!("club schema ensured");
        Ok(())
    }
}

#[async_trait]
impl ClubStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgStoreTransaction { tx }))
    }

    async fn club(&self, id: ClubId) -> Result<Option<Club>, StoreError> {
        let row = sqlx::query_as::<_, ClubRow>(&format!(
            "SELECT {CLUB_COLUMNS} FROM clubs WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Club::from))
    }

    async fn members(&self, id: ClubId) -> Result<Vec<Membership>, StoreError> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            "SELECT club_id, user_id, role, joined_at FROM club_memberships WHERE club_id = $1",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;
        into_memberships(rows)
    }

    async fn memberships_of(&self, user: UserId) -> Result<Vec<Membership>, StoreError> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            "SELECT club_id, user_id, role, joined_at FROM club_memberships WHERE user_id = $1",
        )
        .bind(user.0)
        .fetch_all(&self.pool)
        .await?;
        into_memberships(rows)
    }
}

/// Transaction over [`PgStore`]
pub struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn club(&mut self, id: ClubId) -> Result<Option<Club>, StoreError> {
        let row = sqlx::query_as::<_, ClubRow>(&format!(
            "SELECT {CLUB_COLUMNS} FROM clubs WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.map(Club::from))
    }

    async fn membership(
        &mut self,
        club: ClubId,
        user: UserId,
    ) -> Result<Option<Membership>, StoreError> {
        let row = sqlx::query_as::<_, MembershipRow>(
            "SELECT club_id, user_id, role, joined_at FROM club_memberships \
             WHERE club_id = $1 AND user_id = $2",
        )
        .bind(club.0)
        .bind(user.0)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.map(Membership::try_from).transpose()
    }

    async fn members(&mut self, club: ClubId) -> Result<Vec<Membership>, StoreError> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            "SELECT club_id, user_id, role, joined_at FROM club_memberships WHERE club_id = $1",
        )
        .bind(club.0)
        .fetch_all(&mut *self.tx)
        .await?;
        into_memberships(rows)
    }

    async fn insert_club(&mut self, club: &Club) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO clubs ({CLUB_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        ))
        .bind(club.id.0)
        .bind(&club.name)
        .bind(club.claimed)
        .bind(club.president.map(|p| p.0))
        .bind(&club.profile.category)
        .bind(&club.profile.description)
        .bind(&club.profile.meeting_time)
        .bind(&club.profile.location)
        .bind(&club.profile.image_url)
        .bind(&club.profile.tags)
        .bind(club.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn set_president_if(
        &mut self,
        club: ClubId,
        expected: Option<UserId>,
        president: UserId,
    ) -> Result<bool, StoreError> {
        let result = match expected {
            None => {
                sqlx::query(
                    "UPDATE clubs SET claimed = TRUE, president_id = $1 \
                     WHERE id = $2 AND claimed = FALSE",
                )
                .bind(president.0)
                .bind(club.0)
                .execute(&mut *self.tx)
                .await?
            }
            Some(current) => {
                sqlx::query(
                    "UPDATE clubs SET president_id = $1 WHERE id = $2 AND president_id = $3",
                )
                .bind(president.0)
                .bind(club.0)
                .bind(current.0)
                .execute(&mut *self.tx)
                .await?
            }
        };
        Ok(result.rows_affected() == 1)
    }

    async fn upsert_membership(&mut self, membership: &Membership) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO club_memberships (club_id, user_id, role, joined_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (club_id, user_id) DO UPDATE SET role = EXCLUDED.role",
        )
        .bind(membership.club_id.0)
        .bind(membership.user_id.0)
        .bind(membership.role.as_str())
        .bind(membership.joined_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn insert_membership(&mut self, membership: &Membership) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO club_memberships (club_id, user_id, role, joined_at) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (club_id, user_id) DO NOTHING",
        )
        .bind(membership.club_id.0)
        .bind(membership.user_id.0)
        .bind(membership.role.as_str())
        .bind(membership.joined_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn update_role(
        &mut self,
        club: ClubId,
        user: UserId,
        role: Role,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE club_memberships SET role = $1 WHERE club_id = $2 AND user_id = $3",
        )
        .bind(role.as_str())
        .bind(club.0)
        .bind(user.0)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_membership(&mut self, club: ClubId, user: UserId) -> Result<bool, StoreError> {
        let result =
            sqlx::query("DELETE FROM club_memberships WHERE club_id = $1 AND user_id = $2")
                .bind(club.0)
                .bind(user.0)
                .execute(&mut *self.tx)
                .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}

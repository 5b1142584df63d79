//! Leadership audit log
//!
//! Append-only record of committed transitions. Each event stores the hash of
//! its predecessor and a SHA-256 over its own fields, so any edit or removal
//! breaks the chain from that point on.
//!
//! The manager appends while holding its commit-order lock, so event order
//! matches the order in which transactions committed.
//!
//! Long-running processes call [`AuditLog::drain`] to ship events elsewhere.
//! The log keeps the sequence number and hash to continue from, so drained
//! segments concatenated in order verify as one chain.

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use sc_model::{ClubId, Role, UserId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use ulid::Ulid;

/// What happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditAction {
    ClubCreated { name: String },
    Claimed,
    Transferred { from: UserId, to: UserId },
    RoleChanged { target: UserId, from: Role, to: Role },
    Joined,
    Left,
}

impl AuditAction {
    /// Short label for logs
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AuditAction::ClubCreated { .. } => "club_created",
            AuditAction::Claimed => "claimed",
            AuditAction::Transferred { .. } => "transferred",
            AuditAction::RoleChanged { .. } => "role_changed",
            AuditAction::Joined => "joined",
            AuditAction::Left => "left",
        }
    }

    fn digest_into(&self, hasher: &mut Sha256) {
        hasher.update(self.label().as_bytes());
        hasher.update([0u8]);
        match self {
            AuditAction::ClubCreated { name } => {
                hasher.update(name.as_bytes());
                hasher.update([0u8]);
            }
            AuditAction::Transferred { from, to } => {
                hasher.update(from.0.as_bytes());
                hasher.update(to.0.as_bytes());
            }
            AuditAction::RoleChanged { target, from, to } => {
                hasher.update(target.0.as_bytes());
                hasher.update([from.rank(), to.rank()]);
            }
            AuditAction::Claimed | AuditAction::Joined | AuditAction::Left => {}
        }
    }
}

/// One committed transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Position in the log, from 0
    pub seq: u64,
    pub id: Ulid,
    pub timestamp: DateTime<Utc>,
    pub club_id: ClubId,
    /// User who caused the event; `None` for system actions
    pub actor: Option<UserId>,
    pub action: AuditAction,
    #[serde(with = "hex::serde")]
    pub prev_hash: [u8; 32],
    #[serde(with = "hex::serde")]
    pub hash: [u8; 32],
}

/// Audit chain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditError {
    /// Event does not link to its predecessor
    #[error("audit chain broken at seq {seq}")]
    BrokenChain { seq: u64 },

    /// Event contents do not match its hash
    #[error("audit event {seq} hash mismatch")]
    HashMismatch { seq: u64 },

    /// Sequence numbers are not contiguous
    #[error("audit sequence gap: expected {expected}, found {found}")]
    SequenceGap { expected: u64, found: u64 },
}

/// Hash-chained audit log
#[derive(Debug, Default)]
pub struct AuditLog {
    inner: Mutex<Chain>,
}

/// Retained events plus the link to whatever was drained before them
#[derive(Debug, Default)]
struct Chain {
    events: Vec<AuditEvent>,
    base_seq: u64,
    base_hash: [u8; 32],
}

impl Chain {
    fn next_seq(&self) -> u64 {
        self.base_seq + self.events.len() as u64
    }

    fn head_hash(&self) -> [u8; 32] {
        self.events.last().map_or(self.base_hash, |e| e.hash)
    }
}

impl AuditLog {
    /// Create empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from exported events (not verified)
    ///
    /// The events must start the chain at seq 0.
    #[must_use]
    pub fn from_events(events: Vec<AuditEvent>) -> Self {
        Self {
            inner: Mutex::new(Chain {
                events,
                ..Chain::default()
            }),
        }
    }

    /// Append an event, linking it to the current head
    pub fn append(&self, club_id: ClubId, actor: Option<UserId>, action: AuditAction) -> AuditEvent {
        let mut guard = self.inner.lock();
        let prev_hash = guard.head_hash();
        let mut event = AuditEvent {
            seq: guard.next_seq(),
            id: Ulid::new(),
            timestamp: Utc::now(),
            club_id,
            actor,
            action,
            prev_hash,
            hash: [0u8; 32],
        };
        event.hash = compute_hash(&event);
        guard.events.push(event.clone());
        event
    }

    /// Remove and return every retained event
    ///
    /// Later appends continue the chain from the last drained event.
    pub fn drain(&self) -> Vec<AuditEvent> {
        let mut guard = self.inner.lock();
        guard.base_hash = guard.head_hash();
        guard.base_seq = guard.next_seq();
        let drained = std::mem::take(&mut guard.events);
        tracing::debug!(count = drained.len(), next_seq = guard.base_seq, "audit log drained");
        drained
    }

    /// Retained events in order
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.inner.lock().events.clone()
    }

    /// Events for one club, in order
    #[must_use]
    pub fn events_for(&self, club_id: ClubId) -> Vec<AuditEvent> {
        self.inner
            .lock()
            .events
            .iter()
            .filter(|e| e.club_id == club_id)
            .cloned()
            .collect()
    }

    /// Number of retained events
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    /// Whether no events are retained
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().events.is_empty()
    }

    /// Recompute the chain over retained events
    ///
    /// # Errors
    /// Returns the first broken link, hash mismatch or sequence gap
    pub fn verify_integrity(&self) -> Result<(), AuditError> {
        let guard = self.inner.lock();
        let mut prev = guard.base_hash;
        for (expected, e) in (guard.base_seq..).zip(guard.events.iter()) {
            if e.seq != expected {
                return Err(AuditError::SequenceGap {
                    expected,
                    found: e.seq,
                });
            }
            if e.prev_hash != prev {
                return Err(AuditError::BrokenChain { seq: e.seq });
            }
            if e.hash != compute_hash(e) {
                return Err(AuditError::HashMismatch { seq: e.seq });
            }
            prev = e.hash;
        }
        Ok(())
    }
}

fn compute_hash(event: &AuditEvent) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(event.seq.to_le_bytes());
    hasher.update(event.id.to_bytes());
    hasher.update(
        event
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Nanos, true)
            .as_bytes(),
    );
    hasher.update(event.club_id.0.as_bytes());
    match event.actor {
        Some(actor) => {
            hasher.update([1u8]);
            hasher.update(actor.0.as_bytes());
        }
        None => hasher.update([0u8]),
    }
    event.action.digest_into(&mut hasher);
    hasher.update(event.prev_hash);
    hasher.finalize().into()
}

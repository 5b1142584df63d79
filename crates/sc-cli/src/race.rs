//! Concurrent claim race
//!
//! For each club, spawn `contenders` claim tasks at once and count winners.
//! A club passes when exactly one claim wins and the invariant holds.

use futures::future::join_all;
use sc_core::{ClaimError, ClubId, ClubManager, NewClub, UserId};
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;

/// Race parameters
#[derive(Debug, Clone, Copy)]
pub struct RaceConfig {
    /// Concurrent claimants per club
    pub contenders: usize,
    /// Number of clubs raced in parallel
    pub clubs: usize,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            contenders: 16,
            clubs: 4,
        }
    }
}

/// Outcome for one club
#[derive(Debug, Clone, Serialize)]
pub struct ClubRaceResult {
    pub club_id: ClubId,
    pub winners: Vec<UserId>,
    pub already_claimed: usize,
    pub other_errors: Vec<String>,
    pub violation: Option<String>,
}

impl ClubRaceResult {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.winners.len() == 1 && self.other_errors.is_empty() && self.violation.is_none()
    }
}

/// Outcome for all clubs
#[derive(Debug, Clone, Serialize)]
pub struct RaceReport {
    pub contenders: usize,
    pub clubs: Vec<ClubRaceResult>,
}

impl RaceReport {
    /// An empty race proves nothing and does not pass
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.clubs.is_empty() && self.clubs.iter().all(ClubRaceResult::passed)
    }

    /// Human-readable report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut out = String::from("Claim Race Report:\n");
        let _ = writeln!(out, "  Clubs: {}", self.clubs.len());
        let _ = writeln!(out, "  Contenders per club: {}", self.contenders);
        for r in &self.clubs {
            let _ = writeln!(
                out,
                "  {} winners={} already_claimed={} errors={} violation={}",
                r.club_id,
                r.winners.len(),
                r.already_claimed,
                r.other_errors.len(),
                r.violation.as_deref().unwrap_or("none"),
            );
        }
        let _ = writeln!(
            out,
            "  Result: {}",
            if self.passed() { "PASSED" } else { "FAILED" }
        );
        out
    }
}

/// Run the race
///
/// # Errors
/// Returns an error if the task count overflows, a club cannot be created or
/// a task panics
pub async fn run_race(manager: Arc<ClubManager>, config: RaceConfig) -> anyhow::Result<RaceReport> {
    let Some(total) = config.clubs.checked_mul(config.contenders) else {
        anyhow::bail!(
            "race too large: {} clubs x {} contenders",
            config.clubs,
            config.contenders
        );
    };

    let mut clubs = Vec::with_capacity(config.clubs);
    for i in 0..config.clubs {
        let club = manager
            .create_club(NewClub::new(format!("Race Club {i}")))
            .await?;
        clubs.push(club.id);
    }

    let mut tasks = Vec::with_capacity(total);
    for &club_id in &clubs {
        for _ in 0..config.contenders {
            let manager = Arc::clone(&manager);
            let contender = UserId::new();
            tasks.push(tokio::spawn(async move {
                (club_id, contender, manager.claim(club_id, contender, true).await)
            }));
        }
    }
    tracing::info!(clubs = clubs.len(), tasks = tasks.len(), "claim race started");

    let mut results: Vec<ClubRaceResult> = clubs
        .iter()
        .map(|&club_id| ClubRaceResult {
            club_id,
            winners: Vec::new(),
            already_claimed: 0,
            other_errors: Vec::new(),
            violation: None,
        })
        .collect();

    for joined in join_all(tasks).await {
        let (club_id, contender, outcome) = joined?;
        let Some(entry) = results.iter_mut().find(|r| r.club_id == club_id) else {
            continue;
        };
        match outcome {
            Ok(_) => entry.winners.push(contender),
            Err(ClaimError::AlreadyClaimed(_)) => entry.already_claimed += 1,
            Err(e) => entry.other_errors.push(e.to_string()),
        }
    }

    for entry in &mut results {
        if let Err(e) = manager.verify_club(entry.club_id).await {
            entry.violation = Some(e.to_string());
        }
    }

    let report = RaceReport {
        contenders: config.contenders,
        clubs: results,
    };
    tracing::info!(passed = report.passed(), "claim race finished");
    Ok(report)
}

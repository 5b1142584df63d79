//! SchoolConnect CLI harness
//!
//! Drives the club manager through scripted and concurrent workloads:
//! - `scenario`: the claim / promote / transfer walkthrough
//! - `race`: many concurrent claims per club
//! - `audit`: scenario plus audit log dump
//! - `verify-log`: integrity check of an exported audit log

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod race;
pub mod scenario;

use anyhow::Context;
use sc_core::{AuditEvent, AuditLog, ManagerConfig};
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use race::{run_race, ClubRaceResult, RaceConfig, RaceReport};
pub use scenario::{run_scenario, ScenarioReport, StepOutcome};

/// Install the global subscriber; logs go to stderr so stdout stays parseable
pub fn init_logging(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Load configuration, or defaults when no path is given
///
/// # Errors
/// Returns an error if the file cannot be read or is invalid
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ManagerConfig> {
    match path {
        Some(path) => ManagerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(ManagerConfig::default()),
    }
}

/// Read an exported audit log (JSON array of events)
///
/// # Errors
/// Returns an error if the file cannot be read or parsed
pub fn read_audit_log(path: &Path) -> anyhow::Result<AuditLog> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading audit log {}", path.display()))?;
    let events: Vec<AuditEvent> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing audit log {}", path.display()))?;
    Ok(AuditLog::from_events(events))
}

/// Write the audit log as a JSON array of events
///
/// # Errors
/// Returns an error if serialization or the write fails
pub fn write_audit_log(log: &AuditLog, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&log.events())?;
    std::fs::write(path, json).with_context(|| format!("writing audit log {}", path.display()))?;
    Ok(())
}

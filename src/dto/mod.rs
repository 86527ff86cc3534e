//! Request/response shapes exchanged with polling clients.

use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Shared small response shapes.
pub mod common;
/// Game snapshot, vote, and phase-advance shapes.
pub mod game;
/// Healthcheck response.
pub mod health;
/// Leaderboard rollup shapes.
pub mod leaderboard;
/// Lobby create/join/start shapes.
pub mod lobby;
/// Validation helpers for DTO fields.
pub mod validation;

pub(crate) fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

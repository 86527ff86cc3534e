use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::dto::validation::validate_player_name;

/// Query parameters for the leaderboard rollup.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    /// Display name leaderboards are keyed on (case-insensitive).
    #[validate(custom(function = validate_player_name))]
    pub player_name: String,
}

/// A player's lifetime stats across all finished games.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnStats {
    /// Finished games played.
    pub total_games: u32,
    /// Games won.
    pub total_wins: u32,
    /// Win percentage, rounded.
    pub win_rate: u32,
    /// Games in which the player was the imposter.
    pub times_imposter: u32,
    /// Games in which the player survived as the imposter.
    pub times_survived: u32,
}

/// Head-to-head rollup against one opponent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpponentStats {
    /// Opponent display name.
    pub opponent_name: String,
    /// Games played together.
    pub games_played: u32,
    /// Games the player won.
    pub wins: u32,
    /// Games the player lost.
    pub losses: u32,
    /// Win percentage, rounded.
    pub win_rate: u32,
    /// Games where the player was caught as the imposter.
    pub times_caught_as_imposter: u32,
    /// Games where the player survived as the imposter.
    pub times_survived_as_imposter: u32,
    /// Games where the player was the imposter.
    pub times_was_imposter: u32,
}

/// Leaderboard payload: own lifetime stats plus per-opponent breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    /// The player the rollup is about.
    pub player_name: String,
    /// Lifetime stats.
    pub own_stats: OwnStats,
    /// Per-opponent rollups, most-played first.
    pub leaderboard: Vec<OpponentStats>,
}

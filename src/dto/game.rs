use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{LobbyRecord, LobbyStatus, PlayerRecord, ScoreRecord, VoteRecord},
    dto::validation::{validate_lobby_code, validate_player_id},
    state::phase::{AdvanceTarget, RoundPhase},
};

/// Public projection of a lobby row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LobbySummary {
    /// Lobby code.
    pub code: String,
    /// Player id of the host.
    pub host_player_id: String,
    /// Lifecycle status.
    pub status: LobbyStatus,
    /// Chosen word category, once the game started.
    pub category: Option<String>,
    /// Discussion countdown length in seconds.
    pub round_duration_seconds: u32,
    /// Number of rounds the game runs for.
    pub total_rounds: u32,
    /// 1-indexed current round number; 0 while waiting.
    pub current_round: u32,
}

impl From<LobbyRecord> for LobbySummary {
    fn from(value: LobbyRecord) -> Self {
        Self {
            code: value.code,
            host_player_id: value.host_player_id,
            status: value.status,
            category: value.category,
            round_duration_seconds: value.round_duration_secs,
            total_rounds: value.total_rounds,
            current_round: value.current_round,
        }
    }
}

/// Public projection of a player row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    /// Player id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Assigned avatar color.
    pub avatar_color: String,
    /// Whether this player is the host.
    pub is_host: bool,
}

impl From<PlayerRecord> for PlayerSummary {
    fn from(value: PlayerRecord) -> Self {
        Self {
            id: value.id,
            name: value.name,
            avatar_color: value.avatar_color,
            is_host: value.is_host,
        }
    }
}

/// Current round as seen by polling clients.
///
/// `elapsed_seconds` is computed server-side at response time from the
/// round's anchor timestamp; it is the authoritative input to client-side
/// countdown extrapolation. The word and imposter id are included for every
/// player; the client decides what to show whom (anti-cheat is out of
/// scope).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    /// 1-indexed round number.
    pub round_number: u32,
    /// Current phase.
    pub phase: RoundPhase,
    /// Category the word was drawn from.
    pub category: String,
    /// The round's secret word.
    pub word: String,
    /// The round's imposter.
    pub imposter_id: String,
    /// Seconds elapsed since the anchor timestamp, at response time.
    pub elapsed_seconds: f64,
    /// RFC3339 anchor timestamp.
    pub started_at: String,
    /// RFC3339 end timestamp, set once the round reached results.
    pub ended_at: Option<String>,
}

/// A cast vote, visible to all players of the round.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteSummary {
    /// The voting player.
    pub voter_id: String,
    /// The suspected imposter.
    pub voted_for_id: String,
}

impl From<VoteRecord> for VoteSummary {
    fn from(value: VoteRecord) -> Self {
        Self {
            voter_id: value.voter_id,
            voted_for_id: value.voted_for_id,
        }
    }
}

/// Per-player score counters as shown on scoreboards.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    /// Player the counters belong to.
    pub player_id: String,
    /// Accumulated points.
    pub total_score: u32,
    /// Rounds in which this player voted the imposter out.
    pub correct_votes: u32,
    /// Rounds survived while being the imposter.
    pub survived_as_imposter: u32,
    /// Rounds played as the imposter.
    pub rounds_as_imposter: u32,
}

impl From<ScoreRecord> for ScoreSummary {
    fn from(value: ScoreRecord) -> Self {
        Self {
            player_id: value.player_id,
            total_score: value.total_score,
            correct_votes: value.correct_votes,
            survived_as_imposter: value.survived_as_imposter,
            rounds_as_imposter: value.rounds_as_imposter,
        }
    }
}

/// The full poll snapshot consumed every ~2s by every client.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshotResponse {
    /// Lobby settings and status.
    pub lobby: LobbySummary,
    /// Current round; `None` while the lobby is still waiting.
    pub round: Option<RoundSummary>,
    /// Players in join order.
    pub players: Vec<PlayerSummary>,
    /// Ids of permanently eliminated players.
    pub eliminated_ids: Vec<String>,
    /// Votes cast in the current round.
    pub votes: Vec<VoteSummary>,
    /// Score counters for every player.
    pub scores: Vec<ScoreSummary>,
}

/// Payload used to cast or change a vote.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    /// Lobby code.
    #[validate(custom(function = validate_lobby_code))]
    pub code: String,
    /// The voting player.
    #[validate(custom(function = validate_player_id))]
    pub player_id: String,
    /// The suspected imposter.
    #[validate(custom(function = validate_player_id))]
    pub voted_for_id: String,
}

/// Host request to advance the current round's phase.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdvancePhaseRequest {
    /// Lobby code.
    #[validate(custom(function = validate_lobby_code))]
    pub code: String,
    /// Caller identity; must be the lobby host.
    #[validate(custom(function = validate_player_id))]
    pub player_id: String,
    /// Requested transition.
    pub phase: AdvanceTarget,
}

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::state::phase::RoundPhase;

/// Client-generated player identifier (bots use a reserved `bot-` prefix).
pub type PlayerId = String;
/// Six-character human-shareable lobby code.
pub type LobbyCode = String;

/// Lifecycle status of a lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LobbyStatus {
    /// Waiting room: players may still join.
    Waiting,
    /// A game is in progress; joining is closed.
    Playing,
    /// The game completed; the record is immutable from here on.
    Finished,
}

/// Lobby row as persisted by the session store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LobbyRecord {
    /// Unique uppercase alphanumeric code identifying the lobby.
    pub code: LobbyCode,
    /// Player id of the host (first player, created with the lobby).
    pub host_player_id: PlayerId,
    /// Current lifecycle status.
    pub status: LobbyStatus,
    /// Word category chosen at game start; `None` while waiting.
    pub category: Option<String>,
    /// Discussion countdown length in seconds.
    pub round_duration_secs: u32,
    /// Number of rounds the game runs for.
    pub total_rounds: u32,
    /// 1-indexed number of the round currently in play; 0 while waiting.
    pub current_round: u32,
}

/// Player row. Created on join, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRecord {
    /// Stable identifier supplied by the client.
    pub id: PlayerId,
    /// Owning lobby; a player belongs to exactly one lobby.
    pub lobby_code: LobbyCode,
    /// Display name.
    pub name: String,
    /// Hex color assigned from the configured avatar palette.
    pub avatar_color: String,
    /// Whether this player created the lobby.
    pub is_host: bool,
    /// Join timestamp; defines the stable player ordering.
    pub joined_at: SystemTime,
}

/// One play-through of reveal → discuss → vote → results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundRecord {
    /// Owning lobby.
    pub lobby_code: LobbyCode,
    /// Unique per lobby, monotonically increasing from 1.
    pub round_number: u32,
    /// The player holding the divergent word this round.
    pub imposter_id: PlayerId,
    /// The secret word everyone but the imposter received.
    pub word: String,
    /// Category the word was drawn from.
    pub category: String,
    /// Current phase of the round.
    pub phase: RoundPhase,
    /// Anchor timestamp for elapsed-time computation (reset on discussion).
    pub started_at: SystemTime,
    /// Set once the round reaches `results`.
    pub ended_at: Option<SystemTime>,
}

/// A player's vote for the round. At most one per voter; later votes replace
/// earlier ones while keeping the original row position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteRecord {
    /// The player casting the vote.
    pub voter_id: PlayerId,
    /// The suspected imposter.
    pub voted_for_id: PlayerId,
}

/// Append-only elimination marker; presence anywhere in the lobby means the
/// player is out for the remainder of the game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EliminationRecord {
    /// Round in which the elimination happened.
    pub round_number: u32,
    /// The eliminated player.
    pub player_id: PlayerId,
}

/// Per-player score counters. Only ever incremented.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreRecord {
    /// Player the counters belong to.
    pub player_id: PlayerId,
    /// Accumulated points.
    pub total_score: u32,
    /// Rounds in which this player voted the imposter out.
    pub correct_votes: u32,
    /// Rounds survived while being the imposter.
    pub survived_as_imposter: u32,
    /// Rounds played as the imposter.
    pub rounds_as_imposter: u32,
}

impl ScoreRecord {
    /// Fresh zeroed counters for a newly joined player.
    pub fn zeroed(player_id: PlayerId) -> Self {
        Self {
            player_id,
            total_score: 0,
            correct_votes: 0,
            survived_as_imposter: 0,
            rounds_as_imposter: 0,
        }
    }
}

/// Increment set applied to one player's counters inside a store transaction.
///
/// Applied as `value = value + delta` at the store level so concurrent phase
/// advances cannot lose updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreDelta {
    /// Player whose counters are incremented.
    pub player_id: PlayerId,
    /// Points to add.
    pub total_score: u32,
    /// Correct-vote rounds to add.
    pub correct_votes: u32,
    /// Survived-as-imposter rounds to add.
    pub survived_as_imposter: u32,
    /// Rounds-as-imposter to add.
    pub rounds_as_imposter: u32,
}

impl ScoreDelta {
    /// A delta that adds nothing yet, ready to be accumulated into.
    pub fn zeroed(player_id: PlayerId) -> Self {
        Self {
            player_id,
            total_score: 0,
            correct_votes: 0,
            survived_as_imposter: 0,
            rounds_as_imposter: 0,
        }
    }
}

/// One row per ordered pair of players per finished game, feeding the
/// leaderboard rollups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Lobby the game was played in.
    pub lobby_code: LobbyCode,
    /// Player this row is about.
    pub player_id: PlayerId,
    /// Display name of the player (leaderboards key on names).
    pub player_name: String,
    /// Display name of the opponent in this ordered pair.
    pub opponent_name: String,
    /// Whether the player had the highest total score.
    pub won: bool,
    /// Whether the player was the imposter at least once.
    pub was_imposter: bool,
    /// Whether the player was voted out while being the imposter.
    pub caught_as_imposter: bool,
    /// Whether the player survived at least one round as the imposter.
    pub survived_as_imposter: bool,
    /// When the game finished.
    pub played_at: SystemTime,
}

use std::error::Error;
use std::time::SystemTime;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::dao::models::{
    EliminationRecord, HistoryRecord, LobbyRecord, PlayerRecord, RoundRecord, ScoreDelta,
    ScoreRecord, VoteRecord,
};
use crate::state::phase::RoundPhase;

/// Result alias for session-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by store backends regardless of the underlying engine.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not serve the request.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Operation that failed.
        message: String,
        /// Backend-specific cause.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StoreError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StoreError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Phase compare-and-swap applied to the current round.
///
/// The swap succeeds only when the round is still in `expected`; timer fields
/// are touched only when the corresponding option is set.
#[derive(Debug, Clone)]
pub struct PhaseChange {
    /// Phase the round must currently be in.
    pub expected: RoundPhase,
    /// Phase to move to.
    pub next: RoundPhase,
    /// New countdown anchor (`→ discussion` resets it).
    pub started_at: Option<SystemTime>,
    /// Round end timestamp (`→ results` sets it).
    pub ended_at: Option<SystemTime>,
}

/// The single transaction that resolves a round into `results`.
///
/// Backends must apply the phase swap (`voting → results`), the optional
/// elimination append, and the score increments atomically; when the swap
/// loses (the round already left `voting`) none of the side effects run.
#[derive(Debug, Clone)]
pub struct RoundResolution {
    /// Round being resolved.
    pub round_number: u32,
    /// End timestamp recorded on the round.
    pub ended_at: SystemTime,
    /// Elimination to append, if the tally elected anyone. Duplicate player
    /// ids are skipped (elimination rows are append-only, conflict-free).
    pub elimination: Option<EliminationRecord>,
    /// Per-player counter increments for this round's scoring.
    pub score_deltas: Vec<ScoreDelta>,
}

/// Abstraction over the durable session tables (lobby, player, round, vote,
/// elimination, score, history).
///
/// Every method is a single atomic unit against the backend; the round engine
/// is the sole writer of round/phase/elimination/score state and relies on
/// the CAS semantics of [`SessionStore::change_phase`] and
/// [`SessionStore::resolve_round`] to stay race-free under concurrent
/// polling clients.
pub trait SessionStore: Send + Sync {
    /// Insert a fresh lobby with its host and the host's zeroed score.
    /// Returns `false` when the code is already taken (caller retries with a
    /// new code).
    fn insert_lobby(
        &self,
        lobby: LobbyRecord,
        host: PlayerRecord,
        host_score: ScoreRecord,
    ) -> BoxFuture<'static, StoreResult<bool>>;

    /// Fetch a lobby by code.
    fn find_lobby(&self, code: &str) -> BoxFuture<'static, StoreResult<Option<LobbyRecord>>>;

    /// Replace a lobby row (status / settings / round counter mutations).
    fn update_lobby(&self, lobby: LobbyRecord) -> BoxFuture<'static, StoreResult<()>>;

    /// Append a player and their zeroed score to an existing lobby.
    fn insert_player(
        &self,
        player: PlayerRecord,
        score: ScoreRecord,
    ) -> BoxFuture<'static, StoreResult<()>>;

    /// All players of a lobby in join order.
    fn list_players(&self, code: &str) -> BoxFuture<'static, StoreResult<Vec<PlayerRecord>>>;

    /// Atomically apply a lobby mutation and insert its next round row.
    /// Returns `false` without side effects when that round number already
    /// exists (a concurrent advance won the race).
    fn start_round(
        &self,
        lobby: LobbyRecord,
        round: RoundRecord,
    ) -> BoxFuture<'static, StoreResult<bool>>;

    /// Fetch one round of a lobby.
    fn find_round(
        &self,
        code: &str,
        round_number: u32,
    ) -> BoxFuture<'static, StoreResult<Option<RoundRecord>>>;

    /// Compare-and-swap the phase of a round. Returns `false` when the round
    /// is missing or no longer in the expected phase.
    fn change_phase(
        &self,
        code: &str,
        round_number: u32,
        change: PhaseChange,
    ) -> BoxFuture<'static, StoreResult<bool>>;

    /// Run the results transaction (see [`RoundResolution`]). Returns `false`
    /// when the CAS loses and nothing was applied.
    fn resolve_round(
        &self,
        code: &str,
        resolution: RoundResolution,
    ) -> BoxFuture<'static, StoreResult<bool>>;

    /// Insert or replace the voter's vote for the round, keeping the original
    /// row position on replacement.
    fn upsert_vote(
        &self,
        code: &str,
        round_number: u32,
        vote: VoteRecord,
    ) -> BoxFuture<'static, StoreResult<()>>;

    /// Votes for a round in row (insertion) order.
    fn list_votes(
        &self,
        code: &str,
        round_number: u32,
    ) -> BoxFuture<'static, StoreResult<Vec<VoteRecord>>>;

    /// All eliminations recorded for a lobby so far.
    fn list_eliminations(
        &self,
        code: &str,
    ) -> BoxFuture<'static, StoreResult<Vec<EliminationRecord>>>;

    /// Score counters for every player of a lobby.
    fn list_scores(&self, code: &str) -> BoxFuture<'static, StoreResult<Vec<ScoreRecord>>>;

    /// Append finished-game history rows (best-effort caller side).
    fn insert_history(
        &self,
        entries: Vec<HistoryRecord>,
    ) -> BoxFuture<'static, StoreResult<()>>;

    /// History rows for a player, matched case-insensitively on name.
    fn history_for_player(
        &self,
        player_name: &str,
    ) -> BoxFuture<'static, StoreResult<Vec<HistoryRecord>>>;

    /// Probe backend connectivity.
    fn health_check(&self) -> BoxFuture<'static, StoreResult<()>>;
}

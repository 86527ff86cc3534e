use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use futures::future::BoxFuture;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tracing::warn;

use crate::{dao::models::PlayerId, dto::game::GameSnapshotResponse, state::phase::RoundPhase};

/// Reserved id prefix identifying simulated players.
pub const BOT_ID_PREFIX: &str = "bot-";

/// Bots vote after a randomized delay inside this range.
const MIN_DELAY_MS: u64 = 1000;
const MAX_DELAY_MS: u64 = 5000;

/// A single vote scheduled for a simulated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedVote {
    /// Lobby the vote belongs to.
    pub lobby_code: String,
    /// Round the vote belongs to.
    pub round_number: u32,
    /// The bot casting the vote.
    pub voter_id: PlayerId,
    /// Randomly chosen target (never the bot itself).
    pub voted_for_id: PlayerId,
    /// Randomized submission delay.
    pub delay: Duration,
}

/// Transport used to deliver planned votes; tests substitute a recorder.
pub trait VoteSink: Send + Sync {
    /// Submit one vote to the server.
    fn submit_vote(
        &self,
        lobby_code: String,
        voter_id: PlayerId,
        voted_for_id: PlayerId,
    ) -> BoxFuture<'static, anyhow::Result<()>>;
}

/// Schedules votes for simulated players while a round is in voting.
///
/// Planning is idempotent per `(lobby, round, bot)`: a marker recorded at
/// planning time, before the delayed submission fires, keeps repeated
/// polling ticks from racing a pending timer into double votes.
pub struct BotDirector {
    scheduled: DashMap<(String, u32, PlayerId), ()>,
    rng: Mutex<StdRng>,
}

impl Default for BotDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl BotDirector {
    /// Director with an OS-seeded random source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Director with a caller-provided random source (deterministic tests).
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            scheduled: DashMap::new(),
            rng: Mutex::new(rng),
        }
    }

    /// Plan at most one vote per bot that still owes one this round.
    ///
    /// Returns an empty plan outside the voting phase. Bots that already
    /// voted (per the snapshot) or that are already scheduled are skipped;
    /// targets are drawn uniformly from the *other* active players.
    pub fn plan_votes(&self, snapshot: &GameSnapshotResponse) -> Vec<PlannedVote> {
        let Some(round) = snapshot.round.as_ref() else {
            return Vec::new();
        };
        if round.phase != RoundPhase::Voting {
            return Vec::new();
        }

        let eliminated: HashSet<&str> = snapshot
            .eliminated_ids
            .iter()
            .map(String::as_str)
            .collect();
        let active: Vec<&crate::dto::game::PlayerSummary> = snapshot
            .players
            .iter()
            .filter(|player| !eliminated.contains(player.id.as_str()))
            .collect();
        let already_voted: HashSet<&str> = snapshot
            .votes
            .iter()
            .map(|vote| vote.voter_id.as_str())
            .collect();

        let mut plans = Vec::new();
        for bot in active
            .iter()
            .filter(|player| player.id.starts_with(BOT_ID_PREFIX))
            .filter(|player| !already_voted.contains(player.id.as_str()))
        {
            let key = (
                snapshot.lobby.code.clone(),
                round.round_number,
                bot.id.clone(),
            );
            // mark before the delayed action fires; losing this race means
            // another planning tick owns the vote
            if self.scheduled.insert(key, ()).is_some() {
                continue;
            }

            let targets: Vec<&&crate::dto::game::PlayerSummary> = active
                .iter()
                .filter(|player| player.id != bot.id)
                .collect();
            if targets.is_empty() {
                continue;
            }

            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let Some(target) = targets.choose(&mut *rng) else {
                continue;
            };
            let delay = Duration::from_millis(rng.random_range(MIN_DELAY_MS..=MAX_DELAY_MS));

            plans.push(PlannedVote {
                lobby_code: snapshot.lobby.code.clone(),
                round_number: round.round_number,
                voter_id: bot.id.clone(),
                voted_for_id: target.id.clone(),
                delay,
            });
        }
        plans
    }

    /// Execute the plans on the runtime: sleep each plan's delay, then submit
    /// through the sink. Failures are logged, never retried; the bot simply
    /// sits the round out.
    pub fn spawn_votes(&self, sink: Arc<dyn VoteSink>, plans: Vec<PlannedVote>) {
        for plan in plans {
            let sink = Arc::clone(&sink);
            tokio::spawn(async move {
                tokio::time::sleep(plan.delay).await;
                if let Err(err) = sink
                    .submit_vote(plan.lobby_code, plan.voter_id.clone(), plan.voted_for_id)
                    .await
                {
                    warn!(bot = %plan.voter_id, error = %err, "bot vote failed");
                }
            });
        }
    }
}

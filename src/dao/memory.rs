use std::collections::HashMap;
use std::sync::Mutex;

use dashmap::DashMap;
use futures::future::{BoxFuture, ready};
use indexmap::IndexMap;
use tracing::warn;

use crate::dao::models::{
    EliminationRecord, HistoryRecord, LobbyCode, LobbyRecord, PlayerId, PlayerRecord, RoundRecord,
    ScoreRecord, VoteRecord,
};
use crate::dao::store::{PhaseChange, RoundResolution, SessionStore, StoreResult};
use crate::state::phase::RoundPhase;

/// In-process session store backend.
///
/// Each lobby's tables live behind one mutex, which is what makes every store
/// operation a single atomic unit: phase CAS, vote upsert, and the results
/// transaction all run under the same per-lobby lock. History rows are global
/// (queried across lobbies by player name) and get their own lock.
#[derive(Default)]
pub struct MemoryStore {
    lobbies: DashMap<LobbyCode, Mutex<LobbyTables>>,
    history: Mutex<Vec<HistoryRecord>>,
}

/// Row sets owned by a single lobby.
#[derive(Debug)]
struct LobbyTables {
    lobby: LobbyRecord,
    players: Vec<PlayerRecord>,
    rounds: Vec<RoundRecord>,
    /// Per round: voter → target, insertion-ordered so replacements keep the
    /// original row position.
    votes: HashMap<u32, IndexMap<PlayerId, PlayerId>>,
    eliminations: Vec<EliminationRecord>,
    scores: IndexMap<PlayerId, ScoreRecord>,
}

impl MemoryStore {
    /// Fresh empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_lobby<T>(&self, code: &str, f: impl FnOnce(&mut LobbyTables) -> T) -> Option<T> {
        let entry = self.lobbies.get(code)?;
        let mut tables = entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Some(f(&mut tables))
    }
}

impl SessionStore for MemoryStore {
    fn insert_lobby(
        &self,
        lobby: LobbyRecord,
        host: PlayerRecord,
        host_score: ScoreRecord,
    ) -> BoxFuture<'static, StoreResult<bool>> {
        let inserted = match self.lobbies.entry(lobby.code.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let mut scores = IndexMap::new();
                scores.insert(host_score.player_id.clone(), host_score);
                slot.insert(Mutex::new(LobbyTables {
                    lobby,
                    players: vec![host],
                    rounds: Vec::new(),
                    votes: HashMap::new(),
                    eliminations: Vec::new(),
                    scores,
                }));
                true
            }
        };
        Box::pin(ready(Ok(inserted)))
    }

    fn find_lobby(&self, code: &str) -> BoxFuture<'static, StoreResult<Option<LobbyRecord>>> {
        let lobby = self.with_lobby(code, |tables| tables.lobby.clone());
        Box::pin(ready(Ok(lobby)))
    }

    fn update_lobby(&self, lobby: LobbyRecord) -> BoxFuture<'static, StoreResult<()>> {
        let found = self
            .with_lobby(&lobby.code.clone(), |tables| tables.lobby = lobby)
            .is_some();
        if !found {
            warn!("update for unknown lobby ignored");
        }
        Box::pin(ready(Ok(())))
    }

    fn insert_player(
        &self,
        player: PlayerRecord,
        score: ScoreRecord,
    ) -> BoxFuture<'static, StoreResult<()>> {
        let code = player.lobby_code.clone();
        let found = self
            .with_lobby(&code, |tables| {
                tables.players.push(player);
                tables.scores.insert(score.player_id.clone(), score);
            })
            .is_some();
        if !found {
            warn!(%code, "player insert for unknown lobby ignored");
        }
        Box::pin(ready(Ok(())))
    }

    fn list_players(&self, code: &str) -> BoxFuture<'static, StoreResult<Vec<PlayerRecord>>> {
        let players = self
            .with_lobby(code, |tables| tables.players.clone())
            .unwrap_or_default();
        Box::pin(ready(Ok(players)))
    }

    fn start_round(
        &self,
        lobby: LobbyRecord,
        round: RoundRecord,
    ) -> BoxFuture<'static, StoreResult<bool>> {
        let started = self
            .with_lobby(&lobby.code.clone(), |tables| {
                if tables
                    .rounds
                    .iter()
                    .any(|existing| existing.round_number == round.round_number)
                {
                    return false;
                }
                tables.lobby = lobby;
                tables.rounds.push(round);
                true
            })
            .unwrap_or(false);
        Box::pin(ready(Ok(started)))
    }

    fn find_round(
        &self,
        code: &str,
        round_number: u32,
    ) -> BoxFuture<'static, StoreResult<Option<RoundRecord>>> {
        let round = self
            .with_lobby(code, |tables| {
                tables
                    .rounds
                    .iter()
                    .find(|round| round.round_number == round_number)
                    .cloned()
            })
            .flatten();
        Box::pin(ready(Ok(round)))
    }

    fn change_phase(
        &self,
        code: &str,
        round_number: u32,
        change: PhaseChange,
    ) -> BoxFuture<'static, StoreResult<bool>> {
        let swapped = self
            .with_lobby(code, |tables| {
                let Some(round) = tables
                    .rounds
                    .iter_mut()
                    .find(|round| round.round_number == round_number)
                else {
                    return false;
                };
                if round.phase != change.expected {
                    return false;
                }
                round.phase = change.next;
                if let Some(started_at) = change.started_at {
                    round.started_at = started_at;
                }
                if let Some(ended_at) = change.ended_at {
                    round.ended_at = Some(ended_at);
                }
                true
            })
            .unwrap_or(false);
        Box::pin(ready(Ok(swapped)))
    }

    fn resolve_round(
        &self,
        code: &str,
        resolution: RoundResolution,
    ) -> BoxFuture<'static, StoreResult<bool>> {
        let resolved = self
            .with_lobby(code, |tables| {
                let Some(round) = tables
                    .rounds
                    .iter_mut()
                    .find(|round| round.round_number == resolution.round_number)
                else {
                    return false;
                };
                if round.phase != RoundPhase::Voting {
                    return false;
                }
                round.phase = RoundPhase::Results;
                round.ended_at = Some(resolution.ended_at);

                if let Some(elimination) = resolution.elimination {
                    let already_out = tables
                        .eliminations
                        .iter()
                        .any(|existing| existing.player_id == elimination.player_id);
                    if !already_out {
                        tables.eliminations.push(elimination);
                    }
                }

                for delta in resolution.score_deltas {
                    match tables.scores.get_mut(&delta.player_id) {
                        Some(score) => {
                            score.total_score += delta.total_score;
                            score.correct_votes += delta.correct_votes;
                            score.survived_as_imposter += delta.survived_as_imposter;
                            score.rounds_as_imposter += delta.rounds_as_imposter;
                        }
                        None => warn!(player_id = %delta.player_id, "score delta for unknown player"),
                    }
                }
                true
            })
            .unwrap_or(false);
        Box::pin(ready(Ok(resolved)))
    }

    fn upsert_vote(
        &self,
        code: &str,
        round_number: u32,
        vote: VoteRecord,
    ) -> BoxFuture<'static, StoreResult<()>> {
        self.with_lobby(code, |tables| {
            tables
                .votes
                .entry(round_number)
                .or_default()
                .insert(vote.voter_id, vote.voted_for_id);
        });
        Box::pin(ready(Ok(())))
    }

    fn list_votes(
        &self,
        code: &str,
        round_number: u32,
    ) -> BoxFuture<'static, StoreResult<Vec<VoteRecord>>> {
        let votes = self
            .with_lobby(code, |tables| {
                tables
                    .votes
                    .get(&round_number)
                    .map(|round_votes| {
                        round_votes
                            .iter()
                            .map(|(voter_id, voted_for_id)| VoteRecord {
                                voter_id: voter_id.clone(),
                                voted_for_id: voted_for_id.clone(),
                            })
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .unwrap_or_default();
        Box::pin(ready(Ok(votes)))
    }

    fn list_eliminations(
        &self,
        code: &str,
    ) -> BoxFuture<'static, StoreResult<Vec<EliminationRecord>>> {
        let eliminations = self
            .with_lobby(code, |tables| tables.eliminations.clone())
            .unwrap_or_default();
        Box::pin(ready(Ok(eliminations)))
    }

    fn list_scores(&self, code: &str) -> BoxFuture<'static, StoreResult<Vec<ScoreRecord>>> {
        let scores = self
            .with_lobby(code, |tables| tables.scores.values().cloned().collect())
            .unwrap_or_default();
        Box::pin(ready(Ok(scores)))
    }

    fn insert_history(
        &self,
        entries: Vec<HistoryRecord>,
    ) -> BoxFuture<'static, StoreResult<()>> {
        let mut history = self
            .history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        history.extend(entries);
        Box::pin(ready(Ok(())))
    }

    fn history_for_player(
        &self,
        player_name: &str,
    ) -> BoxFuture<'static, StoreResult<Vec<HistoryRecord>>> {
        let needle = player_name.to_lowercase();
        let history = self
            .history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let rows = history
            .iter()
            .filter(|row| row.player_name.to_lowercase() == needle)
            .cloned()
            .collect();
        Box::pin(ready(Ok(rows)))
    }

    fn health_check(&self) -> BoxFuture<'static, StoreResult<()>> {
        Box::pin(ready(Ok(())))
    }
}

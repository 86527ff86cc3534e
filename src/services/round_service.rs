//! The round engine: poll snapshots, vote collection, and the phase state
//! machine driving every round from reveal to results.
//!
//! This module is the sole writer of round/phase/elimination/score state.
//! Transitions with side effects go through CAS-guarded store transactions so
//! concurrent polling clients cannot double-apply them.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::SystemTime;

use rand::seq::IndexedRandom;
use tracing::error;
use validator::Validate;

use crate::{
    dao::{
        models::{EliminationRecord, LobbyRecord, LobbyStatus, PlayerId, PlayerRecord,
                 RoundRecord, VoteRecord},
        store::{PhaseChange, RoundResolution, SessionStore},
    },
    dto::{
        format_system_time,
        game::{AdvancePhaseRequest, GameSnapshotResponse, RoundSummary, VoteRequest},
    },
    error::ServiceError,
    services::{history_service, scoring, tally},
    state::{
        SharedState,
        phase::{AdvanceTarget, RoundPhase},
    },
};

/// Players still in the game: everyone without an elimination row.
pub fn active_players<'a>(
    players: &'a [PlayerRecord],
    eliminated: &HashSet<PlayerId>,
) -> Vec<&'a PlayerRecord> {
    players
        .iter()
        .filter(|player| !eliminated.contains(&player.id))
        .collect()
}

/// The full poll snapshot: lobby, current round with server-computed elapsed
/// time, players, eliminations, votes, and scores.
pub async fn game_snapshot(
    state: &SharedState,
    code: &str,
) -> Result<GameSnapshotResponse, ServiceError> {
    let code = code.to_uppercase();
    let store = state.store();

    let lobby = store
        .find_lobby(&code)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("lobby `{code}` not found")))?;

    let players = store.list_players(&code).await?;
    let eliminations = store.list_eliminations(&code).await?;
    let scores = store.list_scores(&code).await?;

    let (round, votes) = if lobby.current_round >= 1 {
        match store.find_round(&code, lobby.current_round).await? {
            Some(round) => {
                let votes = store.list_votes(&code, round.round_number).await?;
                (Some(round_summary(&round)), votes)
            }
            None => (None, Vec::new()),
        }
    } else {
        (None, Vec::new())
    };

    Ok(GameSnapshotResponse {
        lobby: lobby.into(),
        round,
        players: players.into_iter().map(Into::into).collect(),
        eliminated_ids: eliminations
            .into_iter()
            .map(|elimination| elimination.player_id)
            .collect(),
        votes: votes.into_iter().map(Into::into).collect(),
        scores: scores.into_iter().map(Into::into).collect(),
    })
}

/// Cast or replace the caller's vote for the current round.
pub async fn submit_vote(state: &SharedState, request: VoteRequest) -> Result<(), ServiceError> {
    request.validate()?;

    if request.player_id == request.voted_for_id {
        return Err(ServiceError::Validation(
            "players cannot vote for themselves".into(),
        ));
    }

    let code = request.code.to_uppercase();
    let store = state.store();

    let lobby = store
        .find_lobby(&code)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("lobby `{code}` not found")))?;
    if lobby.status != LobbyStatus::Playing {
        return Err(ServiceError::InvalidState("game is not in progress".into()));
    }

    let round = store
        .find_round(&code, lobby.current_round)
        .await?
        .ok_or_else(|| ServiceError::NotFound("no active round".into()))?;
    if round.phase != RoundPhase::Voting {
        return Err(ServiceError::InvalidState(
            "votes are only accepted during the voting phase".into(),
        ));
    }

    let players = store.list_players(&code).await?;
    if !players.iter().any(|player| player.id == request.player_id) {
        return Err(ServiceError::Validation(format!(
            "player `{}` is not in this lobby",
            request.player_id
        )));
    }
    if !players.iter().any(|player| player.id == request.voted_for_id) {
        return Err(ServiceError::Validation(format!(
            "player `{}` is not in this lobby",
            request.voted_for_id
        )));
    }

    let eliminated: HashSet<PlayerId> = store
        .list_eliminations(&code)
        .await?
        .into_iter()
        .map(|elimination| elimination.player_id)
        .collect();
    if eliminated.contains(&request.player_id) {
        return Err(ServiceError::InvalidState(
            "eliminated players cannot vote".into(),
        ));
    }
    if eliminated.contains(&request.voted_for_id) {
        return Err(ServiceError::Validation(
            "cannot vote for an eliminated player".into(),
        ));
    }

    store
        .upsert_vote(
            &code,
            round.round_number,
            VoteRecord {
                voter_id: request.player_id,
                voted_for_id: request.voted_for_id,
            },
        )
        .await?;
    Ok(())
}

/// Advance the current round's phase. Host-only; every transition is guarded
/// so phases never move backward and results are applied exactly once.
pub async fn advance_phase(
    state: &SharedState,
    request: AdvancePhaseRequest,
) -> Result<(), ServiceError> {
    request.validate()?;

    let code = request.code.to_uppercase();
    let store = state.store();

    let lobby = store
        .find_lobby(&code)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("lobby `{code}` not found")))?;

    let players = store.list_players(&code).await?;
    let caller = players
        .iter()
        .find(|player| player.id == request.player_id)
        .ok_or_else(|| ServiceError::Forbidden("caller is not in this lobby".into()))?;
    if !caller.is_host {
        return Err(ServiceError::Forbidden(
            "only the host may advance the game".into(),
        ));
    }

    if lobby.status != LobbyStatus::Playing {
        return Err(ServiceError::InvalidState("game is not in progress".into()));
    }

    let round = store
        .find_round(&code, lobby.current_round)
        .await?
        .ok_or_else(|| ServiceError::NotFound("no active round".into()))?;

    match request.phase {
        AdvanceTarget::Discussion | AdvanceTarget::Voting => {
            let next = round.phase.next_for(request.phase)?;
            let change = PhaseChange {
                expected: round.phase,
                next,
                // entering discussion re-anchors the countdown
                started_at: (request.phase == AdvanceTarget::Discussion)
                    .then(SystemTime::now),
                ended_at: None,
            };
            if !store.change_phase(&code, round.round_number, change).await? {
                return Err(ServiceError::InvalidState(
                    "round phase changed concurrently".into(),
                ));
            }
            Ok(())
        }
        AdvanceTarget::Results => resolve_results(&store, &code, &round).await,
        AdvanceTarget::NextRound => {
            round.phase.next_for(AdvanceTarget::NextRound)?;
            begin_next_round(state, &store, &code, lobby, &players).await
        }
    }
}

/// Resolve the round (tally, score, eliminate) in one store transaction.
///
/// Re-invoking after the round already reached `results` is a no-op returning
/// ok, so racing polling clients can never double-award points.
async fn resolve_results(
    store: &Arc<dyn SessionStore>,
    code: &str,
    round: &RoundRecord,
) -> Result<(), ServiceError> {
    if round.phase == RoundPhase::Results {
        return Ok(());
    }
    round.phase.next_for(AdvanceTarget::Results)?;

    let votes = store.list_votes(code, round.round_number).await?;
    let tally = tally::tally_votes(&votes);
    let scoring = scoring::score_round(&round.imposter_id, tally.eliminated.as_ref(), &votes);

    let resolution = RoundResolution {
        round_number: round.round_number,
        ended_at: SystemTime::now(),
        elimination: tally.eliminated.map(|player_id| EliminationRecord {
            round_number: round.round_number,
            player_id,
        }),
        score_deltas: scoring.deltas,
    };

    if !store.resolve_round(code, resolution).await? {
        // lost the CAS; fine as long as someone else resolved the round
        let current = store.find_round(code, round.round_number).await?;
        if current.map(|round| round.phase) == Some(RoundPhase::Results) {
            return Ok(());
        }
        return Err(ServiceError::InvalidState(
            "round phase changed concurrently".into(),
        ));
    }
    Ok(())
}

/// Start the next round, or finish the game after the final one.
async fn begin_next_round(
    state: &SharedState,
    store: &Arc<dyn SessionStore>,
    code: &str,
    lobby: LobbyRecord,
    players: &[PlayerRecord],
) -> Result<(), ServiceError> {
    let next_number = lobby.current_round + 1;

    if next_number > lobby.total_rounds {
        let finished = LobbyRecord {
            status: LobbyStatus::Finished,
            ..lobby
        };
        store.update_lobby(finished).await?;
        // history is best-effort: a failed write must not fail termination
        if let Err(err) = history_service::record_game_history(state, code).await {
            error!(%code, error = %err, "failed to record game history");
        }
        return Ok(());
    }

    let category_name = lobby
        .category
        .clone()
        .ok_or_else(|| ServiceError::InvalidState("lobby has no category".into()))?;
    let category = state.config().category(&category_name).ok_or_else(|| {
        ServiceError::Validation(format!("unknown category `{category_name}`"))
    })?;

    let eliminated: HashSet<PlayerId> = store
        .list_eliminations(code)
        .await?
        .into_iter()
        .map(|elimination| elimination.player_id)
        .collect();
    let active = active_players(players, &eliminated);
    // a degenerate lobby can run out of active players; fall back to the
    // full roster
    let pool: Vec<&PlayerRecord> = if active.is_empty() {
        players.iter().collect()
    } else {
        active
    };

    let (imposter_id, word) = {
        let mut rng = state.rng();
        let imposter = pool
            .choose(&mut *rng)
            .map(|player| player.id.clone())
            .ok_or_else(|| ServiceError::Internal("empty player list".into()))?;
        let word = category
            .words
            .choose(&mut *rng)
            .cloned()
            .ok_or_else(|| ServiceError::Internal("empty word list".into()))?;
        (imposter, word)
    };

    let advanced = LobbyRecord {
        current_round: next_number,
        ..lobby
    };
    let round = RoundRecord {
        lobby_code: code.to_owned(),
        round_number: next_number,
        imposter_id,
        word,
        category: category_name,
        phase: RoundPhase::WordReveal,
        started_at: SystemTime::now(),
        ended_at: None,
    };

    // a concurrent advance that already inserted this round number wins;
    // treat the loss as success
    store.start_round(advanced, round).await?;
    Ok(())
}

fn round_summary(round: &RoundRecord) -> RoundSummary {
    let elapsed_seconds = SystemTime::now()
        .duration_since(round.started_at)
        .unwrap_or_default()
        .as_secs_f64();
    RoundSummary {
        round_number: round.round_number,
        phase: round.phase,
        category: round.category.clone(),
        word: round.word.clone(),
        imposter_id: round.imposter_id.clone(),
        elapsed_seconds,
        started_at: format_system_time(round.started_at),
        ended_at: round.ended_at.map(format_system_time),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        config::AppConfig,
        dao::memory::MemoryStore,
        dto::lobby::{CreateLobbyRequest, JoinLobbyRequest, StartGameRequest},
        services::lobby_service,
        services::scoring::{IMPOSTER_CAUGHT_POINTS, IMPOSTER_SURVIVED_POINTS},
    };

    const HOST: &str = "p-host";

    fn test_state(seed: u64) -> SharedState {
        crate::state::AppState::with_rng(
            AppConfig::default(),
            Arc::new(MemoryStore::new()),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Create a lobby with `extra` players beyond the host and start it.
    async fn setup_game(state: &SharedState, extra: usize, total_rounds: u32) -> String {
        let created = lobby_service::create_lobby(
            state,
            CreateLobbyRequest {
                player_name: "Host".into(),
                player_id: HOST.into(),
            },
        )
        .await
        .unwrap();

        for n in 0..extra {
            lobby_service::join_lobby(
                state,
                JoinLobbyRequest {
                    code: created.code.clone(),
                    player_name: format!("P{n}"),
                    player_id: format!("p-{n}"),
                },
            )
            .await
            .unwrap();
        }

        lobby_service::start_game(
            state,
            StartGameRequest {
                code: created.code.clone(),
                category: "animals".into(),
                round_duration_seconds: Some(120),
                total_rounds: Some(total_rounds),
            },
        )
        .await
        .unwrap();

        created.code
    }

    async fn advance(state: &SharedState, code: &str, target: AdvanceTarget) {
        advance_phase(
            state,
            AdvancePhaseRequest {
                code: code.into(),
                player_id: HOST.into(),
                phase: target,
            },
        )
        .await
        .unwrap();
    }

    async fn open_voting(state: &SharedState, code: &str) {
        advance(state, code, AdvanceTarget::Discussion).await;
        advance(state, code, AdvanceTarget::Voting).await;
    }

    async fn vote(state: &SharedState, code: &str, voter: &str, target: &str) {
        submit_vote(
            state,
            VoteRequest {
                code: code.into(),
                player_id: voter.into(),
                voted_for_id: target.into(),
            },
        )
        .await
        .unwrap();
    }

    async fn imposter_of(state: &SharedState, code: &str) -> String {
        let lobby = state.store().find_lobby(code).await.unwrap().unwrap();
        state
            .store()
            .find_round(code, lobby.current_round)
            .await
            .unwrap()
            .unwrap()
            .imposter_id
    }

    fn score_of<'a>(
        snapshot: &'a GameSnapshotResponse,
        player: &str,
    ) -> &'a crate::dto::game::ScoreSummary {
        snapshot
            .scores
            .iter()
            .find(|score| score.player_id == player)
            .expect("missing score row")
    }

    #[tokio::test]
    async fn snapshot_while_waiting_has_no_round() {
        let state = test_state(1);
        let created = lobby_service::create_lobby(
            &state,
            CreateLobbyRequest {
                player_name: "Host".into(),
                player_id: HOST.into(),
            },
        )
        .await
        .unwrap();

        let snapshot = game_snapshot(&state, &created.code).await.unwrap();
        assert!(snapshot.round.is_none());
        assert!(snapshot.votes.is_empty());
        assert_eq!(snapshot.players.len(), 1);
        assert_eq!(snapshot.scores.len(), 1);
    }

    #[tokio::test]
    async fn caught_imposter_rewards_the_catchers() {
        let state = test_state(3);
        let code = setup_game(&state, 2, 3).await;
        let imposter = imposter_of(&state, &code).await;

        open_voting(&state, &code).await;
        let players = ["p-host".to_string(), "p-0".to_string(), "p-1".to_string()];
        let catchers: Vec<&String> = players.iter().filter(|id| **id != imposter).collect();
        for catcher in &catchers {
            vote(&state, &code, catcher, &imposter).await;
        }

        advance(&state, &code, AdvanceTarget::Results).await;
        let snapshot = game_snapshot(&state, &code).await.unwrap();

        assert_eq!(snapshot.round.as_ref().unwrap().phase, RoundPhase::Results);
        assert!(snapshot.round.as_ref().unwrap().ended_at.is_some());
        assert_eq!(snapshot.eliminated_ids, vec![imposter.clone()]);

        for catcher in &catchers {
            let score = score_of(&snapshot, catcher);
            assert_eq!(score.total_score, IMPOSTER_CAUGHT_POINTS);
            assert_eq!(score.correct_votes, 1);
        }
        let imposter_score = score_of(&snapshot, &imposter);
        assert_eq!(imposter_score.total_score, 0);
        assert_eq!(imposter_score.rounds_as_imposter, 1);
        assert_eq!(imposter_score.survived_as_imposter, 0);
    }

    #[tokio::test]
    async fn wrong_elimination_awards_the_survival_bonus() {
        let state = test_state(5);
        let code = setup_game(&state, 2, 3).await;
        let imposter = imposter_of(&state, &code).await;

        let players = ["p-host".to_string(), "p-0".to_string(), "p-1".to_string()];
        let scapegoat = players
            .iter()
            .find(|id| **id != imposter)
            .unwrap()
            .clone();

        open_voting(&state, &code).await;
        for voter in players.iter().filter(|id| **id != scapegoat) {
            vote(&state, &code, voter, &scapegoat).await;
        }

        advance(&state, &code, AdvanceTarget::Results).await;
        let snapshot = game_snapshot(&state, &code).await.unwrap();

        assert_eq!(snapshot.eliminated_ids, vec![scapegoat.clone()]);
        let imposter_score = score_of(&snapshot, &imposter);
        assert_eq!(imposter_score.total_score, IMPOSTER_SURVIVED_POINTS);
        assert_eq!(imposter_score.survived_as_imposter, 1);
        assert_eq!(imposter_score.rounds_as_imposter, 1);
    }

    #[tokio::test]
    async fn results_twice_awards_once() {
        let state = test_state(7);
        let code = setup_game(&state, 2, 3).await;
        let imposter = imposter_of(&state, &code).await;

        open_voting(&state, &code).await;
        let players = ["p-host".to_string(), "p-0".to_string(), "p-1".to_string()];
        for voter in players.iter().filter(|id| **id != imposter) {
            vote(&state, &code, voter, &imposter).await;
        }

        advance(&state, &code, AdvanceTarget::Results).await;
        let first = game_snapshot(&state, &code).await.unwrap();
        advance(&state, &code, AdvanceTarget::Results).await;
        let second = game_snapshot(&state, &code).await.unwrap();

        for player in &players {
            assert_eq!(
                score_of(&first, player).total_score,
                score_of(&second, player).total_score
            );
        }
        assert_eq!(second.eliminated_ids.len(), 1);
    }

    #[tokio::test]
    async fn zero_votes_lets_the_imposter_survive() {
        let state = test_state(9);
        let code = setup_game(&state, 1, 3).await;
        let imposter = imposter_of(&state, &code).await;

        open_voting(&state, &code).await;
        advance(&state, &code, AdvanceTarget::Results).await;

        let snapshot = game_snapshot(&state, &code).await.unwrap();
        assert!(snapshot.eliminated_ids.is_empty());
        let imposter_score = score_of(&snapshot, &imposter);
        assert_eq!(imposter_score.total_score, IMPOSTER_SURVIVED_POINTS);
        assert_eq!(imposter_score.survived_as_imposter, 1);
    }

    #[tokio::test]
    async fn a_vote_replaces_the_previous_one() {
        let state = test_state(11);
        let code = setup_game(&state, 2, 3).await;

        open_voting(&state, &code).await;
        vote(&state, &code, "p-0", "p-1").await;
        vote(&state, &code, "p-0", HOST).await;

        let snapshot = game_snapshot(&state, &code).await.unwrap();
        assert_eq!(snapshot.votes.len(), 1);
        assert_eq!(snapshot.votes[0].voter_id, "p-0");
        assert_eq!(snapshot.votes[0].voted_for_id, HOST);
    }

    #[tokio::test]
    async fn self_votes_and_off_phase_votes_are_rejected() {
        let state = test_state(13);
        let code = setup_game(&state, 2, 3).await;

        let err = submit_vote(
            &state,
            VoteRequest {
                code: code.clone(),
                player_id: "p-0".into(),
                voted_for_id: "p-0".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        // still in word_reveal
        let err = submit_vote(
            &state,
            VoteRequest {
                code: code.clone(),
                player_id: "p-0".into(),
                voted_for_id: "p-1".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn only_the_host_advances() {
        let state = test_state(15);
        let code = setup_game(&state, 2, 3).await;

        for caller in ["p-0", "p-stranger"] {
            let err = advance_phase(
                &state,
                AdvancePhaseRequest {
                    code: code.clone(),
                    player_id: caller.into(),
                    phase: AdvanceTarget::Discussion,
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ServiceError::Forbidden(_)));
        }

        // nothing mutated
        let snapshot = game_snapshot(&state, &code).await.unwrap();
        assert_eq!(snapshot.round.unwrap().phase, RoundPhase::WordReveal);
    }

    #[tokio::test]
    async fn phases_only_move_forward() {
        let state = test_state(17);
        let code = setup_game(&state, 2, 3).await;
        open_voting(&state, &code).await;

        let err = advance_phase(
            &state,
            AdvancePhaseRequest {
                code: code.clone(),
                player_id: HOST.into(),
                phase: AdvanceTarget::Discussion,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));

        let err = advance_phase(
            &state,
            AdvancePhaseRequest {
                code: code.clone(),
                player_id: HOST.into(),
                phase: AdvanceTarget::NextRound,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn eliminated_players_are_out_for_good() {
        let state = test_state(19);
        let code = setup_game(&state, 3, 3).await;
        let imposter = imposter_of(&state, &code).await;
        let players: Vec<String> = ["p-host", "p-0", "p-1", "p-2"]
            .iter()
            .map(|id| id.to_string())
            .collect();
        let scapegoat = players.iter().find(|id| **id != imposter).unwrap().clone();

        open_voting(&state, &code).await;
        for voter in players.iter().filter(|id| **id != scapegoat) {
            vote(&state, &code, voter, &scapegoat).await;
        }
        advance(&state, &code, AdvanceTarget::Results).await;
        advance(&state, &code, AdvanceTarget::NextRound).await;

        // round 2 exists with a fresh imposter drawn from active players
        let snapshot = game_snapshot(&state, &code).await.unwrap();
        let round = snapshot.round.unwrap();
        assert_eq!(round.round_number, 2);
        assert_eq!(round.phase, RoundPhase::WordReveal);
        assert_ne!(round.imposter_id, scapegoat);
        assert_eq!(snapshot.eliminated_ids, vec![scapegoat.clone()]);

        // the active set excludes the eliminated player
        let all = state.store().list_players(&code).await.unwrap();
        let eliminated: HashSet<PlayerId> = snapshot.eliminated_ids.iter().cloned().collect();
        let active = active_players(&all, &eliminated);
        assert_eq!(active.len(), players.len() - 1);
        assert!(active.iter().all(|player| player.id != scapegoat));

        // and they can no longer vote
        open_voting(&state, &code).await;
        let err = submit_vote(
            &state,
            VoteRequest {
                code: code.clone(),
                player_id: scapegoat.clone(),
                voted_for_id: imposter.clone(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn final_round_finishes_the_game_with_history() {
        // Scenario D: totalRounds=1 with three players
        let state = test_state(21);
        let code = setup_game(&state, 2, 1).await;
        let imposter = imposter_of(&state, &code).await;

        open_voting(&state, &code).await;
        let players = ["p-host".to_string(), "p-0".to_string(), "p-1".to_string()];
        for voter in players.iter().filter(|id| **id != imposter) {
            vote(&state, &code, voter, &imposter).await;
        }
        advance(&state, &code, AdvanceTarget::Results).await;
        advance(&state, &code, AdvanceTarget::NextRound).await;

        let snapshot = game_snapshot(&state, &code).await.unwrap();
        assert_eq!(snapshot.lobby.status, LobbyStatus::Finished);

        // one history row per ordered pair of players
        let mut rows = Vec::new();
        for player in ["Host", "P0", "P1"] {
            rows.extend(state.store().history_for_player(player).await.unwrap());
        }
        assert_eq!(rows.len(), players.len() * (players.len() - 1));

        let winners: HashSet<&str> = rows
            .iter()
            .filter(|row| row.won)
            .map(|row| row.player_name.as_str())
            .collect();
        assert_eq!(winners.len(), 1);

        let imposter_rows: Vec<_> = rows
            .iter()
            .filter(|row| row.player_id == imposter)
            .collect();
        assert!(imposter_rows.iter().all(|row| row.was_imposter));
        assert!(imposter_rows.iter().all(|row| row.caught_as_imposter));
        assert!(imposter_rows.iter().all(|row| !row.survived_as_imposter));

        // finished lobbies reject further advances
        let err = advance_phase(
            &state,
            AdvancePhaseRequest {
                code: code.clone(),
                player_id: HOST.into(),
                phase: AdvanceTarget::NextRound,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn scores_never_decrease_across_a_game() {
        let state = test_state(23);
        let code = setup_game(&state, 2, 2).await;
        let players = ["p-host".to_string(), "p-0".to_string(), "p-1".to_string()];
        let mut floor: Vec<u32> = vec![0; players.len()];

        for round in 0..2 {
            let imposter = imposter_of(&state, &code).await;
            open_voting(&state, &code).await;
            let eliminated: HashSet<PlayerId> = game_snapshot(&state, &code)
                .await
                .unwrap()
                .eliminated_ids
                .into_iter()
                .collect();
            for voter in players
                .iter()
                .filter(|id| **id != imposter && !eliminated.contains(*id))
            {
                vote(&state, &code, voter, &imposter).await;
            }
            advance(&state, &code, AdvanceTarget::Results).await;

            let snapshot = game_snapshot(&state, &code).await.unwrap();
            for (index, player) in players.iter().enumerate() {
                let total = score_of(&snapshot, player).total_score;
                assert!(total >= floor[index], "score decreased in round {round}");
                floor[index] = total;
            }
            advance(&state, &code, AdvanceTarget::NextRound).await;
        }
    }
}

//! Finished-game history fan-out and the leaderboard rollups built on it.

use std::collections::HashMap;
use std::time::SystemTime;

use indexmap::IndexMap;
use validator::Validate;

use crate::{
    dao::models::{HistoryRecord, PlayerId, ScoreRecord},
    dto::leaderboard::{LeaderboardQuery, LeaderboardResponse, OpponentStats, OwnStats},
    error::ServiceError,
    state::SharedState,
};

/// Persist one history row per ordered pair of players for a finished game.
///
/// The winner is the player with the highest total score; ties resolve by
/// sort stability (join order). The fan-out is O(n²) in player count, which
/// the 10-player cap keeps trivial. Callers treat failures as best-effort.
pub async fn record_game_history(state: &SharedState, code: &str) -> Result<(), ServiceError> {
    let store = state.store();
    let players = store.list_players(code).await?;
    if players.len() < 2 {
        return Ok(());
    }

    let scores: HashMap<PlayerId, ScoreRecord> = store
        .list_scores(code)
        .await?
        .into_iter()
        .map(|score| (score.player_id.clone(), score))
        .collect();
    let total_of = |id: &PlayerId| scores.get(id).map_or(0, |score| score.total_score);

    let mut ranked: Vec<&PlayerId> = players.iter().map(|player| &player.id).collect();
    ranked.sort_by(|a, b| total_of(*b).cmp(&total_of(*a)));
    let winner_id = ranked[0].clone();

    let played_at = SystemTime::now();
    let mut entries = Vec::with_capacity(players.len() * (players.len() - 1));
    for player in &players {
        let score = scores.get(&player.id);
        let rounds_as_imposter = score.map_or(0, |score| score.rounds_as_imposter);
        let survived_rounds = score.map_or(0, |score| score.survived_as_imposter);
        let was_imposter = rounds_as_imposter > 0;
        let survived_as_imposter = survived_rounds > 0;
        // survived every imposter round means they were never caught
        let caught_as_imposter =
            was_imposter && !survived_as_imposter && rounds_as_imposter > survived_rounds;

        for opponent in &players {
            if player.id == opponent.id {
                continue;
            }
            entries.push(HistoryRecord {
                lobby_code: code.to_owned(),
                player_id: player.id.clone(),
                player_name: player.name.clone(),
                opponent_name: opponent.name.clone(),
                won: player.id == winner_id,
                was_imposter,
                caught_as_imposter,
                survived_as_imposter,
                played_at,
            });
        }
    }

    store.insert_history(entries).await?;
    Ok(())
}

/// Read-only rollup of a player's finished games, grouped per opponent.
pub async fn leaderboard(
    state: &SharedState,
    query: LeaderboardQuery,
) -> Result<LeaderboardResponse, ServiceError> {
    query.validate()?;

    let rows = state.store().history_for_player(&query.player_name).await?;

    #[derive(Default)]
    struct OpponentAcc {
        games_played: u32,
        wins: u32,
        caught: u32,
        survived: u32,
        was_imposter: u32,
    }

    let mut per_opponent: IndexMap<String, OpponentAcc> = IndexMap::new();
    let mut own = OwnStats {
        total_games: 0,
        total_wins: 0,
        win_rate: 0,
        times_imposter: 0,
        times_survived: 0,
    };

    for row in &rows {
        own.total_games += 1;
        own.total_wins += u32::from(row.won);
        own.times_imposter += u32::from(row.was_imposter);
        own.times_survived += u32::from(row.was_imposter && row.survived_as_imposter);

        let acc = per_opponent.entry(row.opponent_name.clone()).or_default();
        acc.games_played += 1;
        acc.wins += u32::from(row.won);
        acc.caught += u32::from(row.was_imposter && row.caught_as_imposter);
        acc.survived += u32::from(row.was_imposter && row.survived_as_imposter);
        acc.was_imposter += u32::from(row.was_imposter);
    }

    own.win_rate = percentage(own.total_wins, own.total_games);

    let mut leaderboard: Vec<OpponentStats> = per_opponent
        .into_iter()
        .map(|(opponent_name, acc)| OpponentStats {
            opponent_name,
            games_played: acc.games_played,
            wins: acc.wins,
            losses: acc.games_played - acc.wins,
            win_rate: percentage(acc.wins, acc.games_played),
            times_caught_as_imposter: acc.caught,
            times_survived_as_imposter: acc.survived,
            times_was_imposter: acc.was_imposter,
        })
        .collect();
    leaderboard.sort_by(|a, b| {
        b.games_played
            .cmp(&a.games_played)
            .then(b.wins.cmp(&a.wins))
    });

    Ok(LeaderboardResponse {
        player_name: query.player_name,
        own_stats: own,
        leaderboard,
    })
}

fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        0
    } else {
        ((f64::from(part) / f64::from(whole)) * 100.0).round() as u32
    }
}

//! Lobby lifecycle: creation, joining, and starting the game.

use std::time::SystemTime;

use rand::Rng;
use rand::seq::IndexedRandom;
use validator::Validate;

use crate::{
    dao::models::{LobbyRecord, LobbyStatus, PlayerRecord, RoundRecord, ScoreRecord},
    dto::{
        lobby::{CreateLobbyRequest, JoinLobbyRequest, LobbyJoinedResponse, LobbyStateResponse,
                StartGameRequest},
        validation::{LOBBY_CODE_ALPHABET, LOBBY_CODE_LENGTH},
    },
    error::ServiceError,
    state::{SharedState, phase::RoundPhase},
};

/// Hard capacity cap; downstream avatar/UI grid logic assumes at most 10.
pub const MAX_PLAYERS: usize = 10;
/// A deduction game needs an imposter plus at least one crewmate.
pub const MIN_PLAYERS: usize = 2;
/// Collision retries before giving up on code generation.
const MAX_CODE_ATTEMPTS: usize = 16;

/// Create a fresh lobby with the caller as host.
///
/// Codes are generated client-shareable (6 chars, ambiguity-free alphabet)
/// and retried against the store on collision.
pub async fn create_lobby(
    state: &SharedState,
    request: CreateLobbyRequest,
) -> Result<LobbyJoinedResponse, ServiceError> {
    request.validate()?;

    let avatar_color = pick_avatar_color(state);
    let store = state.store();

    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_code(state);
        let lobby = LobbyRecord {
            code: code.clone(),
            host_player_id: request.player_id.clone(),
            status: LobbyStatus::Waiting,
            category: None,
            round_duration_secs: crate::config::DEFAULT_ROUND_DURATION_SECS,
            total_rounds: crate::config::DEFAULT_TOTAL_ROUNDS,
            current_round: 0,
        };
        let host = PlayerRecord {
            id: request.player_id.clone(),
            lobby_code: code.clone(),
            name: request.player_name.clone(),
            avatar_color: avatar_color.clone(),
            is_host: true,
            joined_at: SystemTime::now(),
        };
        let score = ScoreRecord::zeroed(request.player_id.clone());

        if store.insert_lobby(lobby, host, score).await? {
            return Ok(LobbyJoinedResponse {
                code,
                player_id: request.player_id,
                player_name: request.player_name,
                avatar_color,
                is_host: true,
            });
        }
    }

    Err(ServiceError::Internal(
        "could not allocate a unique lobby code".into(),
    ))
}

/// Join an existing lobby while it is still waiting.
pub async fn join_lobby(
    state: &SharedState,
    request: JoinLobbyRequest,
) -> Result<LobbyJoinedResponse, ServiceError> {
    request.validate()?;

    let code = request.code.to_uppercase();
    let store = state.store();

    let lobby = store
        .find_lobby(&code)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("lobby `{code}` not found")))?;

    if lobby.status != LobbyStatus::Waiting {
        return Err(ServiceError::InvalidState("game already started".into()));
    }

    let players = store.list_players(&code).await?;
    if players.len() >= MAX_PLAYERS {
        return Err(ServiceError::Capacity("lobby is full".into()));
    }
    if players.iter().any(|player| player.id == request.player_id) {
        return Err(ServiceError::InvalidState(format!(
            "player `{}` already joined this lobby",
            request.player_id
        )));
    }

    let avatar_color = pick_avatar_color(state);
    let player = PlayerRecord {
        id: request.player_id.clone(),
        lobby_code: code.clone(),
        name: request.player_name.clone(),
        avatar_color: avatar_color.clone(),
        is_host: false,
        joined_at: SystemTime::now(),
    };
    store
        .insert_player(player, ScoreRecord::zeroed(request.player_id.clone()))
        .await?;

    Ok(LobbyJoinedResponse {
        code,
        player_id: request.player_id,
        player_name: request.player_name,
        avatar_color,
        is_host: false,
    })
}

/// Start the game: pick the first imposter and word, create round 1.
pub async fn start_game(
    state: &SharedState,
    request: StartGameRequest,
) -> Result<(), ServiceError> {
    request.validate()?;

    let code = request.code.to_uppercase();
    let store = state.store();

    let lobby = store
        .find_lobby(&code)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("lobby `{code}` not found")))?;

    if lobby.status != LobbyStatus::Waiting {
        return Err(ServiceError::InvalidState("game already started".into()));
    }

    let players = store.list_players(&code).await?;
    if players.len() < MIN_PLAYERS {
        return Err(ServiceError::Capacity(format!(
            "need at least {MIN_PLAYERS} players"
        )));
    }

    let category = state
        .config()
        .category(&request.category)
        .ok_or_else(|| {
            ServiceError::Validation(format!("unknown category `{}`", request.category))
        })?;

    let (imposter_id, word) = {
        let mut rng = state.rng();
        let imposter = players
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

    let started = LobbyRecord {
        status: LobbyStatus::Playing,
        category: Some(request.category.clone()),
        round_duration_secs: request
            .round_duration_seconds
            .unwrap_or(crate::config::DEFAULT_ROUND_DURATION_SECS),
        total_rounds: request
            .total_rounds
            .unwrap_or(crate::config::DEFAULT_TOTAL_ROUNDS),
        current_round: 1,
        ..lobby
    };
    let round = RoundRecord {
        lobby_code: code.clone(),
        round_number: 1,
        imposter_id,
        word,
        category: request.category,
        phase: RoundPhase::WordReveal,
        started_at: SystemTime::now(),
        ended_at: None,
    };

    if !store.start_round(started, round).await? {
        // a concurrent start won the race
        return Err(ServiceError::InvalidState("game already started".into()));
    }

    Ok(())
}

/// Waiting-room poll: the lobby and its players in join order.
pub async fn lobby_state(
    state: &SharedState,
    code: &str,
) -> Result<LobbyStateResponse, ServiceError> {
    let code = code.to_uppercase();
    let store = state.store();

    let lobby = store
        .find_lobby(&code)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("lobby `{code}` not found")))?;
    let players = store.list_players(&code).await?;

    Ok(LobbyStateResponse {
        lobby: lobby.into(),
        players: players.into_iter().map(Into::into).collect(),
    })
}

fn generate_code(state: &SharedState) -> String {
    let mut rng = state.rng();
    (0..LOBBY_CODE_LENGTH)
        .map(|_| {
            let index = rng.random_range(0..LOBBY_CODE_ALPHABET.len());
            LOBBY_CODE_ALPHABET[index] as char
        })
        .collect()
}

fn pick_avatar_color(state: &SharedState) -> String {
    let palette = state.config().avatar_palette();
    let mut rng = state.rng();
    palette
        .choose(&mut *rng)
        .cloned()
        .unwrap_or_else(|| "#FFFFFF".into())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{config::AppConfig, dao::memory::MemoryStore, state::AppState};

    fn test_state(seed: u64) -> SharedState {
        AppState::with_rng(
            AppConfig::default(),
            Arc::new(MemoryStore::new()),
            StdRng::seed_from_u64(seed),
        )
    }

    fn create(name: &str, id: &str) -> CreateLobbyRequest {
        CreateLobbyRequest {
            player_name: name.into(),
            player_id: id.into(),
        }
    }

    fn join(code: &str, name: &str, id: &str) -> JoinLobbyRequest {
        JoinLobbyRequest {
            code: code.into(),
            player_name: name.into(),
            player_id: id.into(),
        }
    }

    fn start(code: &str) -> StartGameRequest {
        StartGameRequest {
            code: code.into(),
            category: "animals".into(),
            round_duration_seconds: Some(120),
            total_rounds: Some(2),
        }
    }

    #[tokio::test]
    async fn created_lobby_has_host_and_shareable_code() {
        let state = test_state(7);
        let response = create_lobby(&state, create("Alice", "p-alice")).await.unwrap();

        assert!(response.is_host);
        assert_eq!(response.code.len(), LOBBY_CODE_LENGTH);
        assert!(
            response
                .code
                .bytes()
                .all(|byte| LOBBY_CODE_ALPHABET.contains(&byte))
        );

        let lobby = lobby_state(&state, &response.code).await.unwrap();
        assert_eq!(lobby.players.len(), 1);
        assert!(lobby.players[0].is_host);
    }

    #[tokio::test]
    async fn join_is_case_insensitive_and_capped() {
        let state = test_state(11);
        let created = create_lobby(&state, create("Host", "p-host")).await.unwrap();

        let joined = join_lobby(&state, join(&created.code.to_lowercase(), "Bob", "p-bob"))
            .await
            .unwrap();
        assert!(!joined.is_host);
        assert_eq!(joined.code, created.code);

        for n in 0..(MAX_PLAYERS - 2) {
            join_lobby(&state, join(&created.code, &format!("P{n}"), &format!("p-{n}")))
                .await
                .unwrap();
        }

        let err = join_lobby(&state, join(&created.code, "Late", "p-late"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Capacity(_)));
    }

    #[tokio::test]
    async fn duplicate_player_id_is_rejected() {
        let state = test_state(13);
        let created = create_lobby(&state, create("Host", "p-host")).await.unwrap();
        let err = join_lobby(&state, join(&created.code, "Copycat", "p-host"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn start_requires_two_players_and_known_category() {
        let state = test_state(17);
        let created = create_lobby(&state, create("Host", "p-host")).await.unwrap();

        let err = start_game(&state, start(&created.code)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Capacity(_)));

        join_lobby(&state, join(&created.code, "Bob", "p-bob")).await.unwrap();

        let mut bad_category = start(&created.code);
        bad_category.category = "colors".into();
        let err = start_game(&state, bad_category).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn started_game_creates_round_one() {
        // Scenario A: host + one joiner, two-player start
        let state = test_state(19);
        let created = create_lobby(&state, create("Host", "p-host")).await.unwrap();
        join_lobby(&state, join(&created.code, "Bob", "p-bob")).await.unwrap();
        start_game(&state, start(&created.code)).await.unwrap();

        let store = state.store();
        let lobby = store.find_lobby(&created.code).await.unwrap().unwrap();
        assert_eq!(lobby.status, LobbyStatus::Playing);
        assert_eq!(lobby.current_round, 1);
        assert_eq!(lobby.round_duration_secs, 120);
        assert_eq!(lobby.total_rounds, 2);

        let round = store.find_round(&created.code, 1).await.unwrap().unwrap();
        assert_eq!(round.phase, RoundPhase::WordReveal);
        assert!(["p-host", "p-bob"].contains(&round.imposter_id.as_str()));
        let words = &state.config().category("animals").unwrap().words;
        assert!(words.contains(&round.word));

        // second start must fail: the lobby already left `waiting`
        let err = start_game(&state, start(&created.code)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn joining_a_started_game_fails() {
        let state = test_state(23);
        let created = create_lobby(&state, create("Host", "p-host")).await.unwrap();
        join_lobby(&state, join(&created.code, "Bob", "p-bob")).await.unwrap();
        start_game(&state, start(&created.code)).await.unwrap();

        let err = join_lobby(&state, join(&created.code, "Late", "p-late"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn seeded_rng_makes_selection_deterministic() {
        let first = {
            let state = test_state(42);
            let created = create_lobby(&state, create("Host", "p-host")).await.unwrap();
            join_lobby(&state, join(&created.code, "Bob", "p-bob")).await.unwrap();
            start_game(&state, start(&created.code)).await.unwrap();
            let round = state.store().find_round(&created.code, 1).await.unwrap().unwrap();
            (round.imposter_id, round.word)
        };
        let second = {
            let state = test_state(42);
            let created = create_lobby(&state, create("Host", "p-host")).await.unwrap();
            join_lobby(&state, join(&created.code, "Bob", "p-bob")).await.unwrap();
            start_game(&state, start(&created.code)).await.unwrap();
            let round = state.store().find_round(&created.code, 1).await.unwrap().unwrap();
            (round.imposter_id, round.word)
        };
        assert_eq!(first, second);
    }
}

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::{
        common::ActionResponse,
        lobby::{CreateLobbyRequest, JoinLobbyRequest, LobbyJoinedResponse, LobbyStateResponse,
                StartGameRequest},
    },
    error::AppError,
    services::lobby_service,
    state::SharedState,
};

/// Routes handling the lobby lifecycle up to game start.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/lobby/create", post(create_lobby))
        .route("/lobby/join", post(join_lobby))
        .route("/lobby/start", post(start_game))
        .route("/lobby/{code}", get(lobby_state))
}

/// Create a fresh lobby with the caller as host.
#[utoipa::path(
    post,
    path = "/lobby/create",
    tag = "lobby",
    request_body = CreateLobbyRequest,
    responses(
        (status = 200, description = "Lobby created", body = LobbyJoinedResponse)
    )
)]
pub async fn create_lobby(
    State(state): State<SharedState>,
    Json(payload): Json<CreateLobbyRequest>,
) -> Result<Json<LobbyJoinedResponse>, AppError> {
    let response = lobby_service::create_lobby(&state, payload).await?;
    Ok(Json(response))
}

/// Join a waiting lobby by code.
#[utoipa::path(
    post,
    path = "/lobby/join",
    tag = "lobby",
    request_body = JoinLobbyRequest,
    responses(
        (status = 200, description = "Joined", body = LobbyJoinedResponse),
        (status = 404, description = "Lobby not found"),
        (status = 400, description = "Game already started or lobby full")
    )
)]
pub async fn join_lobby(
    State(state): State<SharedState>,
    Json(payload): Json<JoinLobbyRequest>,
) -> Result<Json<LobbyJoinedResponse>, AppError> {
    let response = lobby_service::join_lobby(&state, payload).await?;
    Ok(Json(response))
}

/// Start the game with the chosen category and round settings.
#[utoipa::path(
    post,
    path = "/lobby/start",
    tag = "lobby",
    request_body = StartGameRequest,
    responses(
        (status = 200, description = "Game started", body = ActionResponse),
        (status = 404, description = "Lobby not found"),
        (status = 400, description = "Not enough players or unknown category")
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    Json(payload): Json<StartGameRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    lobby_service::start_game(&state, payload).await?;
    Ok(Json(ActionResponse::ok()))
}

/// Waiting-room poll: lobby settings and players in join order.
#[utoipa::path(
    get,
    path = "/lobby/{code}",
    tag = "lobby",
    params(("code" = String, Path, description = "Lobby code")),
    responses(
        (status = 200, description = "Lobby state", body = LobbyStateResponse),
        (status = 404, description = "Lobby not found")
    )
)]
pub async fn lobby_state(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Json<LobbyStateResponse>, AppError> {
    let response = lobby_service::lobby_state(&state, &code).await?;
    Ok(Json(response))
}

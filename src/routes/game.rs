use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::{
        common::ActionResponse,
        game::{AdvancePhaseRequest, GameSnapshotResponse, VoteRequest},
    },
    error::AppError,
    services::round_service,
    state::SharedState,
};

/// Routes serving the poll snapshot and the in-game actions.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game/{code}", get(game_snapshot))
        .route("/game/vote", post(submit_vote))
        .route("/game/phase", post(advance_phase))
}

/// The full game snapshot polled by every client (~2s interval).
#[utoipa::path(
    get,
    path = "/game/{code}",
    tag = "game",
    params(("code" = String, Path, description = "Lobby code")),
    responses(
        (status = 200, description = "Game snapshot", body = GameSnapshotResponse),
        (status = 404, description = "Lobby not found")
    )
)]
pub async fn game_snapshot(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Json<GameSnapshotResponse>, AppError> {
    let response = round_service::game_snapshot(&state, &code).await?;
    Ok(Json(response))
}

/// Cast or replace a vote for the current round (upsert semantics).
#[utoipa::path(
    post,
    path = "/game/vote",
    tag = "game",
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote recorded", body = ActionResponse),
        (status = 404, description = "Lobby or round not found"),
        (status = 400, description = "Wrong phase, self-vote, or eliminated voter")
    )
)]
pub async fn submit_vote(
    State(state): State<SharedState>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    round_service::submit_vote(&state, payload).await?;
    Ok(Json(ActionResponse::ok()))
}

/// Advance the round's phase (host-only).
#[utoipa::path(
    post,
    path = "/game/phase",
    tag = "game",
    request_body = AdvancePhaseRequest,
    responses(
        (status = 200, description = "Phase advanced", body = ActionResponse),
        (status = 403, description = "Caller is not the host"),
        (status = 400, description = "Invalid transition for the current phase")
    )
)]
pub async fn advance_phase(
    State(state): State<SharedState>,
    Json(payload): Json<AdvancePhaseRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    round_service::advance_phase(&state, payload).await?;
    Ok(Json(ActionResponse::ok()))
}

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::leaderboard::{LeaderboardQuery, LeaderboardResponse},
    error::AppError,
    services::history_service,
    state::SharedState,
};

/// Route exposing the read-only leaderboard rollups.
pub fn router() -> Router<SharedState> {
    Router::new().route("/leaderboard", get(leaderboard))
}

/// Lifetime stats for a player, broken down per opponent.
#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "leaderboard",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Leaderboard rollup", body = LeaderboardResponse),
        (status = 400, description = "Missing or invalid player name")
    )
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let response = history_service::leaderboard(&state, query).await?;
    Ok(Json(response))
}

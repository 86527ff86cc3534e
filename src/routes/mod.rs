//! HTTP route composition.

use axum::Router;

use crate::state::SharedState;

/// Word category listing.
pub mod categories;
/// Swagger UI and OpenAPI document.
pub mod docs;
/// Poll snapshot, votes, and phase advances.
pub mod game;
/// Healthcheck.
pub mod health;
/// Leaderboard rollups.
pub mod leaderboard;
/// Lobby lifecycle.
pub mod lobby;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(lobby::router())
        .merge(game::router())
        .merge(categories::router())
        .merge(leaderboard::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}

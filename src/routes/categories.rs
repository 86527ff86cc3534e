use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::common::CategoriesResponse, state::SharedState};

/// Route exposing the configured word categories.
pub fn router() -> Router<SharedState> {
    Router::new().route("/categories", get(list_categories))
}

/// List the word categories available for game setup.
#[utoipa::path(
    get,
    path = "/categories",
    tag = "lobby",
    responses((status = 200, description = "Available categories", body = CategoriesResponse))
)]
pub async fn list_categories(State(state): State<SharedState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.config().category_names(),
    })
}

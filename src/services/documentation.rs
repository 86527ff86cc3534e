use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the imposter game backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::lobby::create_lobby,
        crate::routes::lobby::join_lobby,
        crate::routes::lobby::start_game,
        crate::routes::lobby::lobby_state,
        crate::routes::game::game_snapshot,
        crate::routes::game::submit_vote,
        crate::routes::game::advance_phase,
        crate::routes::categories::list_categories,
        crate::routes::leaderboard::leaderboard,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::ActionResponse,
            crate::dto::common::CategoriesResponse,
            crate::dto::lobby::CreateLobbyRequest,
            crate::dto::lobby::JoinLobbyRequest,
            crate::dto::lobby::StartGameRequest,
            crate::dto::lobby::LobbyJoinedResponse,
            crate::dto::lobby::LobbyStateResponse,
            crate::dto::game::GameSnapshotResponse,
            crate::dto::game::LobbySummary,
            crate::dto::game::PlayerSummary,
            crate::dto::game::RoundSummary,
            crate::dto::game::VoteSummary,
            crate::dto::game::ScoreSummary,
            crate::dto::game::VoteRequest,
            crate::dto::game::AdvancePhaseRequest,
            crate::dto::leaderboard::LeaderboardResponse,
            crate::dto::leaderboard::OwnStats,
            crate::dto::leaderboard::OpponentStats,
            crate::dao::models::LobbyStatus,
            crate::state::phase::RoundPhase,
            crate::state::phase::AdvanceTarget,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "lobby", description = "Lobby creation, joining, and game start"),
        (name = "game", description = "Poll snapshots, votes, and phase advances"),
        (name = "leaderboard", description = "Read-only history rollups"),
    )
)]
pub struct ApiDoc;

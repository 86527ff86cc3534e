use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::{
    game::{LobbySummary, PlayerSummary},
    validation::{validate_lobby_code, validate_player_id, validate_player_name},
};

/// Payload used to create a fresh lobby with the caller as host.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLobbyRequest {
    /// Host display name.
    #[validate(custom(function = validate_player_name))]
    pub player_name: String,
    /// Client-generated host id.
    #[validate(custom(function = validate_player_id))]
    pub player_id: String,
}

/// Payload used to join an existing lobby by code.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinLobbyRequest {
    /// Code of the lobby to join (matched case-insensitively).
    #[validate(custom(function = validate_lobby_code))]
    pub code: String,
    /// Display name of the joining player.
    #[validate(custom(function = validate_player_name))]
    pub player_name: String,
    /// Client-generated id of the joining player.
    #[validate(custom(function = validate_player_id))]
    pub player_id: String,
}

/// Payload used by the host to start the game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    /// Code of the lobby to start.
    #[validate(custom(function = validate_lobby_code))]
    pub code: String,
    /// Word category to draw from.
    #[validate(length(min = 1))]
    pub category: String,
    /// Discussion countdown length; server default applies when omitted.
    #[serde(default)]
    #[validate(range(min = 30, max = 1800))]
    pub round_duration_seconds: Option<u32>,
    /// Number of rounds; server default applies when omitted.
    #[serde(default)]
    #[validate(range(min = 1, max = 10))]
    pub total_rounds: Option<u32>,
}

/// Identity handed back after creating or joining a lobby; the client stores
/// it and repeats the id on every subsequent call.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LobbyJoinedResponse {
    /// Lobby code to share with other players.
    pub code: String,
    /// Echo of the caller's player id.
    pub player_id: String,
    /// Echo of the caller's display name.
    pub player_name: String,
    /// Avatar color assigned from the configured palette.
    pub avatar_color: String,
    /// Whether the caller is the lobby host.
    pub is_host: bool,
}

/// Waiting-room poll payload: the lobby and who is in it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LobbyStateResponse {
    /// Current lobby settings and status.
    pub lobby: LobbySummary,
    /// Players in join order.
    pub players: Vec<PlayerSummary>,
}

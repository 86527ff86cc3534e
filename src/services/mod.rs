//! Service layer: free async functions over the shared state.

/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Finished-game history fan-out and leaderboard rollups.
pub mod history_service;
/// Lobby creation, joining, and game start.
pub mod lobby_service;
/// The round engine: snapshots, votes, and phase transitions.
pub mod round_service;
/// Point and elimination rules.
pub mod scoring;
/// Vote aggregation and tie-breaking.
pub mod tally;

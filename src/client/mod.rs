//! Client-side logic that consumes the polled game snapshot: the countdown
//! reconciliation used during discussion, and the bot director that simulates
//! extra players in dev/test lobbies.
//!
//! The server never pushes ticks; these helpers turn the ~2s poll cadence
//! into a smooth local experience.

/// Simulated-player vote scheduling.
pub mod bot;
/// Countdown reconciliation against the server's elapsed-time anchor.
pub mod timer;

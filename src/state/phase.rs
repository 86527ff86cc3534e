use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Phases a round moves through while a lobby is playing.
///
/// Phases only ever move forward: `word_reveal → discussion → voting →
/// results`. A new round resets to `word_reveal`; there is no backward edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// Every player privately checks their word (the imposter sees a decoy).
    WordReveal,
    /// Timed open discussion; the only phase with a countdown.
    Discussion,
    /// Players lock in who they believe the imposter is.
    Voting,
    /// Tally and scoring are final; the scoreboard for the round is shown.
    Results,
}

/// Transition targets a host may request for the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceTarget {
    /// Start the timed discussion, re-anchoring the countdown.
    Discussion,
    /// Open voting; the discussion timer stops mattering.
    Voting,
    /// Resolve the round: tally votes, apply scores, record elimination.
    Results,
    /// Move on to the next round, or finish the game after the last one.
    NextRound,
}

/// Error returned when a target cannot be reached from the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {target:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// Phase the round was in when the request arrived.
    pub from: RoundPhase,
    /// The requested target.
    pub target: AdvanceTarget,
}

impl AdvanceTarget {
    /// The `(expected, next)` phase pair for targets that move the phase flag
    /// of the current round. `NextRound` returns `None`: it replaces the
    /// round instead of advancing its phase.
    pub fn phase_step(self) -> Option<(RoundPhase, RoundPhase)> {
        match self {
            AdvanceTarget::Discussion => Some((RoundPhase::WordReveal, RoundPhase::Discussion)),
            AdvanceTarget::Voting => Some((RoundPhase::Discussion, RoundPhase::Voting)),
            AdvanceTarget::Results => Some((RoundPhase::Voting, RoundPhase::Results)),
            AdvanceTarget::NextRound => None,
        }
    }
}

impl RoundPhase {
    /// Validate a requested transition, returning the next phase.
    ///
    /// `NextRound` is accepted only from `results` and yields `word_reveal`
    /// for the replacement round.
    pub fn next_for(self, target: AdvanceTarget) -> Result<RoundPhase, InvalidTransition> {
        if let Some((expected, next)) = target.phase_step() {
            if self == expected {
                return Ok(next);
            }
        } else if self == RoundPhase::Results {
            return Ok(RoundPhase::WordReveal);
        }
        Err(InvalidTransition { from: self, target })
    }
}

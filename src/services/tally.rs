//! Vote aggregation for the current round.

use indexmap::IndexMap;

use crate::dao::models::{PlayerId, VoteRecord};

/// Result of counting a round's votes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTally {
    /// `(target, vote count)` pairs, most-voted first. Targets with equal
    /// counts keep the order in which they first appeared in the vote rows.
    pub counts: Vec<(PlayerId, u32)>,
    /// The player voted out, if any votes were cast.
    pub eliminated: Option<PlayerId>,
}

/// Count votes and elect the elimination target.
///
/// Votes are grouped by target in row (insertion) order; the target with the
/// highest count is eliminated. Ties resolve to the earliest target to appear
/// in the vote rows, a deterministic rule rather than whatever the
/// storage engine happens to return. Zero votes means no one is eliminated
/// and the imposter survives by default.
pub fn tally_votes(votes: &[VoteRecord]) -> VoteTally {
    let mut grouped: IndexMap<&PlayerId, u32> = IndexMap::new();
    for vote in votes {
        *grouped.entry(&vote.voted_for_id).or_insert(0) += 1;
    }

    let mut counts: Vec<(PlayerId, u32)> = grouped
        .into_iter()
        .map(|(target, count)| (target.clone(), count))
        .collect();
    // stable sort: equal counts keep first-appearance order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let eliminated = counts.first().map(|(target, _)| target.clone());
    VoteTally { counts, eliminated }
}

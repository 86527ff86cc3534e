//! Point and elimination rules applied when a round resolves.

use indexmap::IndexMap;

use crate::dao::models::{PlayerId, ScoreDelta, VoteRecord};

/// Points awarded to each player who voted the imposter out.
pub const IMPOSTER_CAUGHT_POINTS: u32 = 100;
/// Points awarded to the imposter when someone else (or no one) is voted out.
pub const IMPOSTER_SURVIVED_POINTS: u32 = 150;

/// Score effects of resolving one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundScoring {
    /// Whether the elimination target was the imposter.
    pub imposter_caught: bool,
    /// Per-player counter increments, ready for the store transaction.
    pub deltas: Vec<ScoreDelta>,
}

/// Derive the score deltas for a resolved round.
///
/// When the eliminated player is the imposter, every voter who picked them
/// earns the catch bonus; otherwise the imposter earns the survival bonus,
/// including the zero-vote case where no one is eliminated at all. The
/// imposter's `rounds_as_imposter` counter advances regardless of outcome.
pub fn score_round(
    imposter_id: &PlayerId,
    eliminated: Option<&PlayerId>,
    votes: &[VoteRecord],
) -> RoundScoring {
    let mut deltas: IndexMap<PlayerId, ScoreDelta> = IndexMap::new();
    let imposter_caught = eliminated == Some(imposter_id);

    if imposter_caught {
        for vote in votes {
            if &vote.voted_for_id == imposter_id {
                let entry = deltas
                    .entry(vote.voter_id.clone())
                    .or_insert_with(|| ScoreDelta::zeroed(vote.voter_id.clone()));
                entry.total_score += IMPOSTER_CAUGHT_POINTS;
                entry.correct_votes += 1;
            }
        }
    } else {
        let entry = deltas
            .entry(imposter_id.clone())
            .or_insert_with(|| ScoreDelta::zeroed(imposter_id.clone()));
        entry.total_score += IMPOSTER_SURVIVED_POINTS;
        entry.survived_as_imposter += 1;
    }

    deltas
        .entry(imposter_id.clone())
        .or_insert_with(|| ScoreDelta::zeroed(imposter_id.clone()))
        .rounds_as_imposter += 1;

    RoundScoring {
        imposter_caught,
        deltas: deltas.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(voter: &str, target: &str) -> VoteRecord {
        VoteRecord {
            voter_id: voter.into(),
            voted_for_id: target.into(),
        }
    }

    fn delta_of<'a>(scoring: &'a RoundScoring, player: &str) -> &'a ScoreDelta {
        scoring
            .deltas
            .iter()
            .find(|delta| delta.player_id == player)
            .expect("missing delta")
    }

    #[test]
    fn caught_imposter_rewards_correct_voters() {
        // imposter b eliminated by a and b's own (mistaken) vote
        let imposter = "b".to_string();
        let eliminated = "b".to_string();
        let votes = [vote("a", "b"), vote("b", "b"), vote("c", "a")];
        let scoring = score_round(&imposter, Some(&eliminated), &votes);

        assert!(scoring.imposter_caught);
        let a = delta_of(&scoring, "a");
        assert_eq!((a.total_score, a.correct_votes), (IMPOSTER_CAUGHT_POINTS, 1));
        let b = delta_of(&scoring, "b");
        assert_eq!(b.total_score, IMPOSTER_CAUGHT_POINTS);
        assert_eq!(b.correct_votes, 1);
        assert_eq!(b.rounds_as_imposter, 1);
        assert_eq!(b.survived_as_imposter, 0);
        // c voted wrong: no delta beyond absence
        assert!(scoring.deltas.iter().all(|d| d.player_id != "c"));
    }

    #[test]
    fn surviving_imposter_takes_the_bonus() {
        // imposter a walks free while b is voted out
        let imposter = "a".to_string();
        let eliminated = "b".to_string();
        let votes = [vote("a", "b"), vote("b", "c"), vote("c", "b")];
        let scoring = score_round(&imposter, Some(&eliminated), &votes);

        assert!(!scoring.imposter_caught);
        assert_eq!(scoring.deltas.len(), 1);
        let a = delta_of(&scoring, "a");
        assert_eq!(a.total_score, IMPOSTER_SURVIVED_POINTS);
        assert_eq!(a.survived_as_imposter, 1);
        assert_eq!(a.rounds_as_imposter, 1);
        assert_eq!(a.correct_votes, 0);
    }

    #[test]
    fn zero_votes_still_counts_an_imposter_round() {
        let imposter = "a".to_string();
        let scoring = score_round(&imposter, None, &[]);

        assert!(!scoring.imposter_caught);
        let a = delta_of(&scoring, "a");
        assert_eq!(a.total_score, IMPOSTER_SURVIVED_POINTS);
        assert_eq!(a.survived_as_imposter, 1);
        assert_eq!(a.rounds_as_imposter, 1);
    }

    #[test]
    fn imposter_round_counter_advances_on_every_outcome() {
        let imposter = "a".to_string();
        let caught = score_round(&imposter, Some(&imposter), &[vote("b", "a")]);
        let survived = score_round(&imposter, Some(&"b".to_string()), &[vote("a", "b")]);
        let silent = score_round(&imposter, None, &[]);

        for scoring in [caught, survived, silent] {
            assert_eq!(delta_of(&scoring, "a").rounds_as_imposter, 1);
        }
    }
}

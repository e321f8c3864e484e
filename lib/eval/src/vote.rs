//! k-NN majority voting

use casebase_core::AttributeValue;
use smallvec::SmallVec;

/// Label counts over a ranked neighborhood
///
/// Labels are tallied in rank order. The winner is the first label to reach
/// the highest count, so a plurality tie goes to the label that got there
/// first while walking the neighbors from most to least similar.
#[derive(Debug, Clone, Default)]
pub struct Ballot<'a> {
    tally: SmallVec<[(&'a AttributeValue, usize); 4]>,
    winner: Option<usize>,
}

impl<'a> Ballot<'a> {
    pub fn count<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a AttributeValue>,
    {
        let mut ballot = Self::default();
        let mut best = 0;
        for label in labels {
            let slot = match ballot.tally.iter().position(|(l, _)| *l == label) {
                Some(slot) => slot,
                None => {
                    ballot.tally.push((label, 0));
                    ballot.tally.len() - 1
                }
            };
            ballot.tally[slot].1 += 1;
            if ballot.tally[slot].1 > best {
                best = ballot.tally[slot].1;
                ballot.winner = Some(slot);
            }
        }
        ballot
    }

    pub fn winner(&self) -> Option<&'a AttributeValue> {
        self.winner.map(|slot| self.tally[slot].0)
    }

    pub fn votes_for(&self, label: &AttributeValue) -> usize {
        self.tally
            .iter()
            .find(|(l, _)| *l == label)
            .map_or(0, |(_, n)| *n)
    }

    /// Distinct labels seen, in order of first appearance
    pub fn labels(&self) -> impl Iterator<Item = (&'a AttributeValue, usize)> + '_ {
        self.tally.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.tally.is_empty()
    }
}

/// The most frequent label among ranked neighbors, `None` when there are none
pub fn majority_vote<'a, I>(labels: I) -> Option<&'a AttributeValue>
where
    I: IntoIterator<Item = &'a AttributeValue>,
{
    Ballot::count(labels).winner()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<AttributeValue> {
        raw.iter().map(|s| AttributeValue::from(*s)).collect()
    }

    #[test]
    fn test_clear_majority() {
        let votes = labels(&["<=50K", ">50K", "<=50K", "<=50K", ">50K"]);
        assert_eq!(majority_vote(&votes), Some(&AttributeValue::from("<=50K")));

        let ballot = Ballot::count(&votes);
        assert_eq!(ballot.votes_for(&AttributeValue::from("<=50K")), 3);
        assert_eq!(ballot.votes_for(&AttributeValue::from(">50K")), 2);
        assert_eq!(ballot.votes_for(&AttributeValue::from("other")), 0);
        assert_eq!(ballot.labels().count(), 2);
    }

    #[test]
    fn test_single_neighbor() {
        let votes = labels(&[">50K"]);
        assert_eq!(majority_vote(&votes), Some(&AttributeValue::from(">50K")));
    }

    #[test]
    fn test_tie_goes_to_first_label_reaching_max() {
        // Both labels end with two votes; ">50K" reaches two first
        let votes = labels(&["<=50K", ">50K", ">50K", "<=50K"]);
        assert_eq!(majority_vote(&votes), Some(&AttributeValue::from(">50K")));

        // With one vote each the best-ranked label wins
        let votes = labels(&[">50K", "<=50K"]);
        assert_eq!(majority_vote(&votes), Some(&AttributeValue::from(">50K")));
    }

    #[test]
    fn test_numeric_labels() {
        let votes = vec![AttributeValue::from(1.0), AttributeValue::from(0.0), AttributeValue::from(1.0)];
        assert_eq!(majority_vote(&votes), Some(&AttributeValue::Number(1.0)));
    }

    #[test]
    fn test_no_neighbors() {
        let votes: Vec<AttributeValue> = Vec::new();
        assert_eq!(majority_vote(&votes), None);
        assert!(Ballot::count(&votes).is_empty());
    }
}

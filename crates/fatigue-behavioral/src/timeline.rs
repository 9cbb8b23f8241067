//! Timeline normalization
//!
//! Turns the raw proposal and vote sets of a space into one chronologically
//! ordered [`DelegateTimeline`] per delegate.

use chrono::{DateTime, Utc};
use fatigue_common::{days_between, EngineResult, FatigueError, Proposal, ProposalSet, Vote};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Delegate id -> timeline, iterated in ascending id order
pub type Timelines = BTreeMap<String, DelegateTimeline>;

/// A delegate's deduplicated votes in ascending cast order
#[derive(Debug, Clone)]
pub struct DelegateTimeline {
    delegate_id: String,
    votes: Vec<Vote>,
    proposals: Arc<ProposalSet>,
}

impl DelegateTimeline {
    /// Timeline of a known delegate that never voted
    pub fn empty(delegate_id: impl Into<String>, proposals: Arc<ProposalSet>) -> Self {
        Self {
            delegate_id: delegate_id.into(),
            votes: Vec::new(),
            proposals,
        }
    }

    /// Delegate address
    pub fn delegate_id(&self) -> &str {
        &self.delegate_id
    }

    /// Votes in ascending cast order
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    /// Proposal set of the space this timeline belongs to
    pub fn proposals(&self) -> &ProposalSet {
        &self.proposals
    }

    /// Number of distinct proposals voted on
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    /// Whether the delegate never voted
    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Votes cast at or before `reference_time`
    pub fn votes_until(&self, reference_time: DateTime<Utc>) -> &[Vote] {
        let end = self.votes.partition_point(|v| v.cast_at <= reference_time);
        &self.votes[..end]
    }

    /// Day gaps between consecutive votes up to `reference_time`
    pub fn gaps_days(&self, reference_time: DateTime<Utc>) -> Vec<f64> {
        self.votes_until(reference_time)
            .windows(2)
            .map(|pair| days_between(pair[0].cast_at, pair[1].cast_at))
            .collect()
    }

    /// Mean voting power per vote, 0 when the delegate never voted
    pub fn avg_voting_power(&self) -> f64 {
        if self.votes.is_empty() {
            return 0.0;
        }
        self.votes.iter().map(|v| v.voting_power).sum::<f64>() / self.votes.len() as f64
    }
}

/// Validate and sort the raw sets of a space into per-delegate timelines
pub fn normalize(
    proposals: impl IntoIterator<Item = Proposal>,
    votes: impl IntoIterator<Item = Vote>,
) -> EngineResult<Timelines> {
    let proposals = Arc::new(ProposalSet::new(proposals)?);
    normalize_with_set(proposals, votes)
}

/// Same as [`normalize`] against an already validated proposal set
pub fn normalize_with_set(
    proposals: Arc<ProposalSet>,
    votes: impl IntoIterator<Item = Vote>,
) -> EngineResult<Timelines> {
    let mut earliest: HashMap<(String, String), Vote> = HashMap::new();
    let mut raw = 0usize;

    for vote in votes {
        raw += 1;
        if !proposals.contains(&vote.proposal_id) {
            tracing::warn!(
                "Rejecting space: {} voted on unknown proposal {}",
                vote.delegate,
                vote.proposal_id
            );
            return Err(FatigueError::UnknownProposal {
                delegate: vote.delegate,
                proposal_id: vote.proposal_id,
            });
        }

        match earliest.entry((vote.delegate.clone(), vote.proposal_id.clone())) {
            Entry::Occupied(mut kept) => {
                if vote.cast_at < kept.get().cast_at {
                    kept.insert(vote);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(vote);
            }
        }
    }

    let mut grouped: BTreeMap<String, Vec<Vote>> = BTreeMap::new();
    for vote in earliest.into_values() {
        grouped.entry(vote.delegate.clone()).or_default().push(vote);
    }

    let timelines: Timelines = grouped
        .into_iter()
        .map(|(delegate_id, mut votes)| {
            votes.sort_by(|a, b| {
                a.cast_at
                    .cmp(&b.cast_at)
                    .then_with(|| a.proposal_id.cmp(&b.proposal_id))
            });
            let timeline = DelegateTimeline {
                delegate_id: delegate_id.clone(),
                votes,
                proposals: Arc::clone(&proposals),
            };
            (delegate_id, timeline)
        })
        .collect();

    tracing::debug!(
        "Normalized {} votes into {} delegate timelines over {} proposals",
        raw,
        timelines.len(),
        proposals.len()
    );

    Ok(timelines)
}

/// Add empty timelines for known delegates that never voted
pub fn with_universe<'a>(
    mut timelines: Timelines,
    universe: impl IntoIterator<Item = &'a str>,
    proposals: &Arc<ProposalSet>,
) -> Timelines {
    for delegate in universe {
        timelines
            .entry(delegate.to_string())
            .or_insert_with(|| DelegateTimeline::empty(delegate, Arc::clone(proposals)));
    }
    timelines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::day;

    fn proposals() -> Vec<Proposal> {
        vec![
            Proposal::new("p1", day(0)),
            Proposal::new("p2", day(10)),
            Proposal::new("p3", day(20)),
        ]
    }

    #[test]
    fn test_one_timeline_per_delegate() {
        let votes = vec![
            Vote::new("0xbbb", "p2", day(11)),
            Vote::new("0xaaa", "p1", day(1)),
            Vote::new("0xbbb", "p1", day(2)),
        ];

        let timelines = normalize(proposals(), votes).unwrap();
        let ids: Vec<_> = timelines.keys().cloned().collect();
        assert_eq!(ids, vec!["0xaaa", "0xbbb"]);

        let b = &timelines["0xbbb"];
        assert_eq!(b.len(), 2);
        assert_eq!(b.votes()[0].proposal_id, "p1");
        assert_eq!(b.votes()[1].proposal_id, "p2");
        assert_eq!(b.proposals().len(), 3);
    }

    #[test]
    fn test_unknown_proposal_rejected() {
        let votes = vec![
            Vote::new("0xaaa", "p1", day(1)),
            Vote::new("0xaaa", "ghost", day(2)),
        ];

        let err = normalize(proposals(), votes).unwrap_err();
        assert!(err.is_integrity());
        assert!(matches!(err, FatigueError::UnknownProposal { ref proposal_id, .. } if proposal_id == "ghost"));
    }

    #[test]
    fn test_duplicate_votes_keep_earliest() {
        let votes = vec![
            Vote::new("0xaaa", "p1", day(5)).with_voting_power(1.0),
            Vote::new("0xaaa", "p1", day(1)).with_voting_power(2.0),
            Vote::new("0xaaa", "p1", day(3)).with_voting_power(3.0),
        ];

        let timelines = normalize(proposals(), votes).unwrap();
        let a = &timelines["0xaaa"];
        assert_eq!(a.len(), 1);
        assert_eq!(a.votes()[0].cast_at, day(1));
        assert_eq!(a.votes()[0].voting_power, 2.0);
    }

    #[test]
    fn test_gaps_respect_reference_time() {
        let votes = vec![
            Vote::new("0xaaa", "p1", day(1)),
            Vote::new("0xaaa", "p2", day(11)),
            Vote::new("0xaaa", "p3", day(31)),
        ];
        let timelines = normalize(proposals(), votes).unwrap();
        let a = &timelines["0xaaa"];

        assert_eq!(a.gaps_days(day(40)), vec![10.0, 20.0]);
        assert_eq!(a.gaps_days(day(15)), vec![10.0]);
        assert_eq!(a.votes_until(day(0)).len(), 0);
    }

    #[test]
    fn test_universe_adds_silent_delegates() {
        let set = Arc::new(ProposalSet::new(proposals()).unwrap());
        let timelines =
            normalize_with_set(Arc::clone(&set), vec![Vote::new("0xaaa", "p1", day(1))]).unwrap();

        let timelines = with_universe(timelines, ["0xaaa", "0xccc"], &set);
        assert_eq!(timelines.len(), 2);
        assert_eq!(timelines["0xaaa"].len(), 1);
        assert!(timelines["0xccc"].is_empty());
        assert_eq!(timelines["0xccc"].avg_voting_power(), 0.0);
    }

    #[test]
    fn test_avg_voting_power() {
        let votes = vec![
            Vote::new("0xaaa", "p1", day(1)).with_voting_power(100.0),
            Vote::new("0xaaa", "p2", day(11)).with_voting_power(300.0),
        ];
        let timelines = normalize(proposals(), votes).unwrap();
        assert_eq!(timelines["0xaaa"].avg_voting_power(), 200.0);
    }
}

//! Governance data model: proposals, votes and the per-space proposal set

use crate::{EngineResult, FatigueError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Fractional days from `earlier` to `later` (negative if `later` comes first)
#[inline]
pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Inclusive trailing window `[reference - days, reference]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Window start (inclusive)
    pub start: DateTime<Utc>,
    /// Window end (inclusive)
    pub end: DateTime<Utc>,
}

impl Window {
    /// Trailing window ending at `reference_time`.
    ///
    /// A start before the earliest representable instant is pinned to it.
    pub fn trailing(reference_time: DateTime<Utc>, days: i64) -> Self {
        let start = Duration::try_days(days)
            .and_then(|span| reference_time.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: reference_time }
    }

    /// Whether `at` falls inside the window, bounds included
    #[inline]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

/// A governance proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Proposal id, unique within a space
    pub id: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Proposal {
    /// Create a proposal
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self { id: id.into(), created_at }
    }
}

/// A single vote cast by a delegate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Delegate address
    pub delegate: String,
    /// Proposal voted on
    pub proposal_id: String,
    /// Cast time
    pub cast_at: DateTime<Utc>,
    /// Voting power carried by the vote
    #[serde(default)]
    pub voting_power: f64,
}

impl Vote {
    /// Create a vote with zero voting power
    pub fn new(
        delegate: impl Into<String>,
        proposal_id: impl Into<String>,
        cast_at: DateTime<Utc>,
    ) -> Self {
        Self {
            delegate: delegate.into(),
            proposal_id: proposal_id.into(),
            cast_at,
            voting_power: 0.0,
        }
    }

    /// Attach voting power
    pub fn with_voting_power(mut self, voting_power: f64) -> Self {
        self.voting_power = voting_power;
        self
    }
}

/// Materialized ingestion output for one governance space
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpaceData {
    /// Space identifier, e.g. `arbitrumfoundation.eth`
    pub space: String,
    /// All proposals of the space
    pub proposals: Vec<Proposal>,
    /// All votes cast in the space
    pub votes: Vec<Vote>,
    /// Delegates known to the space whether or not they voted
    #[serde(default)]
    pub known_delegates: Vec<String>,
}

/// Validated, chronologically ordered proposals of one space.
///
/// Shared read-only between every delegate timeline of a run.
#[derive(Debug, Clone, Default)]
pub struct ProposalSet {
    proposals: Vec<Proposal>,
    index: HashMap<String, usize>,
}

impl ProposalSet {
    /// Build the set, rejecting ids that collide with a different timestamp.
    ///
    /// Exact duplicates (same id, same timestamp) collapse to one entry.
    pub fn new(proposals: impl IntoIterator<Item = Proposal>) -> EngineResult<Self> {
        let mut seen: HashMap<String, DateTime<Utc>> = HashMap::new();
        let mut unique = Vec::new();

        for proposal in proposals {
            match seen.get(&proposal.id) {
                Some(created_at) if *created_at == proposal.created_at => continue,
                Some(_) => {
                    tracing::warn!("Proposal {} ingested with conflicting timestamps", proposal.id);
                    return Err(FatigueError::ProposalConflict { proposal_id: proposal.id });
                }
                None => {
                    seen.insert(proposal.id.clone(), proposal.created_at);
                    unique.push(proposal);
                }
            }
        }

        unique.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let index = unique
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();

        Ok(Self { proposals: unique, index })
    }

    /// Look up a proposal by id
    pub fn get(&self, id: &str) -> Option<&Proposal> {
        self.index.get(id).map(|&i| &self.proposals[i])
    }

    /// Whether the id is part of the space
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of proposals
    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    /// Whether the space has no proposals
    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// Proposals in ascending creation order
    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }

    /// Proposals created inside `window`
    pub fn in_window(&self, window: &Window) -> &[Proposal] {
        let lo = self.proposals.partition_point(|p| p.created_at < window.start);
        let hi = self.proposals.partition_point(|p| p.created_at <= window.end);
        if lo >= hi {
            &[]
        } else {
            &self.proposals[lo..hi]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(d)
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(day(0), day(10)), 10.0);
        assert_eq!(days_between(day(10), day(0)), -10.0);
        assert_eq!(days_between(day(0), day(0) + Duration::hours(12)), 0.5);
    }

    #[test]
    fn test_proposal_set_sorted() {
        let set = ProposalSet::new(vec![
            Proposal::new("c", day(20)),
            Proposal::new("a", day(0)),
            Proposal::new("b", day(10)),
        ])
        .unwrap();

        let ids: Vec<_> = set.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(set.get("b").unwrap().created_at, day(10));
        assert!(!set.contains("z"));
    }

    #[test]
    fn test_exact_duplicate_is_idempotent() {
        let set = ProposalSet::new(vec![
            Proposal::new("a", day(0)),
            Proposal::new("a", day(0)),
        ])
        .unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_conflicting_duplicate_rejected() {
        let err = ProposalSet::new(vec![
            Proposal::new("a", day(0)),
            Proposal::new("a", day(1)),
        ])
        .unwrap_err();
        assert!(matches!(err, FatigueError::ProposalConflict { ref proposal_id } if proposal_id == "a"));
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let set = ProposalSet::new((0..=40).map(|d| Proposal::new(format!("p{d}"), day(d)))).unwrap();
        let window = Window::trailing(day(40), 30);

        let in_window = set.in_window(&window);
        assert_eq!(in_window.len(), 31);
        assert_eq!(in_window.first().unwrap().id, "p10");
        assert_eq!(in_window.last().unwrap().id, "p40");
    }

    #[test]
    fn test_huge_window_pins_to_earliest_instant() {
        let window = Window::trailing(day(0), i64::MAX);
        assert_eq!(window.start, DateTime::<Utc>::MIN_UTC);
        assert!(window.contains(day(-10_000)));

        let window = Window::trailing(day(0), 200_000_000);
        assert_eq!(window.start, DateTime::<Utc>::MIN_UTC);
        assert_eq!(window.end, day(0));
    }

    #[test]
    fn test_window_before_any_proposal() {
        let set = ProposalSet::new(vec![Proposal::new("a", day(100))]).unwrap();
        assert!(set.in_window(&Window::trailing(day(50), 30)).is_empty());
    }
}

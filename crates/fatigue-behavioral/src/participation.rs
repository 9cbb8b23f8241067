//! Windowed participation rate

use crate::timeline::DelegateTimeline;
use chrono::{DateTime, Utc};
use fatigue_common::{ProposalSet, Window};
use serde::{Deserialize, Serialize};

/// Participation of one delegate over a trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationResult {
    /// Delegate address
    pub delegate_id: String,
    /// Window length in days
    pub window_days: i64,
    /// votes_in_window / proposals_in_window; `None` when no proposal opened in the window
    pub rate: Option<f64>,
    /// Votes cast in the window on proposals opened in the window
    pub votes_in_window: usize,
    /// Proposals opened in the window
    pub proposals_in_window: usize,
}

impl ParticipationResult {
    /// Whether the window held any opportunity to vote
    pub fn has_data(&self) -> bool {
        self.rate.is_some()
    }
}

/// Share of the proposals opened in `[reference_time - window_days, reference_time]`
/// that the delegate voted on inside the same window.
///
/// A vote only counts when both the vote and its proposal fall in the window.
pub fn participation_rate(
    timeline: &DelegateTimeline,
    all_proposals: &ProposalSet,
    window_days: i64,
    reference_time: DateTime<Utc>,
) -> ParticipationResult {
    let window = Window::trailing(reference_time, window_days);
    let proposals_in_window = all_proposals.in_window(&window).len();

    let votes_in_window = timeline
        .votes()
        .iter()
        .filter(|vote| window.contains(vote.cast_at))
        .filter(|vote| {
            all_proposals
                .get(&vote.proposal_id)
                .is_some_and(|p| window.contains(p.created_at))
        })
        .count();

    let rate = if proposals_in_window > 0 {
        Some(votes_in_window as f64 / proposals_in_window as f64)
    } else {
        None
    };

    ParticipationResult {
        delegate_id: timeline.delegate_id().to_string(),
        window_days,
        rate,
        votes_in_window,
        proposals_in_window,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{day, single, timelines};
    use fatigue_common::Vote;

    #[test]
    fn test_full_participation() {
        let timeline = single("0xaaa", &[50, 60, 70], &[50, 60, 70]);
        let result = participation_rate(&timeline, timeline.proposals(), 30, day(75));

        assert_eq!(result.proposals_in_window, 3);
        assert_eq!(result.votes_in_window, 3);
        assert_eq!(result.rate, Some(1.0));
        assert_eq!(result.window_days, 30);
    }

    #[test]
    fn test_partial_participation() {
        let timeline = single("0xaaa", &[50, 60, 70, 72], &[60]);
        let result = participation_rate(&timeline, timeline.proposals(), 30, day(75));

        assert_eq!(result.rate, Some(0.25));
    }

    #[test]
    fn test_empty_window_is_absent_not_zero() {
        let timeline = single("0xaaa", &[0, 5], &[0, 5]);
        let result = participation_rate(&timeline, timeline.proposals(), 30, day(100));

        assert_eq!(result.proposals_in_window, 0);
        assert_eq!(result.rate, None);
        assert!(!result.has_data());
    }

    #[test]
    fn test_window_bounds_inclusive() {
        // proposal exactly on the start bound and vote exactly on the reference time
        let mut votes = vec![Vote::new("0xaaa", "p10", day(40))];
        votes.push(Vote::new("0xaaa", "p40", day(40)));
        let timeline = timelines(&[9, 10, 40], votes).remove("0xaaa").unwrap();

        let result = participation_rate(&timeline, timeline.proposals(), 30, day(40));
        assert_eq!(result.proposals_in_window, 2);
        assert_eq!(result.votes_in_window, 2);
        assert_eq!(result.rate, Some(1.0));
    }

    #[test]
    fn test_vote_on_old_proposal_does_not_count() {
        // voted inside the window, but on a proposal opened before it
        let votes = vec![Vote::new("0xaaa", "p0", day(65))];
        let timeline = timelines(&[0, 60], votes).remove("0xaaa").unwrap();

        let result = participation_rate(&timeline, timeline.proposals(), 30, day(70));
        assert_eq!(result.proposals_in_window, 1);
        assert_eq!(result.votes_in_window, 0);
        assert_eq!(result.rate, Some(0.0));
    }

    #[test]
    fn test_vote_after_reference_excluded() {
        let votes = vec![Vote::new("0xaaa", "p60", day(80))];
        let timeline = timelines(&[60], votes).remove("0xaaa").unwrap();

        let backtest = participation_rate(&timeline, timeline.proposals(), 30, day(70));
        assert_eq!(backtest.rate, Some(0.0));

        let now = participation_rate(&timeline, timeline.proposals(), 30, day(85));
        assert_eq!(now.rate, Some(1.0));
    }
}

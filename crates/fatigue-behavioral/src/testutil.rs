//! Fixtures shared by the unit tests

use crate::timeline::{normalize, DelegateTimeline, Timelines};
use chrono::{DateTime, Duration, TimeZone, Utc};
use fatigue_common::{Proposal, Vote};

pub fn day(d: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(d)
}

/// One proposal per listed day, id `p{day}`
pub fn proposals_on(days: &[i64]) -> Vec<Proposal> {
    days.iter().map(|d| Proposal::new(format!("p{d}"), day(*d))).collect()
}

/// Votes by `delegate` cast on the creation day of `p{day}`
pub fn votes_on(delegate: &str, days: &[i64]) -> Vec<Vote> {
    days.iter()
        .map(|d| Vote::new(delegate, format!("p{d}"), day(*d)))
        .collect()
}

pub fn timelines(proposal_days: &[i64], votes: Vec<Vote>) -> Timelines {
    normalize(proposals_on(proposal_days), votes).unwrap()
}

/// Timeline of a delegate voting on the day every listed proposal opened
pub fn single(delegate: &str, proposal_days: &[i64], vote_days: &[i64]) -> DelegateTimeline {
    timelines(proposal_days, votes_on(delegate, vote_days))
        .remove(delegate)
        .unwrap()
}

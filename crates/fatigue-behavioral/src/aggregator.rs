//! DAO-wide health aggregation and at-risk ranking

use crate::participation::participation_rate;
use crate::report::{DelegateReport, TrendDirection};
use crate::scorer::{FatigueScorer, RiskBand};
use crate::timeline::{DelegateTimeline, Timelines};
use chrono::{DateTime, Utc};
use fatigue_common::{EngineConfig, ProposalSet};
use serde::{Deserialize, Serialize};

/// Position of a delegate in the fatigue ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDelegate {
    /// 1-based rank, most fatigued first
    pub rank: usize,
    /// Delegate address
    pub delegate_id: String,
    /// Composite fatigue score
    pub composite: f64,
    /// Interpretation band
    pub band: RiskBand,
}

/// DAO-wide health summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    /// Delegates analyzed
    pub total_delegates: usize,
    /// Delegates whose primary window held at least one proposal
    pub rated_delegates: usize,
    /// Mean primary-window rate over rated delegates only.
    ///
    /// Named after the default 30-day window; covers `window_days` as configured.
    pub mean_participation_30d: Option<f64>,
    /// Mean composite over all delegates
    pub mean_fatigue_score: f64,
    /// Delegates at or above the at-risk threshold
    pub at_risk_count: usize,
    /// `at_risk_count` as a percentage of all delegates
    pub at_risk_percentage: f64,
    /// Delegates with a rate above the activity threshold
    pub active_count: usize,
    /// `active_count` as a percentage of all delegates
    pub active_percentage: f64,
    /// Delegates with a positive trend signal
    pub declining_count: usize,
    /// Delegates with a positive burnout signal
    pub burned_out_count: usize,
    /// Composite descending, ties by ascending delegate id
    pub ranking: Vec<RankedDelegate>,
}

/// Folds per-delegate results into a [`HealthSummary`]
#[derive(Debug, Clone, Default)]
pub struct HealthAggregator {
    scorer: FatigueScorer,
}

impl HealthAggregator {
    /// Create aggregator
    pub fn new(config: EngineConfig) -> Self {
        Self { scorer: FatigueScorer::new(config) }
    }

    /// Aggregator configuration
    pub fn config(&self) -> &EngineConfig {
        self.scorer.config()
    }

    /// Participation, fatigue, band and trend of one delegate
    pub fn assess(
        &self,
        timeline: &DelegateTimeline,
        all_proposals: &ProposalSet,
        reference_time: DateTime<Utc>,
    ) -> DelegateReport {
        let config = self.config();
        let short = participation_rate(timeline, all_proposals, config.window_days, reference_time);
        let baseline =
            participation_rate(timeline, all_proposals, config.trend_baseline_days, reference_time);
        let fatigue = self.scorer.score_with_rates(timeline, reference_time, &short, &baseline);

        let band = RiskBand::classify(fatigue.composite, config);
        let trend = TrendDirection::classify(&short, &baseline, fatigue.flags.is_declining);

        DelegateReport {
            delegate_id: timeline.delegate_id().to_string(),
            total_votes: timeline.len(),
            avg_voting_power: timeline.avg_voting_power(),
            participation_30d: short,
            participation_90d: baseline,
            fatigue,
            band,
            trend,
        }
    }

    /// Assess every delegate, in ascending delegate id order
    pub fn assess_all(
        &self,
        timelines: &Timelines,
        all_proposals: &ProposalSet,
        reference_time: DateTime<Utc>,
    ) -> Vec<DelegateReport> {
        timelines
            .values()
            .map(|timeline| self.assess(timeline, all_proposals, reference_time))
            .collect()
    }

    /// Summarize every delegate of the space
    pub fn summarize(
        &self,
        timelines: &Timelines,
        all_proposals: &ProposalSet,
        reference_time: DateTime<Utc>,
    ) -> HealthSummary {
        let reports = self.assess_all(timelines, all_proposals, reference_time);
        self.summarize_reports(&reports)
    }

    /// Fold already computed reports
    pub fn summarize_reports(&self, reports: &[DelegateReport]) -> HealthSummary {
        let config = self.config();
        let total = reports.len();

        let rates: Vec<f64> = reports
            .iter()
            .filter_map(|r| r.participation_30d.rate)
            .collect();
        let mean_participation_30d = mean(&rates);

        let composites: Vec<f64> = reports.iter().map(|r| r.fatigue.composite).collect();
        let mean_fatigue_score = mean(&composites).unwrap_or(0.0);

        let at_risk_count = reports
            .iter()
            .filter(|r| r.fatigue.composite >= config.at_risk_threshold)
            .count();
        let active_count = rates.iter().filter(|&&rate| rate > config.active_threshold).count();
        let declining_count = reports.iter().filter(|r| r.fatigue.flags.is_declining).count();
        let burned_out_count = reports.iter().filter(|r| r.fatigue.flags.is_burned_out).count();

        let summary = HealthSummary {
            total_delegates: total,
            rated_delegates: rates.len(),
            mean_participation_30d,
            mean_fatigue_score,
            at_risk_count,
            at_risk_percentage: percentage(at_risk_count, total),
            active_count,
            active_percentage: percentage(active_count, total),
            declining_count,
            burned_out_count,
            ranking: rank(reports),
        };

        tracing::debug!(
            "Summarized {} delegates: {} at risk, {} active",
            summary.total_delegates,
            summary.at_risk_count,
            summary.active_count
        );

        summary
    }
}

/// Summarize with the default configuration
pub fn summarize(
    timelines: &Timelines,
    all_proposals: &ProposalSet,
    reference_time: DateTime<Utc>,
) -> HealthSummary {
    HealthAggregator::default().summarize(timelines, all_proposals, reference_time)
}

fn rank(reports: &[DelegateReport]) -> Vec<RankedDelegate> {
    let mut ordered: Vec<&DelegateReport> = reports.iter().collect();
    ordered.sort_by(|a, b| {
        b.fatigue
            .composite
            .total_cmp(&a.fatigue.composite)
            .then_with(|| a.delegate_id.cmp(&b.delegate_id))
    });

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, r)| RankedDelegate {
            rank: i + 1,
            delegate_id: r.delegate_id.clone(),
            composite: r.fatigue.composite,
            band: r.band,
        })
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::{FatigueFlags, FatigueResult};
    use crate::participation::ParticipationResult;
    use crate::testutil::{day, proposals_on, timelines, votes_on};
    use fatigue_common::ProposalSet;

    fn report(id: &str, composite: f64, rate: Option<f64>) -> DelegateReport {
        let window = ParticipationResult {
            delegate_id: id.into(),
            window_days: 30,
            rate,
            votes_in_window: 0,
            proposals_in_window: 0,
        };
        DelegateReport {
            delegate_id: id.into(),
            total_votes: 0,
            avg_voting_power: 0.0,
            participation_30d: window.clone(),
            participation_90d: window,
            fatigue: FatigueResult {
                delegate_id: id.into(),
                gap_score: 0.0,
                burnout_score: 0.0,
                trend_score: 0.0,
                composite,
                longest_gap_days: 0.0,
                avg_gap_days: None,
                recent_silence_days: None,
                flags: FatigueFlags::default(),
            },
            band: RiskBand::classify(composite, &EngineConfig::default()),
            trend: TrendDirection::InsufficientData,
        }
    }

    #[test]
    fn test_ranking_ties_by_id() {
        let aggregator = HealthAggregator::default();
        let reports = vec![
            report("0xccc", 50.0, Some(0.5)),
            report("0xbbb", 50.0, Some(0.5)),
            report("0xaaa", 10.0, Some(0.5)),
            report("0xddd", 70.0, Some(0.5)),
        ];

        let summary = aggregator.summarize_reports(&reports);
        let order: Vec<_> = summary.ranking.iter().map(|r| r.delegate_id.as_str()).collect();
        assert_eq!(order, vec!["0xddd", "0xbbb", "0xccc", "0xaaa"]);
        assert_eq!(summary.ranking[0].rank, 1);
        assert_eq!(summary.ranking[0].band, RiskBand::HighRisk);
        assert_eq!(summary.ranking[3].rank, 4);
    }

    #[test]
    fn test_absent_rates_excluded_from_mean() {
        let aggregator = HealthAggregator::default();
        let reports = vec![
            report("0xaaa", 0.0, Some(1.0)),
            report("0xbbb", 0.0, Some(0.5)),
            report("0xccc", 30.0, None),
        ];

        let summary = aggregator.summarize_reports(&reports);
        assert_eq!(summary.total_delegates, 3);
        assert_eq!(summary.rated_delegates, 2);
        assert_eq!(summary.mean_participation_30d, Some(0.75));
        assert_eq!(summary.mean_fatigue_score, 10.0);
        assert_eq!(summary.active_count, 2);
    }

    #[test]
    fn test_counts_and_percentages() {
        let aggregator = HealthAggregator::default();
        let reports = vec![
            report("0xaaa", 61.0, Some(0.0)),
            report("0xbbb", 60.9, Some(0.1)),
            report("0xccc", 90.0, None),
            report("0xddd", 5.0, Some(0.4)),
        ];

        let summary = aggregator.summarize_reports(&reports);
        assert_eq!(summary.at_risk_count, 2);
        assert_eq!(summary.at_risk_percentage, 50.0);
        // zero rate is defined but not active
        assert_eq!(summary.active_count, 2);
        assert_eq!(summary.active_percentage, 50.0);
    }

    #[test]
    fn test_empty_space() {
        let summary = HealthAggregator::default().summarize_reports(&[]);
        assert_eq!(summary.total_delegates, 0);
        assert_eq!(summary.mean_participation_30d, None);
        assert_eq!(summary.mean_fatigue_score, 0.0);
        assert_eq!(summary.at_risk_percentage, 0.0);
        assert!(summary.ranking.is_empty());
    }

    #[test]
    fn test_summarize_timelines() {
        let proposal_days: Vec<i64> = (0..=12).map(|i| i * 10).collect();
        let mut votes = votes_on("0xsteady", &proposal_days);
        votes.extend(votes_on("0xfading", &[0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100]));
        let timelines = timelines(&proposal_days, votes);
        let set = ProposalSet::new(proposals_on(&proposal_days)).unwrap();

        let summary = summarize(&timelines, &set, day(135));
        assert_eq!(summary.total_delegates, 2);
        assert_eq!(summary.ranking[0].delegate_id, "0xfading");
        assert_eq!(summary.burned_out_count, 1);
        // window [105, 135]: p110, p120; steady voted both, fading none
        assert_eq!(summary.mean_participation_30d, Some(0.5));
        assert_eq!(summary.active_count, 1);
        assert_eq!(summary.declining_count, 1);
    }
}

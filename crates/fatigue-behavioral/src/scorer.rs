//! Fatigue scoring
//!
//! Three independent signals, each capped at its own weight:
//! - gap: longest silence between two votes against a fixed horizon
//! - burnout: current silence against the delegate's own cadence
//! - trend: short-window participation against the baseline window
//!
//! Missing history never penalizes a delegate; the affected signal is 0.

use crate::participation::{participation_rate, ParticipationResult};
use crate::timeline::DelegateTimeline;
use chrono::{DateTime, Utc};
use fatigue_common::{days_between, EngineConfig};
use serde::{Deserialize, Serialize};

/// Guards the trend ratio against a zero baseline
const EPSILON: f64 = 1e-9;

/// Boolean fatigue indicators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatigueFlags {
    /// Current silence exceeds the burnout trigger
    pub is_burned_out: bool,
    /// Short-window participation fell below the baseline
    pub is_declining: bool,
}

/// Fatigue assessment of one delegate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueResult {
    /// Delegate address
    pub delegate_id: String,
    /// Longest-gap signal
    pub gap_score: f64,
    /// Burnout signal
    pub burnout_score: f64,
    /// Declining-participation signal
    pub trend_score: f64,
    /// Sum of the signals clamped to [0, 100]
    pub composite: f64,
    /// Longest gap between consecutive votes, 0 with fewer than two votes
    pub longest_gap_days: f64,
    /// Mean gap between consecutive votes
    pub avg_gap_days: Option<f64>,
    /// Days since the last vote
    pub recent_silence_days: Option<f64>,
    /// Indicators
    pub flags: FatigueFlags,
}

/// Interpretation band of a composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    /// Below the moderate threshold
    Healthy,
    /// Between the moderate and at-risk thresholds
    Moderate,
    /// At or above the at-risk threshold
    HighRisk,
}

impl RiskBand {
    /// Band of `composite` under the configured thresholds
    pub fn classify(composite: f64, config: &EngineConfig) -> Self {
        if composite >= config.at_risk_threshold {
            RiskBand::HighRisk
        } else if composite >= config.moderate_threshold {
            RiskBand::Moderate
        } else {
            RiskBand::Healthy
        }
    }

    /// Lowercase label used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Healthy => "healthy",
            RiskBand::Moderate => "moderate",
            RiskBand::HighRisk => "high_risk",
        }
    }
}

/// Stateless scorer holding the curve parameters
#[derive(Debug, Clone, Default)]
pub struct FatigueScorer {
    config: EngineConfig,
}

impl FatigueScorer {
    /// Create scorer
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Scorer configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score a delegate as of `reference_time`
    pub fn score(&self, timeline: &DelegateTimeline, reference_time: DateTime<Utc>) -> FatigueResult {
        let short = participation_rate(
            timeline,
            timeline.proposals(),
            self.config.window_days,
            reference_time,
        );
        let baseline = participation_rate(
            timeline,
            timeline.proposals(),
            self.config.trend_baseline_days,
            reference_time,
        );
        self.score_with_rates(timeline, reference_time, &short, &baseline)
    }

    /// Score using participation results the caller already computed.
    ///
    /// `short` and `baseline` must be the configured windows at `reference_time`.
    pub fn score_with_rates(
        &self,
        timeline: &DelegateTimeline,
        reference_time: DateTime<Utc>,
        short: &ParticipationResult,
        baseline: &ParticipationResult,
    ) -> FatigueResult {
        let history = timeline.votes_until(reference_time);
        let gaps = timeline.gaps_days(reference_time);

        let longest_gap_days = gaps.iter().copied().fold(0.0, f64::max);
        let avg_gap_days = if gaps.is_empty() {
            None
        } else {
            Some(gaps.iter().sum::<f64>() / gaps.len() as f64)
        };
        let recent_silence_days = history
            .last()
            .map(|last| days_between(last.cast_at, reference_time));

        let gap_score = self.gap_score(longest_gap_days);
        let burnout_score = match (avg_gap_days, recent_silence_days) {
            (Some(avg_gap), Some(silence)) => self.burnout_score(avg_gap, silence),
            _ => 0.0,
        };
        let trend_score = self.trend_score(short.rate, baseline.rate);

        let composite = (gap_score + burnout_score + trend_score).clamp(0.0, 100.0);

        FatigueResult {
            delegate_id: timeline.delegate_id().to_string(),
            gap_score,
            burnout_score,
            trend_score,
            composite,
            longest_gap_days,
            avg_gap_days,
            recent_silence_days,
            flags: FatigueFlags {
                is_burned_out: burnout_score > 0.0,
                is_declining: trend_score > 0.0,
            },
        }
    }

    fn gap_score(&self, longest_gap_days: f64) -> f64 {
        let weight = self.config.gap_weight;
        (longest_gap_days / self.config.long_gap_days * weight).clamp(0.0, weight)
    }

    /// Linear past `burnout_multiplier * avg_gap`, saturating at
    /// `burnout_saturation * avg_gap`. A zero cadence establishes no baseline.
    fn burnout_score(&self, avg_gap: f64, recent_silence: f64) -> f64 {
        if avg_gap <= 0.0 {
            return 0.0;
        }
        let trigger = self.config.burnout_multiplier * avg_gap;
        if recent_silence <= trigger {
            return 0.0;
        }

        let weight = self.config.burnout_weight;
        let span = self.config.burnout_saturation / self.config.burnout_multiplier - 1.0;
        (weight * (recent_silence / trigger - 1.0) / span).clamp(0.0, weight)
    }

    fn trend_score(&self, short: Option<f64>, baseline: Option<f64>) -> f64 {
        match (short, baseline) {
            (Some(short), Some(baseline)) if baseline > 0.0 => {
                let weight = self.config.trend_weight;
                (weight * (baseline - short) / baseline.max(EPSILON)).clamp(0.0, weight)
            }
            _ => 0.0,
        }
    }
}

/// Score with the default curves
pub fn fatigue_score(timeline: &DelegateTimeline, reference_time: DateTime<Utc>) -> FatigueResult {
    FatigueScorer::default().score(timeline, reference_time)
}

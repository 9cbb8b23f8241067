//! Engine configuration

use crate::{EngineResult, FatigueError};
use serde::{Deserialize, Serialize};

/// Longest window accepted, one century of days
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Tunable thresholds and score curves for the behavioral engine.
///
/// Defaults reproduce the 30/50/20 point split, the 90-day long-gap horizon
/// and the "2x historical cadence" burnout rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Primary participation window in days
    pub window_days: i64,
    /// Baseline window used for the trend comparison
    pub trend_baseline_days: i64,
    /// Gap length that earns the full gap sub-score
    pub long_gap_days: f64,
    /// Composite at or above which a delegate is at risk
    pub at_risk_threshold: f64,
    /// Composite at or above which a delegate is moderately fatigued
    pub moderate_threshold: f64,
    /// 30-day rate a delegate must exceed to count as active
    pub active_threshold: f64,
    /// Silence, in multiples of the average gap, that triggers burnout
    pub burnout_multiplier: f64,
    /// Silence, in multiples of the average gap, where burnout saturates
    pub burnout_saturation: f64,
    /// Gap sub-score cap
    pub gap_weight: f64,
    /// Burnout sub-score cap
    pub burnout_weight: f64,
    /// Trend sub-score cap
    pub trend_weight: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            trend_baseline_days: 90,
            long_gap_days: 90.0,
            at_risk_threshold: 61.0,
            moderate_threshold: 31.0,
            active_threshold: 0.0,
            burnout_multiplier: 2.0,
            burnout_saturation: 4.0,
            gap_weight: 30.0,
            burnout_weight: 50.0,
            trend_weight: 20.0,
        }
    }
}

impl EngineConfig {
    /// Reject configurations that would make a score undefined
    pub fn validate(&self) -> EngineResult<()> {
        let reals = [
            ("long_gap_days", self.long_gap_days),
            ("at_risk_threshold", self.at_risk_threshold),
            ("moderate_threshold", self.moderate_threshold),
            ("active_threshold", self.active_threshold),
            ("burnout_multiplier", self.burnout_multiplier),
            ("burnout_saturation", self.burnout_saturation),
            ("gap_weight", self.gap_weight),
            ("burnout_weight", self.burnout_weight),
            ("trend_weight", self.trend_weight),
        ];
        if let Some((name, _)) = reals.iter().find(|(_, v)| !v.is_finite()) {
            return Err(FatigueError::InvalidConfig(format!("{} must be a finite number", name)));
        }
        if self.window_days <= 0 {
            return Err(FatigueError::InvalidConfig("window_days must be positive".into()));
        }
        if self.trend_baseline_days < self.window_days {
            return Err(FatigueError::InvalidConfig(
                "trend_baseline_days must not be shorter than window_days".into(),
            ));
        }
        if self.trend_baseline_days > MAX_WINDOW_DAYS {
            return Err(FatigueError::InvalidConfig(format!(
                "trend_baseline_days must not exceed {}",
                MAX_WINDOW_DAYS
            )));
        }
        if self.long_gap_days <= 0.0 {
            return Err(FatigueError::InvalidConfig("long_gap_days must be positive".into()));
        }
        if self.burnout_multiplier <= 0.0 {
            return Err(FatigueError::InvalidConfig("burnout_multiplier must be positive".into()));
        }
        if self.burnout_saturation <= self.burnout_multiplier {
            return Err(FatigueError::InvalidConfig(
                "burnout_saturation must exceed burnout_multiplier".into(),
            ));
        }
        if [self.gap_weight, self.burnout_weight, self.trend_weight]
            .iter()
            .any(|w| *w < 0.0)
        {
            return Err(FatigueError::InvalidConfig("sub-score weights must be non-negative".into()));
        }
        if self.moderate_threshold > self.at_risk_threshold {
            return Err(FatigueError::InvalidConfig(
                "moderate_threshold must not exceed at_risk_threshold".into(),
            ));
        }
        Ok(())
    }
}

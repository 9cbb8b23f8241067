//! CLI Commands

pub mod analyze;
pub mod config;
pub mod delegate;
pub mod targets;

use crate::snapshot::SnapshotDocument;
use anyhow::Context as _;
use chrono::{DateTime, Utc};
use fatigue_behavioral::{AnalysisReport, BehavioralEngine};
use fatigue_common::EngineConfig;
use std::path::PathBuf;

/// Resolved inputs shared by the analysis commands
pub struct Context {
    pub input: PathBuf,
    pub space: Option<String>,
    pub reference_time: DateTime<Utc>,
    pub engine: EngineConfig,
}

impl Context {
    /// Load the snapshot and run the engine over it
    pub fn analyze(&self) -> anyhow::Result<AnalysisReport> {
        let engine = BehavioralEngine::new(self.engine.clone()).context("invalid engine config")?;
        let data = SnapshotDocument::load(&self.input)?.into_space_data(self.space.clone())?;

        tracing::info!(
            "Analyzing {} as of {}",
            data.space,
            self.reference_time.to_rfc3339()
        );

        let report = engine
            .analyze(data, self.reference_time)
            .with_context(|| format!("analyzing {}", self.input.display()))?;
        Ok(report)
    }
}

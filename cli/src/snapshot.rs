//! Cached snapshot document reader
//!
//! The document is produced by the ingestion layer: proposals with their votes
//! nested inside, timestamps as unix seconds.

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use fatigue_common::{Proposal, SpaceData, Vote};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub space: Option<String>,
    pub proposals: Vec<SnapshotProposal>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotProposal {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub created: i64,
    #[serde(default)]
    pub votes: Vec<SnapshotVote>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotVote {
    pub voter: String,
    pub created: i64,
    #[serde(default)]
    pub vp: Option<f64>,
}

impl SnapshotDocument {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing snapshot {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Flatten into the engine's input sets
    pub fn into_space_data(self, space: Option<String>) -> anyhow::Result<SpaceData> {
        let space = space.or(self.space).unwrap_or_else(|| "unknown".into());
        let mut proposals = Vec::with_capacity(self.proposals.len());
        let mut votes = Vec::new();

        for proposal in self.proposals {
            let created_at = from_unix(proposal.created)
                .ok_or_else(|| anyhow!("proposal {} has invalid timestamp {}", proposal.id, proposal.created))?;

            for vote in proposal.votes {
                let cast_at = from_unix(vote.created).ok_or_else(|| {
                    anyhow!("vote by {} on {} has invalid timestamp {}", vote.voter, proposal.id, vote.created)
                })?;
                let voting_power = vote.vp.unwrap_or(0.0);
                votes.push(Vote::new(vote.voter, proposal.id.clone(), cast_at).with_voting_power(voting_power));
            }

            tracing::trace!("Loaded proposal {} ({})", proposal.id, proposal.title.as_deref().unwrap_or(""));
            proposals.push(Proposal::new(proposal.id, created_at));
        }

        tracing::debug!("Snapshot {}: {} proposals, {} votes", space, proposals.len(), votes.len());

        Ok(SpaceData {
            space,
            proposals,
            votes,
            known_delegates: Vec::new(),
        })
    }
}

fn from_unix(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

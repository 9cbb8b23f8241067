//! CLI Configuration

use anyhow::{anyhow, Context};
use fatigue_behavioral::TargetCriteria;
use fatigue_common::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub space: Option<String>,
    pub input: Option<PathBuf>,
    pub default_format: Option<String>,
    pub engine: EngineConfig,
    pub targets: TargetCriteria,
}

impl Config {
    /// Load from an explicit path, or from the profile file under the home directory.
    ///
    /// A missing profile file yields defaults; a missing explicit path is an error.
    pub fn load(path: Option<&Path>, profile: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::config_path(profile)?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self, profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }

    pub fn config_path(profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot find home directory"))?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".dao-fatigue").join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial() {
        let config = Config::parse(
            r#"
            space = "arbitrumfoundation.eth"

            [engine]
            at_risk_threshold = 70.0
            window_days = 14

            [targets]
            min_voting_power = 1000.0
            "#,
        )
        .unwrap();

        assert_eq!(config.space.as_deref(), Some("arbitrumfoundation.eth"));
        assert_eq!(config.engine.at_risk_threshold, 70.0);
        assert_eq!(config.engine.window_days, 14);
        assert_eq!(config.engine.trend_baseline_days, 90);
        assert_eq!(config.targets.min_voting_power, 1000.0);
        assert_eq!(config.targets.min_fatigue, 50.0);
    }

    #[test]
    fn test_empty_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.engine, EngineConfig::default());
        assert!(config.input.is_none());
    }

    #[test]
    fn test_serializes_back() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let config = Config::parse(&text).unwrap();
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_profile_path() {
        let path = Config::config_path(Some("ens")).unwrap();
        assert!(path.ends_with(".dao-fatigue/config.ens.toml"));
    }
}

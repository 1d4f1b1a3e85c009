use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SosensError};

pub const CONFIG_ENV: &str = "SOSENS_CONFIG";

pub const DEFAULT_DATA_PATH: &str =
    "data/Crop Recommendation using Soil Properties and Weather Prediction.csv";

/// Deklarovaná schéma datasetu.
///
/// Ak `target_column` / `feature_columns` nie sú nastavené, použije sa
/// heuristika podľa názvov stĺpcov a všetky numerické stĺpce.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub target_column: Option<String>,
    pub feature_columns: Option<Vec<String>>,
    pub target_keywords: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_PATH),
            target_column: None,
            feature_columns: None,
            target_keywords: vec!["crop".to_string(), "label".to_string(), "recommend".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub seed: u64,
    pub n_trees: usize,
    pub test_fraction: f64,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n_trees: 200,
            test_fraction: 0.20,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SosensConfig {
    pub dataset: DatasetConfig,
    pub training: TrainingConfig,
    pub models_dir: PathBuf,
    pub outputs_dir: PathBuf,
}

impl Default for SosensConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            training: TrainingConfig::default(),
            models_dir: PathBuf::from("models"),
            outputs_dir: PathBuf::from("outputs"),
        }
    }
}

impl SosensConfig {
    /// Načíta konfiguráciu z JSON súboru
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SosensError::Config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        let config: SosensConfig = serde_json::from_str(&text)
            .map_err(|e| SosensError::Config(format!("invalid config {}: {}", path.display(), e)))?;
        config.validate()?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Poradie: explicitná cesta, potom `SOSENS_CONFIG`, inak východzie hodnoty
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.training;
        if t.n_trees == 0 {
            return Err(SosensError::Config("n_trees must be at least 1".to_string()));
        }
        if !(t.test_fraction > 0.0 && t.test_fraction < 1.0) {
            return Err(SosensError::Config(format!(
                "test_fraction must be in (0, 1), got {}",
                t.test_fraction
            )));
        }
        if t.min_samples_split < 2 {
            return Err(SosensError::Config("min_samples_split must be at least 2".to_string()));
        }
        if self.dataset.target_column.is_none() && self.dataset.target_keywords.is_empty() {
            return Err(SosensError::Config(
                "either target_column or target_keywords must be set".to_string(),
            ));
        }
        Ok(())
    }
}

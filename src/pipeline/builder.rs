use std::path::PathBuf;

use super::trainer::Trainer;
use crate::config::SosensConfig;
use crate::error::Result;

/// Builder pre konfiguráciu tréningu nad východzou konfiguráciou
pub struct TrainerBuilder {
    config: SosensConfig,
}

impl TrainerBuilder {
    pub fn new() -> Self {
        Self { config: SosensConfig::default() }
    }

    /// Začne z existujúcej konfigurácie (napr. načítanej zo súboru)
    pub fn from_config(config: SosensConfig) -> Self {
        Self { config }
    }

    /// Nastaví cestu k datasetu
    pub fn dataset(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dataset.path = path.into();
        self
    }

    /// Deklarovaný cieľový stĺpec; bez neho sa použijú kľúčové slová
    pub fn target_column(mut self, column: &str) -> Self {
        self.config.dataset.target_column = Some(column.to_string());
        self
    }

    pub fn feature_columns(mut self, columns: Vec<String>) -> Self {
        self.config.dataset.feature_columns = Some(columns);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.training.seed = seed;
        self
    }

    pub fn n_trees(mut self, n_trees: usize) -> Self {
        self.config.training.n_trees = n_trees;
        self
    }

    pub fn test_fraction(mut self, fraction: f64) -> Self {
        self.config.training.test_fraction = fraction;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.training.max_depth = Some(depth);
        self
    }

    pub fn models_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.models_dir = dir.into();
        self
    }

    pub fn outputs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.outputs_dir = dir.into();
        self
    }

    /// Vytvorí Trainer s validáciou konfigurácie
    pub fn build(self) -> Result<Trainer> {
        self.config.validate()?;
        Ok(Trainer::new(self.config))
    }
}

impl Default for TrainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SosensError;

    #[test]
    fn applies_overrides() {
        let trainer = TrainerBuilder::new()
            .dataset("crops.csv")
            .target_column("Crop")
            .seed(7)
            .n_trees(10)
            .models_dir("m")
            .build()
            .unwrap();
        let config = trainer.config();
        assert_eq!(config.dataset.path, PathBuf::from("crops.csv"));
        assert_eq!(config.dataset.target_column.as_deref(), Some("Crop"));
        assert_eq!(config.training.seed, 7);
        assert_eq!(config.training.n_trees, 10);
        assert_eq!(config.models_dir, PathBuf::from("m"));
        assert_eq!(config.outputs_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn invalid_fraction_fails_build() {
        let result = TrainerBuilder::new().test_fraction(1.5).build();
        assert!(matches!(result, Err(SosensError::Config(_))));
    }
}

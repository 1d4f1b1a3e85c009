use serde::{Deserialize, Serialize};

use super::envelope::{ArtifactKind, TrainingRun, FORMAT_VERSION};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub kind: ArtifactKind,
    pub file: String,
    pub checksum: u32,
}

/// Súhrn tréningového behu pre prevádzkový prehľad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub dataset: Option<String>,
    pub target: String,
    pub n_samples: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub dropped_rows: usize,
    pub accuracy: f64,
}

/// Manifest viaže štyri artefakty k jednému behu; zapisuje sa ako posledný.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleManifest {
    pub format_version: u32,
    pub run: TrainingRun,
    pub feature_count: usize,
    pub class_count: usize,
    pub classes: Vec<String>,
    pub n_trees: usize,
    pub artifacts: Vec<ManifestEntry>,
    #[serde(default)]
    pub summary: Option<TrainingSummary>,
}

impl BundleManifest {
    pub fn new(run: TrainingRun, feature_count: usize, classes: Vec<String>, n_trees: usize) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            run,
            feature_count,
            class_count: classes.len(),
            classes,
            n_trees,
            artifacts: Vec::new(),
            summary: None,
        }
    }

    pub fn entry(&self, kind: ArtifactKind) -> Option<&ManifestEntry> {
        self.artifacts.iter().find(|e| e.kind == kind)
    }
}

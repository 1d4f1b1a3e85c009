use serde::{Deserialize, Serialize};

use super::envelope::TrainingRun;
use super::manifest::TrainingSummary;
use crate::feature_selection::FeatureSet;
use crate::models::RandomForestClassifier;
use crate::processing::{ImputationState, LabelEncoder, ScalerState};

/// Payload artefaktu `feature_names`: poradie príznakov a mediány z tréningu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFeatures {
    pub feature_set: FeatureSet,
    pub imputation: Option<ImputationState>,
}

/// Štvorica artefaktov z jedného tréningového behu
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub run: TrainingRun,
    pub features: StoredFeatures,
    pub scaler: ScalerState,
    pub label_encoder: LabelEncoder,
    pub classifier: RandomForestClassifier,
    pub summary: Option<TrainingSummary>,
}

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::payload::{extract_features, PredictionRequest};
use super::ranking::{top_k_indices, RankedLabel};
use super::status::{FeatureSchema, StatusReport, FALLBACK_NOTE};
use crate::artifacts::{ArtifactBundle, ArtifactStore, LoadedArtifacts};
use crate::error::PredictionError;
use crate::feature_selection::FeatureSet;
use crate::models::Classifier;
use crate::processing::{LabelEncoder, ScalerState};

const TOP_K: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResponse {
    pub predicted_label: String,
    pub predicted_label_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top3: Option<Vec<RankedLabel>>,
}

/// Artefakty potrebné na inferenciu, k dispozícii iba ak je bundle konzistentný
struct Inference {
    classifier: Arc<dyn Classifier>,
    scaler: ScalerState,
    label_encoder: LabelEncoder,
}

/// Nemenný kontext služby, vytvorený raz pri štarte.
///
/// Každá predikcia je čistý výpočet nad `&self`, takže službu možno zdieľať
/// medzi vláknami cez `Arc<PredictionService>`.
pub struct PredictionService {
    features: FeatureSet,
    using_fallback: bool,
    inference: Result<Inference, String>,
    status: StatusReport,
}

impl PredictionService {
    /// Načíta artefakty z adresára; chýbajúce artefakty službu nezhodia
    pub fn from_store(store: &ArtifactStore) -> Self {
        let loaded = store.load();
        Self::from_loaded(loaded, Some(store.dir()))
    }

    pub fn from_loaded(loaded: LoadedArtifacts, models_dir: Option<&Path>) -> Self {
        let run = loaded.reference_run();
        let consistent = loaded.is_consistent();

        let (features, using_fallback) = match &loaded.features {
            Some(stored) => (stored.value.feature_set.clone(), false),
            None => {
                warn!("feature names not available, using fallback list");
                (FeatureSet::fallback(), true)
            }
        };

        let mut status = StatusReport {
            models_dir: models_dir.map(|d| d.display().to_string()),
            manifest_loaded: loaded.manifest.is_some(),
            model_loaded: loaded.classifier.is_some(),
            scaler_loaded: loaded.scaler.is_some(),
            label_encoder_loaded: loaded.label_encoder.is_some(),
            feature_names_available: !using_fallback,
            feature_count: features.len(),
            using_fallback,
            ready: false,
            run_id: run.map(|r| r.run_id),
            created_at: run.map(|r| r.created_at),
            class_count: loaded.label_encoder.as_ref().map(|l| l.value.len()),
            training: loaded.manifest.as_ref().and_then(|m| m.summary.clone()),
            failures: loaded.failures,
            issues: loaded.issues,
            notes: loaded.notes,
        };

        let inference = match (loaded.classifier, loaded.scaler, loaded.label_encoder) {
            _ if !consistent => Err("artifact bundle is inconsistent; retrain and restart".to_string()),
            (Some(classifier), Some(scaler), Some(label_encoder)) => {
                if scaler.value.n_features() != features.len() {
                    Err(format!(
                        "active feature list has {} names but scaler expects {}",
                        features.len(),
                        scaler.value.n_features()
                    ))
                } else {
                    Ok(Inference {
                        classifier: Arc::new(classifier.value),
                        scaler: scaler.value,
                        label_encoder: label_encoder.value,
                    })
                }
            }
            _ => Err("model artifacts not fully loaded; run training to create them".to_string()),
        };

        status.ready = inference.is_ok();
        match &inference {
            Ok(_) => info!(features = features.len(), run_id = ?status.run_id, "prediction service ready"),
            Err(reason) => warn!(%reason, "prediction service degraded"),
        }

        Self { features, using_fallback, inference, status }
    }

    /// Služba priamo z bundle v pamäti, bez zápisu na disk
    pub fn from_bundle(bundle: ArtifactBundle) -> Self {
        let status = StatusReport {
            models_dir: None,
            manifest_loaded: false,
            model_loaded: true,
            scaler_loaded: true,
            label_encoder_loaded: true,
            feature_names_available: true,
            feature_count: bundle.features.feature_set.len(),
            using_fallback: false,
            ready: true,
            run_id: Some(bundle.run.run_id),
            created_at: Some(bundle.run.created_at),
            class_count: Some(bundle.label_encoder.len()),
            training: bundle.summary,
            failures: Vec::new(),
            issues: Vec::new(),
            notes: Vec::new(),
        };
        Self {
            features: bundle.features.feature_set,
            using_fallback: false,
            inference: Ok(Inference {
                classifier: Arc::new(bundle.classifier),
                scaler: bundle.scaler,
                label_encoder: bundle.label_encoder,
            }),
            status,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.inference.is_ok()
    }

    pub fn status(&self) -> &StatusReport {
        &self.status
    }

    pub fn active_features(&self) -> &FeatureSet {
        &self.features
    }

    pub fn feature_schema(&self) -> FeatureSchema {
        FeatureSchema {
            feature_names: self.features.names().to_vec(),
            note: self.using_fallback.then(|| FALLBACK_NOTE.to_string()),
        }
    }

    pub fn classes(&self) -> Option<&[String]> {
        self.inference.as_ref().ok().map(|i| i.label_encoder.classes())
    }

    /// `ServiceUnavailable`, ak chýba povinný artefakt alebo bundle nie je konzistentný
    pub fn ensure_ready(&self) -> Result<(), PredictionError> {
        self.ready_inference().map(|_| ())
    }

    fn ready_inference(&self) -> Result<&Inference, PredictionError> {
        self.inference
            .as_ref()
            .map_err(|reason| PredictionError::ServiceUnavailable(reason.clone()))
    }

    pub fn predict(&self, payload: &PredictionRequest) -> Result<PredictionResponse, PredictionError> {
        let inference = self.ready_inference()?;

        let raw = extract_features(&self.features, payload)?;
        let scaled = inference
            .scaler
            .transform_row(&raw)
            .map_err(|e| PredictionError::ServiceUnavailable(e.to_string()))?;

        let probabilities = inference.classifier.predict_proba(&scaled);
        let index = inference.classifier.predict(&scaled);
        let label = self.label(inference, index)?;

        let (confidence, top3) = match probabilities {
            Some(probs) => {
                let confidence = probs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let top = top_k_indices(&probs, TOP_K)
                    .into_iter()
                    .map(|i| Ok(RankedLabel { label: self.label(inference, i)?, prob: probs[i] }))
                    .collect::<Result<Vec<_>, PredictionError>>()?;
                (Some(confidence), Some(top))
            }
            None => (None, None),
        };

        debug!(label = %label, index, ?confidence, "prediction");
        Ok(PredictionResponse {
            predicted_label: label,
            predicted_label_index: index,
            confidence,
            top3,
        })
    }

    fn label(&self, inference: &Inference, index: usize) -> Result<String, PredictionError> {
        inference
            .label_encoder
            .decode(index)
            .map(str::to_string)
            .ok_or_else(|| PredictionError::ServiceUnavailable(format!("class index {} has no label", index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn service_is_shareable() {
        assert_send_sync::<PredictionService>();
    }

    #[test]
    fn empty_store_uses_fallback_and_is_unavailable() {
        let service = PredictionService::from_loaded(LoadedArtifacts::default(), None);
        let status = service.status();
        assert!(status.using_fallback);
        assert_eq!(status.feature_count, 14);
        assert!(!status.ready);

        let schema = service.feature_schema();
        assert_eq!(schema.feature_names.len(), 14);
        assert!(schema.note.is_some());

        assert!(matches!(service.ensure_ready(), Err(PredictionError::ServiceUnavailable(_))));
        let err = service.predict(&PredictionRequest::new()).unwrap_err();
        assert!(matches!(err, PredictionError::ServiceUnavailable(_)));
        let full = json!({"Ph": 6.5}).as_object().cloned().unwrap();
        assert_eq!(service.predict(&full).unwrap_err().status_code(), 503);
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::artifacts::{LoadFailure, TrainingSummary};

pub const FALLBACK_NOTE: &str = "fallback list used; run training to save real feature_names.";

/// Prehľad stavu služby pre status endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub models_dir: Option<String>,
    pub manifest_loaded: bool,
    pub model_loaded: bool,
    pub scaler_loaded: bool,
    pub label_encoder_loaded: bool,
    pub feature_names_available: bool,
    pub feature_count: usize,
    pub using_fallback: bool,
    pub ready: bool,
    pub run_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub class_count: Option<usize>,
    pub training: Option<TrainingSummary>,
    pub failures: Vec<LoadFailure>,
    pub issues: Vec<String>,
    pub notes: Vec<String>,
}

/// Aktívna schéma požiadavky
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSchema {
    pub feature_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

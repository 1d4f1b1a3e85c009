//! Inferenčná služba nad načítanými artefaktmi.

pub mod payload;
pub mod ranking;
pub mod status;
pub mod service;

pub use payload::{extract_features, numeric_value, parse_request, PredictionRequest};
pub use ranking::{top_k_indices, RankedLabel};
pub use status::{FeatureSchema, StatusReport, FALLBACK_NOTE};
pub use service::{PredictionResponse, PredictionService};

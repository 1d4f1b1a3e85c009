//! Odporúčanie plodiny z pôdnych a meteorologických meraní.
//!
//! Tréning (`pipeline`) uloží štyri artefakty a manifest cez `artifacts`,
//! inferenčná služba (`serving`) ich pri štarte načíta a overí, že pochádzajú
//! z jedného behu.

pub mod error;
pub mod config;
pub mod logging;
pub mod data_loading;
pub mod target_analysis;
pub mod feature_selection;
pub mod processing;
pub mod models;
pub mod evaluation;
pub mod artifacts;
pub mod pipeline;
pub mod serving;

pub use artifacts::{ArtifactBundle, ArtifactStore, LoadedArtifacts, TrainingRun};
pub use config::SosensConfig;
pub use data_loading::{DataLoader, DataLoaderFactory, Dataset};
pub use error::{PredictionError, Result, SosensError};
pub use feature_selection::{FeatureSelector, FeatureSet};
pub use pipeline::{Trainer, TrainerBuilder, TrainingOutcome};
pub use serving::{PredictionRequest, PredictionResponse, PredictionService, StatusReport};

//! Tréningová pipeline: split, fit a zápis artefaktov.

pub mod split;
pub mod trainer;
pub mod builder;

pub use split::{stratified_split, Split};
pub use trainer::{FittedModel, Trainer, TrainingOutcome, CORRELATION_FILE, IMPORTANCES_FILE, REPORT_FILE};
pub use builder::TrainerBuilder;

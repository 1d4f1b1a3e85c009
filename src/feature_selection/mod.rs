pub mod feature_set;
pub mod numeric_selector;

pub use feature_set::{FeatureSet, FALLBACK_FEATURES};
pub use numeric_selector::{FeatureSelector, SelectedFeatures};

/// Klasifikátor konzumujúci škálovaný vektor príznakov v poradí FeatureSet
pub trait Classifier: Send + Sync {
    fn get_name(&self) -> &str;

    fn n_features(&self) -> usize;

    fn n_classes(&self) -> usize;

    /// Rozdelenie pravdepodobnosti cez triedy, ak ho model poskytuje
    fn predict_proba(&self, x: &[f64]) -> Option<Vec<f64>>;

    fn predict(&self, x: &[f64]) -> usize;
}

pub mod decision_tree;
pub mod random_forest;

pub use decision_tree::{DecisionTreeClassifier, TreeParameters};
pub use random_forest::{ClassWeight, RandomForestClassifier, RandomForestParameters};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::{debug, info};

use super::decision_tree::{DecisionTreeClassifier, TreeParameters};
use super::Classifier;
use crate::config::TrainingConfig;
use crate::error::{Result, SosensError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassWeight {
    Uniform,
    /// Váha triedy = n_samples / (n_classes * počet vzoriek triedy)
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestParameters {
    pub n_trees: usize,
    pub seed: u64,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub class_weight: ClassWeight,
    pub bootstrap: bool,
}

impl Default for RandomForestParameters {
    fn default() -> Self {
        Self {
            n_trees: 200,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            class_weight: ClassWeight::Balanced,
            bootstrap: true,
        }
    }
}

impl RandomForestParameters {
    pub fn from_config(config: &TrainingConfig) -> Self {
        Self {
            n_trees: config.n_trees,
            seed: config.seed,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            ..Self::default()
        }
    }

    pub fn with_n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Random Forest klasifikátor: bootstrap + náhodný výber príznakov v uzloch,
/// predikcia je priemer pravdepodobností stromov.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    params: RandomForestParameters,
    trees: Vec<DecisionTreeClassifier>,
    n_features: usize,
    n_classes: usize,
    feature_importances: Vec<f64>,
}

pub fn class_weights(y: &[usize], n_classes: usize, mode: ClassWeight) -> Vec<f64> {
    match mode {
        ClassWeight::Uniform => vec![1.0; n_classes],
        ClassWeight::Balanced => {
            let mut counts = vec![0usize; n_classes];
            for &c in y {
                counts[c] += 1;
            }
            counts
                .iter()
                .map(|&c| if c == 0 { 0.0 } else { y.len() as f64 / (n_classes * c) as f64 })
                .collect()
        }
    }
}

impl RandomForestClassifier {
    pub fn fit(
        x: &DenseMatrix<f64>,
        y: &[usize],
        n_classes: usize,
        params: RandomForestParameters,
    ) -> Result<Self> {
        let (rows, cols) = x.shape();
        if rows == 0 || cols == 0 {
            return Err(SosensError::Training("empty training matrix".to_string()));
        }
        if rows != y.len() {
            return Err(SosensError::Training(format!(
                "X has {} rows but y has {} labels",
                rows,
                y.len()
            )));
        }
        if params.n_trees == 0 {
            return Err(SosensError::Training("n_trees must be at least 1".to_string()));
        }
        if let Some(&bad) = y.iter().find(|&&c| c >= n_classes) {
            return Err(SosensError::Training(format!("class index {} out of range", bad)));
        }

        let columns: Vec<Vec<f64>> =
            (0..cols).map(|j| (0..rows).map(|i| *x.get((i, j))).collect()).collect();
        let class_weight = class_weights(y, n_classes, params.class_weight);
        let tree_params = TreeParameters {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            max_features: ((cols as f64).sqrt() as usize).max(1),
        };

        // Seedy stromov sa ťahajú sekvenčne, výsledok nezávisí od plánovania vlákien
        let mut master = StdRng::seed_from_u64(params.seed);
        let seeds: Vec<u64> = (0..params.n_trees).map(|_| master.random()).collect();

        info!(
            n_trees = params.n_trees,
            samples = rows,
            features = cols,
            classes = n_classes,
            max_features = tree_params.max_features,
            "fitting random forest"
        );

        let trees = seeds
            .par_iter()
            .map(|&seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let weights: Vec<f64> = if params.bootstrap {
                    let mut counts = vec![0u32; rows];
                    for _ in 0..rows {
                        counts[rng.random_range(0..rows)] += 1;
                    }
                    counts
                        .iter()
                        .zip(y)
                        .map(|(&c, &label)| c as f64 * class_weight[label])
                        .collect()
                } else {
                    y.iter().map(|&label| class_weight[label]).collect()
                };
                DecisionTreeClassifier::fit(&columns, y, &weights, n_classes, tree_params, &mut rng)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut feature_importances = vec![0.0; cols];
        for tree in &trees {
            for (acc, v) in feature_importances.iter_mut().zip(tree.feature_importances()) {
                *acc += v;
            }
        }
        let sum: f64 = feature_importances.iter().sum();
        if sum > 0.0 {
            feature_importances.iter_mut().for_each(|v| *v /= sum);
        }

        debug!(
            nodes = trees.iter().map(DecisionTreeClassifier::node_count).sum::<usize>(),
            "random forest fitted"
        );

        Ok(Self { params, trees, n_features: cols, n_classes, feature_importances })
    }

    pub fn params(&self) -> &RandomForestParameters {
        &self.params
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn predict_proba_row(&self, x: &[f64]) -> Vec<f64> {
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.predict_proba(x)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        proba
    }

    /// Predikcia pre všetky riadky matice
    pub fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<usize>> {
        let (rows, cols) = x.shape();
        if cols != self.n_features {
            return Err(SosensError::Matrix(format!(
                "classifier expects {} features, got {}",
                self.n_features, cols
            )));
        }
        Ok((0..rows)
            .map(|i| {
                let row: Vec<f64> = (0..cols).map(|j| *x.get((i, j))).collect();
                argmax(&self.predict_proba_row(&row))
            })
            .collect())
    }

    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(SosensError::Artifact("forest has no trees".to_string()));
        }
        if self.feature_importances.len() != self.n_features {
            return Err(SosensError::Artifact("feature importances length mismatch".to_string()));
        }
        for tree in &self.trees {
            if tree.n_features() != self.n_features || tree.n_classes() != self.n_classes {
                return Err(SosensError::Artifact("tree shape differs from forest".to_string()));
            }
            tree.validate()?;
        }
        Ok(())
    }
}

/// Index maxima; pri zhode vyhráva nižší index
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

impl Classifier for RandomForestClassifier {
    fn get_name(&self) -> &str {
        "Random Forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, x: &[f64]) -> Option<Vec<f64>> {
        Some(self.predict_proba_row(x))
    }

    fn predict(&self, x: &[f64]) -> usize {
        argmax(&self.predict_proba_row(x))
    }
}

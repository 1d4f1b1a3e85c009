use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SosensError};

/// Dve hodnoty bližšie než táto hranica sa pri hľadaní splitu považujú za rovnaké
const FEATURE_THRESHOLD: f64 = 1e-7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Vážené zastúpenie tried v liste, normalizované na súčet 1
    Leaf { value: Vec<f64> },
    Split { feature: usize, threshold: f64, left: usize, right: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParameters {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Počet kandidátnych príznakov v každom uzle
    pub max_features: usize,
}

/// CART klasifikačný strom s Gini kritériom a váženými vzorkami
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    nodes: Vec<Node>,
    n_features: usize,
    n_classes: usize,
    importances: Vec<f64>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    cost: f64,
    left_impurity: f64,
    right_impurity: f64,
    left_weight: f64,
    right_weight: f64,
}

/// Gini impurity pre vážené počty tried
fn gini(counts: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|c| (c / total).powi(2)).sum::<f64>()
}

struct TreeBuilder<'a> {
    columns: &'a [Vec<f64>],
    y: &'a [usize],
    weights: &'a [f64],
    n_classes: usize,
    params: TreeParameters,
    rng: &'a mut StdRng,
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

impl TreeBuilder<'_> {
    fn class_weights(&self, samples: &[usize]) -> (Vec<f64>, f64) {
        let mut counts = vec![0.0; self.n_classes];
        for &s in samples {
            counts[self.y[s]] += self.weights[s];
        }
        let total = counts.iter().sum();
        (counts, total)
    }

    fn leaf(&mut self, counts: Vec<f64>, total: f64) -> usize {
        let value = if total > 0.0 {
            counts.iter().map(|c| c / total).collect()
        } else {
            vec![1.0 / self.n_classes as f64; self.n_classes]
        };
        self.nodes.push(Node::Leaf { value });
        self.nodes.len() - 1
    }

    fn best_split(&self, samples: &[usize], features: &[usize]) -> Option<BestSplit> {
        let mut best: Option<BestSplit> = None;
        let mut visited = 0;
        let mut sorted: Vec<(f64, usize)> = Vec::with_capacity(samples.len());
        let (node_counts, total) = self.class_weights(samples);

        for &feature in features {
            if visited >= self.params.max_features {
                break;
            }
            let column = &self.columns[feature];
            sorted.clear();
            sorted.extend(samples.iter().map(|&s| (column[s], s)));
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            // Konštantný príznak v uzle sa nepočíta medzi navštívené
            if sorted[sorted.len() - 1].0 <= sorted[0].0 + FEATURE_THRESHOLD {
                continue;
            }
            visited += 1;

            let mut left = vec![0.0; self.n_classes];
            let mut right = node_counts.clone();
            let mut left_w = 0.0;

            for i in 0..sorted.len() - 1 {
                let (value, s) = sorted[i];
                let w = self.weights[s];
                left[self.y[s]] += w;
                right[self.y[s]] -= w;
                left_w += w;

                let next = sorted[i + 1].0;
                if next <= value + FEATURE_THRESHOLD {
                    continue;
                }
                let right_w = total - left_w;
                let gl = gini(&left, left_w);
                let gr = gini(&right, right_w);
                let cost = left_w * gl + right_w * gr;

                if best.as_ref().map_or(true, |b| cost < b.cost) {
                    let mut threshold = value / 2.0 + next / 2.0;
                    if threshold >= next || !threshold.is_finite() {
                        threshold = value;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        cost,
                        left_impurity: gl,
                        right_impurity: gr,
                        left_weight: left_w,
                        right_weight: right_w,
                    });
                }
            }
        }
        best
    }

    fn build(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let (counts, total) = self.class_weights(&samples);
        let impurity = gini(&counts, total);

        let depth_reached = self.params.max_depth.is_some_and(|d| depth >= d);
        if samples.len() < self.params.min_samples_split || impurity <= 0.0 || depth_reached {
            return self.leaf(counts, total);
        }

        let mut features: Vec<usize> = (0..self.columns.len()).collect();
        features.shuffle(&mut *self.rng);

        let split = match self.best_split(&samples, &features) {
            Some(split) => split,
            None => return self.leaf(counts, total),
        };

        self.importances[split.feature] += total * impurity
            - split.left_weight * split.left_impurity
            - split.right_weight * split.right_impurity;

        let column = &self.columns[split.feature];
        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) =
            samples.into_iter().partition(|&s| column[s] <= split.threshold);

        // Placeholder, doplní sa po vytvorení potomkov
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { value: Vec::new() });
        let left = self.build(left_samples, depth + 1);
        let right = self.build(right_samples, depth + 1);
        self.nodes[idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        idx
    }
}

impl DecisionTreeClassifier {
    /// `columns[j][i]` je hodnota príznaku j pre vzorku i. Vzorky s nulovou
    /// váhou sa do stromu nedostanú (out-of-bag).
    pub fn fit(
        columns: &[Vec<f64>],
        y: &[usize],
        weights: &[f64],
        n_classes: usize,
        params: TreeParameters,
        rng: &mut StdRng,
    ) -> Result<Self> {
        let n_features = columns.len();
        if n_features == 0 || n_classes == 0 {
            return Err(SosensError::Training("tree needs features and classes".to_string()));
        }
        if y.len() != weights.len() || columns.iter().any(|c| c.len() != y.len()) {
            return Err(SosensError::Training("inconsistent training data lengths".to_string()));
        }
        if let Some(&bad) = y.iter().find(|&&c| c >= n_classes) {
            return Err(SosensError::Training(format!("class index {} out of range", bad)));
        }

        let samples: Vec<usize> = (0..y.len()).filter(|&i| weights[i] > 0.0).collect();
        if samples.is_empty() {
            return Err(SosensError::Training("no weighted samples to fit".to_string()));
        }

        let mut builder = TreeBuilder {
            columns,
            y,
            weights,
            n_classes,
            params: TreeParameters {
                max_features: params.max_features.clamp(1, n_features),
                ..params
            },
            rng,
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
        };
        builder.build(samples, 0);

        let mut importances = builder.importances;
        let sum: f64 = importances.iter().sum();
        if sum > 0.0 {
            importances.iter_mut().for_each(|v| *v /= sum);
        }

        Ok(Self { nodes: builder.nodes, n_features, n_classes, importances })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Normalizované zníženie impurity podľa príznakov
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    pub fn predict_proba(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split { feature, threshold, left, right } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Overí štruktúru stromu po deserializácii
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(SosensError::Artifact("tree has no nodes".to_string()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { value } if value.len() != self.n_classes => {
                    return Err(SosensError::Artifact(format!(
                        "leaf {} has {} class probabilities, expected {}",
                        i,
                        value.len(),
                        self.n_classes
                    )))
                }
                Node::Split { feature, left, right, .. }
                    if *feature >= self.n_features
                        || *left <= i
                        || *right <= i
                        || *left >= self.nodes.len()
                        || *right >= self.nodes.len() =>
                {
                    return Err(SosensError::Artifact(format!("split node {} is malformed", i)))
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn params() -> TreeParameters {
        TreeParameters { max_depth: None, min_samples_split: 2, max_features: 2 }
    }

    #[test]
    fn separates_linearly_separable_classes() {
        let columns = vec![vec![1.0, 2.0, 3.0, 10.0, 11.0, 12.0], vec![0.0; 6]];
        let y = vec![0, 0, 0, 1, 1, 1];
        let weights = vec![1.0; 6];
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTreeClassifier::fit(&columns, &y, &weights, 2, params(), &mut rng).unwrap();

        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.predict_proba(&[2.5, 0.0]), [1.0, 0.0]);
        assert_eq!(tree.predict_proba(&[11.0, 0.0]), [0.0, 1.0]);
        // Druhý príznak je konštantný, celá dôležitosť patrí prvému
        assert_eq!(tree.feature_importances(), [1.0, 0.0]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn split_threshold_is_midpoint() {
        let columns = vec![vec![1.0, 3.0]];
        let mut rng = StdRng::seed_from_u64(0);
        let tree =
            DecisionTreeClassifier::fit(&columns, &[0, 1], &[1.0, 1.0], 2, params(), &mut rng).unwrap();
        match &tree.nodes[0] {
            Node::Split { threshold, .. } => assert_eq!(*threshold, 2.0),
            other => panic!("expected split, got {:?}", other),
        }
    }

    #[test]
    fn zero_weight_samples_are_ignored() {
        let columns = vec![vec![1.0, 2.0, 3.0]];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = DecisionTreeClassifier::fit(&columns, &[0, 0, 1], &[1.0, 1.0, 0.0], 2, params(), &mut rng)
            .unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_proba(&[3.0]), [1.0, 0.0]);
    }

    #[test]
    fn leaf_distribution_respects_weights() {
        // Rovnaké hodnoty príznaku: split neexistuje, list nesie vážený pomer
        let columns = vec![vec![5.0, 5.0, 5.0]];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = DecisionTreeClassifier::fit(&columns, &[0, 1, 1], &[2.0, 1.0, 1.0], 2, params(), &mut rng)
            .unwrap();
        assert_eq!(tree.predict_proba(&[5.0]), [0.5, 0.5]);
    }

    #[test]
    fn max_depth_limits_growth() {
        let columns = vec![vec![1.0, 2.0, 3.0, 4.0]];
        let mut rng = StdRng::seed_from_u64(0);
        let shallow = TreeParameters { max_depth: Some(0), ..params() };
        let tree = DecisionTreeClassifier::fit(&columns, &[0, 1, 0, 1], &[1.0; 4], 2, shallow, &mut rng)
            .unwrap();
        assert_eq!(tree.node_count(), 1);
    }
}

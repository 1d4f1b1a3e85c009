use serde::{Deserialize, Serialize};

/// Trieda s pravdepodobnosťou v odpovedi
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLabel {
    pub label: String,
    pub prob: f64,
}

/// Indexy `k` najpravdepodobnejších tried, zostupne.
/// Triedenie je stabilné, pri zhode ostáva nižší index encodera vpredu.
pub fn top_k_indices(probabilities: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_by(|&a, &b| probabilities[b].total_cmp(&probabilities[a]));
    order.truncate(k);
    order
}

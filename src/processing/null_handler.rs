use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median};
use tracing::warn;

/// Mediány príznakov vypočítané pri tréningu.
///
/// Ukladajú sa s bundle artefaktov, aby bolo zrejmé, čím boli chýbajúce
/// hodnoty nahradené v danom tréningovom behu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationState {
    pub medians: Vec<f64>,
}

/// Nahrádza chýbajúce hodnoty mediánom stĺpca
pub struct MedianImputer;

impl MedianImputer {
    /// Medián prítomných hodnôt; prázdny stĺpec dostane 0.0
    pub fn column_median(name: &str, values: &[Option<f64>]) -> f64 {
        let present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
        if present.is_empty() {
            warn!(feature = name, "column has no observed values, imputing 0.0");
            return 0.0;
        }
        Data::new(present).median()
    }

    pub fn fit(names: &[String], columns: &[Vec<Option<f64>>]) -> ImputationState {
        let medians = names
            .iter()
            .zip(columns)
            .map(|(name, col)| Self::column_median(name, col))
            .collect();
        ImputationState { medians }
    }

    /// Vyplní chýbajúce hodnoty a vráti riadky matice (row-major)
    pub fn apply(state: &ImputationState, columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
        let rows = columns.first().map_or(0, Vec::len);
        (0..rows)
            .map(|i| {
                columns
                    .iter()
                    .zip(&state.medians)
                    .map(|(col, median)| col[i].unwrap_or(*median))
                    .collect()
            })
            .collect()
    }
}

use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::{info, warn};

use super::feature_set::FeatureSet;
use crate::config::DatasetConfig;
use crate::data_loading::Dataset;
use crate::error::{Result, SosensError};
use crate::processing::{ImputationState, MedianImputer};

/// Výstup výberu príznakov: matica X v poradí `feature_set`, textové triedy
/// a mediány použité na imputáciu.
#[derive(Debug, Clone)]
pub struct SelectedFeatures {
    pub feature_set: FeatureSet,
    pub target: String,
    pub x: DenseMatrix<f64>,
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<String>,
    pub imputation: ImputationState,
    pub dropped_rows: usize,
}

/// Vyberá numerické príznaky zo zdrojového datasetu.
///
/// Bez deklarovaných stĺpcov berie všetky numerické stĺpce okrem cieľového,
/// v poradí zo zdroja.
pub struct FeatureSelector {
    declared: Option<Vec<String>>,
}

impl FeatureSelector {
    pub fn new(declared: Option<Vec<String>>) -> Self {
        Self { declared }
    }

    pub fn from_config(config: &DatasetConfig) -> Self {
        Self::new(config.feature_columns.clone())
    }

    pub fn get_name(&self) -> &str {
        if self.declared.is_some() {
            "Declared Features"
        } else {
            "Numeric Features"
        }
    }

    /// Indexy stĺpcov, ktoré tvoria FeatureSet
    pub fn feature_columns(&self, dataset: &Dataset, target_idx: usize) -> Result<Vec<usize>> {
        let columns = match &self.declared {
            Some(names) => {
                let mut indices = Vec::with_capacity(names.len());
                for name in names {
                    let idx = dataset.column_index(name).ok_or_else(|| {
                        SosensError::Config(format!("declared feature '{}' not found in dataset", name))
                    })?;
                    if idx == target_idx {
                        return Err(SosensError::Config(format!(
                            "declared feature '{}' is the target column",
                            name
                        )));
                    }
                    if !dataset.is_numeric_column(idx) {
                        return Err(SosensError::Config(format!(
                            "declared feature '{}' is not numeric",
                            name
                        )));
                    }
                    indices.push(idx);
                }
                indices
            }
            None => (0..dataset.num_columns())
                .filter(|&idx| idx != target_idx && dataset.is_numeric_column(idx))
                .collect(),
        };

        if columns.is_empty() {
            return Err(SosensError::Config("no numeric feature columns found".to_string()));
        }
        Ok(columns)
    }

    pub fn select(&self, dataset: &Dataset, target_idx: usize) -> Result<SelectedFeatures> {
        let feature_idx = self.feature_columns(dataset, target_idx)?;
        let names: Vec<String> = feature_idx.iter().map(|&i| dataset.headers[i].clone()).collect();
        let feature_set = FeatureSet::new(names)?;

        // Riadky bez cieľovej hodnoty sa nedajú použiť na tréning
        let kept: Vec<usize> = (0..dataset.num_rows())
            .filter(|&r| !Dataset::is_missing(dataset.cell(r, target_idx)))
            .collect();
        let dropped_rows = dataset.num_rows() - kept.len();
        if dropped_rows > 0 {
            warn!(dropped_rows, "dropped rows with missing target value");
        }
        if kept.is_empty() {
            return Err(SosensError::Data("no rows with a target value".to_string()));
        }

        let columns: Vec<Vec<Option<f64>>> = feature_idx
            .iter()
            .map(|&c| {
                kept.iter()
                    .map(|&r| {
                        let cell = dataset.cell(r, c);
                        if Dataset::is_missing(cell) {
                            None
                        } else {
                            Dataset::parse_numeric(cell)
                        }
                    })
                    .collect()
            })
            .collect();

        let imputation = MedianImputer::fit(feature_set.names(), &columns);
        let rows = MedianImputer::apply(&imputation, &columns);
        let x = DenseMatrix::from_2d_vec(&rows).map_err(|e| SosensError::Matrix(e.to_string()))?;

        let labels: Vec<String> = kept
            .iter()
            .map(|&r| dataset.cell(r, target_idx).trim().to_string())
            .collect();

        info!(
            selector = self.get_name(),
            count = feature_set.len(),
            features = ?feature_set.names().iter().take(10).collect::<Vec<_>>(),
            "numeric features used"
        );

        Ok(SelectedFeatures {
            feature_set,
            target: dataset.headers[target_idx].clone(),
            x,
            rows,
            labels,
            imputation,
            dropped_rows,
        })
    }
}

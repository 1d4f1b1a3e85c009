use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::arrays::{Array, MutArray};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{Result, SosensError};

/// Naučené štatistiky Standard Scalera (mean=0, std=1 pre každý stĺpec)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    pub n_samples_seen: usize,
}

impl ScalerState {
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn check_width(&self, cols: usize) -> Result<()> {
        if cols != self.n_features() {
            return Err(SosensError::Matrix(format!(
                "scaler was fit on {} features, got {}",
                self.n_features(),
                cols
            )));
        }
        Ok(())
    }

    pub fn transform(&self, data: &DenseMatrix<f64>) -> Result<DenseMatrix<f64>> {
        let (rows, cols) = data.shape();
        self.check_width(cols)?;
        let mut result = data.clone();
        for j in 0..cols {
            for i in 0..rows {
                let val = (*data.get((i, j)) - self.mean[j]) / self.scale[j];
                result.set((i, j), val);
            }
        }
        Ok(result)
    }

    /// Transformácia jedného vektora (cesta predikcie)
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}

pub struct StandardScaler;

impl StandardScaler {
    /// Stĺpec s nulovým rozptylom dostane scale 1.0 (hodnoty sa iba posunú)
    pub fn fit(data: &DenseMatrix<f64>) -> Result<ScalerState> {
        let (rows, cols) = data.shape();
        if rows == 0 {
            return Err(SosensError::Matrix("cannot fit scaler on empty matrix".to_string()));
        }

        let mut mean = Vec::with_capacity(cols);
        let mut scale = Vec::with_capacity(cols);
        for j in 0..cols {
            let col: Vec<f64> = (0..rows).map(|i| *data.get((i, j))).collect();
            let m = col.iter().sum::<f64>() / rows as f64;
            let var = col.iter().map(|x| (x - m).powi(2)).sum::<f64>() / rows as f64;
            let std = var.sqrt();

            mean.push(m);
            scale.push(if std < 10.0 * f64::EPSILON { 1.0 } else { std });
        }

        Ok(ScalerState { mean, scale, n_samples_seen: rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> DenseMatrix<f64> {
        DenseMatrix::from_2d_vec(&rows).unwrap()
    }

    #[test]
    fn fit_computes_population_statistics() {
        let x = matrix(vec![vec![1.0, 5.0], vec![3.0, 5.0]]);
        let state = StandardScaler::fit(&x).unwrap();
        assert_eq!(state.mean, vec![2.0, 5.0]);
        assert_eq!(state.scale, vec![1.0, 1.0]);
        assert_eq!(state.n_samples_seen, 2);
    }

    #[test]
    fn transform_centers_and_scales() {
        let x = matrix(vec![vec![0.0], vec![4.0], vec![8.0], vec![12.0]]);
        let state = StandardScaler::fit(&x).unwrap();
        let t = state.transform(&x).unwrap();
        let col: Vec<f64> = (0..4).map(|i| *t.get((i, 0))).collect();
        let mean = col.iter().sum::<f64>() / 4.0;
        let var = col.iter().map(|v| v * v).sum::<f64>() / 4.0;
        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
        assert_eq!(state.transform_row(&[4.0]).unwrap(), vec![*t.get((1, 0))]);
    }

    #[test]
    fn rejects_wrong_width() {
        let state = StandardScaler::fit(&matrix(vec![vec![1.0, 2.0]])).unwrap();
        assert!(state.transform_row(&[1.0]).is_err());
    }
}

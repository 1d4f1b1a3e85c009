use std::path::Path;

use crate::error::Result;

/// Pearsonov korelačný koeficient; konštantný stĺpec dáva 0.0
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    if n == 0.0 || x.len() != y.len() {
        return 0.0;
    }

    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }

    let den = (den_x * den_y).sqrt();
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Korelačná matica príznakov z row-major riadkov
pub fn correlation_matrix(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let cols = rows.first().map_or(0, Vec::len);
    let columns: Vec<Vec<f64>> = (0..cols).map(|j| rows.iter().map(|r| r[j]).collect()).collect();
    (0..cols)
        .map(|i| {
            (0..cols)
                .map(|j| if i == j { 1.0 } else { pearson_correlation(&columns[i], &columns[j]) })
                .collect()
        })
        .collect()
}

pub fn write_correlation_csv(path: &Path, names: &[String], matrix: &[Vec<f64>]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header = vec![String::new()];
    header.extend(names.iter().cloned());
    wtr.write_record(&header)?;
    for (name, row) in names.iter().zip(matrix) {
        let mut record = vec![name.clone()];
        record.extend(row.iter().map(|v| format!("{:.6}", v)));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Dôležitosti príznakov zoradené zostupne (stabilne, pri zhode podľa poradia)
pub fn ranked_importances(names: &[String], importances: &[f64]) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> =
        names.iter().cloned().zip(importances.iter().copied()).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

pub fn write_feature_importances_csv(path: &Path, ranked: &[(String, f64)]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["feature", "importance"])?;
    for (name, value) in ranked {
        let value = format!("{:.6}", value);
        wtr.write_record([name.as_str(), value.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_of_linear_columns() {
        let rows = vec![vec![1.0, 2.0, 5.0], vec![2.0, 4.0, 5.0], vec![3.0, 6.0, 5.0]];
        let m = correlation_matrix(&rows);
        assert!((m[0][1] - 1.0).abs() < 1e-12);
        assert_eq!(m[0][2], 0.0);
        assert_eq!(m[2][2], 1.0);
    }

    #[test]
    fn importances_are_ranked_descending() {
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let ranked = ranked_importances(&names, &[0.2, 0.5, 0.3]);
        assert_eq!(ranked.iter().map(|r| r.0.as_str()).collect::<Vec<_>>(), ["b", "c", "a"]);
    }

    #[test]
    fn writes_importances_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fi.csv");
        write_feature_importances_csv(&path, &[("N".to_string(), 0.75), ("P".to_string(), 0.25)]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "feature,importance\nN,0.750000\nP,0.250000\n");
    }
}

use std::path::Path;

use tracing::info;

use crate::error::{Result, SosensError};

/// Reprezentácie chýbajúcej hodnoty v bunke (porovnáva sa bez ohľadu na veľkosť písmen)
pub const NULL_VALUES: [&str; 5] = ["na", "nan", "null", "none", "n/a"];

/// Tabuľkový dataset tak, ako bol načítaný: hlavičky a riadky surových hodnôt
/// v poradí zo zdroja.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(SosensError::Data("dataset has no columns".to_string()));
        }
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != headers.len()) {
            return Err(SosensError::Data(format!(
                "row {} has {} cells, expected {}",
                idx + 1,
                row.len(),
                headers.len()
            )));
        }
        Ok(Self { headers, rows })
    }

    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.rows[row][col]
    }

    pub fn is_missing(cell: &str) -> bool {
        let trimmed = cell.trim();
        trimmed.is_empty() || NULL_VALUES.iter().any(|n| trimmed.eq_ignore_ascii_case(n))
    }

    /// Konvertuje string hodnotu na f64.
    ///
    /// Desatinná čiarka sa akceptuje iba ako jediný oddeľovač (`6,5`); tvar
    /// s tromi číslicami za čiarkou (`1,234`) je oddeľovač tisícov a nie je číslo.
    pub fn parse_numeric(cell: &str) -> Option<f64> {
        let trimmed = cell.trim();
        if let Ok(v) = trimmed.parse::<f64>() {
            return v.is_finite().then_some(v);
        }
        Self::parse_decimal_comma(trimmed)
    }

    fn parse_decimal_comma(text: &str) -> Option<f64> {
        if text.contains('.') || text.matches(',').count() != 1 {
            return None;
        }
        let (_, fraction) = text.split_once(',')?;
        if fraction.len() == 3 && fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        text.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Hodnoty stĺpca ako čísla (`None` = chýbajúca hodnota).
    ///
    /// Vráti `None`, ak stĺpec nie je numerický, t.j. niektorá prítomná
    /// hodnota sa nedá parsovať.
    pub fn numeric_column(&self, col: usize) -> Option<Vec<Option<f64>>> {
        self.rows
            .iter()
            .map(|row| {
                let cell = &row[col];
                if Self::is_missing(cell) {
                    Some(None)
                } else {
                    Self::parse_numeric(cell).map(Some)
                }
            })
            .collect()
    }

    pub fn is_numeric_column(&self, col: usize) -> bool {
        self.numeric_column(col).is_some()
    }
}

/// Strategy pattern pre načítanie dát z rôznych zdrojov
pub trait DataLoader {
    fn get_name(&self) -> &str;

    /// Načíta dáta zo stringu
    fn load_from_string(&self, data: &str) -> Result<Dataset>;

    /// Validuje formát dát pred načítaním
    fn validate_format(&self, data: &str) -> Result<()>;

    fn load_from_path(&self, path: &Path) -> Result<Dataset> {
        info!(loader = self.get_name(), path = %path.display(), "loading dataset");
        let text = std::fs::read_to_string(path).map_err(|e| {
            SosensError::Data(format!("cannot read dataset {}: {}", path.display(), e))
        })?;
        let dataset = self.load_from_string(&text)?;
        info!(rows = dataset.num_rows(), columns = dataset.num_columns(), "dataset loaded");
        Ok(dataset)
    }
}

use tracing::info;

use crate::data_loading::Dataset;
use crate::error::{Result, SosensError};

/// Výber cieľového stĺpca z datasetu.
pub trait TargetSelector {
    fn get_name(&self) -> &str;

    /// Vráti index cieľového stĺpca
    fn select(&self, dataset: &Dataset) -> Result<usize>;
}

/// Cieľový stĺpec deklarovaný v konfigurácii
pub struct DeclaredTarget {
    column: String,
}

impl DeclaredTarget {
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl TargetSelector for DeclaredTarget {
    fn get_name(&self) -> &str {
        "Declared Target"
    }

    fn select(&self, dataset: &Dataset) -> Result<usize> {
        let idx = dataset.column_index(&self.column).ok_or_else(|| {
            SosensError::Config(format!(
                "Target column '{}' not found. Columns: {}",
                self.column,
                dataset.headers.join(", ")
            ))
        })?;
        info!(target = %self.column, "using declared target column");
        Ok(idx)
    }
}

/// Heuristika: prvý stĺpec, ktorého názov obsahuje niektoré z kľúčových slov
/// (bez ohľadu na veľkosť písmen).
pub struct KeywordTarget {
    keywords: Vec<String>,
}

impl KeywordTarget {
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

impl Default for KeywordTarget {
    fn default() -> Self {
        Self::new(&["crop".to_string(), "label".to_string(), "recommend".to_string()])
    }
}

impl TargetSelector for KeywordTarget {
    fn get_name(&self) -> &str {
        "Keyword Target"
    }

    fn select(&self, dataset: &Dataset) -> Result<usize> {
        let idx = dataset
            .headers
            .iter()
            .position(|h| {
                let lower = h.to_lowercase();
                self.keywords.iter().any(|k| lower.contains(k.as_str()))
            })
            .ok_or_else(|| {
                SosensError::Config(format!(
                    "No target column found. Check column names for {}. Columns: {}",
                    self.keywords
                        .iter()
                        .map(|k| format!("'{}'", k))
                        .collect::<Vec<_>>()
                        .join(" or "),
                    dataset.headers.join(", ")
                ))
            })?;
        info!(target = %dataset.headers[idx], "selected target column by keyword");
        Ok(idx)
    }
}

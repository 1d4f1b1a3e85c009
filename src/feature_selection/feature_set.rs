use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SosensError};

/// Zoznam príznakov, ktorý služba použije, kým neexistuje natrénovaný bundle
pub const FALLBACK_FEATURES: [&str; 14] = [
    "Ph", "K", "P", "N", "Zn", "S", "QV2M-W", "QV2M-Sp", "QV2M-Su", "QV2M-Au", "T2M_MIN-W",
    "T2M_MIN-Sp", "WD10M", "PRECTOTCORR-W",
];

/// Usporiadaný zoznam unikátnych názvov príznakov.
///
/// Poradie je súčasťou kontraktu: scaler aj klasifikátor očakávajú hodnoty
/// presne v tomto poradí.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSet {
    names: Vec<String>,
}

impl FeatureSet {
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(SosensError::Config("feature set is empty".to_string()));
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(SosensError::Config(format!("duplicate feature name '{}'", name)));
            }
        }
        Ok(Self { names })
    }

    pub fn fallback() -> Self {
        Self {
            names: FALLBACK_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for FeatureSet {
    type Error = SosensError;

    fn try_from(names: Vec<String>) -> Result<Self> {
        FeatureSet::new(names)
    }
}

impl From<FeatureSet> for Vec<String> {
    fn from(set: FeatureSet) -> Self {
        set.names
    }
}

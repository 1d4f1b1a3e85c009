use serde::{Deserialize, Serialize};

use crate::error::{Result, SosensError};

/// Label Encoder - bijekcia medzi textovými triedami a indexmi 0..n.
///
/// Triedy sú zoradené lexikograficky, takže rovnaké dáta dajú vždy rovnaké
/// priradenie indexov.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let mut classes: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();
        if classes.is_empty() {
            return Err(SosensError::Training("cannot fit label encoder on no labels".to_string()));
        }
        Ok(Self { classes })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        labels
            .iter()
            .map(|l| {
                self.encode(l.as_ref()).ok_or_else(|| {
                    SosensError::Data(format!("unknown label '{}'", l.as_ref()))
                })
            })
            .collect()
    }
}

impl TryFrom<Vec<String>> for LabelEncoder {
    type Error = SosensError;

    fn try_from(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            return Err(SosensError::Artifact("label encoder has no classes".to_string()));
        }
        if classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SosensError::Artifact(
                "label encoder classes must be sorted and unique".to_string(),
            ));
        }
        Ok(Self { classes })
    }
}

impl From<LabelEncoder> for Vec<String> {
    fn from(encoder: LabelEncoder) -> Self {
        encoder.classes
    }
}

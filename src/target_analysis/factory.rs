use super::{DeclaredTarget, KeywordTarget, TargetSelector};
use crate::config::DatasetConfig;

/// Factory pre výber cieľovej premennej podľa konfigurácie.
pub struct TargetSelectorFactory;

impl TargetSelectorFactory {
    /// Deklarovaný stĺpec má prednosť, inak heuristika podľa kľúčových slov
    pub fn from_config(config: &DatasetConfig) -> Box<dyn TargetSelector> {
        match &config.target_column {
            Some(column) => Box::new(DeclaredTarget::new(column.clone())),
            None => Box::new(KeywordTarget::new(&config.target_keywords)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_column_wins_over_keywords() {
        let mut config = DatasetConfig::default();
        assert_eq!(TargetSelectorFactory::from_config(&config).get_name(), "Keyword Target");
        config.target_column = Some("Crop".to_string());
        assert_eq!(TargetSelectorFactory::from_config(&config).get_name(), "Declared Target");
    }
}

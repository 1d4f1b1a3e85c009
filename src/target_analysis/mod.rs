//! Výber cieľovej premennej (stĺpca s plodinou).

pub mod target_selector;
pub mod factory;

pub use target_selector::{DeclaredTarget, KeywordTarget, TargetSelector};
pub use factory::TargetSelectorFactory;

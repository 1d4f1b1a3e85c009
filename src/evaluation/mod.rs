pub mod evaluator;
pub mod metrics;
pub mod analysis;

pub use evaluator::ModelEvaluator;
pub use metrics::{AveragedMetrics, ClassMetrics, EvaluationReport};

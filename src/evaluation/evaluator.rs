use super::metrics::{AveragedMetrics, ClassMetrics, EvaluationReport};

pub struct ModelEvaluator;

impl ModelEvaluator {
    /// Confusion matrix pre viac tried, `matrix[true][predicted]`
    pub fn confusion_matrix(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Vec<Vec<usize>> {
        let mut matrix = vec![vec![0usize; n_classes]; n_classes];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            if t < n_classes && p < n_classes {
                matrix[t][p] += 1;
            }
        }
        matrix
    }

    fn ratio(num: usize, den: usize) -> f64 {
        if den == 0 {
            0.0
        } else {
            num as f64 / den as f64
        }
    }

    /// Vypočíta metriky pre klasifikáciu; delenie nulou dáva 0.0
    pub fn evaluate_classification(
        y_true: &[usize],
        y_pred: &[usize],
        classes: &[String],
        model_name: &str,
    ) -> EvaluationReport {
        let n_classes = classes.len();
        let confusion = Self::confusion_matrix(y_true, y_pred, n_classes);
        let total = y_true.len();

        let correct: usize = (0..n_classes).map(|c| confusion[c][c]).sum();
        let accuracy = Self::ratio(correct, total);

        let per_class: Vec<ClassMetrics> = classes
            .iter()
            .enumerate()
            .map(|(c, label)| {
                let tp = confusion[c][c];
                let support: usize = confusion[c].iter().sum();
                let predicted: usize = confusion.iter().map(|row| row[c]).sum();
                let precision = Self::ratio(tp, predicted);
                let recall = Self::ratio(tp, support);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics { label: label.clone(), precision, recall, f1, support }
            })
            .collect();

        let k = n_classes.max(1) as f64;
        let macro_avg = AveragedMetrics {
            precision: per_class.iter().map(|m| m.precision).sum::<f64>() / k,
            recall: per_class.iter().map(|m| m.recall).sum::<f64>() / k,
            f1: per_class.iter().map(|m| m.f1).sum::<f64>() / k,
            support: total,
        };

        let weight = |f: fn(&ClassMetrics) -> f64| -> f64 {
            if total == 0 {
                return 0.0;
            }
            per_class.iter().map(|m| f(m) * m.support as f64).sum::<f64>() / total as f64
        };
        let weighted_avg = AveragedMetrics {
            precision: weight(|m| m.precision),
            recall: weight(|m| m.recall),
            f1: weight(|m| m.f1),
            support: total,
        };

        EvaluationReport {
            model_name: model_name.to_string(),
            accuracy,
            per_class,
            macro_avg,
            weighted_avg,
            confusion,
        }
    }
}

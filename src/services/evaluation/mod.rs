use crate::algorithms::RatingModel;
use crate::models::EncodedRecord;
use crate::utils::metrics::{MetricsCalculator, RegressionMetrics};
use tracing::{info, warn};

/// Scores held-out rows with a fitted model. Never mutates either side.
pub struct Evaluator;

impl Evaluator {
    pub fn evaluate<M: RatingModel>(model: &M, test_set: &[EncodedRecord]) -> RegressionMetrics {
        let mut calculator = MetricsCalculator::new();
        let mut skipped = 0usize;

        for row in test_set {
            match model.predict(row.encoded_user, row.encoded_item) {
                Some(score) if score.is_finite() => {
                    calculator.record(row.record.rating as f64, score as f64);
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!("Skipped {} test rows without a usable prediction", skipped);
        }

        if calculator.is_empty() {
            warn!("Test set is empty, metrics are undefined");
        }

        let metrics = calculator.calculate_all_metrics();
        info!(
            "Evaluated {} test rows: RMSE {:.4}, R^2 {:.4}",
            metrics.count, metrics.root_mean_squared_error, metrics.r_squared
        );
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RatingRecord;
    use std::collections::HashMap;

    struct TableModel(HashMap<(u32, u32), f32>);

    impl RatingModel for TableModel {
        fn predict(&self, encoded_user: u32, encoded_item: u32) -> Option<f32> {
            self.0.get(&(encoded_user, encoded_item)).copied()
        }
    }

    fn row(user: u32, item: u32, rating: f32) -> EncodedRecord {
        EncodedRecord {
            record: RatingRecord::new(user as i64, item.to_string(), rating),
            encoded_user: user,
            encoded_item: item,
        }
    }

    fn model() -> TableModel {
        let mut scores = HashMap::new();
        scores.insert((0, 0), 8.0);
        scores.insert((0, 1), 3.0);
        scores.insert((1, 0), 5.0);
        scores.insert((1, 1), 5.0);
        TableModel(scores)
    }

    #[test]
    fn test_metrics_use_only_rows_given() {
        let test_set = vec![row(0, 0, 9.0), row(0, 1, 2.0)];

        let before = Evaluator::evaluate(&model(), &test_set);
        let again = Evaluator::evaluate(&model(), &test_set);
        assert_eq!(before.mean_squared_error, again.mean_squared_error);
        assert_eq!(before.count, 2);

        // Only a change in the test rows moves the metrics.
        let mut perturbed_test = test_set.clone();
        perturbed_test[1].record.rating = 7.0;
        let changed = Evaluator::evaluate(&model(), &perturbed_test);
        assert!(changed.mean_squared_error > before.mean_squared_error);
    }

    #[test]
    fn test_known_metrics() {
        let metrics = Evaluator::evaluate(&model(), &[row(0, 0, 9.0), row(0, 1, 2.0)]);
        assert!((metrics.mean_absolute_error - 1.0).abs() < 1e-9);
        assert!((metrics.mean_squared_error - 1.0).abs() < 1e-9);
        assert!((metrics.loss_function - 1.0).abs() < 1e-9);
        // SStot = 24.5, SSres = 2
        assert!((metrics.r_squared - (1.0 - 2.0 / 24.5)).abs() < 1e-9);
    }

    #[test]
    fn test_rows_without_prediction_are_skipped() {
        let metrics = Evaluator::evaluate(&model(), &[row(0, 0, 9.0), row(0, 1, 2.0), row(5, 5, 1.0)]);
        assert_eq!(metrics.count, 2);
    }

    #[test]
    fn test_empty_test_set() {
        let metrics = Evaluator::evaluate(&model(), &[]);
        assert_eq!(metrics.count, 0);
        assert!(metrics.mean_squared_error.is_nan());
    }
}

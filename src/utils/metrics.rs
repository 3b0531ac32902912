use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub r_squared: f64,
    pub loss_function: f64,
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub root_mean_squared_error: f64,
    pub count: usize,
}

impl fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "R^2: {} | LossFunction: {} | MeanAbsoluteError: {} | MeanSquaredError: {}",
            self.r_squared, self.loss_function, self.mean_absolute_error, self.mean_squared_error
        )
    }
}

/// Accumulates (label, score) pairs and computes regression metrics.
/// The reported loss is the squared loss, so it equals the MSE.
#[derive(Debug, Clone, Default)]
pub struct MetricsCalculator {
    labels: Vec<f64>,
    scores: Vec<f64>,
}

impl MetricsCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: f64, score: f64) {
        self.labels.push(label);
        self.scores.push(score);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn calculate_mean_absolute_error(&self) -> f64 {
        self.mean_of(|label, score| (label - score).abs())
    }

    pub fn calculate_mean_squared_error(&self) -> f64 {
        self.mean_of(|label, score| (label - score).powi(2))
    }

    /// 1 - SSres / SStot. A constant label column gives NaN or -inf, as the
    /// ratio is undefined there.
    pub fn calculate_r_squared(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }

        let mean_label = self.labels.iter().sum::<f64>() / self.len() as f64;
        let ss_res: f64 = self
            .labels
            .iter()
            .zip(self.scores.iter())
            .map(|(label, score)| (label - score).powi(2))
            .sum();
        let ss_tot: f64 = self.labels.iter().map(|label| (label - mean_label).powi(2)).sum();

        1.0 - ss_res / ss_tot
    }

    pub fn calculate_all_metrics(&self) -> RegressionMetrics {
        let mean_squared_error = self.calculate_mean_squared_error();

        RegressionMetrics {
            r_squared: self.calculate_r_squared(),
            loss_function: mean_squared_error,
            mean_absolute_error: self.calculate_mean_absolute_error(),
            mean_squared_error,
            root_mean_squared_error: mean_squared_error.sqrt(),
            count: self.len(),
        }
    }

    fn mean_of<F: Fn(f64, f64) -> f64>(&self, f: F) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }

        let total: f64 = self
            .labels
            .iter()
            .zip(self.scores.iter())
            .map(|(&label, &score)| f(label, score))
            .sum();

        total / self.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let mut calculator = MetricsCalculator::new();
        calculator.record(1.0, 1.0);
        calculator.record(5.0, 5.0);
        calculator.record(9.0, 9.0);

        let metrics = calculator.calculate_all_metrics();
        assert!((metrics.r_squared - 1.0).abs() < 1e-12);
        assert_eq!(metrics.mean_absolute_error, 0.0);
        assert_eq!(metrics.mean_squared_error, 0.0);
        assert_eq!(metrics.count, 3);
    }

    #[test]
    fn test_known_values() {
        let mut calculator = MetricsCalculator::new();
        calculator.record(2.0, 3.0);
        calculator.record(4.0, 2.0);

        // mean label 3, SStot 2, SSres 5
        let metrics = calculator.calculate_all_metrics();
        assert!((metrics.mean_absolute_error - 1.5).abs() < 1e-12);
        assert!((metrics.mean_squared_error - 2.5).abs() < 1e-12);
        assert!((metrics.loss_function - 2.5).abs() < 1e-12);
        assert!((metrics.root_mean_squared_error - 2.5f64.sqrt()).abs() < 1e-12);
        assert!((metrics.r_squared - (1.0 - 5.0 / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_metrics_are_nan() {
        let metrics = MetricsCalculator::new().calculate_all_metrics();
        assert!(metrics.r_squared.is_nan());
        assert!(metrics.mean_absolute_error.is_nan());
        assert_eq!(metrics.count, 0);
    }

    #[test]
    fn test_metrics_line_format() {
        let metrics = RegressionMetrics {
            r_squared: 0.5,
            loss_function: 2.0,
            mean_absolute_error: 1.25,
            mean_squared_error: 2.0,
            root_mean_squared_error: 2.0f64.sqrt(),
            count: 4,
        };
        assert_eq!(
            metrics.to_string(),
            "R^2: 0.5 | LossFunction: 2 | MeanAbsoluteError: 1.25 | MeanSquaredError: 2"
        );
    }
}

use crate::algorithms::initializer::FactorInitializer;
use crate::algorithms::MatrixFactorization;
use crate::config::TrainingConfig;
use crate::error::{PipelineError, Result};
use crate::models::EncodedRecord;
use crate::utils::validation::validate_training_config;
use crate::utils::seeded_rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub iterations: usize,
    pub rank: usize,
    pub training_rmse: Vec<f64>,
    pub elapsed_ms: u64,
}

impl TrainingSummary {
    pub fn final_rmse(&self) -> Option<f64> {
        self.training_rmse.last().copied()
    }
}

/// Fits a `MatrixFactorization` with one shuffled SGD pass over the training
/// rows per iteration.
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn fit(
        &self,
        examples: &[EncodedRecord],
        num_users: usize,
        num_items: usize,
    ) -> Result<(MatrixFactorization, TrainingSummary)> {
        validate_training_config(&self.config)?;

        if examples.is_empty() {
            return Err(PipelineError::TrainingFailure("training set is empty".to_string()));
        }

        if let Some(example) = examples
            .iter()
            .find(|e| e.encoded_user as usize >= num_users || e.encoded_item as usize >= num_items)
        {
            return Err(PipelineError::TrainingFailure(format!(
                "row key ({}, {}) outside factor matrix bounds ({}, {})",
                example.encoded_user, example.encoded_item, num_users, num_items
            )));
        }

        let rank = self.config.approximation_rank;
        let started = Instant::now();
        let mut rng = seeded_rng(self.config.seed);

        let initializer = FactorInitializer::new(self.config.initialization, rank);
        let mut model = MatrixFactorization::new(
            num_users,
            num_items,
            &initializer,
            rank,
            self.config.lambda,
            &mut rng,
        );

        let mut user_optimizer = self.config.optimizer.build(self.config.learning_rate, num_users);
        let mut item_optimizer = self.config.optimizer.build(self.config.learning_rate, num_items);

        info!(
            "Training matrix factorization: {} rows, {} users x {} items, rank {}, {} iterations",
            examples.len(),
            num_users,
            num_items,
            rank,
            self.config.iterations
        );

        let mut order: Vec<usize> = (0..examples.len()).collect();
        let mut training_rmse = Vec::with_capacity(self.config.iterations);

        for iteration in 0..self.config.iterations {
            order.shuffle(&mut rng);

            for &index in &order {
                model.sgd_update(&examples[index], user_optimizer.as_mut(), item_optimizer.as_mut());
            }

            let rmse = model.compute_loss(examples).sqrt();
            debug!("iter {:>4}  tr_rmse {:.4}", iteration + 1, rmse);

            if !rmse.is_finite() {
                return Err(PipelineError::TrainingFailure(format!(
                    "training diverged at iteration {}",
                    iteration + 1
                )));
            }
            training_rmse.push(rmse);
        }

        if !model.is_finite() {
            return Err(PipelineError::TrainingFailure(
                "factor matrices contain non-finite values".to_string(),
            ));
        }

        let summary = TrainingSummary {
            iterations: self.config.iterations,
            rank,
            training_rmse,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            "Training finished in {}ms, final training RMSE {:.4}",
            summary.elapsed_ms,
            summary.final_rmse().unwrap_or(f64::NAN)
        );

        Ok((model, summary))
    }
}

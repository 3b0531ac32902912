pub mod optimizer;
pub mod initializer;

use crate::models::EncodedRecord;
use initializer::FactorInitializer;
use nalgebra::DVector;
use optimizer::Optimizer;
use rand::Rng;

/// Anything that can score an encoded (user, item) coordinate pair.
pub trait RatingModel {
    fn predict(&self, encoded_user: u32, encoded_item: u32) -> Option<f32>;
}

/// Low-rank factorization of the user x item rating matrix. Rows are indexed
/// by the dense keys produced during preprocessing.
#[derive(Debug, Clone)]
pub struct MatrixFactorization {
    pub user_factors: Vec<DVector<f32>>,
    pub item_factors: Vec<DVector<f32>>,
    pub rank: usize,
    pub regularization: f64,
}

impl MatrixFactorization {
    pub fn new<R: Rng>(
        num_users: usize,
        num_items: usize,
        initializer: &FactorInitializer,
        rank: usize,
        regularization: f64,
        rng: &mut R,
    ) -> Self {
        Self {
            user_factors: initializer.initialize_rows(rng, num_users),
            item_factors: initializer.initialize_rows(rng, num_items),
            rank,
            regularization,
        }
    }

    pub fn num_users(&self) -> usize {
        self.user_factors.len()
    }

    pub fn num_items(&self) -> usize {
        self.item_factors.len()
    }

    /// Mean squared reconstruction error over the given rows.
    pub fn compute_loss(&self, examples: &[EncodedRecord]) -> f64 {
        let mut total_loss = 0.0f64;
        let mut count = 0;

        for example in examples {
            if let Some(prediction) = self.predict(example.encoded_user, example.encoded_item) {
                let error = (example.record.rating - prediction) as f64;
                total_loss += error * error;
                count += 1;
            }
        }

        if count > 0 {
            total_loss / count as f64
        } else {
            0.0
        }
    }

    pub fn sgd_update(
        &mut self,
        example: &EncodedRecord,
        user_optimizer: &mut dyn Optimizer,
        item_optimizer: &mut dyn Optimizer,
    ) {
        let user = example.encoded_user as usize;
        let item = example.encoded_item as usize;

        let user_emb = self.user_factors[user].clone();
        let item_emb = self.item_factors[item].clone();

        let prediction = user_emb.dot(&item_emb);
        let error = example.record.rating - prediction;
        let lambda = self.regularization as f32;

        // Gradients of the regularized squared loss
        let user_gradient = &user_emb * lambda - &item_emb * error;
        let item_gradient = &item_emb * lambda - &user_emb * error;

        user_optimizer.update(user, &mut self.user_factors[user], &user_gradient);
        item_optimizer.update(item, &mut self.item_factors[item], &item_gradient);
    }

    pub fn is_finite(&self) -> bool {
        self.user_factors
            .iter()
            .chain(self.item_factors.iter())
            .all(|row| row.iter().all(|x| x.is_finite()))
    }
}

impl RatingModel for MatrixFactorization {
    fn predict(&self, encoded_user: u32, encoded_item: u32) -> Option<f32> {
        let user_emb = self.user_factors.get(encoded_user as usize)?;
        let item_emb = self.item_factors.get(encoded_item as usize)?;
        Some(user_emb.dot(item_emb))
    }
}

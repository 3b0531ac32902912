use crate::algorithms::{MatrixFactorization, RatingModel};
use crate::error::Result;
use crate::models::{InputModel, ResultModel};
use crate::preprocessing::KeyTables;
use tracing::warn;

/// Scores raw (UserId, ISBN) pairs against a fitted model, going through the
/// same key tables the training rows were encoded with.
pub struct PredictionEngine<'a> {
    keys: &'a KeyTables,
    model: &'a MatrixFactorization,
}

impl<'a> PredictionEngine<'a> {
    pub fn new(keys: &'a KeyTables, model: &'a MatrixFactorization) -> Self {
        Self { keys, model }
    }

    /// Fails with `UnseenCategory` when either id was not in the dataset.
    pub fn try_predict(&self, input: &InputModel) -> Result<ResultModel> {
        let encoded_user = self.keys.encode_user(input.user_id)?;
        let encoded_item = self.keys.encode_item(&input.isbn)?;

        let score = self
            .model
            .predict(encoded_user, encoded_item)
            .unwrap_or(f32::NAN);

        Ok(ResultModel {
            user_id: input.user_id,
            isbn: input.isbn.clone(),
            score,
            rating: input.rating,
        })
    }

    /// Unseen ids score NaN and are never recommended.
    pub fn predict(&self, input: &InputModel) -> ResultModel {
        match self.try_predict(input) {
            Ok(result) => result,
            Err(e) => {
                warn!("{}; scoring as NaN", e);
                ResultModel {
                    user_id: input.user_id,
                    isbn: input.isbn.clone(),
                    score: f32::NAN,
                    rating: input.rating,
                }
            }
        }
    }

    pub fn predict_all(&self, inputs: &[InputModel]) -> Vec<ResultModel> {
        inputs.iter().map(|input| self.predict(input)).collect()
    }
}

//! Load -> preprocess -> train -> evaluate -> predict.
//!
//! Each stage takes the previous stage's output and returns its own; nothing
//! is kept between runs.

use crate::algorithms::MatrixFactorization;
use crate::config::Config;
use crate::data;
use crate::error::Result;
use crate::models::{EncodedRecord, InputModel, RatingRecord, ResultModel};
use crate::preprocessing::{train_test_split, DatasetSplit, KeyTables, Preprocessor};
use crate::services::evaluation::Evaluator;
use crate::services::recommendation::PredictionEngine;
use crate::services::training::{Trainer, TrainingSummary};
use crate::utils::metrics::RegressionMetrics;
use crate::utils::validation::validate_config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub generated_at: DateTime<Utc>,
    pub num_records: usize,
    pub num_users: usize,
    pub num_items: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub training: TrainingSummary,
    pub metrics: RegressionMetrics,
    pub predictions: Vec<ResultModel>,
}

pub struct PreparedData {
    pub keys: KeyTables,
    pub split: DatasetSplit,
}

pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<PipelineReport> {
        validate_config(&self.config)?;

        let records = self.load_data()?;
        let num_records = records.len();

        let prepared = self.preprocess(records)?;
        let (model, training) = self.create_model(&prepared)?;
        let metrics = self.evaluate_model(&model, &prepared.split.test);
        let predictions = self.predict_values(&prepared.keys, &model, &self.config.prediction.probes);

        Ok(PipelineReport {
            generated_at: Utc::now(),
            num_records,
            num_users: prepared.keys.num_users(),
            num_items: prepared.keys.num_items(),
            train_size: prepared.split.train.len(),
            test_size: prepared.split.test.len(),
            training,
            metrics,
            predictions,
        })
    }

    pub fn load_data(&self) -> Result<Vec<RatingRecord>> {
        data::load_ratings(&self.config.data)
    }

    pub fn preprocess(&self, records: Vec<RatingRecord>) -> Result<PreparedData> {
        let (keys, encoded) = Preprocessor::default().fit_transform(records)?;
        let split = train_test_split(encoded, self.config.split.test_fraction, self.config.split.seed);
        Ok(PreparedData { keys, split })
    }

    pub fn create_model(&self, prepared: &PreparedData) -> Result<(MatrixFactorization, TrainingSummary)> {
        Trainer::new(self.config.training.clone()).fit(
            &prepared.split.train,
            prepared.keys.num_users(),
            prepared.keys.num_items(),
        )
    }

    pub fn evaluate_model(&self, model: &MatrixFactorization, test_set: &[EncodedRecord]) -> RegressionMetrics {
        Evaluator::evaluate(model, test_set)
    }

    pub fn predict_values(
        &self,
        keys: &KeyTables,
        model: &MatrixFactorization,
        probes: &[InputModel],
    ) -> Vec<ResultModel> {
        let engine = PredictionEngine::new(keys, model);
        let results = engine.predict_all(probes);
        info!("Scored {} probe pairs", results.len());
        results
    }
}

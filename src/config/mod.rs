use crate::algorithms::initializer::InitializationMethod;
use crate::algorithms::optimizer::OptimizerKind;
use crate::models::InputModel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub split: SplitConfig,
    pub training: TrainingConfig,
    pub prediction: PredictionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: String,
    pub delimiter: char,
    pub has_header: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub test_fraction: f64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub iterations: usize,
    pub approximation_rank: usize,
    pub learning_rate: f64,
    pub lambda: f64,
    pub optimizer: OptimizerKind,
    pub initialization: InitializationMethod,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub probes: Vec<InputModel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            split: SplitConfig::default(),
            training: TrainingConfig::default(),
            prediction: PredictionConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "book-ratings-train-dataset.csv".to_string(),
            delimiter: ',',
            has_header: true,
        }
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.05,
            seed: None,
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            approximation_rank: 100,
            learning_rate: 0.1,
            lambda: 0.1,
            optimizer: OptimizerKind::AdaGrad,
            initialization: InitializationMethod::ScaledUniform,
            seed: None,
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            probes: vec![
                InputModel::new(12, "1879384493"),
                InputModel::new(12, "425176428"),
            ],
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("BOOKREC").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

use nalgebra::DVector;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub fn uniform<R: Rng>(rng: &mut R, size: usize, low: f32, high: f32) -> Vec<f32> {
    (0..size)
        .map(|_| rng.gen_range(low..high))
        .collect()
}

/// U(0, 1) scaled by 1/sqrt(rank), so initial dot products stay small and positive.
pub fn scaled_uniform<R: Rng>(rng: &mut R, size: usize) -> Vec<f32> {
    let scale = (1.0 / size as f32).sqrt();
    uniform(rng, size, 0.0, 1.0)
        .into_iter()
        .map(|x| x * scale)
        .collect()
}

pub fn xavier_uniform<R: Rng>(rng: &mut R, size: usize) -> Vec<f32> {
    let limit = (6.0 / size as f32).sqrt();
    uniform(rng, size, -limit, limit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitializationMethod {
    ScaledUniform,
    XavierUniform,
}

impl InitializationMethod {
    pub fn initialize<R: Rng>(&self, rng: &mut R, size: usize) -> Vec<f32> {
        match self {
            InitializationMethod::ScaledUniform => scaled_uniform(rng, size),
            InitializationMethod::XavierUniform => xavier_uniform(rng, size),
        }
    }
}

/// Produces the initial factor rows for one side of the factorization.
pub struct FactorInitializer {
    method: InitializationMethod,
    rank: usize,
}

impl FactorInitializer {
    pub fn new(method: InitializationMethod, rank: usize) -> Self {
        Self { method, rank }
    }

    pub fn initialize_rows<R: Rng>(&self, rng: &mut R, rows: usize) -> Vec<DVector<f32>> {
        (0..rows)
            .map(|_| DVector::from_vec(self.method.initialize(rng, self.rank)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scaled_uniform_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let weights = scaled_uniform(&mut rng, 100);
        assert_eq!(weights.len(), 100);

        let limit = (1.0 / 100.0_f32).sqrt();
        for &weight in &weights {
            assert!(weight >= 0.0 && weight < limit);
        }
    }

    #[test]
    fn test_xavier_uniform_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let weights = xavier_uniform(&mut rng, 50);

        let limit = (6.0 / 50.0_f32).sqrt();
        for &weight in &weights {
            assert!(weight >= -limit && weight <= limit);
        }
    }

    #[test]
    fn test_seeded_rows_are_reproducible() {
        let initializer = FactorInitializer::new(InitializationMethod::ScaledUniform, 16);

        let first = initializer.initialize_rows(&mut StdRng::seed_from_u64(99), 4);
        let second = initializer.initialize_rows(&mut StdRng::seed_from_u64(99), 4);

        assert_eq!(first.len(), 4);
        assert_eq!(first[0].len(), 16);
        assert_eq!(first, second);
    }
}

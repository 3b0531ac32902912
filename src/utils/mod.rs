use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod metrics;
pub mod validation;

/// A fixed seed gives reproducible runs; `None` draws one from OS entropy.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

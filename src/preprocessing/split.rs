use crate::models::EncodedRecord;
use crate::utils::seeded_rng;
use rand::seq::SliceRandom;
use tracing::info;

#[derive(Debug, Clone)]
pub struct DatasetSplit {
    pub train: Vec<EncodedRecord>,
    pub test: Vec<EncodedRecord>,
}

impl DatasetSplit {
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.test.is_empty()
    }
}

/// Partitions rows into disjoint train and test sets, reserving
/// `round(n * test_fraction)` randomly chosen rows for testing. Relative row
/// order is preserved within each side.
pub fn train_test_split(records: Vec<EncodedRecord>, test_fraction: f64, seed: Option<u64>) -> DatasetSplit {
    let total = records.len();
    let test_size = ((total as f64) * test_fraction).round() as usize;
    let test_size = test_size.min(total);

    let mut indices: Vec<usize> = (0..total).collect();
    let mut rng = seeded_rng(seed);
    indices.shuffle(&mut rng);

    let mut in_test = vec![false; total];
    for &index in indices.iter().take(test_size) {
        in_test[index] = true;
    }

    let mut train = Vec::with_capacity(total - test_size);
    let mut test = Vec::with_capacity(test_size);
    for (record, is_test) in records.into_iter().zip(in_test) {
        if is_test {
            test.push(record);
        } else {
            train.push(record);
        }
    }

    info!("Split {} rows into {} train / {} test", total, train.len(), test.len());
    DatasetSplit { train, test }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RatingRecord;
    use std::collections::HashSet;

    fn rows(n: usize) -> Vec<EncodedRecord> {
        (0..n)
            .map(|i| EncodedRecord {
                record: RatingRecord::new(i as i64, format!("isbn-{}", i), (i % 10) as f32),
                encoded_user: i as u32,
                encoded_item: i as u32,
            })
            .collect()
    }

    #[test]
    fn test_split_is_disjoint_and_complete() {
        let split = train_test_split(rows(200), 0.05, Some(17));
        assert_eq!(split.len(), 200);
        assert_eq!(split.test.len(), 10);
        assert_eq!(split.train.len(), 190);

        let train_users: HashSet<_> = split.train.iter().map(|r| r.record.user_id).collect();
        let test_users: HashSet<_> = split.test.iter().map(|r| r.record.user_id).collect();
        assert!(train_users.is_disjoint(&test_users));
        assert_eq!(train_users.len() + test_users.len(), 200);
    }

    #[test]
    fn test_split_seeded_is_reproducible() {
        let first = train_test_split(rows(50), 0.2, Some(5));
        let second = train_test_split(rows(50), 0.2, Some(5));
        assert_eq!(first.test, second.test);
    }

    #[test]
    fn test_zero_fraction_keeps_everything_for_training() {
        let split = train_test_split(rows(10), 0.0, None);
        assert!(split.test.is_empty());
        assert_eq!(split.train.len(), 10);
    }

    #[test]
    fn test_small_dataset_rounds_down_to_empty_test() {
        let split = train_test_split(rows(5), 0.05, Some(1));
        assert!(split.test.is_empty());
        assert_eq!(split.train.len(), 5);
    }
}

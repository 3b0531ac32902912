//! Value-to-key encoding of the categorical id columns.
//!
//! Key tables are fitted on the full dataset before any split, so every id in
//! the held-out rows still has a factor row in the model.

pub mod split;

use crate::error::{PipelineError, Result};
use crate::models::{EncodedRecord, RatingRecord};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, info};

pub use split::{train_test_split, DatasetSplit};

/// Bijective map from observed values to dense keys `0..len`, assigned in
/// order of first occurrence.
#[derive(Debug, Clone)]
pub struct KeyMapping<V: Eq + Hash + Clone> {
    keys: HashMap<V, u32>,
    values: Vec<V>,
}

impl<V: Eq + Hash + Clone> KeyMapping<V> {
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
            values: Vec::new(),
        }
    }

    pub fn fit<I: IntoIterator<Item = V>>(values: I) -> Self {
        let mut mapping = Self::new();
        for value in values {
            mapping.insert(value);
        }
        mapping
    }

    /// Returns the existing key for `value`, or assigns the next one.
    pub fn insert(&mut self, value: V) -> u32 {
        if let Some(&key) = self.keys.get(&value) {
            return key;
        }

        let key = self.values.len() as u32;
        self.keys.insert(value.clone(), key);
        self.values.push(value);
        key
    }

    pub fn key_of(&self, value: &V) -> Option<u32> {
        self.keys.get(value).copied()
    }

    pub fn value_of(&self, key: u32) -> Option<&V> {
        self.values.get(key as usize)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<V: Eq + Hash + Clone> Default for KeyMapping<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyTables {
    pub users: KeyMapping<i64>,
    pub items: KeyMapping<String>,
}

impl KeyTables {
    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    pub fn encode_user(&self, user_id: i64) -> Result<u32> {
        self.users.key_of(&user_id).ok_or_else(|| PipelineError::UnseenCategory {
            column: TransformStep::MapUserToKey.input_column(),
            value: user_id.to_string(),
        })
    }

    pub fn encode_item(&self, isbn: &str) -> Result<u32> {
        self.items.key_of(&isbn.to_string()).ok_or_else(|| PipelineError::UnseenCategory {
            column: TransformStep::MapItemToKey.input_column(),
            value: isbn.to_string(),
        })
    }
}

/// One named column transform. Steps run in list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformStep {
    /// `UserId` (integer) -> `EncodedUser` (key)
    MapUserToKey,
    /// `ISBN` (text) -> `EncodedItem` (key)
    MapItemToKey,
}

impl TransformStep {
    pub fn name(&self) -> &'static str {
        match self {
            TransformStep::MapUserToKey => "map_user_to_key",
            TransformStep::MapItemToKey => "map_item_to_key",
        }
    }

    pub fn input_column(&self) -> &'static str {
        match self {
            TransformStep::MapUserToKey => "UserId",
            TransformStep::MapItemToKey => "ISBN",
        }
    }

    pub fn output_column(&self) -> &'static str {
        match self {
            TransformStep::MapUserToKey => "EncodedUser",
            TransformStep::MapItemToKey => "EncodedItem",
        }
    }

    fn fit(&self, tables: &mut KeyTables, records: &[RatingRecord]) {
        match self {
            TransformStep::MapUserToKey => {
                tables.users = KeyMapping::fit(records.iter().map(|r| r.user_id));
            }
            TransformStep::MapItemToKey => {
                tables.items = KeyMapping::fit(records.iter().map(|r| r.isbn.clone()));
            }
        }
    }

    fn apply(&self, tables: &KeyTables, row: &mut EncodedRecord) -> Result<()> {
        match self {
            TransformStep::MapUserToKey => {
                row.encoded_user = tables.encode_user(row.record.user_id)?;
            }
            TransformStep::MapItemToKey => {
                row.encoded_item = tables.encode_item(&row.record.isbn)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Preprocessor {
    steps: Vec<TransformStep>,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(vec![TransformStep::MapUserToKey, TransformStep::MapItemToKey])
    }
}

impl Preprocessor {
    pub fn new(steps: Vec<TransformStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[TransformStep] {
        &self.steps
    }

    pub fn fit(&self, records: &[RatingRecord]) -> KeyTables {
        let mut tables = KeyTables::default();
        for step in &self.steps {
            step.fit(&mut tables, records);
            debug!(
                "Fitted {}: {} -> {}",
                step.name(),
                step.input_column(),
                step.output_column()
            );
        }

        info!(
            "Fitted key tables: {} users, {} items",
            tables.num_users(),
            tables.num_items()
        );
        tables
    }

    pub fn transform(&self, tables: &KeyTables, records: Vec<RatingRecord>) -> Result<Vec<EncodedRecord>> {
        records
            .into_iter()
            .map(|record| {
                let mut row = EncodedRecord {
                    record,
                    encoded_user: 0,
                    encoded_item: 0,
                };
                for step in &self.steps {
                    step.apply(tables, &mut row)?;
                }
                Ok(row)
            })
            .collect()
    }

    pub fn fit_transform(&self, records: Vec<RatingRecord>) -> Result<(KeyTables, Vec<EncodedRecord>)> {
        let tables = self.fit(&records);
        let encoded = self.transform(&tables, records)?;
        Ok((tables, encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings() -> Vec<RatingRecord> {
        vec![
            RatingRecord::new(12, "1879384493", 9.0),
            RatingRecord::new(12, "425176428", 2.0),
            RatingRecord::new(7, "1879384493", 8.0),
            RatingRecord::new(30, "0060973129", 5.0),
            RatingRecord::new(7, "425176428", 3.0),
        ]
    }

    #[test]
    fn test_keys_follow_first_occurrence() {
        let mapping = KeyMapping::fit(vec!["b", "a", "b", "c"]);
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.key_of(&"b"), Some(0));
        assert_eq!(mapping.key_of(&"a"), Some(1));
        assert_eq!(mapping.key_of(&"c"), Some(2));
        assert_eq!(mapping.value_of(1), Some(&"a"));
        assert_eq!(mapping.key_of(&"z"), None);
    }

    #[test]
    fn test_one_key_per_distinct_value() {
        let tables = Preprocessor::default().fit(&ratings());
        assert_eq!(tables.num_users(), 3);
        assert_eq!(tables.num_items(), 3);

        for record in ratings() {
            let key = tables.encode_user(record.user_id).unwrap();
            assert_eq!(tables.users.value_of(key), Some(&record.user_id));
            // Idempotent within a run
            assert_eq!(tables.encode_user(record.user_id).unwrap(), key);
        }
    }

    #[test]
    fn test_transform_annotates_every_record() {
        let (tables, encoded) = Preprocessor::default().fit_transform(ratings()).unwrap();
        assert_eq!(encoded.len(), 5);

        assert_eq!(encoded[0].encoded_user, encoded[1].encoded_user);
        assert_eq!(encoded[0].encoded_item, encoded[2].encoded_item);
        assert_ne!(encoded[0].encoded_item, encoded[1].encoded_item);

        for row in &encoded {
            assert_eq!(tables.users.value_of(row.encoded_user), Some(&row.record.user_id));
            assert_eq!(tables.items.value_of(row.encoded_item), Some(&row.record.isbn));
        }
    }

    #[test]
    fn test_unseen_value_is_reported() {
        let tables = Preprocessor::default().fit(&ratings());
        let err = tables.encode_item("0000000000").unwrap_err();
        assert!(matches!(err, PipelineError::UnseenCategory { column: "ISBN", .. }));

        let preprocessor = Preprocessor::default();
        let err = preprocessor
            .transform(&tables, vec![RatingRecord::new(99, "1879384493", 1.0)])
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnseenCategory { column: "UserId", .. }));
    }

    #[test]
    fn test_step_schema() {
        let preprocessor = Preprocessor::default();
        let outputs: Vec<_> = preprocessor.steps().iter().map(|s| s.output_column()).collect();
        assert_eq!(outputs, vec!["EncodedUser", "EncodedItem"]);
        assert_eq!(preprocessor.steps()[1].name(), "map_item_to_key");
    }
}

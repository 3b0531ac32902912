use serde::{Deserialize, Serialize};
use std::fmt;

/// Score above which a book is reported as recommended.
pub const RECOMMENDATION_THRESHOLD: f32 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub user_id: i64,
    pub isbn: String,
    pub rating: f32,
}

/// A rating annotated with the dense keys used as factor-matrix coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedRecord {
    pub record: RatingRecord,
    pub encoded_user: u32,
    pub encoded_item: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputModel {
    pub user_id: i64,
    pub isbn: String,
    #[serde(default)]
    pub rating: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultModel {
    pub user_id: i64,
    pub isbn: String,
    pub score: f32,
    pub rating: Option<f32>,
}

impl RatingRecord {
    pub fn new(user_id: i64, isbn: impl Into<String>, rating: f32) -> Self {
        Self {
            user_id,
            isbn: isbn.into(),
            rating,
        }
    }
}

impl InputModel {
    pub fn new(user_id: i64, isbn: impl Into<String>) -> Self {
        Self {
            user_id,
            isbn: isbn.into(),
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }
}

impl ResultModel {
    // NaN scores never compare greater, so unseen pairs are never recommended.
    pub fn is_recommended(&self) -> bool {
        self.score > RECOMMENDATION_THRESHOLD
    }
}

impl fmt::Display for ResultModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UserId: {} | Book: {} | Score: {} | Is Recommended: {}",
            self.user_id,
            self.isbn,
            self.score,
            if self.is_recommended() { "True" } else { "False" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_threshold_is_strict() {
        let mut result = ResultModel {
            user_id: 12,
            isbn: "1879384493".to_string(),
            score: 7.0,
            rating: None,
        };
        assert!(!result.is_recommended());

        result.score = 7.01;
        assert!(result.is_recommended());

        result.score = f32::NAN;
        assert!(!result.is_recommended());
    }

    #[test]
    fn test_result_line_format() {
        let result = ResultModel {
            user_id: 12,
            isbn: "425176428".to_string(),
            score: 2.5,
            rating: None,
        };
        assert_eq!(
            result.to_string(),
            "UserId: 12 | Book: 425176428 | Score: 2.5 | Is Recommended: False"
        );

        let liked = ResultModel {
            score: 9.03,
            ..result
        };
        assert!(liked.to_string().ends_with("| Is Recommended: True"));
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LikeDislike {
    Like,
    Dislike,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Thumbs {
    Up,
    Down,
}

/// A rating together with its scale. Serialized as
/// `{"rating_type": "numeric", "rating": 4}`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "rating_type", content = "rating", rename_all = "snake_case")]
pub enum Rating {
    Numeric(u8),
    LikeDislike(LikeDislike),
    Thumbs(Thumbs),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RatingError {
    #[error("Invalid rating type")]
    InvalidType,
    #[error("Numeric rating must be between 1 and 5")]
    NumericOutOfRange,
    #[error("Like/Dislike rating must be either \"like\" or \"dislike\"")]
    InvalidLikeDislike,
    #[error("Thumbs rating must be either \"up\" or \"down\"")]
    InvalidThumbs,
}

impl Rating {
    pub fn parse(rating_type: &str, value: &Value) -> Result<Rating, RatingError> {
        match rating_type {
            "numeric" => {
                let number = value.as_u64().ok_or(RatingError::NumericOutOfRange)?;
                if !(1..=5).contains(&number) {
                    return Err(RatingError::NumericOutOfRange);
                }
                Ok(Rating::Numeric(number as u8))
            }
            "like_dislike" => match value.as_str() {
                Some("like") => Ok(Rating::LikeDislike(LikeDislike::Like)),
                Some("dislike") => Ok(Rating::LikeDislike(LikeDislike::Dislike)),
                _ => Err(RatingError::InvalidLikeDislike),
            },
            "thumbs" => match value.as_str() {
                Some("up") => Ok(Rating::Thumbs(Thumbs::Up)),
                Some("down") => Ok(Rating::Thumbs(Thumbs::Down)),
                _ => Err(RatingError::InvalidThumbs),
            },
            _ => Err(RatingError::InvalidType),
        }
    }

    pub fn rating_type(&self) -> &'static str {
        match self {
            Rating::Numeric(_) => "numeric",
            Rating::LikeDislike(_) => "like_dislike",
            Rating::Thumbs(_) => "thumbs",
        }
    }

    /// Textual form used by the record store.
    pub fn stored_value(&self) -> String {
        match self {
            Rating::Numeric(value) => value.to_string(),
            Rating::LikeDislike(LikeDislike::Like) => "like".to_string(),
            Rating::LikeDislike(LikeDislike::Dislike) => "dislike".to_string(),
            Rating::Thumbs(Thumbs::Up) => "up".to_string(),
            Rating::Thumbs(Thumbs::Down) => "down".to_string(),
        }
    }

    pub fn from_stored(rating_type: &str, value: &str) -> Result<Rating, RatingError> {
        let value = match rating_type {
            "numeric" => value
                .parse::<u64>()
                .map(Value::from)
                .map_err(|_| RatingError::NumericOutOfRange)?,
            _ => Value::from(value),
        };
        Rating::parse(rating_type, &value)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub review_id: Uuid,
    pub user_id: String,
    pub film_id: String,
    #[serde(flatten)]
    pub rating: Rating,
    pub comment: String,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_ratings_are_bounded() {
        assert_eq!(Rating::parse("numeric", &json!(1)), Ok(Rating::Numeric(1)));
        assert_eq!(Rating::parse("numeric", &json!(5)), Ok(Rating::Numeric(5)));
        assert_eq!(
            Rating::parse("numeric", &json!(0)),
            Err(RatingError::NumericOutOfRange)
        );
        assert_eq!(
            Rating::parse("numeric", &json!(6)),
            Err(RatingError::NumericOutOfRange)
        );
        assert_eq!(
            Rating::parse("numeric", &json!("4")),
            Err(RatingError::NumericOutOfRange)
        );
    }

    #[test]
    fn categorical_ratings_accept_their_values_only() {
        assert_eq!(
            Rating::parse("like_dislike", &json!("like")),
            Ok(Rating::LikeDislike(LikeDislike::Like))
        );
        assert_eq!(
            Rating::parse("like_dislike", &json!("up")),
            Err(RatingError::InvalidLikeDislike)
        );
        assert_eq!(
            Rating::parse("thumbs", &json!("down")),
            Ok(Rating::Thumbs(Thumbs::Down))
        );
        assert_eq!(
            Rating::parse("thumbs", &json!("like")),
            Err(RatingError::InvalidThumbs)
        );
        assert_eq!(
            Rating::parse("stars", &json!(3)),
            Err(RatingError::InvalidType)
        );
    }

    #[test]
    fn stored_form_round_trips() {
        for rating in [
            Rating::Numeric(3),
            Rating::LikeDislike(LikeDislike::Dislike),
            Rating::Thumbs(Thumbs::Up),
        ] {
            let restored = Rating::from_stored(rating.rating_type(), &rating.stored_value());
            assert_eq!(restored, Ok(rating));
        }
    }

    #[test]
    fn review_serializes_flat() {
        let review = Review {
            review_id: Uuid::nil(),
            user_id: "u1".into(),
            film_id: "f1".into(),
            rating: Rating::Numeric(4),
            comment: String::new(),
            timestamp: 0,
        };
        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["rating_type"], "numeric");
        assert_eq!(value["rating"], 4);
    }
}

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const PRODUCT_ID_REQUIRED: &str = "Product ID is required";
pub const PRODUCT_IDS_REQUIRED: &str = "Product IDs are required";
pub const SUBMIT_REQUIRED: &str = "Product ID and valid rating (1-5) are required";

/// Body of a review submission.
///
/// Missing `productId` or `rating` fields deserialize to empty values so
/// they are reported by validation rather than by the JSON decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReview {
    #[serde(default)]
    #[validate(custom = "not_blank")]
    pub product_id: String,
    #[serde(default)]
    #[validate(range(min = 1, max = 5))]
    pub rating: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl SubmitReview {
    pub fn new(product_id: impl Into<String>, rating: i64) -> Self {
        Self {
            product_id: product_id.into(),
            rating,
            comment: None,
        }
    }

    pub fn comment(mut self, value: impl Into<String>) -> Self {
        self.comment = Some(value.into());
        self
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }

    Ok(())
}

/// Splits a comma separated `productIds` parameter.
///
/// Blank segments are kept so the lookup can reject them.
pub fn parse_product_ids(raw: &str) -> Vec<String> {
    raw.split(',').map(|id| id.trim().to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_out_of_range() {
        assert!(SubmitReview::new("p", 1).validate().is_ok());
        assert!(SubmitReview::new("p", 5).validate().is_ok());
        assert!(SubmitReview::new("p", 0).validate().is_err());
        assert!(SubmitReview::new("p", 6).validate().is_err());
        assert!(SubmitReview::new("p", -3).validate().is_err());
    }

    #[test]
    fn blank_product_id() {
        assert!(SubmitReview::new("", 3).validate().is_err());
        assert!(SubmitReview::new("  ", 3).validate().is_err());
    }

    #[test]
    fn missing_fields_deserialize_to_invalid_input() {
        let input: SubmitReview = serde_json::from_str(r#"{"comment": "nice"}"#).unwrap();

        assert_eq!(input.product_id, "");
        assert_eq!(input.rating, 0);
        assert_eq!(input.comment.as_deref(), Some("nice"));
        assert!(input.validate().is_err());
    }

    #[test]
    fn fractional_rating_is_rejected_by_decoder() {
        assert!(serde_json::from_str::<SubmitReview>(r#"{"productId": "p", "rating": 4.5}"#).is_err());
    }

    #[test]
    fn split_product_ids() {
        assert_eq!(parse_product_ids("a,b, c"), vec!["a", "b", "c"]);
        assert_eq!(parse_product_ids("a,,b"), vec!["a", "", "b"]);
        assert_eq!(parse_product_ids(""), vec![""]);
    }
}

//! Form payloads and their validation
//!
//! Forms deserialize leniently (absent fields become empty strings) so that
//! validation, not extraction, decides which notice the visitor sees.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::error::ValidationError;

/// Accepted event date format
pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Checkout form as posted by the browser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CheckoutForm {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(length(min = 1))]
    pub email: String,

    #[validate(length(min = 1))]
    pub phone: String,

    #[validate(length(min = 1))]
    pub event_date: String,
}

/// Validated customer contact info
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_date: NaiveDate,
}

impl CheckoutForm {
    /// All four fields must be present and the date must read `YYYY-MM-DD`
    pub fn validate_details(&self) -> Result<CustomerDetails, ValidationError> {
        check_required(self)?;

        let event_date = NaiveDate::parse_from_str(self.event_date.trim(), EVENT_DATE_FORMAT)
            .map_err(|e| ValidationError::InvalidField {
                field: "event_date".to_string(),
                message: format!("expected YYYY-MM-DD ({})", e),
            })?;

        Ok(CustomerDetails {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            event_date,
        })
    }
}

/// Feedback form as posted by the browser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FeedbackForm {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(length(min = 1))]
    pub rating: String,

    #[validate(length(min = 1))]
    pub message: String,
}

/// Validated feedback
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackDetails {
    pub name: String,
    pub rating: i64,
    pub message: String,
}

impl FeedbackForm {
    /// Rating must be an integer; its range is not constrained
    pub fn validate_details(&self) -> Result<FeedbackDetails, ValidationError> {
        check_required(self)?;

        let rating = self
            .rating
            .trim()
            .parse::<i64>()
            .map_err(|e| ValidationError::InvalidField {
                field: "rating".to_string(),
                message: e.to_string(),
            })?;

        Ok(FeedbackDetails {
            name: self.name.clone(),
            rating,
            message: self.message.clone(),
        })
    }
}

fn check_required(form: &impl Validate) -> Result<(), ValidationError> {
    form.validate().map_err(|errors| {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        ValidationError::MissingFields(fields)
    })
}

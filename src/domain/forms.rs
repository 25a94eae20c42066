use std::collections::HashMap;

use crate::domain::models::{NewContactMessage, NewPlayer};
use crate::errors::FormError;

pub const DEFAULT_RATING: i32 = 1200;
pub const INITIAL_PAYMENT_STATUS: &str = "pending";

/// Titles offered on the registration form, in display order
pub const TITLES: &[(&str, &str)] = &[
    ("CM", "Candidate Master"),
    ("FM", "FIDE Master"),
    ("IM", "International Master"),
    ("GM", "Grandmaster"),
    ("WCM", "Woman Candidate Master"),
    ("WFM", "Woman FIDE Master"),
    ("WIM", "Woman International Master"),
    ("WGM", "Woman Grandmaster"),
];

pub const COUNTRIES: &[(&str, &str)] = &[
    ("US", "United States"),
    ("CA", "Canada"),
    ("UK", "United Kingdom"),
    ("DE", "Germany"),
    ("FR", "France"),
    ("RU", "Russia"),
    ("IN", "India"),
    ("CN", "China"),
    ("OTHER", "Other"),
];

pub const CONTACT_CATEGORIES: &[(&str, &str)] = &[
    ("registration", "Registration Issues"),
    ("tournament", "Tournament Rules"),
    ("technical", "Technical Support"),
    ("media", "Media & Press"),
    ("sponsorship", "Sponsorship"),
    ("general", "General Inquiry"),
];

/// Flat field map as collected from a submitted form
pub type FormFields = HashMap<String, String>;

struct Fields<'a>(&'a FormFields);

impl<'a> Fields<'a> {
    fn optional(&self, name: &str) -> String {
        self.0
            .get(name)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    /// Blank counts as absent
    fn present(&self, name: &str) -> Option<String> {
        Some(self.optional(name)).filter(|value| !value.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, FormError> {
        let value = self.optional(name);
        if value.is_empty() {
            return Err(FormError::MissingField(name));
        }
        Ok(value)
    }

    fn integer_or(&self, name: &'static str, default: i32) -> Result<i32, FormError> {
        let value = self.optional(name);
        if value.is_empty() {
            return Ok(default);
        }
        value.parse().map_err(|_| FormError::InvalidNumber {
            field: name,
            value,
        })
    }
}

impl NewPlayer {
    /// Coerces a registration form into an insertable player.
    ///
    /// A blank rating becomes 1200 and the payment status starts as pending.
    pub fn from_form(form: &FormFields) -> Result<Self, FormError> {
        let fields = Fields(form);
        Ok(Self {
            first_name: fields.required("first_name")?,
            last_name: fields.required("last_name")?,
            email: fields.required("email")?,
            phone: fields.optional("phone"),
            country: fields.optional("country"),
            rating: fields.integer_or("rating", DEFAULT_RATING)?,
            title: fields.present("title"),
            birth_date: fields.optional("birth_date"),
            emergency_contact: fields.optional("emergency_contact"),
            emergency_phone: fields.optional("emergency_phone"),
            payment_status: INITIAL_PAYMENT_STATUS.to_string(),
        })
    }
}

impl NewContactMessage {
    pub fn from_form(form: &FormFields) -> Result<Self, FormError> {
        let fields = Fields(form);
        Ok(Self {
            name: fields.required("name")?,
            email: fields.required("email")?,
            subject: fields.required("subject")?,
            category: fields.optional("category"),
            message: fields.required("message")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn registration(rating: &str) -> FormFields {
        form(&[
            ("first_name", "Magnus"),
            ("last_name", "Berg"),
            ("email", "magnus@example.com"),
            ("country", "DE"),
            ("rating", rating),
            ("title", ""),
        ])
    }

    #[test]
    fn test_blank_rating_defaults_to_1200() {
        let player = NewPlayer::from_form(&registration("")).unwrap();
        assert_eq!(player.rating, 1200);
        assert_eq!(player.payment_status, "pending");
    }

    #[test]
    fn test_blank_title_is_none() {
        let player = NewPlayer::from_form(&registration("")).unwrap();
        assert_eq!(player.title, None);
        assert_eq!(serde_json::to_value(&player).unwrap()["title"], serde_json::Value::Null);

        let mut fields = registration("2480");
        fields.insert("title".to_string(), " IM ".to_string());
        assert_eq!(NewPlayer::from_form(&fields).unwrap().title.as_deref(), Some("IM"));
    }

    #[test]
    fn test_rating_is_parsed() {
        let player = NewPlayer::from_form(&registration(" 2105 ")).unwrap();
        assert_eq!(player.rating, 2105);
    }

    #[test]
    fn test_non_numeric_rating_rejected() {
        let err = NewPlayer::from_form(&registration("strong")).unwrap_err();
        assert_eq!(
            err,
            FormError::InvalidNumber {
                field: "rating",
                value: "strong".to_string()
            }
        );
    }

    #[test]
    fn test_missing_required_field() {
        let mut fields = registration("");
        fields.remove("email");
        assert_eq!(
            NewPlayer::from_form(&fields).unwrap_err(),
            FormError::MissingField("email")
        );
    }

    #[test]
    fn test_contact_form() {
        let message = NewContactMessage::from_form(&form(&[
            ("name", "Ola"),
            ("email", "ola@example.com"),
            ("subject", "Parking"),
            ("category", "general"),
            ("message", "Is there parking at the venue?"),
        ]))
        .unwrap();
        assert_eq!(message.category, "general");

        let err = NewContactMessage::from_form(&form(&[("name", "Ola")])).unwrap_err();
        assert_eq!(err, FormError::MissingField("email"));
    }
}

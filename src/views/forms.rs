use serde::Serialize;

use crate::domain::forms::{CONTACT_CATEGORIES, COUNTRIES, DEFAULT_RATING, TITLES};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

fn choices(pairs: &[(&'static str, &'static str)]) -> Vec<Choice> {
    pairs
        .iter()
        .map(|&(value, label)| Choice { value, label })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationView {
    pub required_fields: Vec<&'static str>,
    pub countries: Vec<Choice>,
    pub titles: Vec<Choice>,
    pub default_rating: i32,
    pub entry_fee: &'static str,
}

pub fn build_registration() -> RegistrationView {
    RegistrationView {
        required_fields: vec!["first_name", "last_name", "email"],
        countries: choices(COUNTRIES),
        titles: choices(TITLES),
        default_rating: DEFAULT_RATING,
        entry_fee: "$125",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    pub required_fields: Vec<&'static str>,
    pub categories: Vec<Choice>,
    pub sending: bool,
}

pub fn build_contact(sending: bool) -> ContactView {
    ContactView {
        required_fields: vec!["name", "email", "subject", "message"],
        categories: choices(CONTACT_CATEGORIES),
        sending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_choices() {
        let view = build_registration();
        assert_eq!(view.default_rating, 1200);
        assert_eq!(view.titles.len(), 8);
        assert!(view.countries.iter().any(|c| c.value == "OTHER"));
    }

    #[test]
    fn test_contact_categories() {
        let view = build_contact(false);
        assert_eq!(view.categories[0].value, "registration");
        assert_eq!(view.categories.len(), 6);
    }
}

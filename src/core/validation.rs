//! Form validation shared by the data-access functions.
//!
//! Failures are [`Error::Validation`] with a message that can be shown
//! inline next to the field. Nothing here touches the store.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

fn re_email() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

// Brazilian phone numbers: optional area code in parentheses, 8 or 9 digits.
fn re_phone() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\(?\d{2}\)?\s?\d{4,5}-?\d{4}$").expect("phone pattern"))
}

/// True when `email` looks like `name@domain.tld`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    re_email().is_match(email)
}

/// True when `phone` looks like `(81) 99999-0000` or one of its variants.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    re_phone().is_match(phone)
}

/// Rejects malformed email addresses.
pub fn validate_email(email: &str) -> Result<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(Error::validation(format!("Invalid email: {email}")))
    }
}

/// Rejects malformed phone numbers.
pub fn validate_phone(phone: &str) -> Result<()> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(Error::validation(format!("Invalid phone: {phone}")))
    }
}

/// The end date may not come before the start date.
pub fn validate_dates(starts_on: NaiveDate, ends_on: NaiveDate) -> Result<()> {
    if ends_on < starts_on {
        return Err(Error::validation("End date must not be before start date"));
    }
    Ok(())
}

/// `value` must be strictly positive (and finite).
pub fn validate_positive(value: f64, field: &str) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::validation(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(())
}

/// `value` must not be blank.
pub fn validate_required(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Commission rates are percentages in (0, 100].
pub fn validate_rate(rate: f64) -> Result<()> {
    if !rate.is_finite() || rate <= 0.0 || rate > 100.0 {
        return Err(Error::validation("Rate must be between 0% and 100%"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[test]
    fn test_patterns_compile_and_match() {
        assert!(re_email().is_match("ana@olinda.example"));
        assert!(re_phone().is_match("(81) 99999-0000"));
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("ana@olinda.example"));
        assert!(!is_valid_email("ana@olinda"));
        assert!(!is_valid_email("ana olinda@x.com"));
        assert!(validate_email("nope").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(is_valid_phone("(81) 99999-0000"));
        assert!(is_valid_phone("8133334444"));
        assert!(!is_valid_phone("12-34"));
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_dates() {
        assert!(validate_dates(date(2025, 3, 10), date(2025, 3, 10)).is_ok());
        assert!(validate_dates(date(2025, 3, 10), date(2025, 3, 9)).is_err());
    }

    #[test]
    fn test_positive() {
        assert!(validate_positive(1.0, "Price").is_ok());
        assert!(validate_positive(0.0, "Price").is_err());
        assert!(validate_positive(-3.0, "Price").is_err());
        assert!(validate_positive(f64::NAN, "Price").is_err());
    }

    #[test]
    fn test_positive_message_names_field() {
        let Err(Error::Validation { message }) = validate_positive(0.0, "Price") else {
            panic!("expected a validation error");
        };
        assert_eq!(message, "Price must be greater than zero");
    }

    #[test]
    fn test_rate_bounds() {
        assert!(validate_rate(5.0).is_ok());
        assert!(validate_rate(100.0).is_ok());
        assert!(validate_rate(0.0).is_err());
        assert!(validate_rate(100.5).is_err());
    }

    #[test]
    fn test_required() {
        assert!(validate_required("Ana", "Name").is_ok());
        assert!(validate_required("   ", "Name").is_err());
    }
}

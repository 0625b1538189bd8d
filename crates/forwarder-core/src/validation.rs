//! Validation utilities.

use crate::{FieldError, ForwarderError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `ForwarderError` on failure.
    fn validate_entity(&self) -> Result<(), ForwarderError> {
        self.validate().map_err(validation_errors_to_forwarder_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `ForwarderError`.
#[must_use]
pub fn validation_errors_to_forwarder_error(errors: ValidationErrors) -> ForwarderError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    ForwarderError::Validation(message)
}

/// Domain validation rules used by entity `#[validate(custom(...))]` attributes.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    fn upper_alpha(value: &str, len: usize, code: &'static str) -> Result<(), ValidationError> {
        if value.len() == len && value.chars().all(|c| c.is_ascii_uppercase()) {
            Ok(())
        } else {
            Err(ValidationError::new(code))
        }
    }

    /// ISO 4217 currency code, e.g. `USD`.
    pub fn currency_code(value: &str) -> Result<(), ValidationError> {
        upper_alpha(value, 3, "currency_code")
    }

    /// IATA location code, e.g. `HKG`.
    pub fn iata_code(value: &str) -> Result<(), ValidationError> {
        upper_alpha(value, 3, "iata_code")
    }

    /// ISO 3166-1 alpha-2 country code, e.g. `DE`.
    pub fn country_code(value: &str) -> Result<(), ValidationError> {
        upper_alpha(value, 2, "country_code")
    }

    /// Air waybill number in `PPP-SSSSSSSC` form.
    ///
    /// `PPP` is the airline prefix, `SSSSSSS` the serial and `C` the check
    /// digit, which must equal the serial modulo 7.
    pub fn awb_number(value: &str) -> Result<(), ValidationError> {
        let invalid = || Err(ValidationError::new("awb_number"));

        let Some((prefix, serial)) = value.split_once('-') else {
            return invalid();
        };
        if prefix.len() != 3 || serial.len() != 8 {
            return invalid();
        }
        if !prefix.chars().chain(serial.chars()).all(|c| c.is_ascii_digit()) {
            return invalid();
        }

        let (body, check) = serial.split_at(7);
        let body: u32 = body.parse().map_err(|_| ValidationError::new("awb_number"))?;
        let check: u32 = check.parse().map_err(|_| ValidationError::new("awb_number"))?;
        if body % 7 != check {
            return invalid();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules;
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(custom(function = "rules::currency_code"))]
        currency: String,
        #[validate(length(min = 1, max = 8))]
        code: String,
    }

    #[test]
    fn test_currency_code() {
        assert!(rules::currency_code("USD").is_ok());
        assert!(rules::currency_code("usd").is_err());
        assert!(rules::currency_code("USDT").is_err());
    }

    #[test]
    fn test_iata_and_country() {
        assert!(rules::iata_code("FRA").is_ok());
        assert!(rules::iata_code("FR").is_err());
        assert!(rules::country_code("DE").is_ok());
        assert!(rules::country_code("DEU").is_err());
    }

    #[test]
    fn test_awb_number_check_digit() {
        // 1234567 % 7 == 5
        assert!(rules::awb_number("176-12345675").is_ok());
        assert!(rules::awb_number("176-12345676").is_err());
        assert!(rules::awb_number("17612345675").is_err());
        assert!(rules::awb_number("176-1234567X").is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(rules::not_blank("x").is_ok());
        assert!(rules::not_blank("   ").is_err());
    }

    #[test]
    fn test_validate_entity_collects_fields() {
        let sample = Sample {
            currency: "eur".to_string(),
            code: String::new(),
        };
        let err = sample.validate_entity().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("code"));
        assert!(message.contains("currency"));
    }
}

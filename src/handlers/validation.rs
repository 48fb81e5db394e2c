// src/handlers/validation.rs

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::{ApiError, AppError},
    common::i18n::I18nStore,
    middleware::i18n::Locale,
};

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0);
        err.message = Some("validation.out_of_range".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_percent(val: &Decimal) -> Result<(), ValidationError> {
    validate_not_negative(val)?;
    if *val > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &100);
        err.message = Some("validation.out_of_range".into());
        return Err(err);
    }
    Ok(())
}

/// Erro de um único campo, no mesmo formato do `validate()`.
pub fn field_error(field: &'static str, code: &'static str, message: &'static str) -> ValidationErrors {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    errors
}

pub fn reject(errors: ValidationErrors, locale: &Locale, store: &I18nStore) -> ApiError {
    AppError::ValidationError(errors).to_api_error(locale, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    #[test]
    fn negative_values_are_rejected() {
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&Decimal::from(-1)).is_err());
    }

    #[test]
    fn percent_is_bounded() {
        assert!(validate_percent(&Decimal::from_f64(12.5).unwrap()).is_ok());
        assert!(validate_percent(&Decimal::from(101)).is_err());
    }

    #[test]
    fn field_error_keeps_field_name() {
        let errors = field_error("baseUnitMultiplier", "required", "validation.required");
        assert!(errors.field_errors().contains_key("baseUnitMultiplier"));
    }
}

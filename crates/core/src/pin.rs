//! Caretaker credential rules.

use crate::error::CoreError;

pub const MIN_PIN_LENGTH: usize = 6;
pub const MAX_PIN_LENGTH: usize = 10;

/// Login id length; login ids are typed on a keypad next to the PIN.
pub const LOGIN_ID_LENGTH: usize = 2;

/// Reserved for the family-wide system login.
pub const SYSTEM_LOGIN_ID: &str = "00";

/// A PIN must be 6 to 10 ASCII digits.
pub fn validate_pin(pin: &str) -> Result<(), CoreError> {
    if !(MIN_PIN_LENGTH..=MAX_PIN_LENGTH).contains(&pin.len()) {
        return Err(CoreError::Validation(format!(
            "PIN must be between {MIN_PIN_LENGTH} and {MAX_PIN_LENGTH} digits"
        )));
    }
    if !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::Validation("PIN must contain only digits".into()));
    }
    Ok(())
}

/// A login id is exactly two digits and not the system id.
pub fn validate_login_id(login_id: &str) -> Result<(), CoreError> {
    if login_id.len() != LOGIN_ID_LENGTH || !login_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::Validation(
            "Login ID must be exactly 2 digits".into(),
        ));
    }
    if login_id == SYSTEM_LOGIN_ID {
        return Err(CoreError::Validation(format!(
            "Login ID '{SYSTEM_LOGIN_ID}' is reserved"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_length_bounds() {
        assert!(validate_pin("12345").is_err());
        assert!(validate_pin("123456").is_ok());
        assert!(validate_pin("1234567890").is_ok());
        assert!(validate_pin("12345678901").is_err());
    }

    #[test]
    fn pin_digits_only() {
        assert!(validate_pin("12a456").is_err());
        assert!(validate_pin("123 456").is_err());
    }

    #[test]
    fn login_id_rules() {
        assert!(validate_login_id("01").is_ok());
        assert!(validate_login_id("99").is_ok());
        assert!(validate_login_id("00").is_err());
        assert!(validate_login_id("1").is_err());
        assert!(validate_login_id("123").is_err());
        assert!(validate_login_id("a1").is_err());
    }
}

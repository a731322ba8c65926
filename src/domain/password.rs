use validator::ValidationError;
use zxcvbn::zxcvbn;

const MIN_LENGTH: usize = 8;
const MAX_LENGTH: usize = 128;
const MIN_STRENGTH_SCORE: u8 = 3;
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:'\",.<>/?\\|`~";

fn policy_error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Length, character classes, then a zxcvbn estimate.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();
    if length < MIN_LENGTH {
        return Err(policy_error("password_length", format!("Must be at least {MIN_LENGTH} characters")));
    }
    if length > MAX_LENGTH {
        return Err(policy_error("password_length", format!("Must be at most {MAX_LENGTH} characters")));
    }

    let has_upper = password.chars().any(char::is_uppercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| SYMBOLS.contains(c));

    if !(has_upper && has_digit && has_symbol) {
        return Err(policy_error(
            "password_complexity",
            "Must include uppercase, number, and symbol".to_string(),
        ));
    }

    let estimate = zxcvbn(password, &[]);
    if (estimate.score() as u8) < MIN_STRENGTH_SCORE {
        let feedback = estimate
            .feedback()
            .and_then(|f| f.warning().map(|w| w.to_string()))
            .unwrap_or_else(|| "Password is too weak".to_string());
        return Err(policy_error("password_strength", feedback));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_fails_length() {
        let err = validate_password_strength("Ab1!").unwrap_err();
        assert_eq!(err.code, "password_length");
    }

    #[test]
    fn missing_symbol_fails_complexity() {
        let err = validate_password_strength("Password1234").unwrap_err();
        assert_eq!(err.code, "password_complexity");
    }

    #[test]
    fn common_pattern_fails_strength() {
        let err = validate_password_strength("Password1!").unwrap_err();
        assert_eq!(err.code, "password_strength");
    }

    #[test]
    fn strong_password_passes() {
        assert!(validate_password_strength("Tr0ub4dor&3-horse-Battery").is_ok());
    }
}

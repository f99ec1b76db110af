//! Client-side form checks. A failing check blocks submission; no request is sent.

use crate::core::SmError;

pub const PHONE_DIGITS: usize = 10;
pub const OTP_DIGITS: usize = 6;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Strips spaces, dashes and a leading `+91`, then requires exactly ten digits.
///
/// # Errors
/// Returns [`SmError::Validation`] for anything else.
pub fn normalize_phone(raw: &str) -> Result<String, SmError> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    let digits = compact.strip_prefix("+91").unwrap_or(&compact);
    if digits.len() != PHONE_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(SmError::validation(
            "phone",
            "Please enter a valid 10-digit mobile number.",
        ));
    }
    Ok(digits.to_string())
}

/// # Errors
/// Returns [`SmError::Validation`] unless `raw` is exactly six digits.
pub fn validate_otp(raw: &str) -> Result<String, SmError> {
    let otp = raw.trim();
    if otp.len() != OTP_DIGITS || !otp.chars().all(|c| c.is_ascii_digit()) {
        return Err(SmError::validation("otp", "Please enter the 6-digit OTP."));
    }
    Ok(otp.to_string())
}

/// One `@`, a non-empty local part, a dotted domain, no whitespace.
///
/// # Errors
/// Returns [`SmError::Validation`] for anything that does not look like an address.
pub fn validate_email(raw: &str) -> Result<String, SmError> {
    let email = raw.trim();
    let invalid = || SmError::validation("email", "Please enter a valid email address.");
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok = !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok {
        return Err(invalid());
    }
    Ok(email.to_string())
}

/// # Errors
/// Returns [`SmError::Validation`] for passwords shorter than eight characters.
pub fn validate_password(raw: &str) -> Result<(), SmError> {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        return Err(SmError::validation(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters."),
        ));
    }
    Ok(())
}

/// # Errors
/// Returns [`SmError::Validation`] for a blank name.
pub fn validate_name(raw: &str) -> Result<String, SmError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(SmError::validation("name", "Please enter your name."));
    }
    Ok(name.to_string())
}

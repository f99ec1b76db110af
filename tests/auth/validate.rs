use sm_terminal::auth::validate::{
    normalize_phone, validate_email, validate_name, validate_otp, validate_password,
};
use sm_terminal::{ErrorKind, SmError};

#[test]
fn phone_numbers_are_normalized_to_ten_digits() {
    assert_eq!(normalize_phone("98765 43210").unwrap(), "9876543210");
    assert_eq!(normalize_phone("+91-98765-43210").unwrap(), "9876543210");
    assert!(normalize_phone("987654321").is_err());
    assert!(normalize_phone("98765432101").is_err());
    assert!(normalize_phone("98765abcde").is_err());
}

#[test]
fn otp_must_be_six_digits() {
    assert_eq!(validate_otp(" 123456 ").unwrap(), "123456");
    assert!(validate_otp("12345").is_err());
    assert!(validate_otp("12345a").is_err());
}

#[test]
fn email_password_and_name_rules() {
    assert_eq!(validate_email(" a.b@example.in ").unwrap(), "a.b@example.in");
    for bad in ["", "plain", "@example.com", "a@", "a@host", "a@host.", "a b@x.io", "a@b@c.io"] {
        assert!(validate_email(bad).is_err(), "accepted {bad:?}");
    }

    assert!(validate_password("12345678").is_ok());
    let err = validate_password("short").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.user_message(), "Password must be at least 8 characters.");

    assert_eq!(validate_name("  Asha  ").unwrap(), "Asha");
    assert!(matches!(
        validate_name("   "),
        Err(SmError::Validation { field: "name", .. })
    ));
}

//! OTP/password authentication endpoints and the login state machine.
//!
//! Every operation validates its input first; invalid input never reaches the network.

mod api;
mod flow;
pub mod validate;
mod wire;

pub use flow::{LoginFlow, LoginStep, ProfileForm};
pub use wire::AuthResponse;

use crate::core::{SmClient, SmError};
use wire::{EmailPayload, LoginPayload, PhonePayload, SetPasswordPayload, VerifyOtpPayload};

/// Requests a login OTP for `phone` (`POST send-otp-login`).
///
/// # Errors
/// [`SmError::Validation`] for a malformed number, [`SmError::Backend`] when the backend refuses.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(client), err))]
pub async fn send_otp_login(client: &SmClient, phone: &str) -> Result<AuthResponse, SmError> {
    let phone = validate::normalize_phone(phone)?;
    api::call(client, "send-otp-login", &PhonePayload { phone: &phone }).await
}

/// Requests another OTP for `phone` (`POST resend-otp`).
///
/// # Errors
/// Same as [`send_otp_login`].
#[cfg_attr(feature = "tracing", tracing::instrument(skip(client), err))]
pub async fn resend_otp(client: &SmClient, phone: &str) -> Result<AuthResponse, SmError> {
    let phone = validate::normalize_phone(phone)?;
    api::call(client, "resend-otp", &PhonePayload { phone: &phone }).await
}

/// Verifies `otp` for `phone` (`POST verify-otp`); an issued token is stored in the session.
///
/// # Errors
/// [`SmError::Validation`] for malformed input, [`SmError::Backend`] for a wrong/expired OTP.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(client, otp), err))]
pub async fn verify_otp(client: &SmClient, phone: &str, otp: &str) -> Result<AuthResponse, SmError> {
    let phone = validate::normalize_phone(phone)?;
    let otp = validate::validate_otp(otp)?;
    let resp = api::call(
        client,
        "verify-otp",
        &VerifyOtpPayload {
            phone: &phone,
            otp: &otp,
        },
    )
    .await?;
    api::keep_token(client, &resp)?;
    Ok(resp)
}

/// Email/password login (`POST login`); the issued token is stored in the session.
///
/// # Errors
/// [`SmError::Validation`] for malformed input, [`SmError::Backend`] for rejected credentials.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(client, password), err))]
pub async fn login(client: &SmClient, email: &str, password: &str) -> Result<AuthResponse, SmError> {
    let email = validate::validate_email(email)?;
    validate::validate_password(password)?;
    let resp = api::call(
        client,
        "login",
        &LoginPayload {
            email: &email,
            password,
        },
    )
    .await?;
    api::keep_token(client, &resp)?;
    Ok(resp)
}

/// Starts a password reset for `email` (`POST reset-password`).
///
/// # Errors
/// [`SmError::Validation`] for a malformed address, [`SmError::Backend`] when refused.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(client), err))]
pub async fn reset_password(client: &SmClient, email: &str) -> Result<AuthResponse, SmError> {
    let email = validate::validate_email(email)?;
    api::call(client, "reset-password", &EmailPayload { email: &email }).await
}

/// Sets the account password, optionally completing the profile (`POST set-password`).
/// Sent with the current bearer token; a token in the answer replaces it.
///
/// # Errors
/// [`SmError::Validation`] for malformed input, [`SmError::Backend`] when refused.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(client, form), err))]
pub async fn set_password(
    client: &SmClient,
    phone: Option<&str>,
    form: &ProfileForm,
) -> Result<AuthResponse, SmError> {
    let checked = form.validated()?;
    let phone = phone.map(validate::normalize_phone).transpose()?;
    let resp = api::call(
        client,
        "set-password",
        &SetPasswordPayload {
            phone: phone.as_deref(),
            name: checked.name.as_deref(),
            email: checked.email.as_deref(),
            password: &form.password,
        },
    )
    .await?;
    api::keep_token(client, &resp)?;
    Ok(resp)
}

/// Drops the local credential. Returns whether this call logged the session out.
pub fn logout(client: &SmClient) -> bool {
    client.session().invalidate()
}

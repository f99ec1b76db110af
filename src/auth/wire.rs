use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Common answer of every auth endpoint: `{ status, token?, message? }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub(crate) status: Option<Value>,
    /// Bearer token issued on successful verification/login.
    #[serde(default, alias = "accessToken", alias = "access_token")]
    pub token: Option<String>,
    /// Human-readable outcome supplied by the backend.
    #[serde(default, alias = "error")]
    pub message: Option<String>,
    /// Set by `verify-otp`: whether the account still needs a profile.
    #[serde(default, alias = "isNewUser", alias = "new_user")]
    pub is_new_user: Option<bool>,
}

impl AuthResponse {
    /// `status` is `"success"` (any case), `"ok"`, or `true`.
    pub fn is_success(&self) -> bool {
        match &self.status {
            Some(Value::String(s)) => {
                let s = s.trim();
                s.eq_ignore_ascii_case("success") || s.eq_ignore_ascii_case("ok")
            }
            Some(Value::Bool(b)) => *b,
            _ => false,
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().and_then(Value::as_str)
    }
}

#[derive(Serialize)]
pub(crate) struct PhonePayload<'a> {
    pub(crate) phone: &'a str,
}

#[derive(Serialize)]
pub(crate) struct VerifyOtpPayload<'a> {
    pub(crate) phone: &'a str,
    pub(crate) otp: &'a str,
}

#[derive(Serialize)]
pub(crate) struct LoginPayload<'a> {
    pub(crate) email: &'a str,
    pub(crate) password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct EmailPayload<'a> {
    pub(crate) email: &'a str,
}

#[derive(Serialize)]
pub(crate) struct SetPasswordPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<&'a str>,
    pub(crate) password: &'a str,
}

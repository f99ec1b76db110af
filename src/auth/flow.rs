use crate::auth::{self, validate};
use crate::core::{SmClient, SmError};

/// Steps of the phone/OTP signup and login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginStep {
    PhoneInput,
    OtpVerify,
    ProfileSetup,
    Success,
}

/// Profile details collected after the first OTP verification.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub(crate) struct CheckedProfile {
    pub(crate) name: Option<String>,
    pub(crate) email: Option<String>,
}

impl ProfileForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// A form that only changes the password.
    pub fn password_only(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            ..Self::default()
        }
    }

    /// Blank name/email are omitted; anything present must be valid.
    pub(crate) fn validated(&self) -> Result<CheckedProfile, SmError> {
        validate::validate_password(&self.password)?;
        let name = (!self.name.trim().is_empty())
            .then(|| validate::validate_name(&self.name))
            .transpose()?;
        let email = (!self.email.trim().is_empty())
            .then(|| validate::validate_email(&self.email))
            .transpose()?;
        Ok(CheckedProfile { name, email })
    }

    /// Name and email are mandatory.
    pub(crate) fn validated_complete(&self) -> Result<CheckedProfile, SmError> {
        validate::validate_name(&self.name)?;
        validate::validate_email(&self.email)?;
        self.validated()
    }
}

/// Drives `PhoneInput -> OtpVerify -> ProfileSetup -> Success`.
///
/// Each step advances only on a successful backend answer. On failure the step stays put and
/// [`error`](Self::error) holds the inline message to show.
#[derive(Debug, Clone)]
pub struct LoginFlow {
    client: SmClient,
    step: LoginStep,
    phone: Option<String>,
    error: Option<String>,
    notice: Option<String>,
}

impl LoginFlow {
    pub fn new(client: &SmClient) -> Self {
        Self {
            client: client.clone(),
            step: LoginStep::PhoneInput,
            phone: None,
            error: None,
            notice: None,
        }
    }

    pub fn step(&self) -> LoginStep {
        self.step
    }

    /// The normalized phone number the OTP was sent to.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Inline error from the last failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Informational message from the last successful submission.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn expect_step(&self, wanted: LoginStep) -> Result<(), SmError> {
        if self.step == wanted {
            Ok(())
        } else {
            Err(SmError::validation(
                "step",
                format!("expected step {wanted:?}, flow is at {:?}", self.step),
            ))
        }
    }

    fn record<T>(&mut self, res: Result<T, SmError>) -> Result<T, SmError> {
        match &res {
            Ok(_) => self.error = None,
            Err(e) => {
                self.error = Some(e.user_message());
                self.notice = None;
            }
        }
        res
    }

    /// `PhoneInput -> OtpVerify` once the OTP was sent.
    ///
    /// # Errors
    /// Validation or backend failure; the step does not change.
    pub async fn submit_phone(&mut self, phone: &str) -> Result<LoginStep, SmError> {
        let res = self.try_submit_phone(phone).await;
        self.record(res)
    }

    async fn try_submit_phone(&mut self, phone: &str) -> Result<LoginStep, SmError> {
        self.expect_step(LoginStep::PhoneInput)?;
        let phone = validate::normalize_phone(phone)?;
        let resp = auth::send_otp_login(&self.client, &phone).await?;
        self.notice = resp.message;
        self.phone = Some(phone);
        self.step = LoginStep::OtpVerify;
        Ok(self.step)
    }

    /// Sends a fresh OTP while at `OtpVerify`; the step does not change.
    ///
    /// # Errors
    /// Validation or backend failure.
    pub async fn resend_otp(&mut self) -> Result<(), SmError> {
        let res = self.try_resend().await;
        self.record(res)
    }

    async fn try_resend(&mut self) -> Result<(), SmError> {
        self.expect_step(LoginStep::OtpVerify)?;
        let phone = self
            .phone
            .clone()
            .ok_or_else(|| SmError::validation("phone", "No phone number to resend to."))?;
        let resp = auth::resend_otp(&self.client, &phone).await?;
        self.notice = resp.message;
        Ok(())
    }

    /// `OtpVerify -> ProfileSetup`, or straight to `Success` for an existing account.
    ///
    /// # Errors
    /// Validation or backend failure; the step does not change.
    pub async fn submit_otp(&mut self, otp: &str) -> Result<LoginStep, SmError> {
        let res = self.try_submit_otp(otp).await;
        self.record(res)
    }

    async fn try_submit_otp(&mut self, otp: &str) -> Result<LoginStep, SmError> {
        self.expect_step(LoginStep::OtpVerify)?;
        let phone = self
            .phone
            .clone()
            .ok_or_else(|| SmError::validation("phone", "No phone number to verify."))?;
        let resp = auth::verify_otp(&self.client, &phone, otp).await?;
        self.notice = resp.message;
        self.step = if resp.is_new_user == Some(false) {
            LoginStep::Success
        } else {
            LoginStep::ProfileSetup
        };
        Ok(self.step)
    }

    /// `ProfileSetup -> Success` once the profile and password are saved.
    ///
    /// # Errors
    /// Validation or backend failure; the step does not change.
    pub async fn submit_profile(&mut self, form: &ProfileForm) -> Result<LoginStep, SmError> {
        let res = self.try_submit_profile(form).await;
        self.record(res)
    }

    async fn try_submit_profile(&mut self, form: &ProfileForm) -> Result<LoginStep, SmError> {
        self.expect_step(LoginStep::ProfileSetup)?;
        form.validated_complete()?;
        let resp = auth::set_password(&self.client, self.phone.as_deref(), form).await?;
        self.notice = resp.message;
        self.step = LoginStep::Success;
        Ok(self.step)
    }

    /// Returns from `OtpVerify` to `PhoneInput` to change the number.
    pub fn change_phone(&mut self) {
        if self.step == LoginStep::OtpVerify {
            self.step = LoginStep::PhoneInput;
            self.phone = None;
            self.error = None;
            self.notice = None;
        }
    }
}

//! Public client surface + builder.
//! Defaults live in `constants`; the credential itself is held by [`Session`].

pub(crate) mod constants;

use crate::core::{Session, SmError, net};
use chrono_tz::Tz;
use constants::{DEFAULT_API_BASE, DEFAULT_DISPLAY_TZ, USER_AGENT};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Thin wrapper that holds a configured HTTP client, the API base and the session.
///
/// Clones share the same connection pool and the same [`Session`], so a 401 seen by any clone
/// logs every clone out.
#[derive(Debug, Clone)]
pub struct SmClient {
    http: Client,
    base_api: Url,
    session: Session,
    display_tz: Tz,
}

impl Default for SmClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl SmClient {
    /// Create a new builder.
    pub fn builder() -> SmClientBuilder {
        SmClientBuilder::default()
    }

    /// The session shared by this client and its clones.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Timezone used to interpret naive timestamps and to format them.
    pub fn display_tz(&self) -> Tz {
        self.display_tz
    }

    pub fn base_api(&self) -> &Url {
        &self.base_api
    }

    /* -------- internal helpers used by the endpoint modules -------- */

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, SmError> {
        Ok(self.base_api.join(path)?)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
            None => req,
        }
    }

    /// Bearer-authenticated GET returning the response body.
    ///
    /// A 401, or a 2xx whose payload says "unauthorized", invalidates the session and yields
    /// [`SmError::Unauthorized`]. No retry is attempted for any failure.
    pub(crate) async fn get_authed(&self, url: Url) -> Result<String, SmError> {
        let req = self
            .authorize(self.http.get(url.clone()))
            .header(ACCEPT, "application/json");
        let resp = req.send().await?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(self.unauthorized(&url));
        }
        if !status.is_success() {
            return Err(SmError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = net::get_text(resp).await?;
        if net::is_unauthorized_payload(&body) {
            return Err(self.unauthorized(&url));
        }
        Ok(body)
    }

    /// POST a JSON payload and return the status with the raw body.
    ///
    /// Auth endpoints answer business failures with 4xx + a JSON message, so the status is
    /// not turned into an error here.
    pub(crate) async fn post_json<P: Serialize + ?Sized>(
        &self,
        url: Url,
        payload: &P,
    ) -> Result<(u16, String), SmError> {
        let req = self
            .authorize(self.http.post(url))
            .header(ACCEPT, "application/json")
            .json(payload);
        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = net::get_text(resp).await?;
        Ok((status, body))
    }

    fn unauthorized(&self, url: &Url) -> SmError {
        let _first = self.session.invalidate();
        #[cfg(feature = "tracing")]
        tracing::warn!(url = %url, first = _first, "credential rejected; session invalidated");
        SmError::Unauthorized {
            url: url.to_string(),
        }
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct SmClientBuilder {
    user_agent: Option<String>,
    base_api: Option<Url>,
    token: Option<String>,
    session: Option<Session>,
    display_tz: Option<Tz>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl SmClientBuilder {
    /// Override the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the API base (e.g., `https://api.example.com/v1/`).
    /// A missing trailing slash is added so endpoint paths join underneath it.
    pub fn base_api(mut self, url: Url) -> Self {
        self.base_api = Some(url);
        self
    }

    /// Start with a memory-only session holding `token`.
    /// Ignored when [`session`](Self::session) is also set.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Use an existing (possibly persistent) session.
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Timezone for naive timestamps and display. Default: Asia/Kolkata.
    pub fn display_tz(mut self, tz: Tz) -> Self {
        self.display_tz = Some(tz);
        self
    }

    /// Set a global request timeout (overall). Default: none.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    pub fn build(self) -> Result<SmClient, SmError> {
        let mut base_api = match self.base_api {
            Some(u) => u,
            None => Url::parse(DEFAULT_API_BASE)?,
        };
        if !base_api.path().ends_with('/') {
            let path = format!("{}/", base_api.path());
            base_api.set_path(&path);
        }

        let mut httpb = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT));

        if let Some(t) = self.timeout {
            httpb = httpb.timeout(t);
        }
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        let http = httpb.build()?;

        let session = match (self.session, self.token) {
            (Some(s), _) => s,
            (None, Some(t)) => Session::with_token(t),
            (None, None) => Session::new(),
        };

        Ok(SmClient {
            http,
            base_api,
            session,
            display_tz: self.display_tz.unwrap_or(DEFAULT_DISPLAY_TZ),
        })
    }
}

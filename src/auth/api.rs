use serde::Serialize;

use crate::{
    auth::wire::AuthResponse,
    core::{SmClient, SmError},
};

/// POSTs `payload` to `{base}/{path}` and turns a non-success `status` into
/// [`SmError::Backend`] carrying the backend's message.
pub(super) async fn call<P: Serialize + ?Sized>(
    client: &SmClient,
    path: &str,
    payload: &P,
) -> Result<AuthResponse, SmError> {
    let url = client.endpoint(path)?;
    let (status, body) = client.post_json(url.clone(), payload).await?;

    let parsed: AuthResponse = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) if (200..300).contains(&status) => return Err(SmError::Json(e)),
        Err(_) => {
            return Err(SmError::Status {
                status,
                url: url.to_string(),
            });
        }
    };

    if parsed.is_success() {
        Ok(parsed)
    } else {
        Err(SmError::Backend {
            message: parsed.message.filter(|m| !m.trim().is_empty()),
        })
    }
}

/// Stores a token the backend handed out, if any.
pub(super) fn keep_token(client: &SmClient, resp: &AuthResponse) -> Result<(), SmError> {
    match resp.token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => client.session().set_token(token),
        _ => Ok(()),
    }
}

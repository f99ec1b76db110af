use serde_json::Value;

/// Read the response body as text.
pub(crate) async fn get_text(resp: reqwest::Response) -> Result<String, reqwest::Error> {
    resp.text().await
}

/// Detects the backend's "soft 401": a 2xx JSON body that still says the caller is unauthorized,
/// e.g. `{"status":"unauthorized"}`, `{"error":"Unauthorized"}` or `{"code":401}`.
pub(crate) fn is_unauthorized_payload(body: &str) -> bool {
    let trimmed = body.trim_start();
    if !trimmed.starts_with('{') {
        return false;
    }
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) else {
        return false;
    };

    let says_unauthorized = |key: &str| {
        map.get(key)
            .and_then(Value::as_str)
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("unauthorized"))
    };
    let code_401 = |key: &str| match map.get(key) {
        Some(Value::Number(n)) => n.as_u64() == Some(401),
        Some(Value::String(s)) => s.trim() == "401",
        _ => false,
    };

    says_unauthorized("status")
        || says_unauthorized("error")
        || says_unauthorized("message")
        || code_401("code")
        || code_401("statusCode")
}

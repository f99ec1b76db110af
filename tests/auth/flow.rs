use httpmock::Method::POST;
use serde_json::json;
use sm_terminal::{LoginFlow, LoginStep, ProfileForm, Session, SessionState};

use crate::common::{client_with_session, setup_server};

#[tokio::test]
async fn new_user_walks_through_every_step() {
    let server = setup_server();
    let send = server.mock(|when, then| {
        when.method(POST).path("/api/send-otp-login");
        then.status(200)
            .body(r#"{"status":"success","message":"OTP sent to your mobile"}"#);
    });
    let verify = server.mock(|when, then| {
        when.method(POST)
            .path("/api/verify-otp")
            .json_body(json!({ "phone": "9876543210", "otp": "123456" }));
        then.status(200)
            .body(r#"{"status":"success","token":"otp-token","isNewUser":true}"#);
    });
    let profile = server.mock(|when, then| {
        when.method(POST)
            .path("/api/set-password")
            .header("authorization", "Bearer otp-token")
            .json_body(json!({
                "phone": "9876543210",
                "name": "Asha",
                "email": "asha@example.in",
                "password": "longenough"
            }));
        then.status(200)
            .body(r#"{"status":"success","token":"full-token"}"#);
    });

    let session = Session::new();
    let client = client_with_session(&server, session.clone());
    let mut flow = LoginFlow::new(&client);
    assert_eq!(flow.step(), LoginStep::PhoneInput);

    assert_eq!(
        flow.submit_phone("98765 43210").await.unwrap(),
        LoginStep::OtpVerify
    );
    assert_eq!(flow.phone(), Some("9876543210"));
    assert_eq!(flow.notice(), Some("OTP sent to your mobile"));

    assert_eq!(
        flow.submit_otp("123456").await.unwrap(),
        LoginStep::ProfileSetup
    );
    assert_eq!(session.token().as_deref(), Some("otp-token"));

    let form = ProfileForm::new(" Asha ", "asha@example.in", "longenough");
    assert_eq!(
        flow.submit_profile(&form).await.unwrap(),
        LoginStep::Success
    );
    assert_eq!(session.token().as_deref(), Some("full-token"));
    assert_eq!(session.state(), SessionState::Active);

    send.assert();
    verify.assert();
    profile.assert();
}

#[tokio::test]
async fn existing_user_skips_profile_setup() {
    let server = setup_server();
    server.mock(|when, then| {
        when.method(POST).path("/api/send-otp-login");
        then.status(200).body(r#"{"status":"success"}"#);
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/verify-otp");
        then.status(200)
            .body(r#"{"status":"success","token":"jwt","is_new_user":false}"#);
    });

    let client = client_with_session(&server, Session::new());
    let mut flow = LoginFlow::new(&client);
    flow.submit_phone("9876543210").await.unwrap();
    assert_eq!(flow.submit_otp("654321").await.unwrap(), LoginStep::Success);
}

#[tokio::test]
async fn failures_keep_the_step_and_show_an_inline_error() {
    let server = setup_server();
    server.mock(|when, then| {
        when.method(POST).path("/api/send-otp-login");
        then.status(200).body(r#"{"status":"success"}"#);
    });
    let verify = server.mock(|when, then| {
        when.method(POST).path("/api/verify-otp");
        then.status(401)
            .body(r#"{"status":"error","message":"Incorrect OTP"}"#);
    });

    let client = client_with_session(&server, Session::new());
    let mut flow = LoginFlow::new(&client);

    // validation failure: no request, no step change
    assert!(flow.submit_phone("12").await.is_err());
    assert_eq!(flow.step(), LoginStep::PhoneInput);
    assert_eq!(
        flow.error(),
        Some("Please enter a valid 10-digit mobile number.")
    );

    flow.submit_phone("9876543210").await.unwrap();
    assert_eq!(flow.error(), None);

    assert!(flow.submit_otp("12").await.is_err());
    assert_eq!(flow.error(), Some("Please enter the 6-digit OTP."));
    verify.assert_hits(0);

    assert!(flow.submit_otp("111111").await.is_err());
    assert_eq!(flow.step(), LoginStep::OtpVerify);
    assert_eq!(flow.error(), Some("Incorrect OTP"));
    verify.assert_hits(1);
}

#[tokio::test]
async fn resend_and_change_number() {
    let server = setup_server();
    server.mock(|when, then| {
        when.method(POST).path("/api/send-otp-login");
        then.status(200).body(r#"{"status":"success"}"#);
    });
    let resend = server.mock(|when, then| {
        when.method(POST)
            .path("/api/resend-otp")
            .json_body(json!({ "phone": "9876543210" }));
        then.status(200)
            .body(r#"{"status":"success","message":"OTP resent"}"#);
    });

    let client = client_with_session(&server, Session::new());
    let mut flow = LoginFlow::new(&client);

    // nothing to resend yet
    assert!(flow.resend_otp().await.is_err());

    flow.submit_phone("9876543210").await.unwrap();
    flow.resend_otp().await.unwrap();
    assert_eq!(flow.step(), LoginStep::OtpVerify);
    assert_eq!(flow.notice(), Some("OTP resent"));
    resend.assert();

    flow.change_phone();
    assert_eq!(flow.step(), LoginStep::PhoneInput);
    assert_eq!(flow.phone(), None);
}

#[tokio::test]
async fn profile_requires_name_and_email() {
    let server = setup_server();
    server.mock(|when, then| {
        when.method(POST).path("/api/send-otp-login");
        then.status(200).body(r#"{"status":"success"}"#);
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/verify-otp");
        then.status(200).body(r#"{"status":"success","token":"t"}"#);
    });
    let set = server.mock(|when, then| {
        when.method(POST).path("/api/set-password");
        then.status(200).body(r#"{"status":"success"}"#);
    });

    let client = client_with_session(&server, Session::new());
    let mut flow = LoginFlow::new(&client);
    flow.submit_phone("9876543210").await.unwrap();
    assert_eq!(
        flow.submit_otp("123456").await.unwrap(),
        LoginStep::ProfileSetup
    );

    let missing_email = ProfileForm::new("Asha", "", "longenough");
    assert!(flow.submit_profile(&missing_email).await.is_err());
    assert_eq!(flow.step(), LoginStep::ProfileSetup);
    assert_eq!(flow.error(), Some("Please enter a valid email address."));

    let short_password = ProfileForm::new("Asha", "asha@example.in", "short");
    assert!(flow.submit_profile(&short_password).await.is_err());
    set.assert_hits(0);
}

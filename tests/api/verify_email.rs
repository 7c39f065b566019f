use crate::helpers::{
    get_confirmation_code, get_json_response_body, get_random_email,
    get_random_username, get_reset_code, register, TestApp,
};
use contacts_api::{
    domain::{FlowSessionStoreError, FlowToken},
    ErrorResponse,
};
use secrecy::Secret;
use test_context::test_context;

fn wrong_code(right: &str) -> String {
    right
        .chars()
        .map(|c| if c == '0' { '1' } else { '0' })
        .collect()
}

#[test_context(TestApp)]
#[tokio::test]
async fn correct_code_confirms_and_signs_in(app: &mut TestApp) {
    let username = get_random_username();
    let email = get_random_email();
    let token = register(app, &username, &email, "password123").await;
    let code = get_confirmation_code(app, &email).await;

    let response = app
        .post_verify(&serde_json::json!({
            "token": token,
            "code": code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    // Verification established a session, so an authenticated route works
    // without a separate login
    assert_eq!(app.get_contacts().await.status().as_u16(), 200);
}

#[test_context(TestApp)]
#[tokio::test]
async fn wrong_code_returns_401_and_the_right_code_still_works(
    app: &mut TestApp,
) {
    let username = get_random_username();
    let email = get_random_email();
    let token = register(app, &username, &email, "password123").await;
    let code = get_confirmation_code(app, &email).await;

    let response = app
        .post_verify(&serde_json::json!({
            "token": token,
            "code": wrong_code(&code)
        }))
        .await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(
        response
            .json::<ErrorResponse>()
            .await
            .expect("Could not deserialise response body to ErrorResponse")
            .error,
        "Code mismatch".to_owned()
    );

    // A failed attempt does not burn the stored code
    let response = app
        .post_verify(&serde_json::json!({
            "token": token,
            "code": code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[test_context(TestApp)]
#[tokio::test]
async fn unknown_token_returns_404(app: &mut TestApp) {
    let test_cases = [
        serde_json::json!({
            "token": uuid::Uuid::new_v4().to_string(),
            "code": "123456"
        }),
        serde_json::json!({
            "token": "not-a-token",
            "code": "123456"
        }),
        serde_json::json!({
            "code": "123456"
        }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_verify(test_case).await;
        assert_eq!(
            response.status().as_u16(),
            404,
            "Failed for input: {}",
            test_case
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn login_is_blocked_until_the_email_is_confirmed(app: &mut TestApp) {
    let username = get_random_username();
    let email = get_random_email();
    let token = register(app, &username, &email, "password123").await;

    let response = app
        .post_login(&serde_json::json!({
            "username": username,
            "password": "password123"
        }))
        .await;
    assert_eq!(
        response.status().as_u16(),
        403,
        "Unconfirmed account should not be able to log in"
    );

    let code = get_confirmation_code(app, &email).await;
    let response = app
        .post_verify(&serde_json::json!({
            "token": token,
            "code": code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .post_login(&serde_json::json!({
            "username": username,
            "password": "password123"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[test_context(TestApp)]
#[tokio::test]
async fn cookie_verification_discards_the_registration_session(
    app: &mut TestApp,
) {
    let username = get_random_username();
    let email = get_random_email();
    let pending_token = register(app, &username, &email, "password123").await;
    let code = get_confirmation_code(app, &email).await;

    // A password reset signs the account in while the email is still
    // unconfirmed
    let response = app
        .post_forgot_password(&serde_json::json!({ "email": email }))
        .await;
    let body = get_json_response_body(response).await;
    let reset_token = body.get("resetToken").unwrap().as_str().unwrap();
    let reset_code = get_reset_code(app, &email).await;
    let response = app
        .post_reset_password(&serde_json::json!({
            "token": reset_token,
            "code": reset_code,
            "newPassword": "password456",
            "newPasswordConfirmation": "password456"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    // Confirm using the cookie alone, no token submitted
    let response = app
        .post_verify(&serde_json::json!({ "code": code }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    // The session opened at registration is gone with it
    let pending_token =
        FlowToken::parse(Secret::new(pending_token)).unwrap();
    assert_eq!(
        app.verification_sessions
            .read()
            .await
            .get_user_id(&pending_token)
            .await,
        Err(FlowSessionStoreError::SessionNotFound)
    );
}

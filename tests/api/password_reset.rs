use crate::helpers::{
    get_confirmation_code, get_json_response_body, get_random_email,
    get_random_username, get_reset_code, register, verify_email, TestApp,
};
use test_context::test_context;

/// Register and confirm an account without logging in.
async fn confirmed_account(app: &mut TestApp) -> (String, String) {
    let username = get_random_username();
    let email = get_random_email();
    let token = register(app, &username, &email, "password123").await;
    let code = get_confirmation_code(app, &email).await;
    verify_email(app, &token, &code).await;
    (username, email)
}

async fn forgot_password(app: &mut TestApp, email: &str) -> (String, String) {
    let response = app
        .post_forgot_password(&serde_json::json!({ "email": email }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = get_json_response_body(response).await;
    let message = body.get("message").unwrap().as_str().unwrap().to_owned();
    let token = body.get("resetToken").unwrap().as_str().unwrap().to_owned();
    (message, token)
}

#[test_context(TestApp)]
#[tokio::test]
async fn unknown_email_gets_the_same_response_as_a_known_one(
    app: &mut TestApp,
) {
    let (_username, email) = confirmed_account(app).await;

    let (known_message, known_token) = forgot_password(app, &email).await;
    let (unknown_message, unknown_token) =
        forgot_password(app, &get_random_email()).await;

    assert_eq!(known_message, unknown_message);
    uuid::Uuid::try_parse(&known_token).expect("Token should be a UUID");
    uuid::Uuid::try_parse(&unknown_token).expect("Token should be a UUID");
}

#[test_context(TestApp)]
#[tokio::test]
async fn a_token_for_an_unknown_email_never_resolves(app: &mut TestApp) {
    let (_message, token) = forgot_password(app, &get_random_email()).await;

    let response = app
        .post_reset_password(&serde_json::json!({
            "token": token,
            "code": "123456",
            "newPassword": "newpassword1",
            "newPasswordConfirmation": "newpassword1"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn email_lookup_ignores_case(app: &mut TestApp) {
    let (_username, email) = confirmed_account(app).await;

    let (_message, _token) = forgot_password(app, &email.to_uppercase()).await;

    // A reset code was issued for the account registered in lowercase
    assert_eq!(get_reset_code(app, &email).await.len(), 6);
}

#[test_context(TestApp)]
#[tokio::test]
async fn wrong_code_fails_and_the_right_code_still_works(app: &mut TestApp) {
    let (username, email) = confirmed_account(app).await;
    let (_message, token) = forgot_password(app, &email).await;
    let code = get_reset_code(app, &email).await;
    let wrong: String = code
        .chars()
        .map(|c| if c == '0' { '1' } else { '0' })
        .collect();

    let response = app
        .post_reset_password(&serde_json::json!({
            "token": token,
            "code": wrong,
            "newPassword": "newpassword1",
            "newPasswordConfirmation": "newpassword1"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app
        .post_reset_password(&serde_json::json!({
            "token": token,
            "code": code,
            "newPassword": "newpassword1",
            "newPasswordConfirmation": "newpassword1"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    // Old password is dead, the new one works
    let response = app
        .post_login(&serde_json::json!({
            "username": username,
            "password": "password123"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app
        .post_login(&serde_json::json!({
            "username": username,
            "password": "newpassword1"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[test_context(TestApp)]
#[tokio::test]
async fn mismatched_password_fields_return_400(app: &mut TestApp) {
    let (_username, email) = confirmed_account(app).await;
    let (_message, token) = forgot_password(app, &email).await;
    let code = get_reset_code(app, &email).await;

    let response = app
        .post_reset_password(&serde_json::json!({
            "token": token,
            "code": code,
            "newPassword": "newpassword1",
            "newPasswordConfirmation": "newpassword2"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);

    // Nothing was consumed; the session and code both survive
    let response = app
        .post_reset_password(&serde_json::json!({
            "token": token,
            "code": code,
            "newPassword": "newpassword1",
            "newPasswordConfirmation": "newpassword1"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[test_context(TestApp)]
#[tokio::test]
async fn policy_violating_password_returns_400(app: &mut TestApp) {
    let (_username, email) = confirmed_account(app).await;
    let (_message, token) = forgot_password(app, &email).await;
    let code = get_reset_code(app, &email).await;

    let response = app
        .post_reset_password(&serde_json::json!({
            "token": token,
            "code": code,
            "newPassword": "short",
            "newPasswordConfirmation": "short"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
}

#[test_context(TestApp)]
#[tokio::test]
async fn a_reset_session_is_single_use(app: &mut TestApp) {
    let (_username, email) = confirmed_account(app).await;
    let (_message, token) = forgot_password(app, &email).await;
    let code = get_reset_code(app, &email).await;

    let body = serde_json::json!({
        "token": token,
        "code": code,
        "newPassword": "newpassword1",
        "newPasswordConfirmation": "newpassword1"
    });

    assert_eq!(app.post_reset_password(&body).await.status().as_u16(), 200);
    assert_eq!(
        app.post_reset_password(&body).await.status().as_u16(),
        404,
        "A spent reset session should not be reusable"
    );
}

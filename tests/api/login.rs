use crate::helpers::{
    get_confirmation_code, get_confirmed_session, get_random_email,
    get_random_username, register, verify_email, TestApp,
};
use contacts_api::ErrorResponse;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_422_if_malformed_input(app: &mut TestApp) {
    let test_cases = [
        serde_json::json!({
            "username": get_random_username()
        }),
        serde_json::json!({
            "password": "password123"
        }),
        serde_json::json!({
            "username": get_random_username(),
            "password": 12345678
        }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_login(test_case).await;
        assert_eq!(
            response.status().as_u16(),
            422,
            "Failed for input: {:?}",
            test_case
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable(
    app: &mut TestApp,
) {
    let (username, _email) = get_confirmed_session(app).await;

    let wrong_password = app
        .post_login(&serde_json::json!({
            "username": username,
            "password": "not-the-password"
        }))
        .await;
    let unknown_user = app
        .post_login(&serde_json::json!({
            "username": get_random_username(),
            "password": "password123"
        }))
        .await;

    assert_eq!(wrong_password.status().as_u16(), 401);
    assert_eq!(unknown_user.status().as_u16(), 401);

    let wrong_password_error = wrong_password
        .json::<ErrorResponse>()
        .await
        .expect("Could not deserialise response body to ErrorResponse")
        .error;
    let unknown_user_error = unknown_user
        .json::<ErrorResponse>()
        .await
        .expect("Could not deserialise response body to ErrorResponse")
        .error;
    assert_eq!(wrong_password_error, unknown_user_error);
}

#[test_context(TestApp)]
#[tokio::test]
async fn can_log_in_with_the_email_address(app: &mut TestApp) {
    let username = get_random_username();
    let email = get_random_email();
    let token = register(app, &username, &email, "password123").await;
    let code = get_confirmation_code(app, &email).await;
    verify_email(app, &token, &code).await;

    let response = app
        .post_login(&serde_json::json!({
            "username": email,
            "password": "password123"
        }))
        .await;
    assert_eq!(
        response.status().as_u16(),
        200,
        "The username field should also accept the account's email"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn successful_login_establishes_a_session(app: &mut TestApp) {
    get_confirmed_session(app).await;

    assert_eq!(app.get_contacts().await.status().as_u16(), 200);
    assert_eq!(app.get_users().await.status().as_u16(), 200);
}

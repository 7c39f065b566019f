use crate::helpers::{
    add_contact, get_confirmed_session, get_json_response_body,
    get_random_email, get_random_username, TestApp,
};
use contacts_api::domain::UserId;
use test_context::test_context;

async fn user_id_for(app: &mut TestApp, username: &str) -> String {
    let response = app.get_users().await;
    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;

    body.as_array()
        .expect("Expected a JSON array of users")
        .iter()
        .find(|u| u.get("username").unwrap().as_str() == Some(username))
        .unwrap_or_else(|| panic!("User {username} not in listing"))
        .get("id")
        .unwrap()
        .as_str()
        .unwrap()
        .to_owned()
}

#[test_context(TestApp)]
#[tokio::test]
async fn listing_requires_authentication(app: &mut TestApp) {
    assert_eq!(app.get_users().await.status().as_u16(), 400);
}

#[test_context(TestApp)]
#[tokio::test]
async fn listing_is_not_scoped_to_the_caller(app: &mut TestApp) {
    let (first, _email) = get_confirmed_session(app).await;
    let (second, _email) = get_confirmed_session(app).await;

    let response = app.get_users().await;
    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    let usernames: Vec<&str> = body
        .as_array()
        .expect("Expected a JSON array of users")
        .iter()
        .map(|u| u.get("username").unwrap().as_str().unwrap())
        .collect();

    // Every account is visible to any authenticated caller
    assert!(usernames.contains(&first.as_str()));
    assert!(usernames.contains(&second.as_str()));
}

#[test_context(TestApp)]
#[tokio::test]
async fn create_via_api_returns_the_user_representation(app: &mut TestApp) {
    let username = get_random_username();
    let email = get_random_email();

    let response = app
        .post_users(&serde_json::json!({
            "username": username,
            "email": email,
            "phone": "0123456789",
            "password": "password123"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let body = get_json_response_body(response).await;
    assert_eq!(body.get("username").unwrap().as_str(), Some(username.as_str()));
    assert_eq!(body.get("email").unwrap().as_str(), Some(email.as_str()));
    assert_eq!(body.get("phone").unwrap().as_str(), Some("0123456789"));
    assert_eq!(body.get("emailConfirmed").unwrap().as_bool(), Some(false));
    assert!(
        body.get("password").is_none() && body.get("passwordHash").is_none(),
        "Credentials must never be serialised"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn get_returns_404_for_an_unknown_id(app: &mut TestApp) {
    get_confirmed_session(app).await;

    let response = app.get_user(&uuid::Uuid::new_v4().to_string()).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn patch_updates_profile_fields(app: &mut TestApp) {
    let (username, _email) = get_confirmed_session(app).await;
    let user_id = user_id_for(app, &username).await;

    let new_username = get_random_username();
    let response = app
        .patch_user(
            &user_id,
            &serde_json::json!({
                "username": new_username,
                "phone": "0998877665"
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = get_json_response_body(app.get_user(&user_id).await).await;
    assert_eq!(
        body.get("username").unwrap().as_str(),
        Some(new_username.as_str())
    );
    assert_eq!(body.get("phone").unwrap().as_str(), Some("0998877665"));
}

#[test_context(TestApp)]
#[tokio::test]
async fn patch_rejects_invalid_fields(app: &mut TestApp) {
    let (username, _email) = get_confirmed_session(app).await;
    let user_id = user_id_for(app, &username).await;

    let test_cases = [
        serde_json::json!({ "username": "has spaces" }),
        serde_json::json!({ "email": "not-an-email" }),
        serde_json::json!({ "phone": "012345678901234567890" }),
    ];

    for test_case in test_cases.iter() {
        let response = app.patch_user(&user_id, test_case).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Failed for input: {}",
            test_case
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn deleting_a_user_removes_their_contacts(app: &mut TestApp) {
    let (owner, _email) = get_confirmed_session(app).await;
    add_contact(app, "John Doe", "john@example.com", "0123456789").await;
    add_contact(app, "Jane Roe", "jane@example.com", "0123456788").await;
    let owner_id = user_id_for(app, &owner).await;

    // A different authenticated account can delete any user: the original
    // interface has no ownership check here
    get_confirmed_session(app).await;
    let response = app.delete_user(&owner_id).await;
    assert_eq!(response.status().as_u16(), 204);

    assert_eq!(app.get_user(&owner_id).await.status().as_u16(), 404);

    let owner_id = UserId::parse(&owner_id).unwrap();
    let remaining = app
        .contact_store
        .read()
        .await
        .list_contacts(&owner_id, None)
        .await
        .unwrap();
    assert!(remaining.is_empty(), "Contacts should be deleted with the user");
}

use contacts_api::{
    app_state::{
        AppState, BannedTokenStoreType, ContactStoreType, FlowSessionStoreType,
        UserStoreType,
    },
    domain::Email,
    services::{
        data_stores::{
            HashmapContactStore, HashmapFlowSessionStore, HashmapUserStore,
            HashsetBannedTokenStore,
        },
        postmark_email_client::PostmarkEmailClient,
    },
    utils::constants::{test, POSTMARK_EMAIL_SENDER_ADDRESS},
    Application,
};
use reqwest::{cookie::Jar, Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::sync::Arc;
use test_context::AsyncTestContext;
use tokio::sync::RwLock;
use uuid::Uuid;
use wiremock::{
    matchers::method, matchers::path, Mock, MockServer, ResponseTemplate,
};

pub struct TestApp {
    pub address: String,
    pub banned_token_store: BannedTokenStoreType,
    pub contact_store: ContactStoreType,
    pub cookie_jar: Arc<Jar>,
    pub email_server: MockServer,
    pub http_client: reqwest::Client,
    pub reset_sessions: FlowSessionStoreType,
    pub user_store: UserStoreType,
    pub verification_sessions: FlowSessionStoreType,
}

impl TestApp {
    pub async fn new() -> Self {
        let user_store = Arc::new(RwLock::new(HashmapUserStore::default()));
        let contact_store =
            Arc::new(RwLock::new(HashmapContactStore::default()));
        let banned_token_store =
            Arc::new(RwLock::new(HashsetBannedTokenStore::default()));
        let verification_sessions =
            Arc::new(RwLock::new(HashmapFlowSessionStore::default()));
        let reset_sessions =
            Arc::new(RwLock::new(HashmapFlowSessionStore::default()));

        let email_server = MockServer::start().await;
        Mock::given(path("/email"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&email_server)
            .await;
        let email_client =
            Arc::new(configure_postmark_email_client(email_server.uri()));

        let app_state = AppState::new(
            user_store.clone(),
            contact_store.clone(),
            banned_token_store.clone(),
            verification_sessions.clone(),
            reset_sessions.clone(),
            email_client,
        );

        let app = Application::build(app_state, test::APP_ADDRESS)
            .await
            .expect("Failed to build app");
        let address = format!("http://{}", app.address.clone());

        #[allow(clippy::let_underscore_future)]
        let _ = tokio::spawn(app.run());

        let cookie_jar = Arc::new(Jar::default());
        let http_client = reqwest::Client::builder()
            .cookie_provider(cookie_jar.clone())
            .build()
            .unwrap();

        Self {
            address,
            banned_token_store,
            contact_store,
            cookie_jar,
            email_server,
            http_client,
            reset_sessions,
            user_store,
            verification_sessions,
        }
    }

    pub async fn post_register<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/users/register", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_verify<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/users/verify", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_forgot_password<Body>(
        &self,
        body: &Body,
    ) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/users/password/forgot", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_reset_password<Body>(
        &self,
        body: &Body,
    ) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/users/password/reset", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_login<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/login", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_logout(&self) -> reqwest::Response {
        self.http_client
            .post(format!("{}/logout", &self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_users(&self) -> reqwest::Response {
        self.http_client
            .get(format!("{}/users/api", &self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_users<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/users/api", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_user(&self, user_id: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}/users/api/{}", &self.address, user_id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch_user<Body>(
        &self,
        user_id: &str,
        body: &Body,
    ) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .patch(format!("{}/users/api/{}", &self.address, user_id))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_user(&self, user_id: &str) -> reqwest::Response {
        self.http_client
            .delete(format!("{}/users/api/{}", &self.address, user_id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_contacts(&self) -> reqwest::Response {
        self.http_client
            .get(format!("{}/contacts/api", &self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn search_contacts(&self, term: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}/contacts/api", &self.address))
            .query(&[("search", term)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_contacts<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/contacts/api", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_contact(&self, contact_id: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}/contacts/api/{}", &self.address, contact_id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_contact<Body>(
        &self,
        contact_id: &str,
        body: &Body,
    ) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .put(format!("{}/contacts/api/{}", &self.address, contact_id))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch_contact<Body>(
        &self,
        contact_id: &str,
        body: &Body,
    ) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .patch(format!("{}/contacts/api/{}", &self.address, contact_id))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_contact(&self, contact_id: &str) -> reqwest::Response {
        self.http_client
            .delete(format!("{}/contacts/api/{}", &self.address, contact_id))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

impl AsyncTestContext for TestApp {
    async fn setup() -> TestApp {
        TestApp::new().await
    }

    async fn teardown(self) {}
}

pub fn get_random_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}

pub fn get_random_username() -> String {
    format!("user-{}", Uuid::new_v4())
}

fn configure_postmark_email_client(base_url: String) -> PostmarkEmailClient {
    let postmark_auth_token = Secret::new("auth_token".to_owned());

    let sender =
        Email::parse(POSTMARK_EMAIL_SENDER_ADDRESS.to_owned()).unwrap();

    let http_client = Client::builder()
        .timeout(test::email_client::TIMEOUT)
        .build()
        .expect("Failed to build HTTP client");

    PostmarkEmailClient::new(base_url, sender, postmark_auth_token, http_client)
}

pub async fn get_json_response_body(response: Response) -> Value {
    let body: Value = response
        .json()
        .await
        .expect("failed to parse response body JSON");
    body
}

/// Register an account and return the pending verification token.
pub async fn register(
    app: &mut TestApp,
    username: &str,
    email: &str,
    password: &str,
) -> String {
    let response = app
        .post_register(&serde_json::json!({
            "username": username,
            "email": email,
            "password": password
        }))
        .await;
    assert_eq!(
        response.status().as_u16(),
        201,
        "Failed to register {username}"
    );

    let body = get_json_response_body(response).await;
    body.get("pendingVerificationToken")
        .expect("No pendingVerificationToken in response")
        .as_str()
        .unwrap()
        .to_owned()
}

/// Read the pending confirmation code straight out of the user store.
pub async fn get_confirmation_code(app: &mut TestApp, email: &str) -> String {
    let email = Email::parse(Secret::new(String::from(email)))
        .expect("Failed to parse email");

    let user = app
        .user_store
        .read()
        .await
        .get_user_by_email(&email)
        .await
        .expect("Failed to get user from store");

    user.email_confirmation
        .expect("No pending confirmation code")
        .code
        .as_ref()
        .expose_secret()
        .to_owned()
}

/// Read the pending password reset code straight out of the user store.
pub async fn get_reset_code(app: &mut TestApp, email: &str) -> String {
    let email = Email::parse(Secret::new(String::from(email)))
        .expect("Failed to parse email");

    let user = app
        .user_store
        .read()
        .await
        .get_user_by_email(&email)
        .await
        .expect("Failed to get user from store");

    user.password_reset
        .expect("No pending reset code")
        .code
        .as_ref()
        .expose_secret()
        .to_owned()
}

pub async fn verify_email(app: &mut TestApp, token: &str, code: &str) {
    assert_eq!(
        app.post_verify(&serde_json::json!({
            "token": token,
            "code": code
        }))
        .await
        .status()
        .as_u16(),
        200,
        "Failed to verify email"
    );
}

pub async fn login(app: &mut TestApp, username: &str, password: &str) {
    assert_eq!(
        app.post_login(&serde_json::json!({
            "username": username,
            "password": password
        }))
        .await
        .status()
        .as_u16(),
        200,
        "Failed to log in as {username}"
    );
}

/// Register, confirm and log in a fresh account; returns (username, email).
pub async fn get_confirmed_session(app: &mut TestApp) -> (String, String) {
    let username = get_random_username();
    let email = get_random_email();
    let password = "password123";

    let token = register(app, &username, &email, password).await;
    let code = get_confirmation_code(app, &email).await;
    verify_email(app, &token, &code).await;
    login(app, &username, password).await;

    (username, email)
}

/// Create a contact for the logged-in session and return its id.
pub async fn add_contact(
    app: &mut TestApp,
    name: &str,
    email: &str,
    phone: &str,
) -> String {
    let response = app
        .post_contacts(&serde_json::json!({
            "name": name,
            "email": email,
            "phone": phone
        }))
        .await;

    assert_eq!(
        response.status().as_u16(),
        201,
        "Failed to create contact {name}"
    );

    let body = get_json_response_body(response).await;
    body.get("id")
        .expect("No id in contact response")
        .as_str()
        .unwrap()
        .to_owned()
}

pub async fn logout(app: &mut TestApp) {
    assert_eq!(
        app.post_logout().await.status().as_u16(),
        200,
        "Failed to log out"
    );
}

use std::sync::Arc;

use contacts_api::{
    app_state::AppState,
    domain::Email,
    get_postgres_pool, get_redis_client,
    services::{
        data_stores::{
            PostgresContactStore, PostgresUserStore, RedisBannedTokenStore,
            RedisFlowSessionStore,
        },
        postmark_email_client::PostmarkEmailClient,
    },
    utils::{
        constants::{
            prod, DATABASE_URL, POSTMARK_AUTH_TOKEN,
            POSTMARK_EMAIL_SENDER_ADDRESS, REDIS_HOST_NAME,
        },
        tracing::init_tracing,
    },
    Application,
};
use reqwest::Client;
use sqlx::PgPool;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() {
    color_eyre::install().expect("Failed to install color_eyre");
    init_tracing().expect("Failed to initialise tracing");

    let pg_pool = configure_postgresql().await;
    let redis_conn = Arc::new(RwLock::new(configure_redis()));

    let user_store =
        Arc::new(RwLock::new(PostgresUserStore::new(pg_pool.clone())));
    let contact_store =
        Arc::new(RwLock::new(PostgresContactStore::new(pg_pool)));
    let banned_token_store = Arc::new(RwLock::new(RedisBannedTokenStore::new(
        redis_conn.clone(),
    )));
    let verification_sessions = Arc::new(RwLock::new(
        RedisFlowSessionStore::for_verification(redis_conn.clone()),
    ));
    let reset_sessions = Arc::new(RwLock::new(
        RedisFlowSessionStore::for_password_reset(redis_conn),
    ));
    let email_client = Arc::new(configure_postmark_email_client());

    let app_state = AppState::new(
        user_store,
        contact_store,
        banned_token_store,
        verification_sessions,
        reset_sessions,
        email_client,
    );

    let app = Application::build(app_state, prod::APP_ADDRESS)
        .await
        .expect("Failed to build app");

    app.run().await.expect("Failed to run app");
}

async fn configure_postgresql() -> PgPool {
    let pg_pool = get_postgres_pool(&DATABASE_URL)
        .await
        .expect("Failed to create Postgres connection pool!");

    sqlx::migrate!()
        .run(&pg_pool)
        .await
        .expect("Failed to run migrations");

    pg_pool
}

fn configure_redis() -> redis::Connection {
    get_redis_client(REDIS_HOST_NAME.to_owned())
        .expect("Failed to get Redis client")
        .get_connection()
        .expect("Failed to get Redis connection")
}

fn configure_postmark_email_client() -> PostmarkEmailClient {
    let http_client = Client::builder()
        .timeout(prod::email_client::TIMEOUT)
        .build()
        .expect("Failed to build HTTP client");

    PostmarkEmailClient::new(
        prod::email_client::BASE_URL.to_owned(),
        Email::parse(POSTMARK_EMAIL_SENDER_ADDRESS.clone())
            .expect("Invalid sender email address"),
        POSTMARK_AUTH_TOKEN.clone(),
        http_client,
    )
}

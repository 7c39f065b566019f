use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    serve::Serve,
    Json, Router,
};

use redis::{Client, RedisResult};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::error::Error;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Level;

use domain::{AuthAPIError, ContactAPIError};
pub mod routes;
use crate::utils::tracing::*;
use routes::{
    create_contact, create_user, delete_contact, delete_user, forgot_password,
    get_contact, get_user, list_contacts, list_users, login, logout, register,
    reset_password, update_contact, update_user, verify_email,
};
pub mod app_state;
pub mod domain;
pub mod services;
use app_state::AppState;
pub mod utils;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AuthAPIError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AuthAPIError::CodeMismatch => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::UNAUTHORIZED, "Code mismatch".to_string())
            }
            AuthAPIError::EmailNotConfirmed => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::FORBIDDEN, "Email not confirmed".to_string())
            }
            AuthAPIError::IncorrectCredentials => {
                log_error_chain(&self, Level::DEBUG);
                (
                    StatusCode::UNAUTHORIZED,
                    "Incorrect credentials".to_string(),
                )
            }
            AuthAPIError::InvalidToken => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
            AuthAPIError::MissingToken => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, "Missing token".to_string())
            }
            AuthAPIError::NoPendingVerification => {
                log_error_chain(&self, Level::DEBUG);
                (
                    StatusCode::NOT_FOUND,
                    "No pending email confirmation".to_string(),
                )
            }
            AuthAPIError::NoResetSession => {
                log_error_chain(&self, Level::DEBUG);
                (
                    StatusCode::NOT_FOUND,
                    "No active password reset session".to_string(),
                )
            }
            AuthAPIError::PasswordMismatch => {
                log_error_chain(&self, Level::DEBUG);
                (
                    StatusCode::BAD_REQUEST,
                    "Password fields do not match".to_string(),
                )
            }
            AuthAPIError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
            }
            AuthAPIError::UserAlreadyExists => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::CONFLICT, "User already exists".to_string())
            }
            AuthAPIError::UserNotFound => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::NOT_FOUND, "User not found".to_string())
            }
            AuthAPIError::ValidationError(message) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, format!("{message}"))
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
        });
        (status, body).into_response()
    }
}

impl IntoResponse for ContactAPIError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ContactAPIError::AuthenticationError(auth_error) => {
                log_error_chain(&self, Level::DEBUG);
                return auth_error_response(auth_error);
            }
            ContactAPIError::NotFound(id) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::NOT_FOUND, format!("Contact not found: {id}"))
            }
            ContactAPIError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
            }
            ContactAPIError::ValidationError(message) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, format!("{message}"))
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
        });
        (status, body).into_response()
    }
}

// Authentication failures keep their own status codes when they surface
// through the contacts API
fn auth_error_response(auth_error: &AuthAPIError) -> Response {
    let status = match auth_error {
        AuthAPIError::MissingToken => StatusCode::BAD_REQUEST,
        _ => StatusCode::UNAUTHORIZED,
    };
    let body = Json(ErrorResponse {
        error: format!("{auth_error}"),
    });
    (status, body).into_response()
}

fn log_error_chain(e: &(dyn Error + 'static), debug_level: Level) {
    let separator =
        "\n-----------------------------------------------------------------------------------\n";
    let mut report = format!("{}{:?}\n", separator, e);
    let mut current = e.source();
    while let Some(cause) = current {
        let str = format!("Caused by:\n\n{:?}", cause);
        report = format!("{}\n{}", report, str);
        current = cause.source();
    }
    report = format!("{}\n{}", report, separator);
    match debug_level {
        Level::ERROR => tracing::error!("{}", report),
        Level::WARN => tracing::warn!("{}", report),
        Level::INFO => tracing::info!("{}", report),
        Level::DEBUG => tracing::debug!("{}", report),
        Level::TRACE => tracing::trace!("{}", report),
    }
}

pub struct Application {
    server: Serve<Router, Router>,
    pub address: String,
}

impl Application {
    pub async fn build(
        app_state: AppState,
        address: &str,
    ) -> Result<Self, Box<dyn Error>> {
        let allowed_origins = [
            "http://localhost:3000".parse()?,
            "http://127.0.0.1:3000".parse()?,
        ];

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_credentials(true)
            .allow_origin(allowed_origins);

        let router = Router::new()
            .route("/login", post(login))
            .route("/logout", post(logout))
            .route("/users/register", post(register))
            .route("/users/verify", post(verify_email))
            .route("/users/password/forgot", post(forgot_password))
            .route("/users/password/reset", post(reset_password))
            .route("/users/api", get(list_users).post(create_user))
            .route(
                "/users/api/:id",
                get(get_user)
                    .put(update_user)
                    .patch(update_user)
                    .delete(delete_user),
            )
            .route("/contacts/api", get(list_contacts).post(create_contact))
            .route(
                "/contacts/api/:id",
                get(get_contact)
                    .put(update_contact)
                    .patch(update_contact)
                    .delete(delete_contact),
            )
            .with_state(app_state)
            .layer(cors)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            );

        let listener = tokio::net::TcpListener::bind(address).await?;
        let address = listener.local_addr()?.to_string();
        let server = axum::serve(listener, router);

        Ok(Application { server, address })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("listening on {}", &self.address);
        self.server.with_graceful_shutdown(shutdown_signal()).await
    }
}

#[allow(dead_code)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

pub async fn get_postgres_pool(
    url: &Secret<String>,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(url.expose_secret())
        .await
}

pub fn get_redis_client(redis_hostname: String) -> RedisResult<Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}

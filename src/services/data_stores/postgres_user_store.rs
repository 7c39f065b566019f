use chrono::{DateTime, Utc};
use color_eyre::eyre::{eyre, Result};
use secrecy::{ExposeSecret, Secret};
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::{
    Email, PendingCode, User, UserId, UserPasswordHash, UserStore,
    UserStoreError, Username, VerificationCode,
};

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_USER: &str = r#"
    SELECT id, username, email, phone, password_hash, email_confirmed,
           email_confirmation_code, email_confirmation_sent_at,
           password_reset_code, password_reset_requested_at
    FROM users
"#;

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError> {
        let (confirmation_code, confirmation_sent_at) =
            split_pending(&user.email_confirmation);
        let (reset_code, reset_requested_at) =
            split_pending(&user.password_reset);

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, phone, password_hash,
                               email_confirmed, email_confirmation_code,
                               email_confirmation_sent_at, password_reset_code,
                               password_reset_requested_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id.as_ref())
        .bind(user.username.as_ref())
        .bind(user.email.as_ref().expose_secret())
        .bind(&user.phone)
        .bind(user.hash.as_ref().expose_secret())
        .bind(user.email_confirmed)
        .bind(&confirmation_code)
        .bind(confirmation_sent_at)
        .bind(&reset_code)
        .bind(reset_requested_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                UserStoreError::UserAlreadyExists
            }
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        let query = format!("{} WHERE id = $1", SELECT_USER);
        let row = sqlx::query(&query)
            .bind(id.as_ref())
            .fetch_one(&self.pool)
            .await
            .map_err(map_fetch_error)?;
        map_user_row(&row)
    }

    #[tracing::instrument(
        name = "Retrieving user by username from PostgreSQL",
        skip_all
    )]
    async fn get_user_by_username(
        &self,
        username: &Username,
    ) -> Result<User, UserStoreError> {
        let query = format!("{} WHERE username = $1", SELECT_USER);
        let row = sqlx::query(&query)
            .bind(username.as_ref())
            .fetch_one(&self.pool)
            .await
            .map_err(map_fetch_error)?;
        map_user_row(&row)
    }

    #[tracing::instrument(
        name = "Retrieving user by email from PostgreSQL",
        skip_all
    )]
    async fn get_user_by_email(
        &self,
        email: &Email,
    ) -> Result<User, UserStoreError> {
        let query = format!("{} WHERE LOWER(email) = LOWER($1)", SELECT_USER);
        let row = sqlx::query(&query)
            .bind(email.as_ref().expose_secret())
            .fetch_one(&self.pool)
            .await
            .map_err(map_fetch_error)?;
        map_user_row(&row)
    }

    #[tracing::instrument(name = "Listing users from PostgreSQL", skip_all)]
    async fn list_users(&self) -> Result<Vec<User>, UserStoreError> {
        let query = format!("{} ORDER BY username", SELECT_USER);
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;

        rows.iter().map(map_user_row).collect()
    }

    #[tracing::instrument(name = "Updating user in PostgreSQL", skip_all)]
    async fn update_user(&mut self, user: User) -> Result<(), UserStoreError> {
        let (confirmation_code, confirmation_sent_at) =
            split_pending(&user.email_confirmation);
        let (reset_code, reset_requested_at) =
            split_pending(&user.password_reset);

        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, phone = $4, password_hash = $5,
                email_confirmed = $6, email_confirmation_code = $7,
                email_confirmation_sent_at = $8, password_reset_code = $9,
                password_reset_requested_at = $10
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_ref())
        .bind(user.username.as_ref())
        .bind(user.email.as_ref().expose_secret())
        .bind(&user.phone)
        .bind(user.hash.as_ref().expose_secret())
        .bind(user.email_confirmed)
        .bind(&confirmation_code)
        .bind(confirmation_sent_at)
        .bind(&reset_code)
        .bind(reset_requested_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                UserStoreError::UserAlreadyExists
            }
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Deleting user from PostgreSQL", skip_all)]
    async fn delete_user(
        &mut self,
        id: &UserId,
    ) -> Result<(), UserStoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }
}

fn split_pending(
    pending: &Option<PendingCode>,
) -> (Option<String>, Option<DateTime<Utc>>) {
    match pending {
        Some(p) => (
            Some(p.code.as_ref().expose_secret().to_owned()),
            Some(p.issued_at),
        ),
        None => (None, None),
    }
}

fn join_pending(
    code: Option<String>,
    issued_at: Option<DateTime<Utc>>,
) -> Result<Option<PendingCode>, UserStoreError> {
    match (code, issued_at) {
        (Some(code), Some(issued_at)) => Ok(Some(PendingCode {
            code: VerificationCode::parse(Secret::new(code))
                .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
            issued_at,
        })),
        (None, None) => Ok(None),
        // A stored code must always carry its issue time
        _ => Err(UserStoreError::UnexpectedError(eyre!(
            "code and timestamp columns out of sync"
        ))),
    }
}

fn map_fetch_error(e: sqlx::Error) -> UserStoreError {
    match e {
        sqlx::Error::RowNotFound => UserStoreError::UserNotFound,
        err => UserStoreError::UnexpectedError(eyre!(err)),
    }
}

fn map_user_row(row: &PgRow) -> Result<User, UserStoreError> {
    let unexpected = |e: sqlx::Error| UserStoreError::UnexpectedError(eyre!(e));

    Ok(User {
        id: UserId::new(row.try_get("id").map_err(unexpected)?),
        username: Username::parse(
            row.try_get::<String, _>("username")
                .map_err(unexpected)?
                .as_str(),
        )
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
        email: Email::parse(Secret::new(
            row.try_get("email").map_err(unexpected)?,
        ))
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
        phone: row.try_get("phone").map_err(unexpected)?,
        hash: UserPasswordHash::parse(Secret::new(
            row.try_get("password_hash").map_err(unexpected)?,
        ))
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
        email_confirmed: row
            .try_get("email_confirmed")
            .map_err(unexpected)?,
        email_confirmation: join_pending(
            row.try_get("email_confirmation_code").map_err(unexpected)?,
            row.try_get("email_confirmation_sent_at")
                .map_err(unexpected)?,
        )?,
        password_reset: join_pending(
            row.try_get("password_reset_code").map_err(unexpected)?,
            row.try_get("password_reset_requested_at")
                .map_err(unexpected)?,
        )?,
    })
}

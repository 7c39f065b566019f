use color_eyre::eyre::eyre;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::{
    Contact, ContactId, ContactName, ContactStore, ContactStoreError, UserId,
};

pub struct PostgresContactStore {
    pool: PgPool,
}

impl PostgresContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ContactStore for PostgresContactStore {
    #[tracing::instrument(name = "Adding contact to PostgreSQL", skip_all)]
    async fn add_contact(
        &mut self,
        contact: Contact,
    ) -> Result<(), ContactStoreError> {
        sqlx::query(
            r#"
            INSERT INTO contacts (id, user_id, name, email, phone, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(contact.id.as_ref())
        .bind(contact.user_id.as_ref())
        .bind(contact.name.as_ref())
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.address)
        .execute(&self.pool)
        .await
        .map_err(|e| ContactStoreError::UnexpectedError(eyre!(e)))?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving contact from PostgreSQL", skip_all)]
    async fn get_contact(
        &self,
        owner: &UserId,
        id: &ContactId,
    ) -> Result<Contact, ContactStoreError> {
        // Scoping by owner makes someone else's contact indistinguishable
        // from a missing one
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, email, phone, address
            FROM contacts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_ref())
        .bind(owner.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => ContactStoreError::ContactNotFound,
            err => ContactStoreError::UnexpectedError(eyre!(err)),
        })?;

        map_contact_row(&row)
    }

    #[tracing::instrument(name = "Listing contacts from PostgreSQL", skip_all)]
    async fn list_contacts(
        &self,
        owner: &UserId,
        search: Option<&str>,
    ) -> Result<Vec<Contact>, ContactStoreError> {
        let rows = match search {
            Some(term) => {
                let pattern = like_pattern(term);
                sqlx::query(
                    r#"
                    SELECT id, user_id, name, email, phone, address
                    FROM contacts
                    WHERE user_id = $1
                      AND (name ILIKE $2 OR email ILIKE $2 OR phone ILIKE $2)
                    ORDER BY name
                    "#,
                )
                .bind(owner.as_ref())
                .bind(pattern)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, user_id, name, email, phone, address
                    FROM contacts
                    WHERE user_id = $1
                    ORDER BY name
                    "#,
                )
                .bind(owner.as_ref())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| ContactStoreError::UnexpectedError(eyre!(e)))?;

        rows.iter().map(map_contact_row).collect()
    }

    #[tracing::instrument(name = "Updating contact in PostgreSQL", skip_all)]
    async fn update_contact(
        &mut self,
        owner: &UserId,
        contact: Contact,
    ) -> Result<(), ContactStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE contacts
            SET name = $3, email = $4, phone = $5, address = $6
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(contact.id.as_ref())
        .bind(owner.as_ref())
        .bind(contact.name.as_ref())
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.address)
        .execute(&self.pool)
        .await
        .map_err(|e| ContactStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(ContactStoreError::ContactNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Deleting contact from PostgreSQL", skip_all)]
    async fn delete_contact(
        &mut self,
        owner: &UserId,
        id: &ContactId,
    ) -> Result<(), ContactStoreError> {
        let result = sqlx::query(
            "DELETE FROM contacts WHERE id = $1 AND user_id = $2",
        )
        .bind(id.as_ref())
        .bind(owner.as_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| ContactStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(ContactStoreError::ContactNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(
        name = "Deleting all contacts for user from PostgreSQL",
        skip_all
    )]
    async fn delete_contacts_for_user(
        &mut self,
        owner: &UserId,
    ) -> Result<(), ContactStoreError> {
        sqlx::query("DELETE FROM contacts WHERE user_id = $1")
            .bind(owner.as_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| ContactStoreError::UnexpectedError(eyre!(e)))?;
        Ok(())
    }
}

// The search term is literal text; % and _ would otherwise act as
// ILIKE wildcards
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn map_contact_row(row: &PgRow) -> Result<Contact, ContactStoreError> {
    let unexpected =
        |e: sqlx::Error| ContactStoreError::UnexpectedError(eyre!(e));

    Ok(Contact {
        id: ContactId::new(row.try_get("id").map_err(unexpected)?),
        user_id: UserId::new(row.try_get("user_id").map_err(unexpected)?),
        name: ContactName::parse(
            row.try_get::<String, _>("name").map_err(unexpected)?.as_str(),
        )
        .map_err(|e| ContactStoreError::UnexpectedError(eyre!(e)))?,
        email: row.try_get("email").map_err(unexpected)?,
        phone: row.try_get("phone").map_err(unexpected)?,
        address: row.try_get("address").map_err(unexpected)?,
    })
}

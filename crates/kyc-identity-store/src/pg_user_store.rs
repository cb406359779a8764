//! `PostgreSQL` implementation of the `UserStore` trait.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use kyc_identity_core::error::DomainError;
use kyc_identity_core::repository::PersistenceStrategy;
use kyc_identity_users::domain::aggregates::{User, UserSnapshot};
use kyc_identity_users::domain::repository::UserStore;

use crate::schema::CREATE_USERS_TABLE;

const INSERT_USER: &str = r"
INSERT INTO users (id, name, email, password_hash, kyc_status, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)
RETURNING id, name, email, password_hash, kyc_status, created_at, updated_at
";

const UPDATE_USER: &str = r"
UPDATE users
SET name = $2, email = $3, password_hash = $4, kyc_status = $5, updated_at = $6
WHERE id = $1
RETURNING id, name, email, password_hash, kyc_status, created_at, updated_at
";

const SELECT_USER_BY_ID: &str = r"
SELECT id, name, email, password_hash, kyc_status, created_at, updated_at
FROM users WHERE id = $1
";

const SELECT_USER_BY_EMAIL: &str = r"
SELECT id, name, email, password_hash, kyc_status, created_at, updated_at
FROM users WHERE email = $1
";

/// PostgreSQL-backed user store.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Creates a new `PgUserStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `users` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the DDL fails.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::raw_sql(CREATE_USERS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

fn map_sqlx_error(err: sqlx::Error) -> DomainError {
    if matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation()) {
        return DomainError::Conflict("email already registered".into());
    }
    DomainError::Infrastructure(format!("database error: {err}"))
}

fn user_from_row(row: &PgRow) -> Result<User, DomainError> {
    let kyc_status: String = row.try_get("kyc_status").map_err(map_sqlx_error)?;
    Ok(User::rehydrate(UserSnapshot {
        id: Some(row.try_get("id").map_err(map_sqlx_error)?),
        name: row.try_get("name").map_err(map_sqlx_error)?,
        email: row.try_get("email").map_err(map_sqlx_error)?,
        password_hash: row.try_get("password_hash").map_err(map_sqlx_error)?,
        kyc_status: kyc_status
            .parse()
            .map_err(|e| DomainError::Infrastructure(format!("corrupt user row: {e}")))?,
        created_at: row.try_get("created_at").map_err(map_sqlx_error)?,
        updated_at: row.try_get("updated_at").map_err(map_sqlx_error)?,
    }))
}

#[async_trait]
impl PersistenceStrategy<User> for PgUserStore {
    async fn save_to_database(&self, user: &User) -> Result<User, DomainError> {
        let snapshot = user.snapshot();
        let row = match snapshot.id {
            None => {
                let id = Uuid::now_v7();
                debug!(user_id = %id, "inserting user");
                sqlx::query(INSERT_USER)
                    .bind(id)
                    .bind(&snapshot.name)
                    .bind(&snapshot.email)
                    .bind(&snapshot.password_hash)
                    .bind(snapshot.kyc_status.as_str())
                    .bind(snapshot.created_at)
                    .bind(snapshot.updated_at)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?
            }
            Some(id) => {
                debug!(user_id = %id, "updating user");
                sqlx::query(UPDATE_USER)
                    .bind(id)
                    .bind(&snapshot.name)
                    .bind(&snapshot.email)
                    .bind(&snapshot.password_hash)
                    .bind(snapshot.kyc_status.as_str())
                    .bind(snapshot.updated_at)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?
                    .ok_or_else(|| DomainError::AggregateNotFound(format!("user {id}")))?
            }
        };
        user_from_row(&row)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(SELECT_USER_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(SELECT_USER_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(user_from_row).transpose()
    }
}

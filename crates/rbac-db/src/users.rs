//! User repository
//!
//! PostgreSQL storage for users. Permissions are kept as a comma-joined
//! string, the role as its name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rbac_core::traits::Id;
use rbac_models::{PermissionSet, Role, User};
use sqlx::{FromRow, PgPool};

use crate::repository::{RepositoryError, RepositoryResult, UserStore};

const SELECT_COLUMNS: &str = "SELECT id, name, username, email, phone, website, role, \
     permissions, password_hash, created_at, updated_at FROM rbac_users";

/// User database row
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub role: String,
    pub permissions: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role).ok_or_else(|| {
            RepositoryError::Corrupt(format!("user {} has unknown role '{}'", row.id, row.role))
        })?;

        Ok(User {
            id: row.id,
            name: row.name,
            username: row.username,
            email: row.email,
            phone: row.phone,
            website: row.website,
            role,
            permissions: PermissionSet::from_comma_string(&row.permissions),
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Map unique-constraint violations on `username` to `Conflict`
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            RepositoryError::Conflict("Username already exists".to_string())
        }
        _ => RepositoryError::Database(err),
    }
}

/// User repository implementation
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the users table and its id sequence if they do not exist
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::query("CREATE SEQUENCE IF NOT EXISTS rbac_users_id_seq")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS rbac_users (
                id            BIGINT PRIMARY KEY,
                name          TEXT NOT NULL DEFAULT '',
                username      TEXT NOT NULL UNIQUE,
                email         TEXT NOT NULL DEFAULT '',
                phone         TEXT NOT NULL DEFAULT '',
                website       TEXT NOT NULL DEFAULT '',
                role          TEXT NOT NULL DEFAULT 'Staff',
                permissions   TEXT NOT NULL DEFAULT 'CanReadUser',
                password_hash TEXT NOT NULL,
                created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Ensured rbac_users schema");
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn next_id(&self) -> RepositoryResult<Id> {
        let id = sqlx::query_scalar::<_, i64>("SELECT nextval('rbac_users_id_seq')")
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn insert(&self, user: User) -> RepositoryResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO rbac_users
                (id, name, username, email, phone, website, role, permissions,
                 password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, name, username, email, phone, website, role, permissions,
                      password_hash, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.website)
        .bind(user.role.as_str())
        .bind(user.permissions.to_comma_string())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        tracing::debug!(user_id = row.id, "Inserted user");
        row.try_into()
    }

    async fn find(&self, id: Id) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE username = $1", SELECT_COLUMNS))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, user: &User) -> RepositoryResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE rbac_users
            SET name = $2, username = $3, email = $4, phone = $5, website = $6,
                role = $7, permissions = $8, password_hash = $9, updated_at = $10
            WHERE id = $1
            RETURNING id, name, username, email, phone, website, role, permissions,
                      password_hash, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.website)
        .bind(user.role.as_str())
        .bind(user.permissions.to_comma_string())
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| RepositoryError::NotFound(user.id.to_string()))?;

        tracing::debug!(user_id = row.id, "Updated user");
        row.try_into()
    }

    async fn delete(&self, id: Id) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM rbac_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rbac_users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

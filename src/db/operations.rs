use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use crate::config::DatabaseConfig;
use crate::db::models::{Account, Template, TemplateFields};
use crate::error::{AppError, DatabaseError};

const ACCOUNT_COLUMNS: &str = "email, first_name, last_name, password_hash";
const TEMPLATE_COLUMNS: &str = "id, template_name, subject, body, owner_email";

#[derive(Clone)]
pub struct DbOperations {
    pool: Arc<SqlitePool>,
}

impl DbOperations {
    /// Opens the pool described by `config` and makes sure the schema exists.
    ///
    /// An in-memory database exists per connection, so it is pinned to one
    /// connection that is never reaped.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(5));
        pool_options = if config.is_in_memory() {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(config.max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        let db = Self { pool: Arc::new(pool) };
        db.init_schema().await?;
        Ok(db)
    }

    pub async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                email TEXT PRIMARY KEY NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password_hash TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS templates (
                id BLOB PRIMARY KEY NOT NULL,
                template_name TEXT NOT NULL,
                subject TEXT NOT NULL,
                body TEXT NOT NULL,
                owner_email TEXT NOT NULL REFERENCES accounts(email)
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_templates_owner ON templates (owner_email)")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Inserts an account. A second insert for the same email fails with
    /// `DatabaseError::Duplicate` from the primary key.
    pub async fn create_account(&self, account: &Account) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "INSERT INTO accounts ({ACCOUNT_COLUMNS}) VALUES (?, ?, ?, ?) RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.password_hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(account)
    }

    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(account)
    }

    pub async fn create_template(&self, template: &Template) -> Result<Template, AppError> {
        let template = sqlx::query_as::<_, Template>(&format!(
            "INSERT INTO templates ({TEMPLATE_COLUMNS}) VALUES (?, ?, ?, ?, ?) RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(template.id)
        .bind(&template.template_name)
        .bind(&template.subject)
        .bind(&template.body)
        .bind(&template.owner_email)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(template)
    }

    /// All templates owned by `owner_email`, oldest first.
    pub async fn list_templates_by_owner(&self, owner_email: &str) -> Result<Vec<Template>, AppError> {
        let templates = sqlx::query_as::<_, Template>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM templates WHERE owner_email = ? ORDER BY rowid"
        ))
        .bind(owner_email)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(templates)
    }

    pub async fn get_template_by_id(&self, id: Uuid) -> Result<Option<Template>, AppError> {
        let template = sqlx::query_as::<_, Template>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(template)
    }

    pub async fn get_template_by_id_and_owner(
        &self,
        id: Uuid,
        owner_email: &str,
    ) -> Result<Option<Template>, AppError> {
        let template = sqlx::query_as::<_, Template>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = ? AND owner_email = ?"
        ))
        .bind(id)
        .bind(owner_email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(template)
    }

    /// Overwrites all mutable fields. Returns `None` if the row is gone.
    pub async fn update_template(
        &self,
        id: Uuid,
        fields: &TemplateFields,
    ) -> Result<Option<Template>, AppError> {
        let template = sqlx::query_as::<_, Template>(&format!(
            "UPDATE templates SET template_name = ?, subject = ?, body = ? WHERE id = ? RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(&fields.template_name)
        .bind(&fields.subject)
        .bind(&fields.body)
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(template)
    }

    /// Returns the number of rows removed (0 or 1).
    pub async fn delete_template(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM templates WHERE id = ?")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}

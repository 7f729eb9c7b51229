use async_trait::async_trait;
use auth::HashedSecret;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountLookup;
use crate::domain::account::ports::AccountRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            password_hash: HashedSecret::from_stored(row.password_hash),
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AccountLookup for PostgresAccountRepository {
    async fn find_by_identifier(
        &self,
        username_or_email: &str,
    ) -> Result<Option<Account>, AccountError> {
        // A username match takes precedence over an email match
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM accounts
            WHERE username = $1 OR email = $1
            ORDER BY (username = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(username_or_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        row.map(Account::try_from).transpose()
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn save(&self, account: Account) -> Result<Account, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account.id.0)
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_str())
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("accounts_username_key") {
                        return AccountError::UsernameAlreadyExists(
                            account.username.as_str().to_string(),
                        );
                    }
                    if db_err.constraint() == Some("accounts_email_key") {
                        return AccountError::EmailAlreadyExists(
                            account.email.as_str().to_string(),
                        );
                    }
                }
            }
            AccountError::DatabaseError(e.to_string())
        })?;

        Ok(account)
    }
}

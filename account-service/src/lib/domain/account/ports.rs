use async_trait::async_trait;
use auth::IssuedToken;

use crate::domain::account::errors::AccountError;
use crate::domain::account::errors::LoginError;
use crate::domain::account::errors::RegistrationError;
use crate::domain::account::models::Account;
use crate::domain::account::models::LoginAttempt;
use crate::domain::account::models::RegisterAccountCommand;

/// Port for credential operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Register a new account, storing only a hash of its password.
    ///
    /// # Errors
    /// * `Hashing` - Password could not be hashed
    /// * `PersistenceFailure` - Storage refused the account (duplicate, database failure)
    async fn register(&self, command: RegisterAccountCommand) -> Result<Account, RegistrationError>;

    /// Check a login attempt.
    ///
    /// Returns false both for unknown identifiers and for wrong passwords.
    async fn validate_login(&self, attempt: &LoginAttempt) -> bool;

    /// Check a login attempt and issue a bearer token for the account.
    ///
    /// # Errors
    /// * `LoginFailed` - Credentials did not match an account
    /// * `TokenIssue` - Token could not be signed
    async fn login(&self, attempt: LoginAttempt) -> Result<IssuedToken, LoginError>;
}

/// Read access to accounts, the only capability request authentication needs.
#[async_trait]
pub trait AccountLookup: Send + Sync + 'static {
    /// Find an account by username, or by email when no username matches.
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_identifier(
        &self,
        username_or_email: &str,
    ) -> Result<Option<Account>, AccountError>;
}

/// Persistence operations for the account aggregate.
#[async_trait]
pub trait AccountRepository: AccountLookup {
    /// Persist a new account.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn save(&self, account: Account) -> Result<Account, AccountError>;
}

use std::sync::Arc;

use async_trait::async_trait;
use auth::HashedSecret;
use auth::IssuedToken;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::Utc;
use zeroize::Zeroizing;

use crate::domain::account::errors::LoginError;
use crate::domain::account::errors::RegistrationError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::LoginAttempt;
use crate::domain::account::models::RegisterAccountCommand;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::CredentialServicePort;

/// Domain service implementation for registration and login.
///
/// Concrete implementation of CredentialServicePort with dependency injection.
/// Argon2 work runs on tokio's blocking pool.
pub struct CredentialService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    password_hasher: PasswordHasher,
    token_codec: Arc<TokenCodec>,
    /// Checked against when the identifier matches no account.
    placeholder_hash: HashedSecret,
}

impl<AR> CredentialService<AR>
where
    AR: AccountRepository,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `password_hasher` - Hasher configured with the deployment's cost
    /// * `token_codec` - Codec used to issue tokens on successful login
    ///
    /// # Errors
    /// * `HashingFailed` - The placeholder hash could not be computed
    pub fn new(
        repository: Arc<AR>,
        password_hasher: PasswordHasher,
        token_codec: Arc<TokenCodec>,
    ) -> Result<Self, PasswordError> {
        let placeholder_hash = password_hasher.hash(&AccountId::new().to_string())?;

        Ok(Self {
            repository,
            password_hasher,
            token_codec,
            placeholder_hash,
        })
    }

    async fn hash_password(
        &self,
        password: Zeroizing<String>,
    ) -> Result<HashedSecret, PasswordError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
    }

    async fn verify_password(
        &self,
        password: &Zeroizing<String>,
        hash: HashedSecret,
    ) -> Result<bool, PasswordError> {
        let hasher = self.password_hasher.clone();
        let password = password.clone();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
    }

    /// Resolve the attempt to an account whose stored hash matches the password.
    ///
    /// Every attempt pays for exactly one password verification, whether or
    /// not the identifier resolves.
    async fn matching_account(&self, attempt: &LoginAttempt) -> Option<Account> {
        let account = match self
            .repository
            .find_by_identifier(&attempt.username_or_email)
            .await
        {
            Ok(Some(account)) => Some(account),
            Ok(None) => {
                tracing::debug!("Login attempt for unknown account");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Account lookup failed during login");
                None
            }
        };

        let hash = account.as_ref().map_or_else(
            || self.placeholder_hash.clone(),
            |account| account.password_hash.clone(),
        );
        let verified = self.verify_password(&attempt.password, hash).await;
        let account = account?;

        match verified {
            Ok(true) => Some(account),
            Ok(false) => {
                tracing::debug!(account_id = %account.id, "Login attempt with wrong password");
                None
            }
            Err(e) => {
                tracing::error!(
                    account_id = %account.id,
                    error = %e,
                    "Stored password hash could not be read"
                );
                None
            }
        }
    }
}

#[async_trait]
impl<AR> CredentialServicePort for CredentialService<AR>
where
    AR: AccountRepository,
{
    async fn register(
        &self,
        command: RegisterAccountCommand,
    ) -> Result<Account, RegistrationError> {
        let password_hash = self.hash_password(command.password).await?;

        let account = Account {
            id: AccountId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let saved = self.repository.save(account).await.map_err(|e| {
            tracing::warn!(error = %e, "Account could not be persisted");
            RegistrationError::PersistenceFailure(e)
        })?;

        tracing::info!(
            account_id = %saved.id,
            username = %saved.username,
            "Account registered"
        );

        Ok(saved)
    }

    async fn validate_login(&self, attempt: &LoginAttempt) -> bool {
        self.matching_account(attempt).await.is_some()
    }

    async fn login(&self, attempt: LoginAttempt) -> Result<IssuedToken, LoginError> {
        let account = self
            .matching_account(&attempt)
            .await
            .ok_or(LoginError::LoginFailed)?;

        let issued = self.token_codec.issue(account.username.as_str())?;

        tracing::info!(account_id = %account.id, "Access token issued");

        Ok(issued)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use auth::HashCost;
    use std::time::Instant;

    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::domain::account::errors::AccountError;
    use crate::domain::account::models::EmailAddress;
    use crate::domain::account::models::Username;
    use crate::domain::account::ports::AccountLookup;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestAccountRepository {}

        #[async_trait]
        impl AccountLookup for TestAccountRepository {
            async fn find_by_identifier(&self, username_or_email: &str) -> Result<Option<Account>, AccountError>;
        }

        #[async_trait]
        impl AccountRepository for TestAccountRepository {
            async fn save(&self, account: Account) -> Result<Account, AccountError>;
        }
    }

    fn hasher() -> PasswordHasher {
        PasswordHasher::with_cost(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    fn service(
        repository: MockTestAccountRepository,
    ) -> CredentialService<MockTestAccountRepository> {
        CredentialService::new(
            Arc::new(repository),
            hasher(),
            Arc::new(TokenCodec::new(SECRET, Duration::minutes(30))),
        )
        .unwrap()
    }

    fn stored_account(username: &str, email: &str, password: &str) -> Account {
        Account {
            id: AccountId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: hasher().hash(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn bob_command(password: &str) -> RegisterAccountCommand {
        RegisterAccountCommand::new(
            Username::new("bob".to_string()).unwrap(),
            EmailAddress::new("b@x.com".to_string()).unwrap(),
            password.to_string(),
        )
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_save()
            .withf(|account| {
                account.username.as_str() == "bob"
                    && account.email.as_str() == "b@x.com"
                    && account.password_hash.as_str() != "pw"
                    && account.password_hash.as_str().starts_with("$argon2id$")
            })
            .times(1)
            .returning(Ok);

        let account = service(repository)
            .register(bob_command("pw"))
            .await
            .expect("registration failed");

        assert_eq!(account.username.as_str(), "bob");
        assert!(hasher().verify("pw", &account.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_duplicate_is_persistence_failure() {
        let mut repository = MockTestAccountRepository::new();

        repository.expect_save().times(1).returning(|account| {
            Err(AccountError::UsernameAlreadyExists(
                account.username.as_str().to_string(),
            ))
        });

        let result = service(repository).register(bob_command("pw")).await;
        assert!(matches!(
            result,
            Err(RegistrationError::PersistenceFailure(
                AccountError::UsernameAlreadyExists(_)
            ))
        ));
    }

    #[tokio::test]
    async fn test_register_database_error_is_persistence_failure() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_save()
            .times(1)
            .returning(|_| Err(AccountError::DatabaseError("connection reset".to_string())));

        let result = service(repository).register(bob_command("pw")).await;
        assert!(matches!(
            result,
            Err(RegistrationError::PersistenceFailure(AccountError::DatabaseError(_)))
        ));
    }

    #[tokio::test]
    async fn test_register_then_validate_login() {
        // In-process store so the saved hash is what login sees
        let saved: Arc<Mutex<Option<Account>>> = Arc::new(Mutex::new(None));
        let mut repository = MockTestAccountRepository::new();

        let store = saved.clone();
        repository.expect_save().times(1).returning(move |account| {
            *store.lock().unwrap() = Some(account.clone());
            Ok(account)
        });
        let store = saved.clone();
        repository
            .expect_find_by_identifier()
            .returning(move |identifier| {
                Ok(store
                    .lock()
                    .unwrap()
                    .clone()
                    .filter(|a| a.username.as_str() == identifier))
            });

        let service = service(repository);
        service.register(bob_command("pw")).await.unwrap();

        assert!(
            service
                .validate_login(&LoginAttempt::new("bob".to_string(), "pw".to_string()))
                .await
        );
        assert!(
            !service
                .validate_login(&LoginAttempt::new("bob".to_string(), "wrong".to_string()))
                .await
        );
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let account = stored_account("alice", "alice@example.com", "correct");
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_identifier()
            .returning(move |identifier| {
                Ok((identifier == "alice").then(|| account.clone()))
            });

        let service = service(repository);

        let unknown = service
            .login(LoginAttempt::new("mallory".to_string(), "correct".to_string()))
            .await;
        let wrong = service
            .login(LoginAttempt::new("alice".to_string(), "incorrect".to_string()))
            .await;

        assert!(matches!(unknown, Err(LoginError::LoginFailed)));
        assert!(matches!(wrong, Err(LoginError::LoginFailed)));
        assert_eq!(
            unknown.unwrap_err().to_string(),
            wrong.unwrap_err().to_string()
        );
    }

    #[tokio::test]
    async fn test_validate_login_by_email() {
        let account = stored_account("alice", "alice@example.com", "correct");
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_identifier()
            .withf(|identifier| identifier == "alice@example.com")
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let attempt = LoginAttempt::new("alice@example.com".to_string(), "correct".to_string());
        assert!(service(repository).validate_login(&attempt).await);
    }

    #[tokio::test]
    async fn test_validate_login_lookup_error_returns_false() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_identifier()
            .times(1)
            .returning(|_| Err(AccountError::DatabaseError("timeout".to_string())));

        let attempt = LoginAttempt::new("alice".to_string(), "correct".to_string());
        assert!(!service(repository).validate_login(&attempt).await);
    }

    #[tokio::test]
    async fn test_validate_login_corrupt_hash_returns_false() {
        let mut account = stored_account("alice", "alice@example.com", "correct");
        account.password_hash = HashedSecret::from_stored("not-a-phc-string");
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_identifier()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let attempt = LoginAttempt::new("alice".to_string(), "correct".to_string());
        assert!(!service(repository).validate_login(&attempt).await);
    }

    #[tokio::test]
    async fn test_login_issues_token_for_username() {
        let account = stored_account("alice", "alice@example.com", "correct");
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_find_by_identifier()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let issued = service(repository)
            .login(LoginAttempt::new(
                "alice@example.com".to_string(),
                "correct".to_string(),
            ))
            .await
            .expect("login failed");

        let codec = TokenCodec::new(SECRET, Duration::minutes(30));
        assert_eq!(codec.verify(&issued.access_token).unwrap(), "alice");
    }

    async fn average_validation(
        service: &CredentialService<MockTestAccountRepository>,
        identifier: &str,
    ) -> std::time::Duration {
        const RUNS: u32 = 5;
        let started = Instant::now();
        for _ in 0..RUNS {
            let attempt = LoginAttempt::new(identifier.to_string(), "incorrect".to_string());
            assert!(!service.validate_login(&attempt).await);
        }
        started.elapsed() / RUNS
    }

    #[tokio::test]
    async fn test_unknown_account_costs_a_password_check() {
        let costly = PasswordHasher::with_cost(HashCost {
            memory_kib: 8192,
            iterations: 4,
            parallelism: 1,
        })
        .unwrap();
        let mut account = stored_account("alice", "alice@example.com", "correct");
        account.password_hash = costly.hash("correct").unwrap();

        let mut repository = MockTestAccountRepository::new();
        repository
            .expect_find_by_identifier()
            .returning(move |identifier| Ok((identifier == "alice").then(|| account.clone())));

        let service = CredentialService::new(
            Arc::new(repository),
            costly,
            Arc::new(TokenCodec::new(SECRET, Duration::minutes(30))),
        )
        .unwrap();

        // Warm up the blocking pool before measuring
        average_validation(&service, "alice").await;

        let wrong_password = average_validation(&service, "alice").await;
        let unknown = average_validation(&service, "mallory").await;

        assert!(
            unknown * 3 >= wrong_password,
            "unknown={:?} wrong_password={:?}",
            unknown,
            wrong_password
        );
    }
}

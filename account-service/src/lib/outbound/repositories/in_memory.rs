use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::ports::AccountLookup;
use crate::domain::account::ports::AccountRepository;

/// Process-local account store.
///
/// Enforces the same uniqueness rules as the Postgres schema. Contents are
/// lost on restart.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountLookup for InMemoryAccountRepository {
    async fn find_by_identifier(
        &self,
        username_or_email: &str,
    ) -> Result<Option<Account>, AccountError> {
        let accounts = self.accounts.read().await;

        let by_username = accounts
            .values()
            .find(|account| account.username.as_str() == username_or_email);
        let found = by_username.or_else(|| {
            accounts
                .values()
                .find(|account| account.email.as_str() == username_or_email)
        });

        Ok(found.cloned())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn save(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.username == account.username) {
            return Err(AccountError::UsernameAlreadyExists(
                account.username.as_str().to_string(),
            ));
        }
        if accounts.values().any(|a| a.email == account.email) {
            return Err(AccountError::EmailAlreadyExists(
                account.email.as_str().to_string(),
            ));
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }
}

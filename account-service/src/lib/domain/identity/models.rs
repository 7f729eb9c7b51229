use auth::VerificationError;
use thiserror::Error;

use crate::domain::account::models::Account;

/// Identity established for a single request.
///
/// Lives in the request's extensions; a request without one is unauthenticated.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedIdentity {
    principal: String,
    account: Account,
}

impl AuthenticatedIdentity {
    pub fn new(account: Account) -> Self {
        Self {
            principal: account.username.as_str().to_string(),
            account,
        }
    }

    /// Principal name (the account's username).
    pub fn principal(&self) -> &str {
        &self.principal
    }

    pub fn account(&self) -> &Account {
        &self.account
    }
}

/// Why a request carrying a bearer token was turned away.
///
/// Kept for logs only; every reason produces the same response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    SignatureInvalid,

    #[error("expired token")]
    Expired,

    #[error("token subject does not resolve to an account")]
    AccountNotFound,

    #[error("account lookup failed")]
    LookupFailed,

    #[error("account lookup timed out")]
    LookupTimedOut,
}

impl From<VerificationError> for RejectionReason {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::Malformed => RejectionReason::Malformed,
            VerificationError::SignatureInvalid => RejectionReason::SignatureInvalid,
            VerificationError::Expired => RejectionReason::Expired,
        }
    }
}

/// Result of running the authentication filter on one request.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// No bearer credentials: forward without an identity.
    Anonymous,
    /// Forward with this identity attached.
    Authenticated(AuthenticatedIdentity),
    /// Stop here with an unauthorized response.
    Rejected(RejectionReason),
}

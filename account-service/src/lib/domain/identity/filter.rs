use std::sync::Arc;
use std::time::Duration;

use auth::TokenCodec;

use crate::domain::account::models::Account;
use crate::domain::account::ports::AccountLookup;
use crate::domain::identity::models::AuthenticatedIdentity;
use crate::domain::identity::models::FilterOutcome;
use crate::domain::identity::models::RejectionReason;

/// Authorization scheme prefix, including the separating space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Per-request bearer authentication.
///
/// Turns the raw `Authorization` header of one request into a
/// [`FilterOutcome`]: no bearer credentials forward anonymously, a token that
/// verifies and names an existing account forwards with an identity, anything
/// else is rejected. Holds no per-request state.
pub struct AuthenticationFilter<AL>
where
    AL: AccountLookup,
{
    token_codec: Arc<TokenCodec>,
    lookup: Arc<AL>,
    lookup_timeout: Duration,
}

impl<AL> AuthenticationFilter<AL>
where
    AL: AccountLookup,
{
    pub fn new(token_codec: Arc<TokenCodec>, lookup: Arc<AL>, lookup_timeout: Duration) -> Self {
        Self {
            token_codec,
            lookup,
            lookup_timeout,
        }
    }

    /// Run the filter against the request's `Authorization` header, if any.
    pub async fn authenticate(&self, authorization: Option<&[u8]>) -> FilterOutcome {
        match self.identify(authorization).await {
            Ok(None) => FilterOutcome::Anonymous,
            Ok(Some(identity)) => FilterOutcome::Authenticated(identity),
            Err(reason) => FilterOutcome::Rejected(reason),
        }
    }

    async fn identify(
        &self,
        authorization: Option<&[u8]>,
    ) -> Result<Option<AuthenticatedIdentity>, RejectionReason> {
        let Some(token) = authorization
            .map(extract_bearer_token)
            .transpose()?
            .flatten()
        else {
            return Ok(None);
        };

        let subject = self.token_codec.verify(token)?;
        let account = self.resolve(&subject).await?;

        Ok(Some(AuthenticatedIdentity::new(account)))
    }

    async fn resolve(&self, subject: &str) -> Result<Account, RejectionReason> {
        let lookup = self.lookup.find_by_identifier(subject);

        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(Some(account))) => Ok(account),
            Ok(Ok(None)) => {
                tracing::warn!(subject = %subject, "Token subject not found");
                Err(RejectionReason::AccountNotFound)
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Account lookup failed");
                Err(RejectionReason::LookupFailed)
            }
            Err(_) => {
                tracing::error!(
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "Account lookup timed out"
                );
                Err(RejectionReason::LookupTimedOut)
            }
        }
    }
}

/// Split the bearer token off an `Authorization` header value.
///
/// The scheme is matched positionally on the first `BEARER_PREFIX.len()`
/// bytes, ignoring ASCII case. Returns `Ok(None)` when the header is empty or
/// uses another scheme.
///
/// # Errors
/// * `Malformed` - Bearer scheme with an empty or non UTF-8 token, or a header
///   cut off inside the prefix (`"Bearer"`, `"bear"`)
pub fn extract_bearer_token(header: &[u8]) -> Result<Option<&str>, RejectionReason> {
    let Some(scheme) = header.get(..BEARER_PREFIX.len()) else {
        let prefix = &BEARER_PREFIX.as_bytes()[..header.len()];
        if !header.is_empty() && header.eq_ignore_ascii_case(prefix) {
            return Err(RejectionReason::Malformed);
        }
        return Ok(None);
    };

    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX.as_bytes()) {
        return Ok(None);
    }

    match std::str::from_utf8(&header[BEARER_PREFIX.len()..]) {
        Ok(token) if !token.is_empty() => Ok(Some(token)),
        _ => Err(RejectionReason::Malformed),
    }
}

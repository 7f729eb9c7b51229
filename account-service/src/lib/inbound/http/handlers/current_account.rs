use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::models::AuthenticatedIdentity;

/// Identity of the caller. Anonymous callers are refused here, not by the filter.
pub async fn current_account(
    identity: Option<Extension<AuthenticatedIdentity>>,
) -> Result<ApiSuccess<CurrentAccountResponseData>, ApiError> {
    let Extension(identity) = identity.ok_or_else(ApiError::unauthorized)?;

    Ok(ApiSuccess::new(StatusCode::OK, (&identity).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentAccountResponseData {
    pub principal: String,
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&AuthenticatedIdentity> for CurrentAccountResponseData {
    fn from(identity: &AuthenticatedIdentity) -> Self {
        let account = identity.account();
        Self {
            principal: identity.principal().to_string(),
            id: account.id.to_string(),
            email: account.email.as_str().to_string(),
            created_at: account.created_at,
        }
    }
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::LoginAttempt;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

pub async fn login<R: AccountRepository>(
    State(state): State<AppState<R>>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let attempt = LoginAttempt::new(body.username_or_email, body.password);

    let issued = state.credential_service.login(attempt).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            token: issued.access_token,
            token_type: "Bearer".to_string(),
            expires_at: issued.expires_at,
        },
    ))
}

#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    username_or_email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

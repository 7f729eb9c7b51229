use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::account::errors::AccountError;
use crate::domain::account::errors::LoginError;
use crate::domain::account::errors::RegistrationError;

pub mod current_account;
pub mod health;
pub mod login;
pub mod register;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    Conflict(String),
    Unauthorized(String),
}

impl ApiError {
    /// The single response given for every failed request authentication.
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::PersistenceFailure(
                ref cause @ (AccountError::UsernameAlreadyExists(_)
                | AccountError::EmailAlreadyExists(_)),
            ) => ApiError::Conflict(cause.to_string()),
            RegistrationError::PersistenceFailure(_) => {
                ApiError::BadRequest("Account registration failed".to_string())
            }
            RegistrationError::Hashing(_) => {
                ApiError::InternalServerError("Account registration failed".to_string())
            }
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::LoginFailed => ApiError::Unauthorized(err.to_string()),
            LoginError::TokenIssue(_) => {
                ApiError::InternalServerError("Token generation failed".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use auth::PasswordError;

    use super::*;

    #[test]
    fn test_registration_error_mapping() {
        let duplicate = RegistrationError::PersistenceFailure(AccountError::EmailAlreadyExists(
            "b@x.com".to_string(),
        ));
        assert!(matches!(ApiError::from(duplicate), ApiError::Conflict(_)));

        let database =
            RegistrationError::PersistenceFailure(AccountError::DatabaseError("down".to_string()));
        assert_eq!(
            ApiError::from(database),
            ApiError::BadRequest("Account registration failed".to_string())
        );

        let hashing = RegistrationError::Hashing(PasswordError::HashingFailed("oom".to_string()));
        assert!(matches!(
            ApiError::from(hashing),
            ApiError::InternalServerError(_)
        ));
    }

    #[test]
    fn test_login_error_mapping() {
        assert_eq!(
            ApiError::from(LoginError::LoginFailed),
            ApiError::Unauthorized("Invalid credentials".to_string())
        );
    }
}

use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Errors raised by account storage.
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Stored rows that no longer satisfy the value types
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Registration failures.
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] PasswordError),

    #[error("Account could not be saved: {0}")]
    PersistenceFailure(#[source] AccountError),
}

/// Login failures.
///
/// Unknown accounts and wrong passwords are both `LoginFailed`.
#[derive(Debug, Clone, Error)]
pub enum LoginError {
    #[error("Invalid credentials")]
    LoginFailed,

    #[error("Token generation failed: {0}")]
    TokenIssue(#[from] TokenError),
}

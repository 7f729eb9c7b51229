//! Authentication utilities library
//!
//! Provides the credential primitives used by the account service:
//! - Password hashing (Argon2id, tunable cost, per-call salt)
//! - Bearer token issuance and verification (HS256 JWT)
//!
//! Both types are immutable once built and can be shared behind an `Arc`.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::TokenCodec;
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(1));
//! let issued = codec.issue("alice").unwrap();
//! let subject = codec.verify(&issued.access_token).unwrap();
//! assert_eq!(subject, "alice");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::HashCost;
pub use password::HashedSecret;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Clock;
pub use token::IssuedToken;
pub use token::ManualClock;
pub use token::SystemClock;
pub use token::TokenClaims;
pub use token::TokenCodec;
pub use token::TokenError;
pub use token::VerificationError;

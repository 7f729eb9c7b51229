pub mod argon2;
pub mod errors;
pub mod secret;

pub use self::argon2::HashCost;
pub use self::argon2::PasswordHasher;
pub use errors::PasswordError;
pub use secret::HashedSecret;

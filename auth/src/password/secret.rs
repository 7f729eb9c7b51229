use std::fmt;

/// One-way hash of a user secret in PHC string format.
///
/// The only way to obtain one from plaintext is [`super::PasswordHasher::hash`];
/// [`HashedSecret::from_stored`] exists for values read back from storage.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedSecret(String);

impl HashedSecret {
    pub(crate) fn new(phc: String) -> Self {
        Self(phc)
    }

    /// Wrap a hash loaded from storage. No parsing happens here; unreadable
    /// values surface as an error on verification.
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedSecret(..)")
    }
}

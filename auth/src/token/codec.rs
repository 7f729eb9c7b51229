use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::crypto;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::clock::Clock;
use super::clock::SystemClock;
use super::errors::TokenError;
use super::errors::VerificationError;

/// Signed access token together with the instant it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HS256 bearer tokens.
///
/// Holds the signing key and token lifetime, both fixed at construction, so a
/// single instance can be shared across request handlers without locking.
///
/// The HMAC over the raw header and claims segments is checked before either
/// is decoded, so altering any byte of them reports
/// [`VerificationError::SignatureInvalid`]. `Malformed` is left for tokens that
/// are not three base64url segments, or that carry a valid signature over
/// content which does not decode. Signatures are compared in constant time by
/// `jsonwebtoken`.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Create a codec signing with `secret` and issuing tokens valid for `ttl`.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self::with_clock(secret, ttl, Arc::new(SystemClock))
    }

    /// Same as [`TokenCodec::new`] with an explicit time source.
    pub fn with_clock(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Self::ALGORITHM);
        // Expiry is checked against our own clock after decoding.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject` that expires `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        let now = self.clock.now();
        let claims = TokenClaims::issue(subject, now, self.ttl);

        let access_token = encode(&Header::new(Self::ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            expires_at: now + self.ttl,
        })
    }

    /// Verify `token` and return the subject it was issued for.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be parsed or lacks required claims
    /// * `SignatureInvalid` - Signature does not match the signing key
    /// * `Expired` - Signature is valid but the lifetime has elapsed
    pub fn verify(&self, token: &str) -> Result<String, VerificationError> {
        let (message, signature) = split_signed(token)?;

        if !crypto::verify(
            signature,
            message.as_bytes(),
            &self.decoding_key,
            Self::ALGORITHM,
        )? {
            return Err(VerificationError::SignatureInvalid);
        }

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = token_data.claims;

        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(VerificationError::Expired);
        }

        Ok(claims.sub)
    }
}

/// Split a compact token into its signed part (`header.claims`) and signature.
///
/// Only the shape is checked: exactly three non-empty base64url segments.
fn split_signed(token: &str) -> Result<(&str, &str), VerificationError> {
    let mut segments = token.split('.');
    let (Some(header), Some(claims), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(VerificationError::Malformed);
    };

    if ![header, claims, signature].iter().all(|s| is_base64url(s)) {
        return Err(VerificationError::Malformed);
    }

    let message = &token[..header.len() + 1 + claims.len()];
    Ok((message, signature))
}

fn is_base64url(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

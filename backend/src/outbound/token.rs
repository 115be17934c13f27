//! JWT bearer-token issuance and verification.
//!
//! Tokens are HS256-signed with a shared secret; the payload carries the
//! user id in `sub` plus the standard `iat`/`exp` pair. Expiry is
//! enforced at verification.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::auth::AuthTokens;
use crate::domain::ports::{TokenError, TokenIssuer};
use crate::domain::user::UserId;

/// Claims carried by every issued token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User the token was issued to.
    sub: String,
    /// Issued-at, seconds since the epoch.
    iat: u64,
    /// Expiry, seconds since the epoch.
    exp: u64,
}

/// HS256 token issuer with a fixed lifetime.
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtTokenIssuer {
    /// Create an issuer from the shared secret and token lifetime.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    fn now_epoch_seconds() -> Result<u64, TokenError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .map_err(|err| TokenError::issue(format!("system clock before epoch: {err}")))
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &UserId) -> Result<AuthTokens, TokenError> {
        let issued_at = Self::now_epoch_seconds()?;
        let claims = Claims {
            sub: user.as_ref().to_owned(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl.as_secs()),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| TokenError::issue(err.to_string()))?;

        Ok(AuthTokens::bearer(token, self.ttl.as_secs()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| TokenError::Invalid)?;

        UserId::new(&data.claims.sub).map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    //! Issue/verify round-trip coverage.
    use rstest::rstest;

    use super::*;

    fn issuer() -> JwtTokenIssuer {
        JwtTokenIssuer::new(b"test-secret", Duration::from_secs(3600))
    }

    #[rstest]
    fn issued_tokens_verify_back_to_the_user() {
        let user = UserId::random();
        let tokens = issuer().issue(&user).expect("issue succeeds");

        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 3600);

        let verified = issuer().verify(&tokens.access_token).expect("verifies");
        assert_eq!(verified, user);
    }

    #[rstest]
    #[case("")]
    #[case("not-a-token")]
    #[case("aaaa.bbbb.cccc")]
    fn garbage_tokens_are_invalid(#[case] token: &str) {
        assert_eq!(issuer().verify(token), Err(TokenError::Invalid));
    }

    #[rstest]
    fn tokens_from_another_secret_are_rejected() {
        let user = UserId::random();
        let other = JwtTokenIssuer::new(b"other-secret", Duration::from_secs(3600));
        let tokens = other.issue(&user).expect("issue succeeds");

        assert_eq!(
            issuer().verify(&tokens.access_token),
            Err(TokenError::Invalid)
        );
    }
}

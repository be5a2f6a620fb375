//! Session token issuance and verification
//!
//! Tokens are HS256-signed over the shared secret and carry a single
//! `authenticated` claim plus the standard `exp` claim. Verification is
//! deliberately opaque: bad signature, malformed input and expiry all
//! collapse to the same `None`, so callers never leak the failure cause.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::types::GatehouseError;

/// Session lifetime: 7 days, never renewed or refreshed
pub const TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 7;

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Always true for issued tokens; a token with `authenticated: false`
    /// is treated as invalid
    pub authenticated: bool,
    /// Expiry as unix timestamp (seconds)
    pub exp: u64,
}

/// Stateless issue/verify over the shared secret
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Build a token service from the shared secret.
    ///
    /// An empty secret is a configuration error — the service fails closed
    /// rather than signing with a trivially guessable key.
    pub fn new(secret: &str) -> Result<Self, GatehouseError> {
        if secret.is_empty() {
            return Err(GatehouseError::Config(
                "session secret must not be empty".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: a token whose exp has passed is invalid immediately
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Issue a signed session token expiring in [`TOKEN_TTL_SECS`]
    pub fn issue(&self) -> Result<String, GatehouseError> {
        let claims = Claims {
            authenticated: true,
            exp: now_unix() + TOKEN_TTL_SECS,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| GatehouseError::Auth(format!("Failed to sign session token: {e}")))
    }

    /// Verify a serialized token.
    ///
    /// Returns the decoded claims only when the signature checks out, the
    /// token has not expired and `authenticated` is true. All failure modes
    /// are indistinguishable to the caller.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).ok()?;
        if !data.claims.authenticated {
            return None;
        }
        Some(data.claims)
    }
}

fn now_unix() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret").unwrap()
    }

    #[test]
    fn issue_then_verify_round_trip() {
        let svc = service();
        let token = svc.issue().unwrap();

        let claims = svc.verify(&token).expect("freshly issued token is valid");
        assert!(claims.authenticated);
        assert!(claims.exp > now_unix());
    }

    #[test]
    fn expiry_is_seven_days() {
        let svc = service();
        let token = svc.issue().unwrap();
        let claims = svc.verify(&token).unwrap();

        let expected = now_unix() + TOKEN_TTL_SECS;
        // Allow a couple of seconds of test runtime skew
        assert!(claims.exp.abs_diff(expected) <= 2);
    }

    #[test]
    fn expired_token_is_invalid_despite_good_signature() {
        let svc = service();
        let claims = Claims {
            authenticated: true,
            exp: now_unix() - 60,
        };
        let token = encode(&Header::default(), &claims, &svc.encoding_key).unwrap();

        assert!(svc.verify(&token).is_none());
    }

    #[test]
    fn unauthenticated_claim_is_invalid() {
        let svc = service();
        let claims = Claims {
            authenticated: false,
            exp: now_unix() + 600,
        };
        let token = encode(&Header::default(), &claims, &svc.encoding_key).unwrap();

        assert!(svc.verify(&token).is_none());
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = service().issue().unwrap();
        let other = TokenService::new("another-secret").unwrap();

        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn garbage_input_never_panics() {
        let svc = service();
        let token = svc.issue().unwrap();

        assert!(svc.verify("").is_none());
        assert!(svc.verify("not-a-token").is_none());
        assert!(svc.verify(&token[..token.len() / 2]).is_none());
        assert!(svc.verify("a.b.c").is_none());
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        assert!(TokenService::new("").is_err());
    }
}

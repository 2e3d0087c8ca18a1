//! HMAC-SHA256 JWT bearer token authentication.

use crate::authenticator::Authenticator;
use crate::context::{ConnectionContext, UserId};
use crate::error::{AuthError, Result};
use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Claims this authenticator expects in a presented bearer token. Only
/// `sub` is used as the resolved user identifier; `exp` is validated by
/// `jsonwebtoken` itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user identifier this token authenticates.
    pub sub: String,
    /// Expiration time, Unix seconds.
    pub exp: i64,
}

/// Authenticates connections by validating an HS256-signed JWT bearer
/// token and taking its `sub` claim as the user identifier.
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    /// Build an authenticator from a shared HMAC secret. The secret must
    /// be at least 32 bytes, matching the minimum this workspace's other
    /// JWT-issuing services enforce.
    pub fn new(secret: &[u8]) -> Result<Self> {
        if secret.len() < 32 {
            return Err(AuthError::Configuration(
                "JWT secret must be at least 32 bytes".to_string(),
            ));
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp"]);
        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn authenticate(&self, context: &ConnectionContext) -> Result<UserId> {
        let token = context
            .token
            .as_deref()
            .ok_or(AuthError::MissingCredential)?;

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            warn!(error = %e, "rejected bearer token");
            AuthError::InvalidCredential(e.to_string())
        })?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"01234567890123456789012345678901";

    fn token_for(sub: &str, exp: i64) -> String {
        let claims = Claims { sub: sub.to_string(), exp };
        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    #[tokio::test]
    async fn accepts_a_valid_token() {
        let auth = JwtAuthenticator::new(SECRET).unwrap();
        let future_exp = i64::MAX / 2; // far future, avoids a time dependency in the test
        let token = token_for("user-42", future_exp);
        let ctx = ConnectionContext::with_token(token);
        let user_id = auth.authenticate(&ctx).await.unwrap();
        assert_eq!(user_id, "user-42");
    }

    #[tokio::test]
    async fn rejects_an_expired_token() {
        let auth = JwtAuthenticator::new(SECRET).unwrap();
        let token = token_for("user-42", 1); // expired in 1970
        let ctx = ConnectionContext::with_token(token);
        assert!(auth.authenticate(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn rejects_missing_token() {
        let auth = JwtAuthenticator::new(SECRET).unwrap();
        let ctx = ConnectionContext::default();
        assert!(matches!(
            auth.authenticate(&ctx).await,
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn rejects_a_short_secret() {
        assert!(JwtAuthenticator::new(b"too-short").is_err());
    }
}

//! A fixed token-to-user lookup table, for tests and local development.

use crate::authenticator::Authenticator;
use crate::context::{ConnectionContext, UserId};
use crate::error::{AuthError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Authenticates connections against a fixed, in-memory token table.
/// Never use this in production: tokens never expire and are compared
/// as plain strings.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthenticator {
    tokens: HashMap<String, UserId>,
}

impl StaticAuthenticator {
    /// Construct an authenticator with no valid tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token that resolves to `user_id`.
    pub fn with_token(mut self, token: impl Into<String>, user_id: impl Into<UserId>) -> Self {
        self.tokens.insert(token.into(), user_id.into());
        self
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, context: &ConnectionContext) -> Result<UserId> {
        let token = context
            .token
            .as_deref()
            .ok_or(AuthError::MissingCredential)?;
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::InvalidCredential("unknown token".to_string()))
    }
}

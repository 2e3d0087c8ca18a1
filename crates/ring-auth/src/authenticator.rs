//! The authentication collaborator contract.

use crate::context::{ConnectionContext, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Collaborator contract for connection authentication: given what the
/// protocol layer knows about an inbound connection, resolve (or reject)
/// the authenticated user. Implementations are consulted once per
/// connection, before any `stream_subscribe` is accepted.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate `context`, returning the resolved user identifier or
    /// an [`crate::AuthError`] if the connection should be refused.
    async fn authenticate(&self, context: &ConnectionContext) -> Result<UserId>;
}

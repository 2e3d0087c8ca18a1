//! The connection-time context an [`crate::Authenticator`] inspects.

/// Identifies the authenticated user of a streaming connection.
pub type UserId = String;

/// Everything an authenticator is given about an inbound connection
/// before it is accepted onto the streaming protocol.
#[derive(Debug, Clone, Default)]
pub struct ConnectionContext {
    /// Bearer token presented by the client, if any (stripped of any
    /// `Bearer ` prefix).
    pub token: Option<String>,
    /// Remote address of the connecting socket, for audit logging.
    pub remote_addr: Option<String>,
}

impl ConnectionContext {
    /// Build a context carrying only a bearer token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            remote_addr: None,
        }
    }
}

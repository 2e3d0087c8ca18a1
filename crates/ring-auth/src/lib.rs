//! # Ring Auth
//!
//! The connection authentication collaborator contract for the
//! streaming core, plus an HS256 JWT implementation and a fixed-table
//! test double.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod authenticator;
pub mod context;
pub mod error;
pub mod jwt;
pub mod static_auth;

pub use authenticator::Authenticator;
pub use context::{ConnectionContext, UserId};
pub use error::{AuthError, Result};
pub use jwt::JwtAuthenticator;
pub use static_auth::StaticAuthenticator;

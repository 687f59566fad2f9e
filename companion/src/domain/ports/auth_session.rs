//! Port for the authentication collaborator.
//!
//! The session is opaque to the core: all it needs is who is signed in.

use async_trait::async_trait;

use crate::domain::SessionUser;

use super::define_port_error;

define_port_error! {
    /// Errors raised by authentication adapters.
    pub enum AuthSessionError {
        /// Auth service could not be reached.
        Connection { message: String } => "auth session connection failed: {message}",
        /// Auth service rejected the request.
        Rejected { message: String } => "auth session rejected: {message}",
        /// Response body did not match the expected shape.
        Decode { message: String } => "auth session decode failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthSession: Send + Sync {
    /// The signed-in user, or `None` when anonymous.
    async fn current_user(&self) -> Result<Option<SessionUser>, AuthSessionError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), AuthSessionError>;
}

/// Fixture session with a fixed user, or none.
#[derive(Debug, Default, Clone)]
pub struct FixtureAuthSession {
    user: Option<SessionUser>,
}

impl FixtureAuthSession {
    /// Session signed in as `user`.
    pub fn signed_in(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }

    /// Anonymous session.
    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

#[async_trait]
impl AuthSession for FixtureAuthSession {
    async fn current_user(&self) -> Result<Option<SessionUser>, AuthSessionError> {
        Ok(self.user.clone())
    }

    async fn sign_out(&self) -> Result<(), AuthSessionError> {
        Ok(())
    }
}

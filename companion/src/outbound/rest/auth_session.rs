//! REST-backed `AuthSession` over the backend's auth endpoints.

use async_trait::async_trait;

use super::client::{RestClient, RestError};
use crate::domain::SessionUser;
use crate::domain::ports::{AuthSession, AuthSessionError};

/// Session bound to the access token in the client's config, if any.
#[derive(Clone)]
pub struct RestAuthSession {
    client: RestClient,
}

impl RestAuthSession {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

fn map_rest_error(error: RestError) -> AuthSessionError {
    match error {
        RestError::Timeout { message } | RestError::Transport { message } => {
            AuthSessionError::connection(message)
        }
        RestError::Decode { message } => AuthSessionError::decode(message),
        RestError::Unauthorized { message }
        | RestError::Rejected { message }
        | RestError::Server { message }
        | RestError::Client { message } => AuthSessionError::rejected(message),
    }
}

#[async_trait]
impl AuthSession for RestAuthSession {
    async fn current_user(&self) -> Result<Option<SessionUser>, AuthSessionError> {
        self.client
            .current_user()
            .await
            .map_err(map_rest_error)?
            .map(|user| user.into_domain())
            .transpose()
            .map_err(AuthSessionError::decode)
    }

    async fn sign_out(&self) -> Result<(), AuthSessionError> {
        self.client.logout().await.map_err(map_rest_error)
    }
}

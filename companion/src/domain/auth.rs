//! Signed-in user resolution for write paths.

use crate::domain::ports::{AuthSession, AuthSessionError};
use crate::domain::{Error, SessionUser};

fn map_auth_error(error: AuthSessionError) -> Error {
    match error {
        AuthSessionError::Connection { message } => {
            Error::service_unavailable(format!("auth service unavailable: {message}"))
        }
        AuthSessionError::Rejected { message } => {
            Error::unauthorized(format!("session rejected: {message}"))
        }
        AuthSessionError::Decode { message } => {
            Error::internal(format!("auth response malformed: {message}"))
        }
    }
}

/// Resolve the signed-in user or fail with `Unauthorized`.
pub async fn require_user<A>(session: &A) -> Result<SessionUser, Error>
where
    A: AuthSession + ?Sized,
{
    session
        .current_user()
        .await
        .map_err(map_auth_error)?
        .ok_or_else(|| Error::unauthorized("sign in to continue"))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{FixtureAuthSession, MockAuthSession};
    use crate::domain::{ErrorCode, UserId};

    #[tokio::test]
    async fn anonymous_sessions_are_unauthorised() {
        let error = require_user(&FixtureAuthSession::anonymous())
            .await
            .expect_err("anonymous");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn signed_in_user_is_returned() {
        let user = SessionUser {
            id: UserId::random(),
            email: None,
        };
        let session = FixtureAuthSession::signed_in(user.clone());
        assert_eq!(require_user(&session).await.expect("signed in"), user);
    }

    #[rstest]
    #[case(AuthSessionError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(AuthSessionError::rejected("expired"), ErrorCode::Unauthorized)]
    #[case(AuthSessionError::decode("bad json"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn session_failures_map_to_codes(
        #[case] failure: AuthSessionError,
        #[case] expected: ErrorCode,
    ) {
        let mut session = MockAuthSession::new();
        session
            .expect_current_user()
            .times(1)
            .return_once(move || Err(failure));
        let error = require_user(&session).await.expect_err("failure");
        assert_eq!(error.code(), expected);
    }
}

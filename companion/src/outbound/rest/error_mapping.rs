//! Shared REST error mapping for repositories with basic semantics.

use tracing::debug;

use super::client::RestError;

/// Map transport, status, and decode failures into port constructors.
///
/// Timeouts and transport failures become connection errors, decode
/// failures become decode errors, and anything the backend rejected becomes
/// a query error. Callers that distinguish authorisation failures match
/// [`RestError::Unauthorized`] before delegating here.
pub(super) fn map_basic_rest_error<E, C, Q, D>(
    error: RestError,
    connection: C,
    query: Q,
    decode: D,
) -> E
where
    C: FnOnce(String) -> E,
    Q: FnOnce(String) -> E,
    D: FnOnce(String) -> E,
{
    debug!(error = %error, "backend request failed");
    match error {
        RestError::Timeout { message } | RestError::Transport { message } => connection(message),
        RestError::Decode { message } => decode(message),
        RestError::Unauthorized { message }
        | RestError::Rejected { message }
        | RestError::Server { message }
        | RestError::Client { message } => query(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Probe {
        Connection(String),
        Query(String),
        Decode(String),
    }

    fn map(error: RestError) -> Probe {
        map_basic_rest_error(error, Probe::Connection, Probe::Query, Probe::Decode)
    }

    #[rstest]
    #[case::timeout(RestError::Timeout { message: "slow".into() }, Probe::Connection("slow".into()))]
    #[case::transport(RestError::Transport { message: "reset".into() }, Probe::Connection("reset".into()))]
    #[case::decode(RestError::Decode { message: "eof".into() }, Probe::Decode("eof".into()))]
    #[case::server(RestError::Server { message: "status 500".into() }, Probe::Query("status 500".into()))]
    #[case::unauthorised(RestError::Unauthorized { message: "status 401".into() }, Probe::Query("status 401".into()))]
    fn failures_map_to_the_matching_constructor(#[case] error: RestError, #[case] expected: Probe) {
        assert_eq!(map(error), expected);
    }
}

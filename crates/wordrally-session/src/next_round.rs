//! Outbound round-advance trigger.
//!
//! When the coordinator decides the next round should open, the actual
//! transition may be owned by an external service rather than the
//! client. [`RoundAdvance`] is that seam; [`HttpRoundAdvance`] talks to
//! the `POST {base}/next-round` endpoint the production deployment
//! exposes.

use wordrally_protocol::{RoomCode, Username};

use crate::SessionError;

/// Requests that the next round be opened for a room.
pub trait RoundAdvance: Send + Sync + 'static {
    async fn next_round(
        &self,
        code: &RoomCode,
        username: &Username,
    ) -> Result<(), SessionError>;
}

/// Placeholder for coordinators without an external round-advance
/// service. Never invoked; the coordinator falls back to opening the
/// next round through the store directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRoundAdvance;

impl RoundAdvance for NoRoundAdvance {
    async fn next_round(
        &self,
        _code: &RoomCode,
        _username: &Username,
    ) -> Result<(), SessionError> {
        Ok(())
    }
}

#[cfg(feature = "http")]
pub use http::HttpRoundAdvance;

#[cfg(feature = "http")]
mod http {
    use serde::Serialize;
    use wordrally_protocol::{RoomCode, Username};

    use super::RoundAdvance;
    use crate::SessionError;

    #[derive(Serialize)]
    struct NextRoundBody<'a> {
        code: &'a str,
        username: &'a str,
    }

    /// Triggers round advancement over HTTP.
    #[derive(Debug, Clone)]
    pub struct HttpRoundAdvance {
        client: reqwest::Client,
        endpoint: String,
    }

    impl HttpRoundAdvance {
        /// `base_url` is the API root, e.g. `https://game.example.com/api`.
        pub fn new(base_url: impl AsRef<str>) -> Self {
            Self {
                client: reqwest::Client::new(),
                endpoint: format!(
                    "{}/next-round",
                    base_url.as_ref().trim_end_matches('/')
                ),
            }
        }
    }

    impl RoundAdvance for HttpRoundAdvance {
        async fn next_round(
            &self,
            code: &RoomCode,
            username: &Username,
        ) -> Result<(), SessionError> {
            let response = self
                .client
                .post(&self.endpoint)
                .json(&NextRoundBody {
                    code: code.as_str(),
                    username: username.as_str(),
                })
                .send()
                .await
                .map_err(|e| SessionError::TransportFailure(e.to_string()))?;
            response
                .error_for_status()
                .map_err(|e| SessionError::TransportFailure(e.to_string()))?;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_endpoint_joins_without_double_slash() {
            let advance = HttpRoundAdvance::new("https://game.example.com/api/");
            assert_eq!(
                advance.endpoint,
                "https://game.example.com/api/next-round"
            );
        }
    }
}

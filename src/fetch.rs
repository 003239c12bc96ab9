//! Graceful degradation of read requests.

use std::{collections::BTreeMap, future::Future};

use derive_more::Display;
use futures_util::future::join_all;

use crate::{
    api::{StatusError, UnexpectedDevice},
    prelude::*,
};

/// Why a placeholder is shown instead of the live data.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum FallbackReason {
    /// Transport error or timeout.
    #[display("unreachable")]
    Unreachable,

    /// Non-successful HTTP status.
    #[display("HTTP {_0}")]
    Status(u16),

    /// The response body could not be parsed, or does not match the request.
    #[display("malformed response")]
    Malformed,
}

impl From<&Error> for FallbackReason {
    fn from(error: &Error) -> Self {
        for cause in error.chain() {
            if let Some(error) = cause.downcast_ref::<StatusError>() {
                return Self::Status(error.status.as_u16());
            }
            if cause.is::<serde_json::Error>() || cause.is::<UnexpectedDevice>() {
                return Self::Malformed;
            }
            if let Some(error) = cause.downcast_ref::<reqwest::Error>()
                && error.is_decode()
            {
                return Self::Malformed;
            }
        }
        Self::Unreachable
    }
}

/// Outcome of a read request that never fails.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum Fetched<T> {
    Live(T),
    Fallback { value: T, reason: FallbackReason },
}

impl<T> Fetched<T> {
    pub const fn get(&self) -> &T {
        match self {
            Self::Live(value) | Self::Fallback { value, .. } => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Live(value) | Self::Fallback { value, .. } => value,
        }
    }

    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    #[must_use]
    pub const fn reason(&self) -> Option<FallbackReason> {
        match self {
            Self::Live(_) => None,
            Self::Fallback { reason, .. } => Some(*reason),
        }
    }
}

/// Await the request, substituting the fallback on any failure.
pub async fn or_default<T>(request: impl Future<Output = Result<T>>, fallback: T) -> Fetched<T> {
    match request.await {
        Ok(value) => Fetched::Live(value),
        Err(error) => {
            let reason = FallbackReason::from(&error);
            warn!(%reason, "falling back to a placeholder: {error:#}");
            Fetched::Fallback { value: fallback, reason }
        }
    }
}

/// Run the keyed requests concurrently, each falling back independently.
///
/// The results are keyed, not ordered by completion. For duplicate keys, the last request wins.
pub async fn many<K, F, T>(requests: impl IntoIterator<Item = (K, F, T)>) -> BTreeMap<K, Fetched<T>>
where
    K: Ord,
    F: Future<Output = Result<T>>,
{
    let (keys, requests): (Vec<K>, Vec<_>) = requests
        .into_iter()
        .map(|(key, request, fallback)| (key, or_default(request, fallback)))
        .unzip();
    keys.into_iter().zip(join_all(requests).await).collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;

    use super::*;

    #[tokio::test]
    async fn test_or_default_live() {
        let fetched = or_default(async { Ok::<_, Error>(42) }, 0).await;
        assert_eq!(fetched, Fetched::Live(42));
        assert!(fetched.is_live());
        assert_eq!(fetched.reason(), None);
    }

    #[tokio::test]
    async fn test_or_default_unreachable() {
        let fetched = or_default(async { Err::<i32, _>(anyhow!("connection refused")) }, 0).await;
        assert_eq!(fetched, Fetched::Fallback { value: 0, reason: FallbackReason::Unreachable });
        assert_eq!(fetched.into_inner(), 0);
    }

    #[tokio::test]
    async fn test_or_default_status() {
        let request = async {
            Err::<u32, _>(StatusError::new(StatusCode::SERVICE_UNAVAILABLE, ""))
                .context("failed to fetch")
        };
        assert_eq!(or_default(request, 0).await.reason(), Some(FallbackReason::Status(503)));
    }

    #[tokio::test]
    async fn test_or_default_malformed() {
        let request = async { serde_json::from_str::<u32>("\"oops\"").map_err(Error::from) };
        assert_eq!(or_default(request, 7).await.reason(), Some(FallbackReason::Malformed));
    }

    #[tokio::test]
    async fn test_or_default_unexpected_device() {
        let request = async {
            Err::<u32, _>(Error::from(UnexpectedDevice {
                requested: "HP-001".to_string(),
                received: "HP-999".to_string(),
            }))
        };
        assert_eq!(or_default(request, 0).await.reason(), Some(FallbackReason::Malformed));
    }

    #[tokio::test]
    async fn test_many_empty() {
        let requests: Vec<(String, std::future::Ready<Result<u32>>, u32)> = Vec::new();
        assert!(many(requests).await.is_empty());
    }

    #[tokio::test]
    async fn test_many_keyed_by_identity() {
        let request = |delay_millis: u64, value: Result<u32>| async move {
            tokio::time::sleep(Duration::from_millis(delay_millis)).await;
            value
        };
        let results = many([
            ("HP-001", request(30, Ok(1)), 0),
            ("HP-002", request(1, Err(anyhow!("timed out"))), 0),
            ("HP-003", request(10, Ok(3)), 0),
        ])
        .await;
        assert_eq!(results.len(), 3);
        assert_eq!(results["HP-001"], Fetched::Live(1));
        assert_eq!(results["HP-002"].reason(), Some(FallbackReason::Unreachable));
        assert_eq!(results["HP-003"], Fetched::Live(3));
    }

    #[tokio::test]
    async fn test_many_duplicate_key_last_wins() {
        let results = many([
            ("HP-001", std::future::ready(Ok::<_, Error>(1)), 0),
            ("HP-001", std::future::ready(Ok(2)), 0),
        ])
        .await;
        assert_eq!(results.len(), 1);
        assert_eq!(results["HP-001"], Fetched::Live(2));
    }
}

//! Two-tier lookup for reads that have a bundled equivalent.
//!
//! Reads try the backend first. Any remote failure is logged and the bundled
//! copy answers instead. The returned [`Tiered`] value records which tier
//! served the data so callers and tests can tell a live answer from a
//! degraded one.

use std::fmt;
use std::future::Future;

use serde::Serialize;
use tracing::warn;

/// Which tier served a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// The hosted backend answered.
    Remote,
    /// The backend failed and bundled data was substituted.
    Bundled,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => f.write_str("remote"),
            Self::Bundled => f.write_str("bundled"),
        }
    }
}

/// A value paired with the tier that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tiered<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Tiered<T> {
    /// Wrap a value served by the backend.
    pub fn remote(value: T) -> Self {
        Self {
            value,
            source: DataSource::Remote,
        }
    }

    /// Wrap a value served from bundled data.
    pub fn bundled(value: T) -> Self {
        Self {
            value,
            source: DataSource::Bundled,
        }
    }

    /// Whether the value came from the fallback tier.
    pub fn is_degraded(&self) -> bool {
        self.source == DataSource::Bundled
    }

    /// Transform the value while keeping its provenance.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Tiered<U> {
        Tiered {
            value: f(self.value),
            source: self.source,
        }
    }

    /// Discard provenance.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Await the remote read and fall back to `bundled` on error.
///
/// An empty remote result is a valid answer and is returned as-is.
///
/// # Examples
/// ```
/// use companion::domain::{DataSource, with_fallback};
///
/// # tokio_test_block_on(async {
/// let served = with_fallback(
///     "chapters",
///     async { Err::<Vec<u16>, _>("connection refused") },
///     || vec![1, 2, 3],
/// )
/// .await;
/// assert_eq!(served.source, DataSource::Bundled);
/// assert_eq!(served.value, vec![1, 2, 3]);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().expect("runtime").block_on(f)
/// # }
/// ```
pub async fn with_fallback<T, E, Fut, F>(resource: &str, remote: Fut, bundled: F) -> Tiered<T>
where
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
    F: FnOnce() -> T,
{
    match remote.await {
        Ok(value) => Tiered::remote(value),
        Err(error) => {
            warn!(resource, error = %error, "remote read failed; serving bundled data");
            Tiered::bundled(bundled())
        }
    }
}

//! Backend connection settings loaded via OrthoConfig.
//!
//! Raw [`BackendSettings`] come from CLI arguments, `COMPANION_*` environment
//! variables, and config files. They are validated into a [`BackendConfig`]
//! before any adapter is built; secrets in the validated form are zeroised
//! on drop and only ever logged as fingerprints.

use std::fmt;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use url::Url;
use zeroize::Zeroizing;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Length of the key fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Unvalidated backend settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COMPANION")]
pub struct BackendSettings {
    /// Project URL of the hosted backend.
    pub backend_url: Option<String>,
    /// Public anonymous API key.
    pub anon_key: Option<String>,
    /// Access token of a signed-in user.
    pub access_token: Option<String>,
    /// HTTP request timeout in seconds.
    #[ortho_config(default = 10)]
    pub timeout_secs: u64,
}

impl BackendSettings {
    /// Return the configured request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Reasons settings cannot become a [`BackendConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendConfigError {
    #[error("backend URL is not configured (set COMPANION_BACKEND_URL)")]
    MissingUrl,
    #[error("backend URL is invalid: {message}")]
    InvalidUrl { message: String },
    #[error("anon key is not configured (set COMPANION_ANON_KEY)")]
    MissingAnonKey,
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Validated connection details for the REST adapters.
#[derive(Clone)]
pub struct BackendConfig {
    base_url: Url,
    anon_key: Zeroizing<String>,
    access_token: Option<Zeroizing<String>>,
    timeout: Duration,
}

impl BackendConfig {
    /// Build a config from a URL and anon key with the default timeout.
    ///
    /// # Examples
    /// ```
    /// use companion::config::BackendConfig;
    ///
    /// let config = BackendConfig::new("https://demo.example.test", "anon")
    ///     .expect("valid config");
    /// assert_eq!(config.base_url().as_str(), "https://demo.example.test/");
    /// assert!(config.access_token().is_none());
    /// ```
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, BackendConfigError> {
        let anon_key = anon_key.trim();
        if anon_key.is_empty() {
            return Err(BackendConfigError::MissingAnonKey);
        }
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            anon_key: Zeroizing::new(anon_key.to_owned()),
            access_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Attach a user access token. Blank tokens are ignored.
    #[must_use]
    pub fn with_access_token(mut self, token: &str) -> Self {
        let token = token.trim();
        self.access_token = (!token.is_empty()).then(|| Zeroizing::new(token.to_owned()));
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, BackendConfigError> {
        if timeout.is_zero() {
            return Err(BackendConfigError::ZeroTimeout);
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn anon_key(&self) -> &str {
        self.anon_key.as_str()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(|token| token.as_str())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Token sent as the bearer credential: the access token when signed in,
    /// otherwise the anon key.
    pub fn bearer(&self) -> &str {
        self.access_token().unwrap_or_else(|| self.anon_key())
    }

    /// Fingerprint of the anon key for logs.
    pub fn anon_key_fingerprint(&self) -> String {
        key_fingerprint(self.anon_key())
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field("anon_key", &self.anon_key_fingerprint())
            .field("signed_in", &self.access_token.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TryFrom<BackendSettings> for BackendConfig {
    type Error = BackendConfigError;

    fn try_from(settings: BackendSettings) -> Result<Self, Self::Error> {
        let timeout = settings.timeout();
        let url = settings
            .backend_url
            .ok_or(BackendConfigError::MissingUrl)?;
        let anon_key = Zeroizing::new(
            settings
                .anon_key
                .ok_or(BackendConfigError::MissingAnonKey)?,
        );
        let access_token = settings.access_token.map(Zeroizing::new);

        let config = Self::new(&url, &anon_key)?.with_timeout(timeout)?;
        Ok(match access_token {
            Some(token) => config.with_access_token(&token),
            None => config,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, BackendConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BackendConfigError::MissingUrl);
    }
    let mut url = Url::parse(raw).map_err(|err| BackendConfigError::InvalidUrl {
        message: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BackendConfigError::InvalidUrl {
            message: format!("unsupported scheme {}", url.scheme()),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Truncated SHA-256 fingerprint of a key as 16 hex characters.
///
/// # Examples
/// ```
/// use companion::config::key_fingerprint;
///
/// let fp = key_fingerprint("anon-key");
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn key_fingerprint(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
}

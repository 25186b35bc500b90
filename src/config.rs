use std::time::Duration;
use url::Url;

/// Upload ceiling enforced before any transfer starts (16 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Root of the storage-verification service; API paths are joined onto it.
    pub base_url: Url,

    pub max_upload_bytes: u64,

    /// How long a notification stays visible before it removes itself.
    pub notification_ttl: Duration,

    /// How long the upload success banner is shown before returning to idle.
    pub upload_banner_ttl: Duration,

    /// Rows shown in the dashboard's recent-files table.
    pub dashboard_row_limit: usize,

    /// Size of the body slices fed to the multipart stream; progress is reported per slice.
    pub upload_chunk_size: usize,

    /// No timeout beyond the HTTP client's own when unset.
    pub request_timeout: Option<Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            notification_ttl: Duration::from_millis(5000),
            upload_banner_ttl: Duration::from_millis(3000),
            dashboard_row_limit: 5,
            upload_chunk_size: 64 * 1024,
            request_timeout: None,
        }
    }
}

impl DashboardConfig {
    /// Create a config pointing at a specific service root
    pub fn with_base_url(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: normalize_base(Url::parse(base_url)?),
            ..Default::default()
        })
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    pub fn with_upload_banner_ttl(mut self, ttl: Duration) -> Self {
        self.upload_banner_ttl = ttl;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_upload_chunk_size(mut self, size: usize) -> Self {
        self.upload_chunk_size = size.max(1);
        self
    }

    /// Build a config from `DASHBOARD_URL`, `DASHBOARD_REQUEST_TIMEOUT_SECS` and
    /// `DASHBOARD_NOTIFICATION_TTL_MS`, falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, url::ParseError> {
        let mut config = match std::env::var("DASHBOARD_URL") {
            Ok(url) => Self::with_base_url(&url)?,
            Err(_) => Self::default(),
        };

        if let Some(secs) = env_u64("DASHBOARD_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(ms) = env_u64("DASHBOARD_NOTIFICATION_TTL_MS") {
            config.notification_ttl = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

fn env_u64(key: &str) -> Option<u64> {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, value = %raw, error = %e, "ignoring invalid environment value");
                None
            }
        },
        Err(_) => None,
    }
}

// Url::join drops the last segment unless the base ends with '/'
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.notification_ttl, Duration::from_millis(5000));
        assert_eq!(config.upload_banner_ttl, Duration::from_millis(3000));
        assert_eq!(config.dashboard_row_limit, 5);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = DashboardConfig::with_base_url("http://example.test/validator").unwrap();
        assert_eq!(config.base_url.as_str(), "http://example.test/validator/");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(DashboardConfig::with_base_url("not a url").is_err());
    }

    #[test]
    fn test_builder_setters() {
        let config = DashboardConfig::default()
            .with_notification_ttl(Duration::from_millis(10))
            .with_upload_chunk_size(0)
            .with_request_timeout(Duration::from_secs(2));

        assert_eq!(config.notification_ttl, Duration::from_millis(10));
        assert_eq!(config.upload_chunk_size, 1);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(2)));
    }
}

use crate::ReportFrequency;

/// Environment variable holding a pre-authenticated Yahoo cookie.
pub const YAHOO_COOKIE_ENV: &str = "YAHOO_COOKIE";

const DEFAULT_USER_AGENT: &str = concat!("solvency/", env!("CARGO_PKG_VERSION"));

/// Provider transport settings shared by adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Per-request transport timeout in milliseconds.
    pub timeout_ms: u64,
    pub user_agent: String,
    /// Serve deterministic synthetic data instead of calling the provider.
    pub mock: bool,
    pub frequency: ReportFrequency,
    /// Cookie override; skips the session-cookie handshake when set.
    pub cookie: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            user_agent: String::from(DEFAULT_USER_AGENT),
            mock: false,
            frequency: ReportFrequency::Annual,
            cookie: None,
        }
    }
}

impl ProviderConfig {
    /// Defaults overlaid with environment overrides.
    pub fn from_env() -> Self {
        Self {
            cookie: std::env::var(YAHOO_COOKIE_ENV)
                .ok()
                .filter(|value| !value.trim().is_empty()),
            ..Self::default()
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_mock(mut self, mock: bool) -> Self {
        self.mock = mock;
        self
    }

    pub fn with_frequency(mut self, frequency: ReportFrequency) -> Self {
        self.frequency = frequency;
        self
    }
}

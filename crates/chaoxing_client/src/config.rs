use crate::ChaoxingError;
use secrecy::SecretString;
use std::time::Duration;

/// Knobs for the concurrent course scan.
///
/// Passed explicitly into the orchestrator and the HTTP client builder so the
/// limits live in one value instead of process-wide state.
#[derive(Clone, Debug)]
pub struct ScanConfig {
    /// Maximum number of courses scanned concurrently.
    pub max_concurrent: usize,
    /// Fixed timeout applied to every single remote request.
    pub request_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 10,
            request_timeout: Duration::from_secs(8),
        }
    }
}

impl ScanConfig {
    pub fn from_env() -> Result<Self, ChaoxingError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads the optional scan knobs using the provided
    /// function, so tests never touch the global environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, ChaoxingError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = get("CHAOXING_MAX_CONCURRENT") {
            config.max_concurrent = raw
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ChaoxingError::Config(format!("invalid CHAOXING_MAX_CONCURRENT: {raw}"))
                })?;
        }
        if let Some(raw) = get("CHAOXING_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                ChaoxingError::Config(format!("invalid CHAOXING_TIMEOUT_SECS: {raw}"))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

/// Account credentials plus scan knobs resolved from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub phone: String,
    pub password: SecretString,
    pub scan: ScanConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ChaoxingError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(mut get: F) -> Result<Self, ChaoxingError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let phone = get("CHAOXING_PHONE")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ChaoxingError::Config("CHAOXING_PHONE missing".into()))?;
        let password = get("CHAOXING_PASSWORD")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ChaoxingError::Config("CHAOXING_PASSWORD missing".into()))?;
        let scan = ScanConfig::from_env_with(get)?;
        Ok(Self {
            phone,
            password: SecretString::new(password.into()),
            scan,
        })
    }
}

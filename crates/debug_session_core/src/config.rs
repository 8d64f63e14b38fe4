use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:4000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_RESTART_SETTLE: Duration = Duration::from_millis(250);
const DEFAULT_SOURCE_FILE: &str = "main.nr";

#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Base URL of the debug-adapter server, without a trailing slash.
    pub endpoint: String,
    /// Bound for start, step, fetch and breakpoint calls.
    pub timeout: Duration,
    /// Bound for `GET /debug/health`, kept short so a dead server is noticed quickly.
    pub health_timeout: Duration,
    /// Pause between terminating the old session and starting the new one on restart.
    pub restart_settle: Duration,
    /// Source file reported with breakpoint requests when the session has none.
    pub source_file: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            restart_settle: DEFAULT_RESTART_SETTLE,
            source_file: DEFAULT_SOURCE_FILE.to_string(),
        }
    }
}

impl DebugConfig {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint.into()),
            timeout,
            ..Self::default()
        }
    }

    pub fn with_health_timeout(mut self, health_timeout: Duration) -> Self {
        self.health_timeout = health_timeout;
        self
    }

    pub fn with_restart_settle(mut self, restart_settle: Duration) -> Self {
        self.restart_settle = restart_settle;
        self
    }

    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = source_file.into();
        self
    }

    pub fn from_env() -> Self {
        let endpoint = std::env::var("DEBUG_ADAPTER_ENDPOINT")
            .map(normalize_endpoint)
            .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let source_file = std::env::var("DEBUG_SOURCE_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE_FILE.to_string());

        Self {
            endpoint,
            timeout: duration_from_env("DEBUG_ADAPTER_TIMEOUT_MS").unwrap_or(DEFAULT_TIMEOUT),
            health_timeout: duration_from_env("DEBUG_ADAPTER_HEALTH_TIMEOUT_MS")
                .unwrap_or(DEFAULT_HEALTH_TIMEOUT),
            restart_settle: duration_from_env("DEBUG_RESTART_SETTLE_MS")
                .unwrap_or(DEFAULT_RESTART_SETTLE),
            source_file,
        }
    }
}

fn normalize_endpoint(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}

fn duration_from_env(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DebugConfig::default();
        assert_eq!(config.endpoint, "http://127.0.0.1:4000");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.health_timeout, Duration::from_secs(3));
        assert_eq!(config.restart_settle, Duration::from_millis(250));
        assert_eq!(config.source_file, "main.nr");
    }

    #[test]
    fn test_new_config_trims_trailing_slash() {
        let config = DebugConfig::new("http://localhost:8080/", Duration::from_secs(10));
        assert_eq!(config.endpoint, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.health_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_builder_overrides() {
        let config = DebugConfig::default()
            .with_health_timeout(Duration::from_millis(500))
            .with_restart_settle(Duration::ZERO)
            .with_source_file("src/lib.nr");
        assert_eq!(config.health_timeout, Duration::from_millis(500));
        assert_eq!(config.restart_settle, Duration::ZERO);
        assert_eq!(config.source_file, "src/lib.nr");
    }

    // Both env scenarios live in one test; the variables are process-global.
    #[test]
    fn test_from_env() {
        std::env::remove_var("DEBUG_ADAPTER_ENDPOINT");
        std::env::remove_var("DEBUG_ADAPTER_TIMEOUT_MS");
        std::env::remove_var("DEBUG_ADAPTER_HEALTH_TIMEOUT_MS");
        std::env::remove_var("DEBUG_RESTART_SETTLE_MS");
        std::env::remove_var("DEBUG_SOURCE_FILE");

        let config = DebugConfig::from_env();
        assert_eq!(config.endpoint, "http://127.0.0.1:4000");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.source_file, "main.nr");

        std::env::set_var("DEBUG_ADAPTER_ENDPOINT", "http://custom:9999/");
        std::env::set_var("DEBUG_ADAPTER_TIMEOUT_MS", "5000");
        std::env::set_var("DEBUG_ADAPTER_HEALTH_TIMEOUT_MS", "not-a-number");
        std::env::set_var("DEBUG_RESTART_SETTLE_MS", "0");
        std::env::set_var("DEBUG_SOURCE_FILE", "circuit.nr");

        let config = DebugConfig::from_env();
        assert_eq!(config.endpoint, "http://custom:9999");
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert_eq!(config.health_timeout, Duration::from_secs(3));
        assert_eq!(config.restart_settle, Duration::ZERO);
        assert_eq!(config.source_file, "circuit.nr");

        std::env::remove_var("DEBUG_ADAPTER_ENDPOINT");
        std::env::remove_var("DEBUG_ADAPTER_TIMEOUT_MS");
        std::env::remove_var("DEBUG_ADAPTER_HEALTH_TIMEOUT_MS");
        std::env::remove_var("DEBUG_RESTART_SETTLE_MS");
        std::env::remove_var("DEBUG_SOURCE_FILE");
    }
}

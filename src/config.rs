use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::time::Duration;

pub const MOJANG_API_URL: &str = "https://api.mojang.com";
pub const MOJANG_SESSION_URL: &str = "https://sessionserver.mojang.com";
pub const RENDER_URL: &str = "https://crafatar.com";

/// Connect and read timeout applied to every single request.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

pub static APP_DIRECTORY: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("io", "felixtech", "MinecraftPlayerInfo"));

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Directory for log files, falling back to `./logs` when the platform
/// has no home directory.
pub fn log_dir() -> PathBuf {
    match APP_DIRECTORY.as_ref() {
        Some(dirs) => dirs.data_dir().join("logs"),
        None => PathBuf::from("logs"),
    }
}

/// Settings for the directory client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Connect timeout and whole-request read timeout for one request
    pub timeout: Duration,
    /// Optional budget for a complete `lookup_player` sequence
    pub lookup_deadline: Option<Duration>,
    /// Base URL of the identity service
    pub api_base_url: String,
    /// Base URL of the session service
    pub session_base_url: String,
    /// Base URL of the body render service
    pub render_base_url: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            lookup_deadline: None,
            api_base_url: MOJANG_API_URL.to_string(),
            session_base_url: MOJANG_SESSION_URL.to_string(),
            render_base_url: RENDER_URL.to_string(),
            user_agent: APP_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_millis(self, millis: u64) -> Self {
        self.with_timeout(Duration::from_millis(millis))
    }

    pub fn with_lookup_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.lookup_deadline = deadline;
        self
    }

    pub fn with_api_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.api_base_url = trim_base(url.into());
        self
    }

    pub fn with_session_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.session_base_url = trim_base(url.into());
        self
    }

    pub fn with_render_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.render_base_url = trim_base(url.into());
        self
    }
}

fn trim_base(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert!(config.lookup_deadline.is_none());
        assert_eq!(config.api_base_url, "https://api.mojang.com");
        assert!(config.user_agent.starts_with("mc-player-info/"));
    }

    #[test]
    fn test_base_urls_lose_trailing_slash() {
        let config = ClientConfig::new()
            .with_api_base_url("http://127.0.0.1:8080/")
            .with_session_base_url("http://127.0.0.1:8081//");
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080");
        assert_eq!(config.session_base_url, "http://127.0.0.1:8081");
    }
}

// Configuration module entry point
// Loads settings from file + environment and owns the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, GitHubConfig};

/// Default config file, looked up without extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Environment variables use the `DEMO` prefix and `__` as the nesting
    /// separator, e.g. `DEMO_SECRETS__PATH=/run/secrets`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEMO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("secrets.path", "/opt/demo/secrets")?
            .set_default("github.api_base", "https://api.github.com")?
            .set_default("github.user_agent", "github-secrets-proxy")?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that could never serve a request
    fn validate(&self) -> Result<(), config::ConfigError> {
        self.get_socket_addr().map_err(config::ConfigError::Message)?;

        let api_base = reqwest::Url::parse(&self.github.api_base).map_err(|e| {
            config::ConfigError::Message(format!(
                "Invalid github.api_base '{}': {e}",
                self.github.api_base
            ))
        })?;
        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(config::ConfigError::Message(format!(
                "github.api_base must be an http(s) URL, got '{}'",
                self.github.api_base
            )));
        }

        if !self.routes.orgs_path.starts_with('/') {
            return Err(config::ConfigError::Message(format!(
                "routes.orgs_path must start with '/', got '{}'",
                self.routes.orgs_path
            )));
        }

        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

use serde::Deserialize;
use tracing::info;

/// Application configuration from the environment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Bearer credential for the rendering service. Optional; raises rate
    /// limits and allows private context repositories.
    pub github_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables or a .env file
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        match envy::from_env::<Config>() {
            Ok(config) => {
                info!("✅ Configuration loaded");
                Ok(config)
            }
            Err(e) => Err(ConfigError::EnvError(e)),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EnvError(envy::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EnvError(e) => write!(f, "Environment variable error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

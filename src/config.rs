use crate::types::{Credentials, Environment};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "cmapi-playground";

pub const PROD_ENDPOINT: &str = "cloudmanager.adobe.io";
pub const STAGE_ENDPOINT: &str = "cloudmanager-stage.adobe.io";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub environment: Environment,
    /// Host override; when unset the environment picks the endpoint
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub client_id: Option<String>,
    pub org_id: Option<String>,
}

impl Config {
    /// Directory holding the config and location files (`~/.config/cmapi-playground`)
    pub fn app_dir() -> Result<PathBuf> {
        // Use ~/.config instead of platform-specific directory
        let home_dir = dirs::home_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not find home directory"))?;

        let app_dir = home_dir.join(".config").join(APP_DIR);
        if !app_dir.exists() {
            fs::create_dir_all(&app_dir)?;
        }

        Ok(app_dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::app_dir()?.join("config.toml"))
    }

    /// Load config from `path`, or defaults if the file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Host requests are sent to
    pub fn endpoint(&self) -> String {
        self.server
            .endpoint
            .clone()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| default_endpoint(self.server.environment).to_string())
    }
}

pub fn default_endpoint(environment: Environment) -> &'static str {
    match environment {
        Environment::Prod => PROD_ENDPOINT,
        Environment::Stage => STAGE_ENDPOINT,
    }
}

/// Values given on the command line or via environment variables
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub org_id: Option<String>,
    pub client_id: Option<String>,
    pub access_token: Option<String>,
    pub stage: bool,
    pub endpoint: Option<String>,
}

/// Everything a session needs to talk to the API
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub credentials: Credentials,
}

impl Settings {
    /// Command-line values win over the config file
    pub fn resolve(config: &Config, overrides: Overrides) -> Result<Self> {
        let mut config = config.clone();
        if overrides.stage {
            config.server.environment = Environment::Stage;
        }
        if let Some(endpoint) = overrides.endpoint {
            config.server.endpoint = Some(endpoint);
        }

        let endpoint = config.endpoint();
        validate_host(&endpoint).map_err(|e| color_eyre::eyre::eyre!(e))?;

        Ok(Self {
            endpoint,
            credentials: Credentials {
                access_token: overrides.access_token.unwrap_or_default(),
                client_id: overrides
                    .client_id
                    .or(config.auth.client_id)
                    .unwrap_or_default(),
                org_id: overrides.org_id.or(config.auth.org_id).unwrap_or_default(),
            },
        })
    }
}

/// A bare host name (optionally with a port), as used in `https://{host}{path}`
pub fn validate_host(host: &str) -> Result<(), String> {
    if host.is_empty() {
        return Err("Endpoint cannot be empty".to_string());
    }

    if host.contains("://") {
        return Err("Endpoint is a host name, leave out the scheme".to_string());
    }

    if host.chars().any(char::is_whitespace) {
        return Err("Endpoint cannot contain whitespace".to_string());
    }

    if host.contains('/') {
        return Err("Endpoint cannot contain a path".to_string());
    }

    Ok(())
}

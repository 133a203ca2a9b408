use crate::errors::ConfigurationError;
use config::{Config, ConfigError, FileFormat};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::env::var;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://placehold.co/400x400?text=No+Image";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
const DEFAULT_PREFERENCES_PATH: &str = "data/preferences.json";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: Application,
    pub backend: BackendSettings,
    pub storage: StorageSettings,
    pub display: DisplaySettings,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Application {
    pub host: String,
    pub port: u16,
}

/// Where the price-tracking backend lives.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BackendSettings {
    #[serde_as(as = "DisplayFromStr")]
    pub base_url: Url,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StorageSettings {
    #[serde_as(as = "DisplayFromStr")]
    pub storage_type: StorageType,
    pub file_path: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DisplaySettings {
    pub currency_symbol: String,
    pub placeholder_image: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    InMemory,
    File,
}

impl Display for StorageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::InMemory => write!(f, "in_memory"),
            StorageType::File => write!(f, "file"),
        }
    }
}

impl FromStr for StorageType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(StorageType::File),
            "in_memory" => Ok(StorageType::InMemory),
            other => Err(ConfigurationError::UnknownStorageType(other.to_string())),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            storage_type: StorageType::InMemory,
            file_path: None,
        }
    }
}

impl StorageSettings {
    pub fn is_valid(&self) -> Result<(), ConfigurationError> {
        match self.storage_type {
            StorageType::InMemory => Ok(()),
            StorageType::File => self.file_path().map(|_| ()),
        }
    }

    pub fn file_path(&self) -> Result<&str, ConfigurationError> {
        match self.file_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Ok(path),
            _ => Err(ConfigurationError::MissingStorageFile),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// The possible runtime environment for our application.
#[derive(Debug, Eq, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(format!(
                "{other} is not a supported environment. Use either `dev` or `prod`."
            )),
        }
    }
}

pub fn get_env() -> Result<Environment, ConfigError> {
    var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "dev".into())
        .try_into()
        .map_err(ConfigError::Message)
}

/// Layers built-in defaults, `configuration/base.yaml`, the per-environment
/// file and finally `APP_*` environment variables (`APP_BACKEND__BASE_URL`).
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let environment = get_env()?;
    let second_source = format!("configuration/{}", environment.as_str());
    let settings = Config::builder()
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 3000)?
        .set_default("backend.base_url", DEFAULT_BACKEND_URL)?
        .set_default("storage.storage_type", StorageType::File.to_string())?
        .set_default("storage.file_path", DEFAULT_PREFERENCES_PATH)?
        .set_default("display.currency_symbol", DEFAULT_CURRENCY_SYMBOL)?
        .set_default("display.placeholder_image", DEFAULT_PLACEHOLDER_IMAGE)?
        .add_source(config::File::new("configuration/base", FileFormat::Yaml).required(false))
        .add_source(config::File::new(&second_source, FileFormat::Yaml).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}

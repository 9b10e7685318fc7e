use std::path::Path;
use std::time::Duration;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;
use tracing::Level;

use crate::error::AppError;
use crate::pipeline::services::BoundaryPolicy;

const DEFAULT_CONFIG_FILE: &str = "agrivision";
const ENV_PREFIX: &str = "AGRIVISION";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub log_level: String,
    pub server: ServerConfiguration,
    pub cors: CorsConfiguration,
    pub analysis: AnalysisConfiguration,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfiguration {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorsPolicy {
    /// Any origin, method and header; credentials allowed. The origin is
    /// mirrored back because a literal `*` cannot be combined with credentials.
    Permissive,
    /// Only the origins listed in `allowed_origins`.
    AllowList,
    /// No cross-origin headers at all.
    Disabled,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfiguration {
    pub policy: CorsPolicy,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfiguration {
    pub resize_width: u32,
    pub resize_height: u32,
    pub boundary_policy: BoundaryPolicy,
    pub timeout_ms: u64,
    pub max_concurrent: usize,
    pub max_image_pixels: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerConfiguration::default(),
            cors: CorsConfiguration::default(),
            analysis: AnalysisConfiguration::default(),
        }
    }
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Default for CorsConfiguration {
    fn default() -> Self {
        Self {
            policy: CorsPolicy::Permissive,
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for AnalysisConfiguration {
    fn default() -> Self {
        Self {
            resize_width: 500,
            resize_height: 500,
            boundary_policy: BoundaryPolicy::Overlapping,
            timeout_ms: 30_000,
            max_concurrent: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            max_image_pixels: 64_000_000,
        }
    }
}

impl AnalysisConfiguration {
    pub fn target_dimensions(&self) -> (u32, u32) {
        (self.resize_width, self.resize_height)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl ServerConfiguration {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Configuration {
    /// Loads defaults, then the optional config file, then `AGRIVISION__*`
    /// environment variables (e.g. `AGRIVISION__SERVER__PORT=9000`).
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let builder = config::Config::builder().add_source(file).add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins"),
        );
        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let configuration: Configuration = builder.build()?.try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn log_level(&self) -> Result<Level, AppError> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| AppError::InvalidConfig(format!("unknown log level '{}'", self.log_level)))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.analysis.resize_width == 0 || self.analysis.resize_height == 0 {
            return Err(AppError::InvalidConfig(
                "Resize dimensions must be greater than 0".to_string(),
            ));
        }

        if self.analysis.max_concurrent == 0 {
            return Err(AppError::InvalidConfig(
                "Max concurrent analyses must be greater than 0".to_string(),
            ));
        }

        if self.analysis.timeout_ms == 0 {
            return Err(AppError::InvalidConfig(
                "Analysis timeout must be greater than 0".to_string(),
            ));
        }

        if self.analysis.max_image_pixels == 0 {
            return Err(AppError::InvalidConfig(
                "Max image pixels must be greater than 0".to_string(),
            ));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(AppError::InvalidConfig(
                "Max upload size must be greater than 0".to_string(),
            ));
        }

        if self.cors.policy == CorsPolicy::AllowList && self.cors.allowed_origins.is_empty() {
            return Err(AppError::InvalidConfig(
                "CORS allow list policy needs at least one origin".to_string(),
            ));
        }

        self.log_level()?;

        Ok(())
    }
}

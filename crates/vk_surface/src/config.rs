//! Configuration system
//!
//! Settings for creating a surface-capable instance. Files are TOML or RON,
//! chosen by extension.

use std::path::Path;

use serde::Deserialize;

/// Configuration loadable from a TOML or RON file
pub trait Config: for<'de> Deserialize<'de> + Default {
    /// Load configuration from file, choosing the format by extension
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnsupportedFormat`] for anything but `.toml`/`.ron`,
    /// checked before the file is opened; otherwise IO or parse failures.
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_toml = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => true,
            Some("ron") => false,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        let contents = std::fs::read_to_string(path)?;
        if is_toml {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML/RON for the target type
    #[error("Parse error: {0}")]
    Parse(String),

    /// Extension is neither `.toml` nor `.ron`
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values parsed but are not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Instance Configuration
///
/// Application metadata and extra layers/extensions for an instance that
/// will create window surfaces. The platform's surface extensions are always
/// enabled and need not be listed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    /// Application name for Vulkan instance creation
    pub application_name: String,
    /// Application version (major, minor, patch)
    pub application_version: (u32, u32, u32),
    /// Requested Vulkan API version (major, minor)
    pub api_version: (u32, u32),
    /// Whether to enable `VK_LAYER_KHRONOS_validation`
    pub enable_validation: bool,
    /// Instance extensions to enable in addition to the surface extensions
    pub extra_extensions: Vec<String>,
    /// `env_logger` filter, e.g. `info` or `vk_surface=debug`
    pub log_level: String,
}

impl InstanceConfig {
    /// Create a new instance configuration
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            application_name: app_name.into(),
            application_version: (1, 0, 0),
            api_version: (1, 0),
            enable_validation: cfg!(debug_assertions),
            extra_extensions: Vec::new(),
            log_level: "info".to_string(),
        }
    }

    /// Set application version
    #[must_use]
    pub const fn with_version(mut self, major: u32, minor: u32, patch: u32) -> Self {
        self.application_version = (major, minor, patch);
        self
    }

    /// Set the requested API version
    #[must_use]
    pub const fn with_api_version(mut self, major: u32, minor: u32) -> Self {
        self.api_version = (major, minor);
        self
    }

    /// Enable or disable validation layers
    #[must_use]
    pub const fn with_validation(mut self, enabled: bool) -> Self {
        self.enable_validation = enabled;
        self
    }

    /// Request an additional instance extension
    #[must_use]
    pub fn with_extension(mut self, name: impl Into<String>) -> Self {
        self.extra_extensions.push(name.into());
        self
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Packed `VkApplicationInfo::applicationVersion`
    pub const fn packed_application_version(&self) -> u32 {
        let (major, minor, patch) = self.application_version;
        ash::vk::make_api_version(0, major, minor, patch)
    }

    /// Packed `VkApplicationInfo::apiVersion`
    pub const fn packed_api_version(&self) -> u32 {
        let (major, minor) = self.api_version;
        ash::vk::make_api_version(0, major, minor, 0)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_name.is_empty() {
            return Err(ConfigError::Invalid("Application name cannot be empty".to_string()));
        }

        if self.application_name.contains('\0') {
            return Err(ConfigError::Invalid("Application name cannot contain NUL".to_string()));
        }

        if self.api_version.0 != 1 {
            return Err(ConfigError::Invalid(format!(
                "Unsupported API version {}.{}",
                self.api_version.0, self.api_version.1
            )));
        }

        if let Some(name) = self
            .extra_extensions
            .iter()
            .find(|name| name.is_empty() || name.contains('\0'))
        {
            return Err(ConfigError::Invalid(format!("Invalid extension name {name:?}")));
        }

        Ok(())
    }
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self::new("vk_surface application")
    }
}

impl Config for InstanceConfig {}

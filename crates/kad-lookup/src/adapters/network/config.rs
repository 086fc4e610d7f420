use crate::domain::LookupConfig;
use crate::ports::ConfigProvider;

// ============================================================================
// StaticConfigProvider - Hardcoded config for testing/development
// ============================================================================

/// Static configuration provider with hardcoded values.
///
/// Useful for testing and development. For deployments, use `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: LookupConfig,
}

impl StaticConfigProvider {
    /// Create with the default lookup config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with the specified lookup config.
    #[must_use]
    pub fn with_config(mut self, config: LookupConfig) -> Self {
        self.config = config;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn get_lookup_config(&self) -> LookupConfig {
        self.config.clone()
    }
}

// ============================================================================
// TomlConfigProvider - Config file loading (requires "network" feature)
// ============================================================================

#[cfg(feature = "network")]
mod toml_config {
    use super::*;
    use crate::domain::{ConfigError, FrontierPolicy};
    use serde::Deserialize;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    /// Configuration file structure.
    #[derive(Debug, Deserialize)]
    struct ConfigFile {
        #[serde(default)]
        lookup: LookupConfigFile,
    }

    #[derive(Debug, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    struct LookupConfigFile {
        k: Option<usize>,
        alpha: Option<usize>,
        query_timeout_ms: Option<u64>,
        connect_timeout_ms: Option<u64>,
        frontier_policy: Option<FrontierPolicyFile>,
    }

    #[derive(Debug, Clone, Copy, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum FrontierPolicyFile {
        Reset,
        Retain,
    }

    impl From<FrontierPolicyFile> for FrontierPolicy {
        fn from(value: FrontierPolicyFile) -> Self {
            match value {
                FrontierPolicyFile::Reset => FrontierPolicy::Reset,
                FrontierPolicyFile::Retain => FrontierPolicy::Retain,
            }
        }
    }

    /// TOML-based configuration provider.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// [lookup]
    /// k = 20
    /// alpha = 3
    /// query_timeout_ms = 3000
    /// connect_timeout_ms = 3000
    /// frontier_policy = "reset"   # or "retain"
    /// ```
    ///
    /// Missing keys take their defaults.
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        config: LookupConfig,
    }

    impl TomlConfigProvider {
        /// Load configuration from a TOML file.
        ///
        /// # Errors
        ///
        /// Returns error if the file cannot be read, parsed, or validated.
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

            Self::parse(&content)
        }

        /// Parse configuration from a TOML string.
        pub fn parse(content: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

            let defaults = LookupConfig::default();
            let lc = file.lookup;
            let config = LookupConfig {
                k: lc.k.unwrap_or(defaults.k),
                alpha: lc.alpha.unwrap_or(defaults.alpha),
                query_timeout: lc
                    .query_timeout_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.query_timeout),
                connect_timeout: lc
                    .connect_timeout_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.connect_timeout),
                frontier_policy: lc
                    .frontier_policy
                    .map(FrontierPolicy::from)
                    .unwrap_or(defaults.frontier_policy),
            };
            config.validate()?;

            Ok(Self { config })
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn get_lookup_config(&self) -> LookupConfig {
            self.config.clone()
        }
    }
}

#[cfg(feature = "network")]
pub use toml_config::TomlConfigProvider;

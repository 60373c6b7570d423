//! Sample configuration, layered: CLI args > ENV (`KILLRVIDEO_*`) > config
//! file > defaults.

use clap::ValueEnum;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::CqlError;
use crate::video::schema::KEYSPACE_NAME;

pub const CONFIG_PATHS: [&str; 2] = ["/etc/killrvideo/killrvideo.toml", "./killrvideo.toml"];

/// Where statements run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process session, no cluster needed
    #[default]
    Memory,
    /// Live cluster through the scylla driver (requires the `cassandra` feature)
    Cassandra,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SampleConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_contact_point")]
    pub contact_point: String,
    #[serde(default = "default_keyspace")]
    pub keyspace: String,
    #[serde(default = "default_replication_factor")]
    pub replication_factor: u32,
    #[serde(default = "default_truncate")]
    pub truncate: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Config file the values came from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

fn default_contact_point() -> String {
    "127.0.0.1:9042".to_string()
}

fn default_keyspace() -> String {
    KEYSPACE_NAME.to_string()
}

const fn default_replication_factor() -> u32 {
    1
}

const fn default_truncate() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            contact_point: default_contact_point(),
            keyspace: default_keyspace(),
            replication_factor: default_replication_factor(),
            truncate: default_truncate(),
            log_level: default_log_level(),
            source: None,
        }
    }
}

/// Values given on the command line; `None` keeps the lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub backend: Option<Backend>,
    pub contact_point: Option<String>,
    pub keyspace: Option<String>,
    pub replication_factor: Option<u32>,
    pub truncate: Option<bool>,
    pub log_level: Option<String>,
}

impl SampleConfig {
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, CqlError> {
        Self::load_from(&CONFIG_PATHS, overrides)
    }

    /// Reads the first existing file of `paths`, then the environment, then
    /// applies `overrides`.
    pub fn load_from<P: AsRef<Path>>(
        paths: &[P],
        overrides: &ConfigOverrides,
    ) -> Result<Self, CqlError> {
        let environment = Environment::with_prefix("KILLRVIDEO").try_parsing(true);
        Self::load_sources(paths, Some(environment), overrides)
    }

    fn load_sources<P: AsRef<Path>>(
        paths: &[P],
        environment: Option<Environment>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, CqlError> {
        let mut builder = Config::builder();

        // 1. Config file (optional)
        let source = paths
            .iter()
            .map(AsRef::as_ref)
            .find(|path| path.exists())
            .map(Path::to_path_buf);
        if let Some(path) = &source {
            builder = builder.add_source(File::from(path.as_path()));
        }

        // 2. Environment variables (KILLRVIDEO_*)
        if let Some(environment) = environment {
            builder = builder.add_source(environment);
        }

        // 3. Defaults come from serde
        let mut config: Self = builder.build()?.try_deserialize()?;
        config.source = source;

        // 4. CLI args override everything
        Ok(config.apply(overrides))
    }

    #[must_use]
    pub fn apply(self, overrides: &ConfigOverrides) -> Self {
        Self {
            backend: overrides.backend.unwrap_or(self.backend),
            contact_point: overrides.contact_point.clone().unwrap_or(self.contact_point),
            keyspace: overrides.keyspace.clone().unwrap_or(self.keyspace),
            replication_factor: overrides.replication_factor.unwrap_or(self.replication_factor),
            truncate: overrides.truncate.unwrap_or(self.truncate),
            log_level: overrides.log_level.clone().unwrap_or(self.log_level),
            source: self.source,
        }
    }

    pub fn validate(&self) -> Result<(), CqlError> {
        if self.keyspace.is_empty() || self.keyspace.contains('.') {
            return Err(CqlError::Config(format!("invalid keyspace name '{}'", self.keyspace)));
        }
        if self.replication_factor == 0 {
            return Err(CqlError::Config("replication_factor must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let missing = ["/nonexistent/killrvideo.toml"];
        let config =
            SampleConfig::load_sources(&missing, None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.keyspace, "killrvideo");
        assert_eq!(config.contact_point, "127.0.0.1:9042");
        assert_eq!(config.replication_factor, 1);
        assert!(config.truncate);
        assert!(config.source.is_none());
    }

    #[test]
    fn test_file_then_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "backend = \"cassandra\"").unwrap();
        writeln!(file, "keyspace = \"samples\"\ntruncate = false").unwrap();

        let config =
            SampleConfig::load_sources(&[file.path()], None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.backend, Backend::Cassandra);
        assert_eq!(config.keyspace, "samples");
        assert!(!config.truncate);
        assert_eq!(config.source.as_deref(), Some(file.path()));

        let overrides = ConfigOverrides {
            backend: Some(Backend::Memory),
            truncate: Some(true),
            ..ConfigOverrides::default()
        };
        let config = config.apply(&overrides);
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.keyspace, "samples");
        assert!(config.truncate);
    }

    #[test]
    fn test_validate() {
        assert!(SampleConfig::default().validate().is_ok());
        let bad = SampleConfig {
            keyspace: "a.b".to_string(),
            ..SampleConfig::default()
        };
        assert!(matches!(bad.validate(), Err(CqlError::Config(_))));
    }

    #[test]
    fn test_environment_layer() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "keyspace = \"from_file\"\nreplication_factor = 2").unwrap();

        let environment = Environment::default()
            .prefix("KILLRVIDEO")
            .try_parsing(true)
            .source(Some(HashMap::from([
                ("KILLRVIDEO_KEYSPACE".to_string(), "from_env".to_string()),
                ("KILLRVIDEO_TRUNCATE".to_string(), "false".to_string()),
            ])));
        let config = SampleConfig::load_sources(
            &[file.path()],
            Some(environment),
            &ConfigOverrides::default(),
        )
        .unwrap();
        assert_eq!(config.keyspace, "from_env");
        assert_eq!(config.replication_factor, 2);
        assert!(!config.truncate);
    }
}

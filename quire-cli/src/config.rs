use anyhow::{Context, Result};
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "./quire.toml";

/// Complete configuration that merges CLI args, env vars, config files, and defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QuireConfig {
    /// Where to read from and write to
    pub build: BuildConfig,
    /// Site and highlighting settings handed to quire-core
    #[serde(flatten)]
    pub site: quire_core::Config,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Content store root, one directory per post
    pub content: String,
    /// Output directory for generated pages
    pub output: String,
    /// Template directory overriding the built-in templates
    pub theme: String,
    /// Configuration file path
    pub config: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content: "./content".to_string(),
            output: "./out".to_string(),
            theme: "./theme".to_string(),
            config: DEFAULT_CONFIG_FILE.to_string(),
        }
    }
}

impl QuireConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (QUIRE_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let config_file = cli_value(args, "config").unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let mut builder = ConfigBuilder::builder();

        builder = builder.add_source(ConfigBuilder::try_from(&Self::default())?);

        if Path::new(&config_file).exists() {
            builder = builder.add_source(File::new(&config_file, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("QUIRE")
                .prefix_separator("_")
                .separator("__"),
        );

        let mut cli_overrides = HashMap::new();
        for key in ["content", "output", "theme", "config"] {
            if let Some(value) = cli_value(args, key) {
                cli_overrides.insert(format!("build.{key}"), value);
            }
        }
        if !cli_overrides.is_empty() {
            builder = builder.add_source(ConfigBuilder::try_from(&cli_overrides)?);
        }

        let config = builder
            .build()
            .with_context(|| format!("Failed to read configuration from {config_file}"))?;
        let quire_config: QuireConfig = config.try_deserialize()?;

        Ok(quire_config)
    }
}

/// Value of a CLI argument, if the command defines it and the user set it.
fn cli_value(args: &ArgMatches, id: &str) -> Option<String> {
    args.try_get_one::<String>(id).ok().flatten().cloned()
}

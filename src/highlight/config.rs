//! Configuration loader.
//!
//! `defaults/grimoire.default.toml` is embedded into the binary so that documentation and
//! runtime behavior stay in sync. Callers layer user files and explicit overrides on top of it
//! via [`Loader`] before deserializing into [`GrimoireConfig`].

use super::grimoire::LanguageVariant;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/grimoire.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GrimoireConfig {
    pub highlight: HighlightConfig,
    pub output: OutputConfig,
    pub html: HtmlConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightConfig {
    pub variant: LanguageVariant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Name of a registered format.
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HtmlConfig {
    pub class_prefix: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for command-line flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<GrimoireConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<GrimoireConfig, ConfigError> {
    Loader::new().build()
}

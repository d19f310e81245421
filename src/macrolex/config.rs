//! Configuration loader
//!
//! `defaults/macrolex.default.toml` is embedded into the binary so the documented defaults and
//! runtime behavior stay in sync. Callers layer user files and single-key overrides on top via
//! [`Loader`] before deserializing into [`MacroLexConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

use crate::macrolex::engine::LexerOptions;

const DEFAULT_TOML: &str = include_str!("../../defaults/macrolex.default.toml");

/// Project config picked up from the working directory when present
pub const LOCAL_CONFIG_FILE: &str = "macrolex.toml";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MacroLexConfig {
    pub lexer: LexerOptions,
    pub output: OutputConfig,
}

/// Controls how token reports are rendered
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Name of a format registered in [`FormatRegistry`](crate::macrolex::formats::FormatRegistry)
    pub format: String,
}

/// Layers user settings over the built-in defaults
///
/// Sources are applied in call order, later ones win:
///
/// ```text
/// Loader::new()                                  embedded defaults
///     .with_optional_file(LOCAL_CONFIG_FILE)     ./macrolex.toml, if present
///     .with_file("team.toml")                    must exist
///     .set_override("lexer.recovery", "abort")?  single key
///     .build()?
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Self {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Layer a TOML file that must exist
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file, skipped silently when absent
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Override one dotted key, e.g. `("output.format", "json")`
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<MacroLexConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Just the embedded defaults
pub fn load_defaults() -> Result<MacroLexConfig, ConfigError> {
    Loader::new().build()
}

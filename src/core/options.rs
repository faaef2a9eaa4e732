// src/core/options.rs

//! Flags controlling a resolve call, and loading them from files.

use crate::constants::{JSON_EXTENSION, TOML_EXTENSION};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Failure to load an options layer.
#[derive(Error, Debug)]
pub enum OptionsError {
    /// The file could not be read.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for options.
    #[error("Error parsing TOML in '{path}': {source}")]
    Toml {
        /// File being parsed.
        path: String,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },
    /// The file is not valid JSON for options.
    #[error("Error parsing JSON in '{path}': {source}")]
    Json {
        /// File being parsed.
        path: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
    /// The extension names no known format.
    #[error("Unsupported options file '{path}'. Expected a .toml or .json extension.")]
    UnsupportedFormat {
        /// File that was rejected.
        path: String,
    },
}

type OptionsResult<T> = Result<T, OptionsError>;

#[derive(Debug, Clone, Copy)]
enum Format {
    Toml,
    Json,
}

/// Fully resolved flags driving a `resolve` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Settle pending leaves.
    pub resolve: bool,
    /// Invoke callable leaves.
    pub apply: bool,
    /// Stop after a single pass instead of re-scanning the output.
    pub once: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            resolve: true,
            apply: true,
            once: false,
        }
    }
}

/// A possibly incomplete set of options. Unset fields fall back to the
/// defaults of [`Options`]; unknown fields are ignored when deserializing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialOptions {
    /// See [`Options::resolve`].
    #[serde(alias = "resolveEnabled", skip_serializing_if = "Option::is_none")]
    pub resolve: Option<bool>,
    /// See [`Options::apply`].
    #[serde(alias = "applyEnabled", skip_serializing_if = "Option::is_none")]
    pub apply: Option<bool>,
    /// See [`Options::once`].
    #[serde(alias = "recurseOnce", skip_serializing_if = "Option::is_none")]
    pub once: Option<bool>,
}

impl PartialOptions {
    /// An empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`Options::resolve`].
    pub fn resolve(mut self, enabled: bool) -> Self {
        self.resolve = Some(enabled);
        self
    }

    /// Sets [`Options::apply`].
    pub fn apply(mut self, enabled: bool) -> Self {
        self.apply = Some(enabled);
        self
    }

    /// Sets [`Options::once`].
    pub fn once(mut self, enabled: bool) -> Self {
        self.once = Some(enabled);
        self
    }

    /// Fills every unset field with its default.
    pub fn normalize(&self) -> Options {
        let defaults = Options::default();
        Options {
            resolve: self.resolve.unwrap_or(defaults.resolve),
            apply: self.apply.unwrap_or(defaults.apply),
            once: self.once.unwrap_or(defaults.once),
        }
    }

    /// Layers `over` on top of `self`: fields set in `over` win.
    pub fn merge(self, over: Self) -> Self {
        Self {
            resolve: over.resolve.or(self.resolve),
            apply: over.apply.or(self.apply),
            once: over.once.or(self.once),
        }
    }

    /// Parses a TOML layer.
    ///
    /// # Errors
    /// Returns the parser error on malformed input.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Parses a JSON layer.
    ///
    /// # Errors
    /// Returns the parser error on malformed input.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Reads an options layer from a `.toml` or `.json` file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, has an unknown extension,
    /// or does not parse.
    pub fn load(path: &Path) -> OptionsResult<Self> {
        let display = path.display().to_string();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let format = match extension.as_deref() {
            Some(TOML_EXTENSION) => Format::Toml,
            Some(JSON_EXTENSION) => Format::Json,
            _ => return Err(OptionsError::UnsupportedFormat { path: display }),
        };

        log::debug!("Loading options layer from '{}'", display);
        let content = fs::read_to_string(path)?;
        match format {
            Format::Toml => Self::from_toml_str(&content).map_err(|source| OptionsError::Toml {
                path: display,
                source,
            }),
            Format::Json => Self::from_json_str(&content).map_err(|source| OptionsError::Json {
                path: display,
                source,
            }),
        }
    }
}

impl From<Options> for PartialOptions {
    fn from(options: Options) -> Self {
        Self {
            resolve: Some(options.resolve),
            apply: Some(options.apply),
            once: Some(options.once),
        }
    }
}

impl From<Option<PartialOptions>> for PartialOptions {
    fn from(options: Option<PartialOptions>) -> Self {
        options.unwrap_or_default()
    }
}

/// Normalizes a partial configuration into the full set of flags.
pub fn normalize(options: impl Into<PartialOptions>) -> Options {
    options.into().normalize()
}

//! Site configuration for quill.
//!
//! Configuration is merged from several [figment] providers, lowest precedence
//! first:
//!
//! 1. Built-in defaults ([`Config::default`]),
//! 2. `quill.toml`, `quill.yaml` and `quill.json` in the site root (each optional),
//! 3. Environment variables prefixed with `QUILL_` (e.g. `QUILL_STRING_PATTERN_TYPE=legacy`).
//!
//! ```
//! use quill_config::{Config, StringPatternType};
//!
//! let config = Config::default();
//! assert_eq!(config.string_pattern_type, StringPatternType::Glob);
//! assert!(config.uses_globs());
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use tracing::instrument;

/// Files looked up in the site root, in merge order.
pub const CONFIG_FILES: [&str; 3] = ["quill.toml", "quill.yaml", "quill.json"];
/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "QUILL_";

/// How plain strings are interpreted when looking up content by identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringPatternType {
    /// Strings that don't match an identifier exactly are retried as globs.
    #[default]
    Glob,
    /// Strings only ever match identifiers exactly.
    Legacy,
}
impl StringPatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StringPatternType::Glob => "glob",
            StringPatternType::Legacy => "legacy",
        }
    }
}
impl Display for StringPatternType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lookup mode for string arguments to content collections.
    pub string_pattern_type: StringPatternType,
}
impl Config {
    /// The provider stack used by [`load`](Self::load), exposed so callers can
    /// layer additional providers on top before extracting.
    pub fn figment(root: impl AsRef<Path>) -> Figment {
        let root = root.as_ref();
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(root.join(CONFIG_FILES[0])))
            .merge(Yaml::file(root.join(CONFIG_FILES[1])))
            .merge(Json::file(root.join(CONFIG_FILES[2])))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Loads the configuration for the site rooted at `root`.
    /// Missing configuration files are not an error; defaults apply.
    #[instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        Self::from_figment(Self::figment(root))
    }

    /// Extracts a configuration from any provider stack.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().or_raise(|| ErrorKind::Load)?;
        tracing::debug!(string_pattern_type = %config.string_pattern_type, "loaded configuration");
        Ok(config)
    }

    /// Whether plain-string lookups fall back to glob matching.
    pub fn uses_globs(&self) -> bool {
        self.string_pattern_type == StringPatternType::Glob
    }
}

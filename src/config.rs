//! Indexer configuration
//!
//! Read from `.cpp-type-index.toml` at the root of the indexed tree when
//! present. Every key is optional.
//!
//! ```toml
//! [walk]
//! include_hidden = true
//! respect_gitignore = false
//! follow_links = false
//!
//! [parse]
//! parallel = true
//! extra_extensions = ["tpp", "ipp"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::languages::LanguageRegistry;

pub const CONFIG_FILENAME: &str = ".cpp-type-index.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub walk: WalkConfig,
    pub parse: ParseConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    pub include_hidden: bool,
    pub respect_gitignore: bool,
    pub follow_links: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            include_hidden: true,
            respect_gitignore: false,
            follow_links: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Parse files on the rayon pool before merging them.
    pub parallel: bool,
    /// Additional extensions treated as C/C++ sources.
    pub extra_extensions: Vec<String>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            extra_extensions: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Loads `.cpp-type-index.toml` from `dir`, or defaults if there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            tracing::debug!("Using config {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Language registry with the configured extra extensions applied.
    pub fn registry(&self) -> LanguageRegistry {
        let mut registry = LanguageRegistry::new();
        for ext in &self.parse.extra_extensions {
            registry.register_extension(ext, "cpp");
        }
        registry
    }
}

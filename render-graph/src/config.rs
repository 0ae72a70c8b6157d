//! Compiler configuration.
//!
//! Loaded from RON, e.g.
//!
//! ```ron
//! (
//!     strategy: Optimized,
//!     render_resolution: (width: 2560, height: 1440),
//!     verbose: true,
//!     dump_dir: Some("logs"),
//! )
//! ```
//!
//! Every field is optional and falls back to [`CompilerConfig::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Extent2d;

/// How physical resources are assigned to logical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompileStrategy {
    /// One physical resource per output port.
    Naive,
    /// Alias compatible images with disjoint lifetimes.
    #[default]
    Optimized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub strategy: CompileStrategy,
    /// Size that resolution-relative images are allocated at.
    pub render_resolution: Extent2d,
    /// Log inputs, culling, execution order and resource reports.
    pub verbose: bool,
    /// Where verbose compiles write their reports.
    pub dump_dir: Option<PathBuf>,
    /// Fail on resources of unknown type instead of skipping them.
    pub strict_resource_types: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            strategy: CompileStrategy::Optimized,
            render_resolution: Extent2d::default(),
            verbose: false,
            dump_dir: None,
            strict_resource_types: false,
        }
    }
}

impl CompilerConfig {
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&source)
    }

    pub fn with_strategy(mut self, strategy: CompileStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_render_resolution(mut self, resolution: Extent2d) -> Self {
        self.render_resolution = resolution;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dump_dir = Some(dir.into());
        self
    }

    pub fn with_strict_resource_types(mut self, strict: bool) -> Self {
        self.strict_resource_types = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.strategy, CompileStrategy::Optimized);
        assert_eq!(config.render_resolution, Extent2d::new(1920, 1080));
        assert!(!config.verbose);
        assert!(config.dump_dir.is_none());
        assert!(!config.strict_resource_types);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = CompilerConfig::from_ron("(strategy: Naive, verbose: true)").unwrap();
        assert_eq!(config.strategy, CompileStrategy::Naive);
        assert!(config.verbose);
        assert_eq!(config.render_resolution, Extent2d::default());
    }

    #[test]
    fn test_full_ron() {
        let config = CompilerConfig::from_ron(
            r#"(
                render_resolution: (width: 1280, height: 720),
                dump_dir: Some("logs"),
                strict_resource_types: true,
            )"#,
        )
        .unwrap();
        assert_eq!(config.render_resolution, Extent2d::new(1280, 720));
        assert_eq!(config.dump_dir, Some(PathBuf::from("logs")));
        assert!(config.strict_resource_types);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            CompilerConfig::from_ron("(strategy: Fastest)"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            CompilerConfig::load("/nonexistent/compiler.ron"),
            Err(ConfigError::Io { .. })
        ));
    }
}

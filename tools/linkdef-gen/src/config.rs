// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generator configuration.
//!
//! Settings come from an optional TOML file; command-line flags override
//! them. Relative paths in a file are resolved against the file's directory.
//!
//! ```toml
//! manifest = "SBSLinkDef.h"
//! out = "generated/sbs_bindings.rs"
//! backend = "rust"
//! include_dirs = ["include"]
//! ```

use crate::codegen::Backend;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Binding generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Manifest to read (directives or LinkDef pragmas).
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    /// Generated artifact path.
    #[serde(default)]
    pub out: Option<PathBuf>,

    /// Output backend.
    #[serde(default)]
    pub backend: Backend,

    /// Header directories scanned to cross-check included names.
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,

    /// Report unresolved names as warnings instead of failing.
    #[serde(default)]
    pub allow_unresolved: bool,

    /// Expose nested classes/typedefs when the manifest asks for them.
    #[serde(default = "default_true")]
    pub expand_nested: bool,

    /// Also write the canonical directive form of the manifest here.
    #[serde(default)]
    pub emit_manifest: Option<PathBuf>,

    /// Write a JSON generation report here.
    #[serde(default)]
    pub report: Option<PathBuf>,

    /// Log filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            manifest: None,
            out: None,
            backend: Backend::default(),
            include_dirs: Vec::new(),
            allow_unresolved: false,
            expand_nested: true,
            emit_manifest: None,
            report: None,
            log_level: default_log_level(),
        }
    }
}

impl GeneratorConfig {
    /// Configuration for a manifest/output pair with default settings.
    pub fn new(manifest: impl Into<PathBuf>, out: impl Into<PathBuf>) -> Self {
        Self {
            manifest: Some(manifest.into()),
            out: Some(out.into()),
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.manifest.is_none() {
            return Err(ConfigError::Invalid(
                "No manifest given (use --manifest or `manifest = ...`)".into(),
            ));
        }

        for dir in &self.include_dirs {
            if !dir.is_dir() {
                return Err(ConfigError::Invalid(format!(
                    "Include directory {} does not exist",
                    dir.display()
                )));
            }
        }

        if self.out.is_some() && self.out == self.manifest {
            return Err(ConfigError::Invalid(
                "Output path would overwrite the manifest".into(),
            ));
        }

        Ok(())
    }

    /// Manifest path, or an error when none is configured.
    pub fn manifest_path(&self) -> Result<&Path, ConfigError> {
        self.manifest
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("No manifest given".into()))
    }

    /// Output path, or an error when none is configured.
    pub fn output_path(&self) -> Result<&Path, ConfigError> {
        self.out
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("No output given (use --out or `out = ...`)".into()))
    }

    fn rebase(&mut self, base: &Path) {
        let paths = self
            .manifest
            .iter_mut()
            .chain(self.out.iter_mut())
            .chain(self.emit_manifest.iter_mut())
            .chain(self.report.iter_mut())
            .chain(self.include_dirs.iter_mut());
        for path in paths {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.backend, Backend::Rust);
        assert!(config.expand_nested);
        assert!(!config.allow_unresolved);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_validation() {
        assert!(GeneratorConfig::default().validate().is_err());
        assert!(GeneratorConfig::new("sbs.manifest", "out.rs").validate().is_ok());
        assert!(GeneratorConfig::new("sbs.manifest", "sbs.manifest")
            .validate()
            .is_err());
        assert!(GeneratorConfig::new("sbs.manifest", "out.rs")
            .with_include_dir("/nonexistent/include")
            .validate()
            .is_err());
    }

    #[test]
    fn test_output_path_required_for_writing() {
        let mut config = GeneratorConfig::new("sbs.manifest", "out.rs");
        config.out = None;
        assert!(config.manifest_path().is_ok());
        assert!(config.output_path().is_err());
    }

    #[test]
    fn test_from_file_rebases_relative_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bindings.toml");
        std::fs::write(
            &path,
            r#"
manifest = "SBSLinkDef.h"
out = "/abs/sbs_bindings.json"
backend = "json"
include_dirs = ["include"]
allow_unresolved = true
"#,
        )
        .expect("write config");

        let config = GeneratorConfig::from_file(&path).expect("load config");
        assert_eq!(config.manifest, Some(dir.path().join("SBSLinkDef.h")));
        assert_eq!(config.out, Some(PathBuf::from("/abs/sbs_bindings.json")));
        assert_eq!(config.backend, Backend::Json);
        assert_eq!(config.include_dirs, vec![dir.path().join("include")]);
        assert!(config.allow_unresolved);
        assert!(config.expand_nested);
    }

    #[test]
    fn test_from_file_rejects_unknown_backend() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bindings.toml");
        std::fs::write(&path, "backend = \"python\"\n").expect("write config");

        assert!(matches!(
            GeneratorConfig::from_file(&path),
            Err(ConfigError::Toml(_))
        ));
    }
}

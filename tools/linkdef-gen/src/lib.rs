// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reflection binding generator.
//!
//! Reads a class registration manifest, cross-checks it against scanned
//! headers and renders deterministic binding code.
//!
//! # Usage
//!
//! ```bash
//! generate-bindings --manifest SBSLinkDef.h --out sbs_bindings.rs
//! generate-bindings --manifest sbs.manifest --out SBSLinkDef.h --backend linkdef
//! generate-bindings --manifest sbs.manifest --include-dir include --check
//! generate-bindings --config bindings.toml
//! ```

pub mod codegen;
pub mod config;
pub mod generator;

pub use codegen::{Backend, BindingModel, BindingRecord};
pub use config::{ConfigError, GeneratorConfig};
pub use generator::{BindingGenerator, GenerationReport};

use linkdef::ManifestError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// An included name with no matching declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedName {
    pub name: String,
    pub line: Option<usize>,
}

impl fmt::Display for UnresolvedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: `{}`", self.name),
            None => write!(f, "`{}`", self.name),
        }
    }
}

/// Generator errors.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "{}: {} included name(s) not declared in any scanned header: {}",
        manifest.display(),
        names.len(),
        list_unresolved(names)
    )]
    UnresolvedReference {
        manifest: PathBuf,
        names: Vec<UnresolvedName>,
    },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn list_unresolved(names: &[UnresolvedName]) -> String {
    names
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

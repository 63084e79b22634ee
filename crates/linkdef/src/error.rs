// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use thiserror::Error;

/// Errors raised while parsing or resolving a registration manifest.
///
/// Every configuration error carries the 1-based manifest line it was
/// detected on, so callers can print `path:line` diagnostics.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: unknown directive kind `{kind}`")]
    UnknownKind { line: usize, kind: String },

    #[error("line {line}: malformed directive: {message}")]
    Malformed { line: usize, message: String },

    #[error("line {line}: `{name}` conflicts with the entry at line {first_line} ({reason})")]
    DuplicateEntry {
        name: String,
        first_line: usize,
        line: usize,
        reason: String,
    },
}

impl ManifestError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }

    /// Manifest line the error points at, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io(_) => None,
            Self::UnknownKind { line, .. }
            | Self::Malformed { line, .. }
            | Self::DuplicateEntry { line, .. } => Some(*line),
        }
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolution of manifest entries into an inclusion set.
//!
//! The baseline excludes every global, class and function. Each explicit
//! entry overrides the baseline for one qualified name. A name listed twice
//! with different settings is a configuration error, never a silent
//! overwrite.

use crate::entry::{
    check_qualified_name, link_suffix, normalize_name, EntryKind, RegistrationEntry, StreamerMode,
};
use crate::error::ManifestError;
use crate::parser::LinkPolicy;
use serde::Serialize;
use std::collections::BTreeMap;

/// Resolved state of one qualified name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub kind: EntryKind,
    pub included: bool,
    pub streamer: StreamerMode,
    pub input_operator: bool,
}

impl Resolution {
    #[must_use]
    pub fn suffix(&self) -> &'static str {
        link_suffix(self.streamer, self.input_operator)
    }

    fn conflict_with(&self, other: &Resolution) -> String {
        if self.included != other.included {
            "included and excluded".to_string()
        } else if self.kind != other.kind {
            format!("declared as `{}` and `{}`", self.kind, other.kind)
        } else {
            format!(
                "link suffixes `{}` and `{}` differ",
                self.suffix(),
                other.suffix()
            )
        }
    }
}

impl From<&RegistrationEntry> for Resolution {
    fn from(entry: &RegistrationEntry) -> Self {
        Self {
            kind: entry.kind,
            included: entry.included,
            streamer: entry.streamer,
            input_operator: entry.input_operator,
        }
    }
}

/// Mapping from qualified name to its resolved inclusion state.
///
/// Iteration is ordered by name, so anything rendered from the set is
/// reproducible. Equality ignores the manifest lines entries came from.
#[derive(Debug, Clone, Default)]
pub struct InclusionSet {
    entries: BTreeMap<String, Resolution>,
    origins: BTreeMap<String, usize>,
    policy: LinkPolicy,
}

impl PartialEq for InclusionSet {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.policy == other.policy
    }
}

impl Eq for InclusionSet {}

/// Resolve explicit entries against the exclude-everything baseline.
pub fn load_manifest(entries: &[RegistrationEntry]) -> Result<InclusionSet, ManifestError> {
    load_with_policy(entries, LinkPolicy::default())
}

pub(crate) fn load_with_policy(
    entries: &[RegistrationEntry],
    policy: LinkPolicy,
) -> Result<InclusionSet, ManifestError> {
    let mut set = InclusionSet {
        policy,
        ..InclusionSet::default()
    };

    for entry in entries {
        let name = normalize_name(&entry.qualified_name);
        check_qualified_name(&name, entry.kind)
            .map_err(|message| ManifestError::malformed(entry.line, message))?;

        let resolution = Resolution::from(entry);
        match set.entries.get(&name) {
            None => {
                set.entries.insert(name.clone(), resolution);
                set.origins.insert(name, entry.line);
            }
            Some(existing) if *existing == resolution => {
                tracing::debug!("line {}: repeated entry for `{}` collapsed", entry.line, name);
            }
            Some(existing) => {
                return Err(ManifestError::DuplicateEntry {
                    first_line: set.origins.get(&name).copied().unwrap_or(0),
                    line: entry.line,
                    reason: existing.conflict_with(&resolution),
                    name,
                });
            }
        }
    }

    tracing::debug!(
        "Resolved {} names ({} included)",
        set.len(),
        set.included().count()
    );
    Ok(set)
}

/// Whether `qualified_name` is exposed; `false` for unmentioned names.
#[must_use]
pub fn is_included(set: &InclusionSet, qualified_name: &str) -> bool {
    set.is_included(qualified_name)
}

impl InclusionSet {
    /// Whether `qualified_name` is exposed; `false` for unmentioned names.
    #[must_use]
    pub fn is_included(&self, qualified_name: &str) -> bool {
        self.get(qualified_name).is_some_and(|r| r.included)
    }

    /// Resolved state of `qualified_name`, if the manifest mentions it.
    #[must_use]
    pub fn get(&self, qualified_name: &str) -> Option<&Resolution> {
        self.entries
            .get(qualified_name)
            .or_else(|| self.entries.get(&normalize_name(qualified_name)))
    }

    /// Manifest line that introduced `qualified_name`.
    #[must_use]
    pub fn line_of(&self, qualified_name: &str) -> Option<usize> {
        self.origins
            .get(qualified_name)
            .or_else(|| self.origins.get(&normalize_name(qualified_name)))
            .copied()
            .filter(|l| *l > 0)
    }

    #[must_use]
    pub fn policy(&self) -> LinkPolicy {
        self.policy
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All mentioned names, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resolution)> {
        self.entries.iter().map(|(name, r)| (name.as_str(), r))
    }

    /// Included names only, ordered by name.
    pub fn included(&self) -> impl Iterator<Item = (&str, &Resolution)> {
        self.iter().filter(|(_, r)| r.included)
    }

    /// Canonical entry list: ordered by kind, then name.
    #[must_use]
    pub fn to_entries(&self) -> Vec<RegistrationEntry> {
        let mut entries: Vec<RegistrationEntry> = self
            .iter()
            .map(|(name, r)| {
                let entry = if r.included {
                    RegistrationEntry::include(r.kind, name)
                } else {
                    RegistrationEntry::exclude(r.kind, name)
                };
                let entry = entry.with_streamer(r.streamer);
                if r.input_operator {
                    entry
                } else {
                    entry.without_input_operator()
                }
            })
            .collect();
        entries.sort_by(|a, b| {
            (a.kind, &a.qualified_name).cmp(&(b.kind, &b.qualified_name))
        });
        entries
    }
}

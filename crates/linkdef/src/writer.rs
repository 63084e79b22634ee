// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Render an inclusion set back into manifest text.

use crate::entry::{EntryKind, RegistrationEntry};
use crate::inclusion::InclusionSet;
use crate::parser::ManifestFormat;
use std::fmt::Write as _;

const BASELINE_SCOPES: [&str; 3] = ["globals", "classes", "functions"];

/// Render `set` in `format`.
///
/// Output depends only on the set's contents: entries are grouped by kind
/// (namespaces first) and sorted by name within a group.
#[must_use]
pub fn write_manifest(set: &InclusionSet, format: ManifestFormat) -> String {
    let entries = set.to_entries();
    match format {
        ManifestFormat::Directives => write_directives(set, &entries),
        ManifestFormat::Pragma => write_pragmas(set, &entries),
    }
}

fn write_directives(set: &InclusionSet, entries: &[RegistrationEntry]) -> String {
    let mut out = String::from("# Class registration manifest\n");
    for scope in BASELINE_SCOPES {
        let _ = writeln!(out, "exclude all {scope}");
    }

    let policy = set.policy();
    if policy.nested_classes || policy.nested_typedefs {
        out.push('\n');
        if policy.nested_classes {
            out.push_str("nestedclass\n");
        }
        if policy.nested_typedefs {
            out.push_str("nestedtypedef\n");
        }
    }

    for group in kind_groups(entries) {
        out.push('\n');
        for entry in group {
            let annotation = if entry.included { "" } else { ":exclude" };
            let _ = writeln!(
                out,
                "{} {}{}{}",
                entry.kind,
                entry.qualified_name,
                entry.suffix(),
                annotation
            );
        }
    }
    out
}

fn write_pragmas(set: &InclusionSet, entries: &[RegistrationEntry]) -> String {
    let mut out = String::from("#ifdef __CINT__\n\n");
    for scope in BASELINE_SCOPES {
        let _ = writeln!(out, "#pragma link off all {scope};");
    }

    let policy = set.policy();
    if policy.nested_classes || policy.nested_typedefs {
        out.push('\n');
        if policy.nested_classes {
            out.push_str("#pragma link C++ nestedclass;\n");
        }
        if policy.nested_typedefs {
            out.push_str("#pragma link C++ nestedtypedef;\n");
        }
    }

    for group in kind_groups(entries) {
        out.push('\n');
        for entry in group {
            let mode = if entry.included { "C++" } else { "off" };
            let _ = writeln!(
                out,
                "#pragma link {} {} {}{};",
                mode,
                entry.kind,
                entry.qualified_name,
                entry.suffix()
            );
        }
    }

    out.push_str("\n#endif\n");
    out
}

/// Split kind-ordered entries into runs of equal kind.
fn kind_groups(entries: &[RegistrationEntry]) -> Vec<&[RegistrationEntry]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for kind in EntryKind::ALL {
        let len = entries[start..]
            .iter()
            .take_while(|e| e.kind == kind)
            .count();
        if len > 0 {
            groups.push(&entries[start..start + len]);
            start += len;
        }
    }
    groups
}

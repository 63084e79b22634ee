// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Manifest parsing.
//!
//! Two textual formats are accepted:
//!
//! - **Directives**: one `<kind> <name>[suffix][:include|:exclude]` per line,
//!   `#` and `//` comments.
//! - **Pragma**: LinkDef headers made of `#pragma link C++ ...;` and
//!   `#pragma link off ...;` lines, optionally wrapped in `#ifdef` guards.
//!
//! The format is detected from the text: any `#pragma` line selects the
//! pragma reader.

use crate::entry::{check_qualified_name, normalize_name, EntryKind, RegistrationEntry, StreamerMode};
use crate::error::ManifestError;
use crate::inclusion::{load_with_policy, InclusionSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Nested declaration switches (`nestedclass`, `nestedtypedef`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkPolicy {
    pub nested_classes: bool,
    pub nested_typedefs: bool,
}

/// Textual manifest format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Directives,
    Pragma,
}

impl ManifestFormat {
    /// Guess the format of `text`.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let is_pragma = |line: &str| {
            line.trim_start()
                .strip_prefix('#')
                .is_some_and(|rest| split_keyword(rest).0 == "pragma")
        };
        if text.lines().any(is_pragma) {
            ManifestFormat::Pragma
        } else {
            ManifestFormat::Directives
        }
    }
}

/// A parsed manifest: explicit entries in source order plus link policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub format: ManifestFormat,
    pub entries: Vec<RegistrationEntry>,
    pub policy: LinkPolicy,
}

impl Manifest {
    fn empty(format: ManifestFormat) -> Self {
        Self {
            format,
            entries: Vec::new(),
            policy: LinkPolicy::default(),
        }
    }

    /// Parse manifest text, detecting its format.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        Self::parse_as(text, ManifestFormat::detect(text))
    }

    /// Parse manifest text in an explicit format.
    pub fn parse_as(text: &str, format: ManifestFormat) -> Result<Self, ManifestError> {
        let manifest = match format {
            ManifestFormat::Directives => parse_directives(text)?,
            ManifestFormat::Pragma => parse_pragmas(text)?,
        };
        tracing::debug!(
            "Parsed {:?} manifest: {} entries, policy {:?}",
            manifest.format,
            manifest.entries.len(),
            manifest.policy
        );
        Ok(manifest)
    }

    /// Read and parse a manifest file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Resolve entries and policy into an inclusion set.
    pub fn resolve(&self) -> Result<InclusionSet, ManifestError> {
        load_with_policy(&self.entries, self.policy)
    }
}

/// Parse manifest text, detecting its format.
pub fn parse_manifest(text: &str) -> Result<Manifest, ManifestError> {
    Manifest::parse(text)
}

const BASELINE_SCOPES: [&str; 3] = ["globals", "classes", "functions"];

fn parse_directives(text: &str) -> Result<Manifest, ManifestError> {
    let mut manifest = Manifest::empty(ManifestFormat::Directives);

    for (idx, raw) in strip_block_comments(text).lines().enumerate() {
        let line = idx + 1;
        let content = strip_line_comment(raw, &["#", "//"]);
        if content.is_empty() {
            continue;
        }

        let (keyword, rest) = split_keyword(content);
        match keyword {
            "exclude" => check_baseline(line, rest)?,
            "include" => {
                return Err(ManifestError::malformed(
                    line,
                    "blanket inclusion is not supported; list each name explicitly",
                ))
            }
            _ => {
                let kind = EntryKind::from_keyword(keyword).ok_or_else(|| {
                    ManifestError::UnknownKind {
                        line,
                        kind: keyword.to_string(),
                    }
                })?;
                if rest.is_empty() && set_policy(&mut manifest.policy, kind, true) {
                    continue;
                }
                let (target, included) = split_annotation(rest);
                manifest
                    .entries
                    .push(parse_target(line, kind, target, included)?);
            }
        }
    }

    Ok(manifest)
}

fn parse_pragmas(text: &str) -> Result<Manifest, ManifestError> {
    let mut manifest = Manifest::empty(ManifestFormat::Pragma);
    let mut open_guards: Vec<usize> = Vec::new();

    for (idx, raw) in strip_block_comments(text).lines().enumerate() {
        let line = idx + 1;
        let content = strip_line_comment(raw, &["//"]);
        if content.is_empty() {
            continue;
        }

        let Some(directive) = content.strip_prefix('#') else {
            return Err(ManifestError::malformed(
                line,
                format!("expected a preprocessor directive, found `{content}`"),
            ));
        };
        let (keyword, rest) = split_keyword(directive.trim_start());

        match keyword {
            "if" | "ifdef" | "ifndef" => open_guards.push(line),
            "else" | "elif" => {
                if open_guards.is_empty() {
                    return Err(ManifestError::malformed(line, format!("`#{keyword}` without `#if`")));
                }
            }
            "endif" => {
                if open_guards.pop().is_none() {
                    return Err(ManifestError::malformed(line, "`#endif` without `#if`"));
                }
            }
            "pragma" => parse_pragma(line, rest, &mut manifest)?,
            _ => tracing::warn!("line {}: ignoring `#{}` directive", line, keyword),
        }
    }

    if let Some(line) = open_guards.pop() {
        return Err(ManifestError::malformed(line, "unterminated `#if` block"));
    }

    Ok(manifest)
}

fn parse_pragma(line: usize, rest: &str, manifest: &mut Manifest) -> Result<(), ManifestError> {
    let (keyword, body) = split_keyword(rest);
    if keyword != "link" {
        tracing::warn!("line {}: ignoring `#pragma {}`", line, keyword);
        return Ok(());
    }

    let body = body
        .strip_suffix(';')
        .ok_or_else(|| ManifestError::malformed(line, "`#pragma link` must end with `;`"))?
        .trim();

    let (mode, tail) = split_keyword(body);
    let included = match mode {
        "C++" | "C" => true,
        "off" => false,
        other => {
            return Err(ManifestError::malformed(
                line,
                format!("expected `C++` or `off` after `#pragma link`, found `{other}`"),
            ))
        }
    };

    let (keyword, target) = split_keyword(tail);
    if keyword == "all" {
        if included {
            return Err(ManifestError::malformed(
                line,
                "blanket inclusion is not supported; list each name explicitly",
            ));
        }
        return check_baseline(line, tail);
    }

    let kind = EntryKind::from_keyword(keyword).ok_or_else(|| ManifestError::UnknownKind {
        line,
        kind: keyword.to_string(),
    })?;
    if target.is_empty() && set_policy(&mut manifest.policy, kind, included) {
        return Ok(());
    }
    manifest
        .entries
        .push(parse_target(line, kind, target, included)?);
    Ok(())
}

/// Accept `all globals|classes|functions`; the baseline already excludes them.
fn check_baseline(line: usize, rest: &str) -> Result<(), ManifestError> {
    match split_keyword(rest) {
        ("all", scope) if BASELINE_SCOPES.contains(&scope) => Ok(()),
        ("all", scope) => Err(ManifestError::malformed(
            line,
            format!("unknown scope `{scope}`, expected one of globals, classes, functions"),
        )),
        _ => Err(ManifestError::malformed(
            line,
            "`exclude` only accepts `all globals|classes|functions`; use `<kind> <name>:exclude`",
        )),
    }
}

/// Bare `nestedclass` / `nestedtypedef` toggles the link policy.
fn set_policy(policy: &mut LinkPolicy, kind: EntryKind, enabled: bool) -> bool {
    match kind {
        EntryKind::NestedClass => policy.nested_classes = enabled,
        EntryKind::NestedTypedef => policy.nested_typedefs = enabled,
        _ => return false,
    }
    true
}

fn parse_target(
    line: usize,
    kind: EntryKind,
    target: &str,
    included: bool,
) -> Result<RegistrationEntry, ManifestError> {
    let (name, streamer, input_operator) = split_suffix(target.trim());

    if (streamer != StreamerMode::Default || !input_operator) && !kind.is_class_like() {
        return Err(ManifestError::malformed(
            line,
            format!("link suffixes only apply to classes, not `{kind}`"),
        ));
    }

    let name = normalize_name(name);
    check_qualified_name(&name, kind).map_err(|message| ManifestError::malformed(line, message))?;

    let mut entry = if included {
        RegistrationEntry::include(kind, name)
    } else {
        RegistrationEntry::exclude(kind, name)
    };
    entry = entry.with_streamer(streamer).at_line(line);
    if !input_operator {
        entry = entry.without_input_operator();
    }
    Ok(entry)
}

/// Split a trailing `:include` / `:exclude` annotation (default: include).
fn split_annotation(target: &str) -> (&str, bool) {
    for (suffix, included) in [(":include", true), (":exclude", false)] {
        if let Some(stripped) = target.strip_suffix(suffix) {
            // `Foo::include` is a scope, not an annotation
            if !stripped.ends_with(':') {
                return (stripped, included);
            }
        }
    }
    (target, true)
}

fn split_suffix(target: &str) -> (&str, StreamerMode, bool) {
    const SUFFIXES: [(&str, StreamerMode, bool); 5] = [
        ("+!", StreamerMode::Generated, false),
        ("-!", StreamerMode::Disabled, false),
        ("+", StreamerMode::Generated, true),
        ("-", StreamerMode::Disabled, true),
        ("!", StreamerMode::Default, false),
    ];
    for (suffix, streamer, input_operator) in SUFFIXES {
        if let Some(name) = target.strip_suffix(suffix) {
            return (name.trim_end(), streamer, input_operator);
        }
    }
    (target, StreamerMode::Default, true)
}

fn split_keyword(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (s, ""),
    }
}

fn strip_line_comment<'a>(line: &'a str, markers: &[&str]) -> &'a str {
    let cut = markers
        .iter()
        .filter_map(|m| line.find(m))
        .min()
        .unwrap_or(line.len());
    line[..cut].trim()
}

/// Blank out `/* ... */` comments, keeping newlines so line numbers hold.
fn strip_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_block = false;

    while let Some(ch) = chars.next() {
        if in_block {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block = false;
                out.push_str("  ");
            } else {
                out.push(if ch == '\n' { '\n' } else { ' ' });
            }
        } else if ch == '/' && chars.peek() == Some(&'*') {
            chars.next();
            in_block = true;
            out.push_str("  ");
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(
            ManifestFormat::detect("class Foo\n# comment\n"),
            ManifestFormat::Directives
        );
        assert_eq!(
            ManifestFormat::detect("#ifdef __CINT__\n#pragma link C++ class Foo+;\n#endif\n"),
            ManifestFormat::Pragma
        );
        assert_eq!(
            ManifestFormat::detect("# pragmatic notes\nclass Foo\n"),
            ManifestFormat::Directives
        );
    }

    #[test]
    fn test_spaced_pragma_is_detected() {
        let text = "#ifdef __CINT__\n# pragma link C++ class SBSECal+;\n#endif\n";
        assert_eq!(ManifestFormat::detect(text), ManifestFormat::Pragma);

        let m = Manifest::parse(text).unwrap();
        assert_eq!(m.entries.len(), 1);
        assert_eq!(m.entries[0].qualified_name, "SBSECal");
        assert_eq!(m.entries[0].streamer, StreamerMode::Generated);
    }

    #[test]
    fn test_directive_entries() {
        let m = Manifest::parse(
            "exclude all globals\n\
             exclude all classes\n\
             exclude all functions\n\
             nestedclass\n\
             namespace Decoder\n\
             class Decoder::MPDModule+   # GEM readout\n\
             class SBSScintPMT:exclude\n",
        )
        .unwrap();

        assert_eq!(m.format, ManifestFormat::Directives);
        assert!(m.policy.nested_classes);
        assert!(!m.policy.nested_typedefs);
        assert_eq!(m.entries.len(), 3);

        assert_eq!(m.entries[0].kind, EntryKind::Namespace);
        assert_eq!(m.entries[1].qualified_name, "Decoder::MPDModule");
        assert_eq!(m.entries[1].streamer, StreamerMode::Generated);
        assert_eq!(m.entries[1].line, 6);
        assert!(!m.entries[2].included);
    }

    #[test]
    fn test_scope_named_include_is_not_an_annotation() {
        let m = Manifest::parse("class Foo::include\n").unwrap();
        assert_eq!(m.entries[0].qualified_name, "Foo::include");
        assert!(m.entries[0].included);
    }

    #[test]
    fn test_unknown_kind_reports_line() {
        let err = Manifest::parse("class Foo\n\nstruct Bar\n").unwrap_err();
        match err {
            ManifestError::UnknownKind { line, kind } => {
                assert_eq!(line, 3);
                assert_eq!(kind, "struct");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_directives() {
        for text in [
            "class\n",
            "include all classes\n",
            "exclude all typedefs\n",
            "exclude Foo\n",
            "namespace Decoder+\n",
            "class Decoder:MPDModule\n",
        ] {
            let err = Manifest::parse(text).unwrap_err();
            assert!(
                matches!(err, ManifestError::Malformed { line: 1, .. }),
                "{text:?} gave {err}"
            );
        }
    }

    #[test]
    fn test_pragma_entries() {
        let m = Manifest::parse(
            "#ifdef __CINT__\n\
             /* dictionary\n   entries */\n\
             #pragma link off all globals;\n\
             #pragma link C++ nestedtypedef;\n\
             #pragma link C++ class SBSGEMPlane+;\n\
             #pragma link off class SBSCDet;\n\
             #pragma link C++ class SBSECal-!; // no streamer\n\
             #endif\n",
        )
        .unwrap();

        assert_eq!(m.format, ManifestFormat::Pragma);
        assert!(m.policy.nested_typedefs);
        assert_eq!(m.entries.len(), 3);
        assert_eq!(m.entries[0].line, 6);
        assert!(!m.entries[1].included);
        assert_eq!(m.entries[2].streamer, StreamerMode::Disabled);
        assert!(!m.entries[2].input_operator);
    }

    #[test]
    fn test_pragma_errors() {
        let unbalanced = Manifest::parse("#pragma link C++ class Foo;\n#endif\n").unwrap_err();
        assert_eq!(unbalanced.line(), Some(2));

        let unterminated = Manifest::parse("#ifdef __CINT__\n#pragma link C++ class Foo;\n").unwrap_err();
        assert_eq!(unterminated.line(), Some(1));

        let no_semicolon = Manifest::parse("#pragma link C++ class Foo\n").unwrap_err();
        assert!(matches!(no_semicolon, ManifestError::Malformed { line: 1, .. }));

        let blanket = Manifest::parse("#pragma link C++ all classes;\n").unwrap_err();
        assert!(matches!(blanket, ManifestError::Malformed { .. }));

        let unknown = Manifest::parse("#pragma link C++ defined_in \"Foo.h\";\n").unwrap_err();
        assert!(matches!(unknown, ManifestError::UnknownKind { line: 1, .. }));
    }

    #[test]
    fn test_foreign_pragmas_are_skipped() {
        let m = Manifest::parse("#pragma once\n#pragma link C++ class Foo;\n").unwrap();
        assert_eq!(m.entries.len(), 1);
    }
}

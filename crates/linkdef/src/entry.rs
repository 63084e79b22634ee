// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registration entries: one explicit inclusion or exclusion per name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of declaration a registration entry refers to.
///
/// The variant order is the canonical output order (namespaces first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Namespace,
    Class,
    NestedClass,
    NestedTypedef,
    Global,
    Function,
}

impl EntryKind {
    pub const ALL: [EntryKind; 6] = [
        EntryKind::Namespace,
        EntryKind::Class,
        EntryKind::NestedClass,
        EntryKind::NestedTypedef,
        EntryKind::Global,
        EntryKind::Function,
    ];

    /// Directive keyword for this kind.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            EntryKind::Namespace => "namespace",
            EntryKind::Class => "class",
            EntryKind::NestedClass => "nestedclass",
            EntryKind::NestedTypedef => "nestedtypedef",
            EntryKind::Global => "global",
            EntryKind::Function => "function",
        }
    }

    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.keyword() == keyword)
    }

    /// Class-like kinds accept streamer suffixes.
    #[must_use]
    pub fn is_class_like(self) -> bool {
        matches!(self, EntryKind::Class | EntryKind::NestedClass)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Serialization hook requested for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamerMode {
    /// No suffix: the generator picks its default hook.
    #[default]
    Default,
    /// `+` suffix: generate a full streamer.
    Generated,
    /// `-` suffix: no streamer at all.
    Disabled,
}

/// An explicit manifest directive for a single qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationEntry {
    pub qualified_name: String,
    pub kind: EntryKind,
    pub included: bool,
    #[serde(default)]
    pub streamer: StreamerMode,
    #[serde(default = "default_true")]
    pub input_operator: bool,
    /// 1-based manifest line (0 for programmatic entries).
    #[serde(default)]
    pub line: usize,
}

fn default_true() -> bool {
    true
}

impl RegistrationEntry {
    fn new(kind: EntryKind, name: impl Into<String>, included: bool) -> Self {
        Self {
            qualified_name: name.into(),
            kind,
            included,
            streamer: StreamerMode::Default,
            input_operator: true,
            line: 0,
        }
    }

    /// Entry that exposes `name` to the generator.
    pub fn include(kind: EntryKind, name: impl Into<String>) -> Self {
        Self::new(kind, name, true)
    }

    /// Entry that keeps `name` out of the generated bindings.
    pub fn exclude(kind: EntryKind, name: impl Into<String>) -> Self {
        Self::new(kind, name, false)
    }

    #[must_use]
    pub fn with_streamer(mut self, streamer: StreamerMode) -> Self {
        self.streamer = streamer;
        self
    }

    #[must_use]
    pub fn without_input_operator(mut self) -> Self {
        self.input_operator = false;
        self
    }

    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Link suffix as written in manifests (`+`, `-`, `!`, `-!` or empty).
    #[must_use]
    pub fn suffix(&self) -> &'static str {
        link_suffix(self.streamer, self.input_operator)
    }
}

pub(crate) fn link_suffix(streamer: StreamerMode, input_operator: bool) -> &'static str {
    match (streamer, input_operator) {
        (StreamerMode::Default, true) => "",
        (StreamerMode::Generated, true) => "+",
        (StreamerMode::Disabled, true) => "-",
        (StreamerMode::Default, false) => "!",
        (StreamerMode::Generated, false) => "+!",
        (StreamerMode::Disabled, false) => "-!",
    }
}

/// Collapse insignificant whitespace in a qualified name.
///
/// A single space survives only between two identifier characters, so
/// `std::map< int, double >` and `std::map<int,double>` name the same type.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            if out.chars().last().is_some_and(is_ident_char) && is_ident_char(ch) {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => chars.all(is_ident_char),
        _ => false,
    }
}

/// Split `a::b<c::d>::e` into scope segments, ignoring `::` inside
/// template arguments.
fn split_scopes(name: &str) -> Result<Vec<&str>, String> {
    let bytes = name.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format!("unbalanced `>` in `{name}`"))?;
            }
            b':' if depth == 0 => {
                if bytes.get(i + 1) != Some(&b':') {
                    return Err(format!("stray `:` in `{name}`"));
                }
                segments.push(&name[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    if depth != 0 {
        return Err(format!("unbalanced `<` in `{name}`"));
    }
    segments.push(&name[start..]);
    Ok(segments)
}

/// Check that `name` is a well-formed qualified name for `kind`.
pub(crate) fn check_qualified_name(name: &str, kind: EntryKind) -> Result<(), String> {
    if name.is_empty() {
        return Err(format!("`{kind}` directive needs a qualified name"));
    }

    let body = match (kind, name.find('(')) {
        (EntryKind::Function, Some(open)) => {
            if !name.ends_with(')') {
                return Err(format!("unterminated signature in `{name}`"));
            }
            &name[..open]
        }
        _ => name,
    };

    for segment in split_scopes(body)? {
        let ident_end = segment.find('<').unwrap_or(segment.len());
        let ident = &segment[..ident_end];
        if !is_identifier(ident) {
            return Err(format!("`{segment}` is not a valid scope in `{name}`"));
        }
        let args = &segment[ident_end..];
        if !args.is_empty() && !args.ends_with('>') {
            return Err(format!("trailing characters after template arguments in `{name}`"));
        }
    }

    Ok(())
}

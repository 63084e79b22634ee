// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type catalog built from C++ headers.
//!
//! The scanner is a declaration-level heuristic, not a C++ parser: it tracks
//! brace nesting and records named namespaces, classes, structs, unions,
//! enums and typedefs with their enclosing scopes. That is enough to tell
//! whether a manifest names something that exists.

use crate::entry::EntryKind;
use crate::inclusion::InclusionSet;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

/// Header file extensions picked up by [`TypeCatalog::scan_dir`].
pub const HEADER_EXTENSIONS: [&str; 4] = ["h", "hh", "hpp", "hxx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Namespace,
    Class,
    Enum,
    Typedef,
}

/// Known declarations keyed by fully-qualified name.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    decls: BTreeMap<String, DeclKind>,
}

fn declaration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x)
              \benum\b (?:\s+(?:class|struct))? \s+ (?P<enum>[A-Za-z_]\w*) [^;{}]* \{
            | \b(?P<scope>namespace|class|struct|union) \s+ (?P<name>[A-Za-z_]\w*) \s*
                (?:final\s*)? (?::[^;{}]*)? \{
            | \btypedef\b [^;{}]*? (?P<typedef>[A-Za-z_]\w*) \s* (?:\[[^\]]*\]\s*)? ;
            | \busing \s+ (?P<alias>[A-Za-z_]\w*) \s* =
            | (?P<open>\{)
            | (?P<close>\})
            ",
        )
        // constant pattern, cannot fail to compile
        .expect("declaration pattern is valid")
    })
}

impl TypeCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from explicit names (all recorded as classes).
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::new();
        for name in names {
            catalog.insert(name, DeclKind::Class);
        }
        catalog
    }

    pub fn insert(&mut self, name: impl Into<String>, kind: DeclKind) {
        self.decls.insert(name.into(), kind);
    }

    /// Whether `name` is declared. Template arguments are ignored, so
    /// `Buffer<int>` resolves against a `Buffer` declaration.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<DeclKind> {
        self.decls
            .get(name)
            .or_else(|| self.decls.get(&strip_template_args(name)))
            .copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Declarations directly inside `outer`, ordered by name.
    pub fn nested_of<'a>(&'a self, outer: &'a str) -> impl Iterator<Item = (&'a str, DeclKind)> + 'a {
        self.decls.iter().filter_map(move |(name, kind)| {
            let rest = name.strip_prefix(outer)?.strip_prefix("::")?;
            (!rest.is_empty() && !rest.contains("::")).then_some((name.as_str(), *kind))
        })
    }

    /// Record declarations found in header text; returns how many were new.
    pub fn scan_source(&mut self, text: &str) -> usize {
        let cleaned = strip_noise(text);
        let before = self.decls.len();
        let mut scopes: Vec<Option<String>> = Vec::new();

        for caps in declaration_regex().captures_iter(&cleaned) {
            if let Some(name) = caps.name("enum") {
                self.record(&scopes, name.as_str(), DeclKind::Enum);
                scopes.push(None);
            } else if let (Some(scope), Some(name)) = (caps.name("scope"), caps.name("name")) {
                let kind = if scope.as_str() == "namespace" {
                    DeclKind::Namespace
                } else {
                    DeclKind::Class
                };
                self.record(&scopes, name.as_str(), kind);
                scopes.push(Some(name.as_str().to_string()));
            } else if let Some(name) = caps.name("typedef").or_else(|| caps.name("alias")) {
                self.record(&scopes, name.as_str(), DeclKind::Typedef);
            } else if caps.name("open").is_some() {
                scopes.push(None);
            } else if caps.name("close").is_some() {
                scopes.pop();
            }
        }

        self.decls.len() - before
    }

    /// Scan a single header file.
    pub fn scan_file<P: AsRef<Path>>(&mut self, path: P) -> io::Result<usize> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let added = self.scan_source(&text);
        tracing::debug!("Scanned {}: {} declarations", path.display(), added);
        Ok(added)
    }

    /// Recursively scan every header under `dir`.
    pub fn scan_dir<P: AsRef<Path>>(&mut self, dir: P) -> io::Result<usize> {
        let mut paths: Vec<_> = std::fs::read_dir(dir.as_ref())?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<_>>()?;
        paths.sort();

        let mut added = 0;
        for path in paths {
            if path.is_dir() {
                added += self.scan_dir(&path)?;
            } else if path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| HEADER_EXTENSIONS.contains(&e))
            {
                added += self.scan_file(&path)?;
            }
        }
        Ok(added)
    }

    /// Included names the catalog cannot account for, ordered by name.
    ///
    /// Globals and functions are not declarations the scanner tracks and
    /// are never reported.
    #[must_use]
    pub fn unresolved(&self, set: &InclusionSet) -> Vec<String> {
        set.included()
            .filter(|(_, r)| !matches!(r.kind, EntryKind::Global | EntryKind::Function))
            .filter(|(name, _)| !self.contains(name))
            .map(|(name, _)| name.to_string())
            .collect()
    }

    fn record(&mut self, scopes: &[Option<String>], name: &str, kind: DeclKind) {
        let mut qualified: Vec<&str> = scopes.iter().flatten().map(String::as_str).collect();
        qualified.push(name);
        self.decls.insert(qualified.join("::"), kind);
    }
}

/// Drop text within `<...>`: `a::B<c::D>` becomes `a::B`.
fn strip_template_args(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for ch in name.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Blank out comments, string/char literals and preprocessor lines so
/// braces inside them do not disturb scope tracking.
fn strip_noise(text: &str) -> String {
    enum State {
        Code,
        LineComment,
        BlockComment,
        Literal(char),
    }

    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut chars = text.chars().peekable();
    let mut at_line_start = true;

    while let Some(ch) = chars.next() {
        match state {
            State::Code => {
                if at_line_start && ch == '#' {
                    state = State::LineComment;
                } else if ch == '/' && chars.peek() == Some(&'/') {
                    state = State::LineComment;
                } else if ch == '/' && chars.peek() == Some(&'*') {
                    chars.next();
                    state = State::BlockComment;
                } else if ch == '"' || ch == '\'' {
                    state = State::Literal(ch);
                } else {
                    out.push(ch);
                }
            }
            State::LineComment => {
                if ch == '\n' {
                    out.push('\n');
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                    out.push(' ');
                }
            }
            State::Literal(quote) => {
                if ch == '\\' {
                    chars.next();
                } else if ch == quote {
                    state = State::Code;
                    out.push(' ');
                }
            }
        }

        if ch == '\n' {
            at_line_start = true;
        } else if !ch.is_whitespace() {
            at_line_start = false;
        }
    }
    out
}

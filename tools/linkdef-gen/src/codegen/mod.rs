// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binding model and output backends.

pub mod rust_backend;
pub mod type_hash;

pub use rust_backend::emit_rust_bindings;
pub use type_hash::{compute_type_id, manifest_digest};

use crate::GenerateError;
use linkdef::{
    write_manifest, DeclKind, EntryKind, InclusionSet, ManifestFormat, StreamerMode, TypeCatalog,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Generated artifact flavour.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Self-contained Rust module with a sorted binding table.
    #[default]
    Rust,
    /// LinkDef pragma header.
    Linkdef,
    /// Binding model as JSON.
    Json,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Rust => "rust",
            Backend::Linkdef => "linkdef",
            Backend::Json => "json",
        };
        f.write_str(name)
    }
}

/// Why a record is part of the bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Listed in the manifest.
    Manifest,
    /// Nested inside a listed class, exposed by the link policy.
    Nested,
}

/// One exposed declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingRecord {
    pub name: String,
    pub kind: EntryKind,
    pub type_id: u64,
    pub streamer: StreamerMode,
    pub input_operator: bool,
    pub origin: Origin,
}

/// Everything a backend renders: records sorted by name plus provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingModel {
    pub source: String,
    pub digest: String,
    pub records: Vec<BindingRecord>,
}

impl BindingModel {
    /// Build the model for `set`.
    ///
    /// With a catalog and `expand_nested`, nested classes and typedefs of
    /// included classes are added according to the manifest's link policy.
    /// Names the manifest mentions explicitly are never overridden.
    pub fn build(
        source: impl Into<String>,
        set: &InclusionSet,
        catalog: Option<&TypeCatalog>,
        expand_nested: bool,
    ) -> Self {
        let mut records: BTreeMap<String, BindingRecord> = set
            .included()
            .map(|(name, r)| {
                let record = BindingRecord {
                    name: name.to_string(),
                    kind: r.kind,
                    type_id: compute_type_id(name),
                    streamer: r.streamer,
                    input_operator: r.input_operator,
                    origin: Origin::Manifest,
                };
                (name.to_string(), record)
            })
            .collect();

        if let (Some(catalog), true) = (catalog, expand_nested) {
            expand_nested_records(set, catalog, &mut records);
        }

        Self {
            source: source.into(),
            digest: manifest_digest(&write_manifest(set, ManifestFormat::Directives)),
            records: records.into_values().collect(),
        }
    }

    /// Records exposed through the link policy rather than the manifest.
    pub fn nested(&self) -> impl Iterator<Item = &BindingRecord> {
        self.records.iter().filter(|r| r.origin == Origin::Nested)
    }
}

fn expand_nested_records(
    set: &InclusionSet,
    catalog: &TypeCatalog,
    records: &mut BTreeMap<String, BindingRecord>,
) {
    let policy = set.policy();
    if !policy.nested_classes && !policy.nested_typedefs {
        return;
    }

    let mut pending: Vec<String> = records
        .values()
        .filter(|r| r.kind.is_class_like())
        .map(|r| r.name.clone())
        .collect();

    while let Some(outer) = pending.pop() {
        for (name, decl) in catalog.nested_of(&outer) {
            let kind = match decl {
                DeclKind::Class if policy.nested_classes => EntryKind::NestedClass,
                DeclKind::Typedef if policy.nested_typedefs => EntryKind::NestedTypedef,
                _ => continue,
            };
            if set.get(name).is_some() || records.contains_key(name) {
                continue;
            }

            tracing::debug!("Exposing nested {} `{}`", kind, name);
            records.insert(
                name.to_string(),
                BindingRecord {
                    name: name.to_string(),
                    kind,
                    type_id: compute_type_id(name),
                    streamer: StreamerMode::Default,
                    input_operator: true,
                    origin: Origin::Nested,
                },
            );
            if kind == EntryKind::NestedClass {
                pending.push(name.to_string());
            }
        }
    }
}

/// Render `model` with `backend`.
///
/// The LinkDef backend renders the inclusion set itself: nested declarations
/// stay implied by the policy pragmas there.
pub fn render(
    backend: Backend,
    model: &BindingModel,
    set: &InclusionSet,
) -> Result<String, GenerateError> {
    match backend {
        Backend::Rust => emit_rust_bindings(model),
        Backend::Linkdef => Ok(write_manifest(set, ManifestFormat::Pragma)),
        Backend::Json => {
            let mut json = serde_json::to_string_pretty(model)?;
            json.push('\n');
            Ok(json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkdef::Manifest;

    fn resolve(text: &str) -> InclusionSet {
        Manifest::parse(text)
            .expect("parse")
            .resolve()
            .expect("resolve")
    }

    fn catalog() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog.scan_source(
            "class SBSBBShower {\n\
               struct Cluster { class Block {}; };\n\
               typedef double Energy_t;\n\
             };\n\
             class SBSCDet { struct Paddle {}; };\n",
        );
        catalog
    }

    #[test]
    fn test_model_lists_included_names_sorted() {
        let set = resolve("class SBSHCal+\nclass SBSECal\nclass SBSCDet:exclude\n");
        let model = BindingModel::build("sbs.manifest", &set, None, true);

        let names: Vec<_> = model.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["SBSECal", "SBSHCal"]);
        assert_eq!(model.records[1].streamer, StreamerMode::Generated);
        assert_eq!(model.records[0].type_id, compute_type_id("SBSECal"));
    }

    #[test]
    fn test_nested_expansion_follows_policy() {
        let catalog = catalog();

        let set = resolve("nestedclass\nclass SBSBBShower\nclass SBSCDet\n");
        let model = BindingModel::build("sbs.manifest", &set, Some(&catalog), true);
        let nested: Vec<_> = model.nested().map(|r| r.name.as_str()).collect();
        assert_eq!(
            nested,
            [
                "SBSBBShower::Cluster",
                "SBSBBShower::Cluster::Block",
                "SBSCDet::Paddle"
            ]
        );

        let set = resolve("nestedtypedef\nclass SBSBBShower\n");
        let model = BindingModel::build("sbs.manifest", &set, Some(&catalog), true);
        let nested: Vec<_> = model.nested().map(|r| (r.name.as_str(), r.kind)).collect();
        assert_eq!(nested, [("SBSBBShower::Energy_t", EntryKind::NestedTypedef)]);
    }

    #[test]
    fn test_nested_expansion_respects_explicit_entries() {
        let catalog = catalog();
        let set = resolve("nestedclass\nclass SBSCDet\nnestedclass SBSCDet::Paddle:exclude\n");
        let model = BindingModel::build("sbs.manifest", &set, Some(&catalog), true);
        assert_eq!(model.nested().count(), 0);

        let model = BindingModel::build("sbs.manifest", &resolve("nestedclass\nclass SBSCDet\n"), Some(&catalog), false);
        assert_eq!(model.nested().count(), 0);
    }

    #[test]
    fn test_digest_ignores_manifest_order() {
        let a = BindingModel::build("a", &resolve("class A\nclass B\n"), None, true);
        let b = BindingModel::build("b", &resolve("class B\nclass A\n"), None, true);
        assert_eq!(a.digest, b.digest);
    }

    #[test]
    fn test_json_backend() {
        let set = resolve("namespace Decoder\nclass Decoder::MPDModule+\n");
        let model = BindingModel::build("sbs.manifest", &set, None, true);
        let json = render(Backend::Json, &model, &set).expect("render json");

        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["source"], "sbs.manifest");
        assert_eq!(value["records"][1]["name"], "Decoder::MPDModule");
        assert_eq!(value["records"][1]["kind"], "class");
        assert_eq!(value["records"][1]["streamer"], "generated");
    }

    #[test]
    fn test_linkdef_backend() {
        let set = resolve("nestedclass\nclass SBSGEMPlane+\n");
        let model = BindingModel::build("sbs.manifest", &set, None, true);
        let header = render(Backend::Linkdef, &model, &set).expect("render linkdef");
        assert!(header.contains("#pragma link C++ nestedclass;\n"));
        assert!(header.contains("#pragma link C++ class SBSGEMPlane+;\n"));
    }
}

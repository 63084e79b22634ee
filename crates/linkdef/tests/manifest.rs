// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::expect_used)]

use linkdef::{
    is_included, load_manifest, write_manifest, EntryKind, InclusionSet, Manifest, ManifestError,
    ManifestFormat, RegistrationEntry, StreamerMode,
};

const SBS_LINKDEF: &str = include_str!("fixtures/sbs_LinkDef.h");

const SBS_CLASSES: [&str; 14] = [
    "Decoder::MPDModule",
    "SBSBigBite",
    "SBSGEMStand",
    "SBSGEMPlane",
    "SBSECal",
    "SBSHCal",
    "SBSCDet",
    "SBSTimingHodoscope",
    "SBSBBShower",
    "SBSBBTotalShower",
    "SBSBBShowerBlock",
    "SBSBBShowerCluster",
    "SBSScintHit",
    "SBSScintPMT",
];

fn resolve(text: &str) -> InclusionSet {
    Manifest::parse(text)
        .expect("parse manifest")
        .resolve()
        .expect("resolve manifest")
}

#[test]
fn test_sbs_linkdef_header() {
    let manifest = Manifest::parse(SBS_LINKDEF).expect("parse LinkDef");
    assert_eq!(manifest.format, ManifestFormat::Pragma);
    assert!(manifest.policy.nested_classes);
    assert!(manifest.policy.nested_typedefs);

    let set = manifest.resolve().expect("resolve LinkDef");
    assert_eq!(set.len(), SBS_CLASSES.len() + 1);
    assert!(is_included(&set, "Decoder"));
    assert_eq!(set.get("Decoder").map(|r| r.kind), Some(EntryKind::Namespace));

    for class in SBS_CLASSES {
        let resolution = set.get(class).expect("class listed");
        assert!(resolution.included, "{class} should be included");
        assert_eq!(resolution.streamer, StreamerMode::Generated);
    }

    assert!(!is_included(&set, "THaApparatus"));
    assert!(!is_included(&set, "Decoder::VmeModule"));
}

#[test]
fn test_directive_example() {
    let set = resolve("class Decoder::MPDModule\nclass SBSBigBite\n");

    assert!(is_included(&set, "Decoder::MPDModule"));
    assert!(is_included(&set, "SBSBigBite"));
    assert!(!is_included(&set, "SBSGEMPlane"));
}

#[test]
fn test_conflicting_annotations_fail_with_lines() {
    let err = Manifest::parse("class Foo:include\nclass Foo:exclude\n")
        .expect("parse")
        .resolve()
        .expect_err("conflict must be rejected");

    assert!(matches!(
        err,
        ManifestError::DuplicateEntry {
            first_line: 1,
            line: 2,
            ..
        }
    ));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_loading_is_idempotent() {
    let manifest = Manifest::parse(SBS_LINKDEF).expect("parse LinkDef");
    let first = manifest.resolve().expect("first resolve");
    let second = manifest.resolve().expect("second resolve");
    assert_eq!(first, second);

    let direct = load_manifest(&manifest.entries).expect("load entries");
    assert_eq!(direct.len(), first.len());
}

#[test]
fn test_linkdef_converts_to_directives_and_back() {
    let set = resolve(SBS_LINKDEF);

    let directives = write_manifest(&set, ManifestFormat::Directives);
    assert!(directives.contains("class Decoder::MPDModule+\n"));
    assert!(directives.contains("nestedtypedef\n"));
    assert_eq!(resolve(&directives), set);

    let pragmas = write_manifest(&set, ManifestFormat::Pragma);
    assert_eq!(resolve(&pragmas), set);
}

#[test]
fn test_reordered_manifests_write_identically() {
    let a = resolve("class SBSHCal+\nnamespace Decoder\nclass SBSECal+\n");
    let b = resolve("class SBSECal+\nclass SBSHCal+\nnamespace Decoder\n");

    assert_eq!(
        write_manifest(&a, ManifestFormat::Pragma),
        write_manifest(&b, ManifestFormat::Pragma)
    );
}

#[test]
fn test_programmatic_entries() {
    let set = load_manifest(&[
        RegistrationEntry::include(EntryKind::Namespace, "Decoder"),
        RegistrationEntry::include(EntryKind::Class, "Decoder::MPDModule")
            .with_streamer(StreamerMode::Generated),
        RegistrationEntry::exclude(EntryKind::Function, "Decoder::Dump()"),
    ])
    .expect("load entries");

    assert!(set.is_included("Decoder::MPDModule"));
    assert!(!set.is_included("Decoder::Dump()"));
    assert_eq!(set.line_of("Decoder"), None);
}

#[test]
fn test_programmatic_spelling_round_trips() {
    let set = load_manifest(&[
        RegistrationEntry::include(EntryKind::Class, "std::map<int, double>")
            .with_streamer(StreamerMode::Generated),
        RegistrationEntry::include(EntryKind::Class, "SBSECal"),
    ])
    .expect("load entries");

    assert!(set.is_included("std::map<int,double>"));
    for format in [ManifestFormat::Directives, ManifestFormat::Pragma] {
        assert_eq!(resolve(&write_manifest(&set, format)), set, "{format:?}");
    }
}

#[test]
fn test_spelling_variants_conflict() {
    let err = load_manifest(&[
        RegistrationEntry::include(EntryKind::Class, "Buf<int, double>").at_line(1),
        RegistrationEntry::exclude(EntryKind::Class, "Buf<int,double>").at_line(2),
    ])
    .expect_err("same type spelled twice");
    assert!(matches!(
        err,
        ManifestError::DuplicateEntry {
            first_line: 1,
            line: 2,
            ..
        }
    ));

    let empty = load_manifest(&[RegistrationEntry::include(EntryKind::Class, "")]);
    assert!(matches!(empty, Err(ManifestError::Malformed { .. })));
}

#[test]
fn test_manifest_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sbs.manifest");
    std::fs::write(&path, "namespace Decoder\nclass Decoder::MPDModule+\n").expect("write");

    let set = Manifest::from_file(&path)
        .expect("read manifest")
        .resolve()
        .expect("resolve");
    assert!(set.is_included("Decoder::MPDModule"));

    let missing = Manifest::from_file(dir.path().join("missing.manifest"));
    assert!(matches!(missing, Err(ManifestError::Io(_))));
}

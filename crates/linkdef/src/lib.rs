// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class registration manifests.
//!
//! A manifest lists which declarations a reflection binding generator must
//! expose. Everything starts excluded; each entry opts one qualified name in
//! (or explicitly out).
//!
//! # Example
//!
//! ```
//! use linkdef::{is_included, Manifest};
//!
//! let manifest = Manifest::parse(
//!     "namespace Decoder\n\
//!      class Decoder::MPDModule+\n\
//!      class SBSBigBite+\n",
//! )
//! .unwrap();
//! let set = manifest.resolve().unwrap();
//!
//! assert!(is_included(&set, "Decoder::MPDModule"));
//! assert!(!is_included(&set, "SBSGEMPlane"));
//! ```
//!
//! # Formats
//!
//! ```text
//! # directives
//! exclude all classes
//! nestedclass
//! class SBSGEMPlane+
//! class SBSCDet:exclude
//!
//! // LinkDef pragmas
//! #pragma link off all classes;
//! #pragma link C++ class SBSGEMPlane+;
//! ```

pub mod catalog;
pub mod entry;
pub mod error;
pub mod inclusion;
pub mod parser;
pub mod writer;

pub use catalog::{DeclKind, TypeCatalog};
pub use entry::{normalize_name, EntryKind, RegistrationEntry, StreamerMode};
pub use error::ManifestError;
pub use inclusion::{is_included, load_manifest, InclusionSet, Resolution};
pub use parser::{parse_manifest, LinkPolicy, Manifest, ManifestFormat};
pub use writer::write_manifest;

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Binding Generator
//
// Turns a registration manifest into a binding artifact:
// - manifest (directives or LinkDef pragmas)
// - optional header directories for reference checks
// - backend template (rust / linkdef / json)

use crate::codegen::{self, Backend, BindingModel};
use crate::config::GeneratorConfig;
use crate::{GenerateError, UnresolvedName};
use linkdef::{write_manifest, InclusionSet, Manifest, ManifestFormat, TypeCatalog};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Generator state: a resolved manifest plus the optional type catalog.
pub struct BindingGenerator {
    config: GeneratorConfig,
    manifest_path: PathBuf,
    set: InclusionSet,
    catalog: Option<TypeCatalog>,
}

impl BindingGenerator {
    /// Load and resolve the manifest, then scan include directories.
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerateError> {
        config.validate()?;
        let manifest_path = config.manifest_path()?.to_path_buf();

        tracing::info!("Loading manifest from: {:?}", manifest_path);
        let text = fs::read_to_string(&manifest_path).map_err(|source| GenerateError::Read {
            path: manifest_path.clone(),
            source,
        })?;
        let set = Manifest::parse(&text)
            .and_then(|manifest| manifest.resolve())
            .map_err(|source| GenerateError::Manifest {
                path: manifest_path.clone(),
                source,
            })?;
        tracing::info!(
            "Resolved {} entries ({} included)",
            set.len(),
            set.included().count()
        );

        let catalog = if config.include_dirs.is_empty() {
            None
        } else {
            let mut catalog = TypeCatalog::new();
            for dir in &config.include_dirs {
                tracing::info!("Scanning headers under: {:?}", dir);
                catalog
                    .scan_dir(dir)
                    .map_err(|source| GenerateError::Read {
                        path: dir.clone(),
                        source,
                    })?;
            }
            tracing::info!("Catalog holds {} declarations", catalog.len());
            Some(catalog)
        };

        Ok(Self {
            config,
            manifest_path,
            set,
            catalog,
        })
    }

    #[must_use]
    pub fn inclusion_set(&self) -> &InclusionSet {
        &self.set
    }

    #[must_use]
    pub fn catalog(&self) -> Option<&TypeCatalog> {
        self.catalog.as_ref()
    }

    /// Validate references and build the model without writing anything.
    pub fn check(&self) -> Result<GenerationReport, GenerateError> {
        let unresolved = self.check_references()?;
        let model = self.model();
        tracing::info!("[OK] Manifest check passed");
        Ok(self.report(&model, unresolved, None, 0))
    }

    /// Render the configured backend in memory.
    pub fn render(&self) -> Result<String, GenerateError> {
        self.check_references()?;
        codegen::render(self.config.backend, &self.model(), &self.set)
    }

    /// Run the full pipeline and write every configured artifact.
    pub fn generate(&self) -> Result<GenerationReport, GenerateError> {
        let out = self.config.output_path()?;

        // Stage 1: cross-check included names
        tracing::info!("Stage 1: Checking references");
        let unresolved = self.check_references()?;

        // Stage 2: build binding model
        tracing::info!("Stage 2: Building binding model");
        let model = self.model();

        // Stage 3: render backend
        tracing::info!("Stage 3: Rendering {} bindings", self.config.backend);
        let rendered = codegen::render(self.config.backend, &model, &self.set)?;
        write_file(out, &rendered)?;
        tracing::info!("[OK] Wrote {} records to {:?}", model.records.len(), out);

        // Stage 4: side artifacts
        if let Some(path) = &self.config.emit_manifest {
            write_file(path, &write_manifest(&self.set, ManifestFormat::Directives))?;
            tracing::info!("[OK] Canonical manifest written to {:?}", path);
        }

        let report = self.report(&model, unresolved, Some(out), rendered.len());
        if let Some(path) = &self.config.report {
            write_file(path, &serde_json::to_string_pretty(&report)?)?;
            tracing::info!("[OK] Report written to {:?}", path);
        }

        Ok(report)
    }

    fn check_references(&self) -> Result<Vec<UnresolvedName>, GenerateError> {
        let Some(catalog) = &self.catalog else {
            tracing::debug!("No include directories, skipping reference check");
            return Ok(Vec::new());
        };

        let names: Vec<UnresolvedName> = catalog
            .unresolved(&self.set)
            .into_iter()
            .map(|name| UnresolvedName {
                line: self.set.line_of(&name),
                name,
            })
            .collect();

        if names.is_empty() || self.config.allow_unresolved {
            for name in &names {
                tracing::warn!("{}: unresolved {}", self.manifest_path.display(), name);
            }
            Ok(names)
        } else {
            Err(GenerateError::UnresolvedReference {
                manifest: self.manifest_path.clone(),
                names,
            })
        }
    }

    fn model(&self) -> BindingModel {
        // file name only, so output does not depend on the build directory
        let source = self.manifest_path.file_name().map_or_else(
            || self.manifest_path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        BindingModel::build(
            source,
            &self.set,
            self.catalog.as_ref(),
            self.config.expand_nested,
        )
    }

    fn report(
        &self,
        model: &BindingModel,
        unresolved: Vec<UnresolvedName>,
        output: Option<&Path>,
        bytes_written: usize,
    ) -> GenerationReport {
        let included = self.set.included().count();
        GenerationReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            manifest: self.manifest_path.clone(),
            backend: self.config.backend,
            output: output.map(Path::to_path_buf),
            digest: model.digest.clone(),
            entries: self.set.len(),
            included,
            excluded: self.set.len() - included,
            nested: model.nested().count(),
            records: model.records.len(),
            catalog_declarations: self.catalog.as_ref().map(TypeCatalog::len),
            unresolved: unresolved.into_iter().map(|u| u.name).collect(),
            bytes_written,
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| GenerateError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Generation report
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub generated_at: String,
    pub manifest: PathBuf,
    pub backend: Backend,
    pub output: Option<PathBuf>,
    pub digest: String,
    pub entries: usize,
    pub included: usize,
    pub excluded: usize,
    pub nested: usize,
    pub records: usize,
    pub catalog_declarations: Option<usize>,
    pub unresolved: Vec<String>,
    pub bytes_written: usize,
}

impl GenerationReport {
    pub fn summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("  Binding Generation Report");
        println!("{}", "=".repeat(60));
        println!();
        println!("  Manifest:          {}", self.manifest.display());
        println!("  Digest:            {}", self.digest);
        println!(
            "  [OK] Entries:      {} ({} included, {} excluded)",
            self.entries, self.included, self.excluded
        );
        println!(
            "  [OK] Records:      {} ({} nested)",
            self.records, self.nested
        );
        if let Some(decls) = self.catalog_declarations {
            println!("  [OK] Catalog:      {decls} declarations");
        }
        if !self.unresolved.is_empty() {
            println!(
                "  [WARN] Unresolved: {}",
                self.unresolved.join(", ")
            );
        }
        println!();
        match &self.output {
            Some(path) => println!(
                "  Generated {} ({} bytes, {} backend)",
                path.display(),
                self.bytes_written,
                self.backend
            ),
            None => println!("  Check only, nothing written"),
        }
        println!();
        println!("{}", "=".repeat(60));
    }
}

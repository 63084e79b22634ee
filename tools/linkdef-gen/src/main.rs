// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! generate-bindings - Render reflection bindings from a registration manifest.
//!
//! Usage:
//!   generate-bindings --manifest SBSLinkDef.h --out sbs_bindings.rs
//!   generate-bindings --manifest sbs.manifest --out SBSLinkDef.h --backend linkdef
//!   generate-bindings --manifest sbs.manifest -I include --check

use anyhow::Context;
use clap::Parser;
use linkdef_gen::{Backend, BindingGenerator, GeneratorConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "generate-bindings")]
#[command(about = "Generate reflection bindings from a class registration manifest")]
#[command(version)]
struct Args {
    /// Manifest file (directives or LinkDef pragmas)
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Generated output file
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Output backend
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Header directory to cross-check included names against (repeatable)
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    include_dirs: Vec<PathBuf>,

    /// Warn about unresolved names instead of failing
    #[arg(long)]
    allow_unresolved: bool,

    /// Do not expose nested classes/typedefs implied by the manifest
    #[arg(long)]
    no_nested: bool,

    /// Validate the manifest and references, write nothing
    #[arg(long)]
    check: bool,

    /// Also write the canonical directive manifest
    #[arg(long, value_name = "FILE")]
    emit_manifest: Option<PathBuf>,

    /// Write a JSON generation report
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Quiet mode (no summary)
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Overlay command-line flags on top of file settings.
    fn apply(&self, config: &mut GeneratorConfig) {
        if let Some(manifest) = &self.manifest {
            config.manifest = Some(manifest.clone());
        }
        if let Some(out) = &self.out {
            config.out = Some(out.clone());
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        config.include_dirs.extend(self.include_dirs.iter().cloned());
        config.allow_unresolved |= self.allow_unresolved;
        if self.no_nested {
            config.expand_nested = false;
        }
        if let Some(path) = &self.emit_manifest {
            config.emit_manifest = Some(path.clone());
        }
        if let Some(path) = &self.report {
            config.report = Some(path.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("[ERROR] {e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    args.apply(&mut config);

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let generator = BindingGenerator::new(config)?;
    let report = if args.check {
        generator.check()?
    } else {
        generator.generate()?
    };

    if !args.quiet {
        report.summary();
    }

    Ok(())
}

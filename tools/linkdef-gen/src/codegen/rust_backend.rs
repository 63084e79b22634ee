// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::codegen::{BindingModel, BindingRecord};
use crate::GenerateError;
use linkdef::{EntryKind, StreamerMode};
use serde::Serialize;
use tera::Tera;

const TEMPLATE_NAME: &str = "rust_bindings.rs";
const TEMPLATE: &str = include_str!("../../templates/rust_bindings.rs.tera");

#[derive(Serialize)]
struct RecordView {
    type_id: String,
    /// Rust string literal, quotes included.
    name: String,
    kind: &'static str,
    streamer: &'static str,
    input_operator: bool,
}

impl From<&BindingRecord> for RecordView {
    fn from(record: &BindingRecord) -> Self {
        Self {
            type_id: format!("0x{:016X}", record.type_id),
            name: format!("{:?}", record.name),
            kind: kind_variant(record.kind),
            streamer: streamer_variant(record),
            input_operator: record.input_operator,
        }
    }
}

fn kind_variant(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Namespace => "Namespace",
        EntryKind::Class => "Class",
        EntryKind::NestedClass => "NestedClass",
        EntryKind::NestedTypedef => "NestedTypedef",
        EntryKind::Global => "Global",
        EntryKind::Function => "Function",
    }
}

fn streamer_variant(record: &BindingRecord) -> &'static str {
    if !record.kind.is_class_like() {
        return "None";
    }
    match record.streamer {
        StreamerMode::Default => "Default",
        StreamerMode::Generated => "Generated",
        StreamerMode::Disabled => "Disabled",
    }
}

/// Emit a self-contained Rust module exposing the binding table.
pub fn emit_rust_bindings(model: &BindingModel) -> Result<String, GenerateError> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

    let records: Vec<RecordView> = model.records.iter().map(RecordView::from).collect();

    let mut ctx = tera::Context::new();
    ctx.insert("source", &model.source);
    ctx.insert("digest", &model.digest);
    ctx.insert("records", &records);

    Ok(tera.render(TEMPLATE_NAME, &ctx)?)
}

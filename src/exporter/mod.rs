// file: src/exporter/mod.rs
// description: output formats for lookup results and reports

pub mod json;
pub mod text;

pub use json::{Exported, ExportedLookup, JsonExporter};

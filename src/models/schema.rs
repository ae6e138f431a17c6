// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Persisted form template I/O: the schema travels as a flat JSON array of field nodes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::logic::validate::check_schema;
use crate::models::field::FieldNode;

/// Ordered list of field nodes; position plus parent links encode the tree.
pub type Schema = Vec<FieldNode>;

/// Current answers of a form submission, keyed by field `name`.
pub type Answers = serde_json::Map<String, serde_json::Value>;

/// Parse a persisted schema array.
///
/// Structural problems (dangling parents, cycles, stale branching records) are
/// logged at `warn` level but left untouched: the engine degrades gracefully on
/// them and the stored template is not rewritten behind the administrator's back.
///
/// # Examples
///
/// ```
/// let schema = branchform::models::parse_schema(r#"[{"id":"a","type":"text","name":"text_1"}]"#).unwrap();
/// assert_eq!(schema.len(), 1);
/// ```
pub fn parse_schema(json: &str) -> Result<Schema> {
    let schema: Schema =
        serde_json::from_str(json).context("Failed to parse form schema JSON")?;

    for issue in check_schema(&schema) {
        log::warn!("form schema inconsistency: {issue}");
    }

    Ok(schema)
}

/// Read and parse a schema file from disk.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read form schema {}", path.display()))?;
    parse_schema(&raw).with_context(|| format!("Invalid form schema in {}", path.display()))
}

/// Serialize the whole schema for a wholesale save.
pub fn schema_to_json(schema: &[FieldNode]) -> Result<String> {
    serde_json::to_string_pretty(schema).context("Failed to serialize form schema")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::models::field::FieldKind;

    const SAMPLE: &str = r##"[
        {"id":"r","type":"radio","name":"radio_1","label":"Status",
         "options":[{"label":"Choix 1","value":"o1"},{"label":"Choix 2","value":"o2"}],
         "branchingEnabled":true,"branching":{"o1":["c"]},"branchingColors":{"o1":"#3B82F6"}},
        {"id":"c","type":"text","name":"text_1","label":"Why",
         "parentFieldId":"r","parentOptionValue":"o1","branchingColor":"#3B82F6"}
    ]"##;

    #[test]
    fn parses_sample_schema() {
        let schema = parse_schema(SAMPLE).unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema[0].kind, FieldKind::Radio);
        assert_eq!(schema[1].parent_field_id.as_deref(), Some("r"));
        assert_eq!(schema[1].branching_color.as_deref(), Some("#3B82F6"));
    }

    #[test]
    fn malformed_json_reports_context() {
        let err = parse_schema("{not an array").unwrap_err();
        assert!(err.to_string().contains("Failed to parse form schema JSON"));
    }

    #[test]
    fn corrupt_references_still_load() {
        let json = r#"[{"id":"a","type":"text","name":"text_1","parentFieldId":"ghost","parentOptionValue":"o1"}]"#;
        let schema = parse_schema(json).unwrap();
        assert_eq!(schema[0].parent_field_id.as_deref(), Some("ghost"));
    }

    #[test]
    fn load_and_save_round_trip_through_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let schema = load_schema(file.path()).unwrap();
        let saved = schema_to_json(&schema).unwrap();
        assert_eq!(parse_schema(&saved).unwrap(), schema);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = load_schema(&path).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }
}

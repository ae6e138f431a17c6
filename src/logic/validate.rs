// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Read-only invariant checker for schemas.
//!
//! Reports problems without repairing them, so a corrupt template can be
//! diagnosed while the editor keeps working on it.

use std::collections::{BTreeSet, HashMap, HashSet};

use thiserror::Error;

use crate::logic::tree::{descendant_ids, index_map, reaches_root, subtree_span};
use crate::models::FieldNode;

/// One broken schema invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaIssue {
    #[error("duplicate field id {0}")]
    DuplicateId(String),
    #[error("duplicate field name {0}")]
    DuplicateName(String),
    #[error("field {child} points to missing parent {parent}")]
    DanglingParent { child: String, parent: String },
    #[error("field {0} has a parent but no parent option")]
    MissingParentOption(String),
    #[error("field {child} hangs under option {option} that {parent} does not offer")]
    UnknownParentOption {
        child: String,
        parent: String,
        option: String,
    },
    #[error("field {0} has a parent option but no parent")]
    OptionWithoutParent(String),
    #[error("field {0} is part of a parent cycle")]
    Cycle(String),
    #[error("field {parent} ({kind}) cannot carry branches")]
    BranchingNotSupported { parent: String, kind: String },
    #[error("branching of {parent} under {option} does not match its children")]
    BranchingMismatch { parent: String, option: String },
    #[error("branch color of {parent} under {option} is missing or stale")]
    ColorMismatch { parent: String, option: String },
    #[error("child {child} does not carry the branch color of {parent}")]
    ChildColorMismatch { child: String, parent: String },
    #[error("subtree of {0} is not contiguous")]
    NotContiguous(String),
}

/// Every invariant violation found in `schema`, in a stable order.
pub fn check_schema(schema: &[FieldNode]) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();
    check_uniqueness(schema, &mut issues);
    check_links(schema, &mut issues);
    check_branching(schema, &mut issues);
    check_contiguity(schema, &mut issues);
    issues
}

/// Shortcut for `check_schema(schema).is_empty()`.
pub fn is_consistent(schema: &[FieldNode]) -> bool {
    check_schema(schema).is_empty()
}

fn check_uniqueness(schema: &[FieldNode], issues: &mut Vec<SchemaIssue>) {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for field in schema {
        if !ids.insert(field.id.as_str()) {
            issues.push(SchemaIssue::DuplicateId(field.id.clone()));
        }
        if !names.insert(field.name.as_str()) {
            issues.push(SchemaIssue::DuplicateName(field.name.clone()));
        }
    }
}

fn check_links(schema: &[FieldNode], issues: &mut Vec<SchemaIssue>) {
    let index = index_map(schema);
    for field in schema {
        match (&field.parent_field_id, &field.parent_option_value) {
            (None, None) => {}
            (None, Some(_)) => issues.push(SchemaIssue::OptionWithoutParent(field.id.clone())),
            (Some(parent_id), option) => {
                let Some(&pidx) = index.get(parent_id.as_str()) else {
                    issues.push(SchemaIssue::DanglingParent {
                        child: field.id.clone(),
                        parent: parent_id.clone(),
                    });
                    continue;
                };
                match option {
                    None => issues.push(SchemaIssue::MissingParentOption(field.id.clone())),
                    Some(option) if !schema[pidx].has_option(option) => {
                        issues.push(SchemaIssue::UnknownParentOption {
                            child: field.id.clone(),
                            parent: parent_id.clone(),
                            option: option.clone(),
                        })
                    }
                    Some(_) => {}
                }
                if !reaches_root(schema, &field.id) && in_cycle(schema, &index, &field.id) {
                    issues.push(SchemaIssue::Cycle(field.id.clone()));
                }
            }
        }
    }
}

fn in_cycle(schema: &[FieldNode], index: &HashMap<&str, usize>, id: &str) -> bool {
    let mut visited = HashSet::new();
    let mut current = id;
    while let Some(&idx) = index.get(current) {
        if !visited.insert(current) {
            return current == id;
        }
        match schema[idx].parent_field_id.as_deref() {
            Some(parent) => current = parent,
            None => return false,
        }
    }
    false
}

fn check_branching(schema: &[FieldNode], issues: &mut Vec<SchemaIssue>) {
    let mut linked: HashMap<(&str, &str), BTreeSet<&str>> = HashMap::new();
    for field in schema {
        if let (Some(parent), Some(option)) = (&field.parent_field_id, &field.parent_option_value) {
            linked
                .entry((parent.as_str(), option.as_str()))
                .or_default()
                .insert(field.id.as_str());
        }
    }

    for parent in schema {
        let recorded = parent.branching.iter().filter(|(_, ids)| !ids.is_empty());
        if recorded.clone().next().is_some() && !parent.kind.supports_branching() {
            issues.push(SchemaIssue::BranchingNotSupported {
                parent: parent.id.clone(),
                kind: parent.kind.to_string(),
            });
        }

        let mut options: BTreeSet<&str> = recorded.map(|(o, _)| o.as_str()).collect();
        options.extend(
            linked
                .keys()
                .filter(|(p, _)| *p == parent.id)
                .map(|(_, o)| *o),
        );
        options.extend(parent.branching_colors.keys().map(String::as_str));

        for option in options {
            let expected = linked.get(&(parent.id.as_str(), option));
            let recorded: BTreeSet<&str> = parent
                .branching
                .get(option)
                .map(|ids| ids.iter().map(String::as_str).collect())
                .unwrap_or_default();
            let expected_set = expected.cloned().unwrap_or_default();
            if recorded != expected_set {
                issues.push(SchemaIssue::BranchingMismatch {
                    parent: parent.id.clone(),
                    option: option.to_string(),
                });
            }

            let color = parent.branching_colors.get(option);
            if color.is_some() != !recorded.is_empty() {
                issues.push(SchemaIssue::ColorMismatch {
                    parent: parent.id.clone(),
                    option: option.to_string(),
                });
            }
            if let Some(color) = color {
                for child in schema.iter().filter(|f| expected_set.contains(f.id.as_str())) {
                    if child.branching_color.as_ref() != Some(color) {
                        issues.push(SchemaIssue::ChildColorMismatch {
                            child: child.id.clone(),
                            parent: parent.id.clone(),
                        });
                    }
                }
            }
        }
    }
}

fn check_contiguity(schema: &[FieldNode], issues: &mut Vec<SchemaIssue>) {
    for (idx, field) in schema.iter().enumerate() {
        let expected = descendant_ids(schema, &field.id).len();
        if subtree_span(schema, idx).len() != expected + 1 {
            issues.push(SchemaIssue::NotContiguous(field.id.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::tree::fixtures::{nested, node};
    use crate::models::FieldKind;

    #[test]
    fn well_formed_tree_has_no_issues() {
        assert!(is_consistent(&nested()));
    }

    #[test]
    fn reports_dangling_parent_and_cycle() {
        let mut orphan = node("o", FieldKind::Text);
        orphan.parent_field_id = Some("ghost".into());
        orphan.parent_option_value = Some("o1".into());
        let mut a = node("a", FieldKind::Radio);
        let mut b = node("b", FieldKind::Radio);
        a.parent_field_id = Some("b".into());
        a.parent_option_value = Some("o1".into());
        b.parent_field_id = Some("a".into());
        b.parent_option_value = Some("o1".into());

        let issues = check_schema(&[orphan, a, b]);
        assert!(issues.contains(&SchemaIssue::DanglingParent {
            child: "o".into(),
            parent: "ghost".into()
        }));
        assert!(issues.contains(&SchemaIssue::Cycle("a".into())));
        assert!(issues.contains(&SchemaIssue::Cycle("b".into())));
    }

    #[test]
    fn reports_stale_branching_and_colors() {
        let mut schema = nested();
        schema[0].branching.insert("o2".into(), vec!["ghost".into()]);
        schema[1].branching_colors.insert("o3".into(), "#000000".into());
        schema[2].branching_color = Some("#FFFFFF".into());

        let issues = check_schema(&schema);
        assert!(issues.contains(&SchemaIssue::BranchingMismatch {
            parent: "r".into(),
            option: "o2".into()
        }));
        assert!(issues.contains(&SchemaIssue::ColorMismatch {
            parent: "c".into(),
            option: "o3".into()
        }));
        assert!(issues.contains(&SchemaIssue::ChildColorMismatch {
            child: "g".into(),
            parent: "c".into()
        }));
    }

    #[test]
    fn reports_interleaved_subtrees_and_duplicates() {
        let mut schema = nested();
        schema.swap(2, 3);
        schema[3].name = schema[0].name.clone();
        let issues = check_schema(&schema);
        assert!(issues.contains(&SchemaIssue::NotContiguous("r".into())));
        assert!(issues.contains(&SchemaIssue::DuplicateName(schema[0].name.clone())));
        assert_eq!(
            SchemaIssue::NotContiguous("r".into()).to_string(),
            "subtree of r is not contiguous"
        );
    }
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Read-only tree queries over the flat schema.
//!
//! The tree is implied by `parentFieldId` links. Persisted templates may carry
//! dangling or cyclic links, so every walk keeps a visited set and degrades to
//! an empty/zero answer instead of looping.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::ops::Range;

use crate::models::FieldNode;

/// Index of the node with `id`.
pub fn find_index(schema: &[FieldNode], id: &str) -> Option<usize> {
    schema.iter().position(|f| f.id == id)
}

pub fn find<'a>(schema: &'a [FieldNode], id: &str) -> Option<&'a FieldNode> {
    schema.iter().find(|f| f.id == id)
}

/// Arena-style id -> index lookup. On duplicate ids the first occurrence wins.
pub fn index_map(schema: &[FieldNode]) -> HashMap<&str, usize> {
    let mut map = HashMap::with_capacity(schema.len());
    for (idx, field) in schema.iter().enumerate() {
        map.entry(field.id.as_str()).or_insert(idx);
    }
    map
}

/// Nesting depth: 0 for roots, 1 + depth(parent) otherwise.
///
/// A missing parent counts as depth 0; a cyclic chain yields 0.
pub fn depth(schema: &[FieldNode], id: &str) -> usize {
    let index = index_map(schema);
    let mut visited = HashSet::new();
    let mut current = id;
    let mut levels = 0;

    while let Some(&idx) = index.get(current) {
        if !visited.insert(current) {
            log::warn!("cyclic parent chain while computing depth of {id}");
            return 0;
        }
        match schema[idx].parent_field_id.as_deref() {
            Some(parent) => {
                levels += 1;
                current = parent;
            }
            None => break,
        }
    }

    levels
}

/// Direct children of `parent_id`, in schema order.
pub fn child_ids(schema: &[FieldNode], parent_id: &str) -> Vec<String> {
    schema
        .iter()
        .filter(|f| f.is_child_of(parent_id) && f.id != parent_id)
        .map(|f| f.id.clone())
        .collect()
}

/// Transitive children of `parent_id`, duplicate-free, parents before their children.
pub fn descendant_ids(schema: &[FieldNode], parent_id: &str) -> Vec<String> {
    let mut children_of: HashMap<&str, Vec<&str>> = HashMap::new();
    for field in schema {
        if let Some(parent) = field.parent_field_id.as_deref() {
            children_of.entry(parent).or_default().push(field.id.as_str());
        }
    }

    let mut visited: HashSet<&str> = HashSet::from([parent_id]);
    let mut out = Vec::new();
    let mut stack: Vec<&str> = children_of
        .get(parent_id)
        .map(|c| c.iter().rev().copied().collect())
        .unwrap_or_default();

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        out.push(id.to_string());
        if let Some(children) = children_of.get(id) {
            stack.extend(children.iter().rev().copied());
        }
    }

    out
}

/// Dotted, 1-based human label ("1", "1.3", "1.3.1").
///
/// Roots are numbered by rank among root fields; children append the 1-based
/// position of their parent option. Stale or cyclic links resolve to `""`.
pub fn identifier(schema: &[FieldNode], id: &str) -> String {
    let index = index_map(schema);
    let mut visited = HashSet::new();
    let mut segments = Vec::new();
    let mut current = id;

    loop {
        let Some(&idx) = index.get(current) else {
            return String::new();
        };
        if !visited.insert(current) {
            log::warn!("cyclic parent chain while computing identifier of {id}");
            return String::new();
        }
        let node = &schema[idx];
        match (&node.parent_field_id, &node.parent_option_value) {
            (None, _) => {
                let rank = schema[..idx].iter().filter(|f| f.is_root()).count() + 1;
                segments.push(rank);
                break;
            }
            (Some(parent_id), Some(option)) => {
                let Some(parent) = index.get(parent_id.as_str()).map(|&i| &schema[i]) else {
                    return String::new();
                };
                let Some(pos) = parent.option_position(option) else {
                    return String::new();
                };
                segments.push(pos + 1);
                current = parent_id.as_str();
            }
            (Some(_), None) => return String::new(),
        }
    }

    segments
        .iter()
        .rev()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Order dotted identifiers numerically per segment; empty identifiers sort last.
pub fn compare_identifiers(a: &str, b: &str) -> Ordering {
    fn segments(raw: &str) -> Vec<u64> {
        raw.split('.').filter_map(|s| s.parse().ok()).collect()
    }

    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => segments(a).cmp(&segments(b)),
    }
}

/// Top-most ancestor of `id` that is reachable (the node itself for roots).
///
/// Stops at the last existing node of a dangling chain and at the entry point of a cycle.
pub fn root_of(schema: &[FieldNode], id: &str) -> Option<String> {
    let index = index_map(schema);
    let mut visited = HashSet::new();
    let mut current = index.get(id).map(|_| id)?;

    while let Some(parent) = schema[index[current]].parent_field_id.as_deref() {
        if !visited.insert(current) || !index.contains_key(parent) {
            break;
        }
        current = parent;
    }

    Some(current.to_string())
}

/// Contiguous run made of the node at `index` followed by its descendants.
pub fn subtree_span(schema: &[FieldNode], index: usize) -> Range<usize> {
    let Some(node) = schema.get(index) else {
        return index..index;
    };
    let descendants: HashSet<String> = descendant_ids(schema, &node.id).into_iter().collect();
    let mut end = index + 1;
    while end < schema.len() && descendants.contains(&schema[end].id) {
        end += 1;
    }
    index..end
}

/// True when the parent chain of `id` ends at a root field.
pub fn reaches_root(schema: &[FieldNode], id: &str) -> bool {
    let index = index_map(schema);
    let mut visited = HashSet::new();
    let mut current = id;

    loop {
        let Some(&idx) = index.get(current) else {
            return false;
        };
        if !visited.insert(current) {
            return false;
        }
        match schema[idx].parent_field_id.as_deref() {
            Some(parent) => current = parent,
            None => return true,
        }
    }
}

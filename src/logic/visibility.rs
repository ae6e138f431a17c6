// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Renderer-facing visibility queries.

use std::collections::HashSet;

use serde_json::Value;

use crate::logic::tree::{find, index_map};
use crate::models::{Answers, FieldKind, FieldNode};

/// Whether `node` is shown for the current `answers` (keyed by field name).
///
/// Roots are always visible. A child is visible when its parent's answer
/// equals (radio) or contains (checkbox) the child's `parentOptionValue`.
/// Stateless: the renderer asks again on every change.
pub fn is_visible(node: &FieldNode, answers: &Answers, schema: &[FieldNode]) -> bool {
    let (Some(parent_id), Some(option)) = (&node.parent_field_id, &node.parent_option_value)
    else {
        return node.is_root();
    };
    let Some(parent) = find(schema, parent_id) else {
        return false;
    };
    answers
        .get(&parent.name)
        .is_some_and(|answer| answer_selects(&parent.kind, answer, option))
}

fn answer_selects(kind: &FieldKind, answer: &Value, option: &str) -> bool {
    match (kind, answer) {
        (FieldKind::Checkbox, Value::Array(values)) => {
            values.iter().any(|v| v.as_str() == Some(option))
        }
        (FieldKind::Radio | FieldKind::Checkbox, Value::String(value)) => value == option,
        _ => false,
    }
}

/// Fields the renderer shows, in schema order.
///
/// Unlike [`is_visible`] alone, a child of a hidden parent is hidden too, even
/// if a stale answer for that parent is still around.
pub fn visible_fields<'a>(schema: &'a [FieldNode], answers: &Answers) -> Vec<&'a FieldNode> {
    let index = index_map(schema);
    schema
        .iter()
        .filter(|field| {
            let mut visited = HashSet::new();
            let mut current = *field;
            loop {
                if !visited.insert(current.id.as_str()) || !is_visible(current, answers, schema) {
                    return false;
                }
                match current.parent_field_id.as_deref().and_then(|p| index.get(p)) {
                    Some(&parent) => current = &schema[parent],
                    None => return true,
                }
            }
        })
        .collect()
}

/// Drop answers of fields that are no longer visible.
///
/// Repeats until stable, so clearing a parent's answer also clears the answers
/// of branches that only its answer revealed.
pub fn prune_hidden_answers(schema: &[FieldNode], answers: &Answers) -> Answers {
    let mut pruned = answers.clone();
    loop {
        let hidden: Vec<&str> = schema
            .iter()
            .filter(|f| pruned.contains_key(&f.name) && !is_visible(f, &pruned, schema))
            .map(|f| f.name.as_str())
            .collect();
        if hidden.is_empty() {
            return pruned;
        }
        for name in hidden {
            log::trace!("clearing answer of hidden field {name}");
            pruned.remove(name);
        }
    }
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Schema mutations.
//!
//! Every operation takes the current schema by reference and returns a new one;
//! nothing is modified in place. Requests that name a field not present in the
//! schema, or that would break an invariant, are declined by returning an
//! unchanged copy. Cascades are computed as id sets, never by index arithmetic.

mod branching;
mod detach;
mod duplicate;
mod ordering;

use std::collections::HashSet;

pub use branching::update_field;
pub use detach::{detach_child, detach_parent};
pub use duplicate::duplicate_field;
pub use ordering::{apply_order, move_down, move_up, regroup, reorder};

use crate::config::BuilderConfig;
use crate::logic::defaults::{apply_kind_defaults, create_for_schema, seeded_option};
use crate::logic::tree::{descendant_ids, find_index};
use crate::models::{FieldKind, FieldNode};

/// Insert a new root field of `kind` at `insert_index`, or append it.
///
/// An index that lands inside another field's branch run is moved forward to
/// the end of that run so subtrees stay contiguous.
pub fn add_field(
    schema: &[FieldNode],
    kind: FieldKind,
    insert_index: Option<usize>,
    cfg: &BuilderConfig,
) -> Vec<FieldNode> {
    let mut next = schema.to_vec();
    let node = create_for_schema(kind, schema, cfg);

    let mut at = insert_index.unwrap_or(next.len()).min(next.len());
    while at < next.len() && !next[at].is_root() {
        at += 1;
    }

    log::debug!("add field {} ({}) at {at}", node.id, node.kind);
    next.insert(at, node);
    next
}

/// Delete the field at `index` together with all of its descendants.
pub fn remove_field(schema: &[FieldNode], index: usize) -> Vec<FieldNode> {
    let Some(target) = schema.get(index) else {
        log::trace!("remove_field: no field at index {index}");
        return schema.to_vec();
    };

    let mut doomed: HashSet<String> = descendant_ids(schema, &target.id).into_iter().collect();
    doomed.insert(target.id.clone());

    let mut next = schema.to_vec();
    if let (Some(parent_id), Some(option)) =
        (&target.parent_field_id, &target.parent_option_value)
        && let Some(parent_idx) = find_index(&next, parent_id)
    {
        let mut parent = next[parent_idx].clone();
        prune_branch_entry(&mut parent, option, &target.id);
        next[parent_idx] = parent;
    }

    log::debug!("remove field {} and {} descendant(s)", target.id, doomed.len() - 1);
    retain_outside(next, &doomed)
}

/// Delete every descendant of `field_id` and drop its branch records.
///
/// Used when a field stops being able to branch: its kind changed away from
/// radio/checkbox or branching was switched off.
pub fn branching_cleanup(schema: &[FieldNode], field_id: &str) -> Vec<FieldNode> {
    let Some(idx) = find_index(schema, field_id) else {
        return schema.to_vec();
    };

    let doomed: HashSet<String> = descendant_ids(schema, field_id).into_iter().collect();
    let mut next = schema.to_vec();
    let mut field = next[idx].clone();
    field.clear_branching();
    next[idx] = field;

    if !doomed.is_empty() {
        log::debug!("branching cleanup of {field_id}: {} field(s) removed", doomed.len());
    }
    retain_outside(next, &doomed)
}

/// Turn branching on or off for the field at `index`; off cascades like [`branching_cleanup`].
pub fn set_branching_enabled(schema: &[FieldNode], index: usize, enabled: bool) -> Vec<FieldNode> {
    let Some(field) = schema.get(index) else {
        return schema.to_vec();
    };
    if enabled {
        if !field.kind.supports_branching() {
            log::trace!("set_branching_enabled: {} cannot branch", field.kind);
            return schema.to_vec();
        }
        let mut next = schema.to_vec();
        next[index].branching_enabled = true;
        return next;
    }
    branching_cleanup(schema, &field.id)
}

/// Switch the field at `index` to `kind`, resetting its type-specific config.
///
/// Identity (id, name, label, description, required) and the parent link survive.
/// Leaving radio/checkbox drops the field's branch subtrees.
pub fn change_kind(
    schema: &[FieldNode],
    index: usize,
    kind: FieldKind,
    cfg: &BuilderConfig,
) -> Vec<FieldNode> {
    let Some(field) = schema.get(index) else {
        return schema.to_vec();
    };
    if field.kind == kind {
        return schema.to_vec();
    }

    let mut next = if field.kind.supports_branching() && !kind.supports_branching() {
        branching_cleanup(schema, &field.id)
    } else {
        schema.to_vec()
    };

    let Some(index) = find_index(&next, &field.id) else {
        return next;
    };
    let mut updated = next[index].clone();
    let old_options = std::mem::take(&mut updated.options);
    updated.kind = kind;
    apply_kind_defaults(&mut updated, cfg);
    if updated.kind.has_options() && !old_options.is_empty() {
        updated.options = old_options;
    }
    if updated.kind.supports_branching() {
        // Branch records of options that did not survive would dangle.
        let doomed: Vec<String> = updated
            .branching
            .keys()
            .filter(|value| !updated.has_option(value))
            .cloned()
            .collect();
        if !doomed.is_empty() {
            let id = updated.id.clone();
            next[index] = updated;
            for value in doomed {
                if let Some(idx) = find_index(&next, &id) {
                    next = remove_option_branch(&next, idx, &value);
                }
            }
            return next;
        }
    }
    log::debug!("field {} is now {}", updated.id, updated.kind);
    next[index] = updated;
    next
}

/// Append a fresh option to the select/radio/checkbox field at `index`.
pub fn add_option(schema: &[FieldNode], index: usize, cfg: &BuilderConfig) -> Vec<FieldNode> {
    let Some(field) = schema.get(index) else {
        return schema.to_vec();
    };
    if !field.kind.has_options() {
        return schema.to_vec();
    }

    let option = (field.options.len() + 1..)
        .map(|n| seeded_option(cfg, n))
        .find(|o| !field.has_option(&o.value))
        .unwrap_or_else(|| seeded_option(cfg, field.options.len() + 1));

    let mut next = schema.to_vec();
    next[index].options.push(option);
    next
}

/// Remove option `value` from the field at `index`, cascading its branch subtree.
///
/// Declined when it would leave a radio/checkbox field without any option.
pub fn remove_option(schema: &[FieldNode], index: usize, value: &str) -> Vec<FieldNode> {
    let Some(field) = schema.get(index) else {
        return schema.to_vec();
    };
    if !field.has_option(value) {
        return schema.to_vec();
    }
    if field.kind.supports_branching() && field.options.len() <= 1 {
        log::trace!("remove_option: {} must keep at least one option", field.id);
        return schema.to_vec();
    }

    let id = field.id.clone();
    let mut next = remove_option_branch(schema, index, value);
    if let Some(idx) = find_index(&next, &id) {
        next[idx].options.retain(|o| o.value != value);
    }
    next
}

/// Drop the children recorded or linked under `(schema[index], value)` with their subtrees.
fn remove_option_branch(schema: &[FieldNode], index: usize, value: &str) -> Vec<FieldNode> {
    let parent = &schema[index];
    let mut doomed = HashSet::new();
    for child in schema
        .iter()
        .filter(|f| f.is_child_of(&parent.id) && f.parent_option_value.as_deref() == Some(value))
    {
        doomed.insert(child.id.clone());
        doomed.extend(descendant_ids(schema, &child.id));
    }

    doomed.remove(&parent.id);

    let mut next = schema.to_vec();
    let mut updated = parent.clone();
    updated.branching.remove(value);
    updated.branching_colors.remove(value);
    next[index] = updated;

    if !doomed.is_empty() {
        log::debug!(
            "option {value} of {} removed with {} branch field(s)",
            parent.id,
            doomed.len()
        );
    }
    retain_outside(next, &doomed)
}

/// Remove `child_id` from `parent.branching[option]`; an emptied option loses its entry and color.
pub(crate) fn prune_branch_entry(parent: &mut FieldNode, option: &str, child_id: &str) {
    let emptied = match parent.branching.get_mut(option) {
        Some(ids) => {
            ids.retain(|id| id != child_id);
            ids.is_empty()
        }
        None => true,
    };
    if emptied {
        parent.branching.remove(option);
        parent.branching_colors.remove(option);
    }
}

/// Keep the nodes whose id is not in `doomed`, preserving order.
pub(crate) fn retain_outside(mut schema: Vec<FieldNode>, doomed: &HashSet<String>) -> Vec<FieldNode> {
    if !doomed.is_empty() {
        schema.retain(|f| !doomed.contains(&f.id));
    }
    schema
}

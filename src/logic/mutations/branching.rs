// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Field replacement with branching reconciliation.
//!
//! The branching selector proposes "option O links to kind K" before any child
//! exists, so a proposed branching list may hold kind tokens next to real child
//! ids. Reconciliation turns tokens into children and drops children that are
//! no longer proposed.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rand::rng;

use super::{branching_cleanup, retain_outside};
use crate::config::BuilderConfig;
use crate::logic::colors::{colors_in_use, next_color};
use crate::logic::defaults::create_for_schema;
use crate::logic::tree::{descendant_ids, find_index, subtree_span};
use crate::models::{FieldKind, FieldNode};

/// What ends up in one slot of an option's child list.
#[derive(Debug)]
enum Slot {
    Keep(String),
    Create(FieldKind),
}

/// Replace the field at `index` with `new_node` and reconcile its branches.
///
/// The stored id, parent link and branch color are kept: they belong to the
/// engine, not to the field configurator. A rename onto another field's name is
/// declined. A radio or checkbox proposal without options is declined as a
/// whole. When the field cannot branch any more, its branch subtrees go.
pub fn update_field(
    schema: &[FieldNode],
    index: usize,
    new_node: FieldNode,
    cfg: &BuilderConfig,
) -> Vec<FieldNode> {
    let Some(old) = schema.get(index) else {
        log::trace!("update_field: no field at index {index}");
        return schema.to_vec();
    };

    if new_node.kind.supports_branching() && new_node.options.is_empty() {
        log::trace!("update_field: {} needs at least one option", old.id);
        return schema.to_vec();
    }

    let mut node = new_node;
    node.id = old.id.clone();
    node.parent_field_id = old.parent_field_id.clone();
    node.parent_option_value = old.parent_option_value.clone();
    node.branching_color = old.branching_color.clone();

    if node.name != old.name && schema.iter().any(|f| f.id != old.id && f.name == node.name) {
        log::trace!("update_field: name {} already taken, keeping {}", node.name, old.name);
        node.name = old.name.clone();
    }

    if !(node.kind.supports_branching() && node.branching_enabled) {
        node.clear_branching();
        let mut next = branching_cleanup(schema, &old.id);
        if let Some(idx) = find_index(&next, &old.id) {
            next[idx] = node;
        }
        return next;
    }

    reconcile(schema, old, node, cfg)
}

fn reconcile(
    schema: &[FieldNode],
    old: &FieldNode,
    mut node: FieldNode,
    cfg: &BuilderConfig,
) -> Vec<FieldNode> {
    let parent_id = node.id.clone();
    let proposed = std::mem::take(&mut node.branching);
    let proposed_colors = std::mem::take(&mut node.branching_colors);

    let mut existing: BTreeMap<&str, Vec<&FieldNode>> = BTreeMap::new();
    for child in schema.iter().filter(|f| f.is_child_of(&parent_id)) {
        if let Some(option) = child.parent_option_value.as_deref() {
            existing.entry(option).or_default().push(child);
        }
    }

    let options: BTreeSet<&str> = existing
        .keys()
        .copied()
        .chain(proposed.keys().map(String::as_str))
        .collect();

    let mut plans: Vec<(String, Vec<Slot>)> = Vec::new();
    let mut doomed = HashSet::new();

    for option in options {
        let current = existing.get(option).map(Vec::as_slice).unwrap_or_default();
        let entries = if node.has_option(option) {
            proposed.get(option).map(Vec::as_slice).unwrap_or_default()
        } else {
            &[]
        };

        let mut claimed: HashSet<&str> = HashSet::new();
        let mut slots = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(child) = current
                .iter()
                .find(|c| c.id == *entry && !claimed.contains(c.id.as_str()))
            {
                claimed.insert(&child.id);
                slots.push(Slot::Keep(child.id.clone()));
            } else if let Some(kind) = FieldKind::known(entry) {
                match current
                    .iter()
                    .find(|c| c.kind == kind && !claimed.contains(c.id.as_str()))
                {
                    Some(child) => {
                        claimed.insert(&child.id);
                        slots.push(Slot::Keep(child.id.clone()));
                    }
                    None => slots.push(Slot::Create(kind)),
                }
            } else {
                log::trace!("update_field: dropping stale branch entry {entry} under {option}");
            }
        }

        for child in current.iter().filter(|c| !claimed.contains(c.id.as_str())) {
            doomed.insert(child.id.clone());
            doomed.extend(descendant_ids(schema, &child.id));
        }

        plans.push((option.to_string(), slots));
    }
    doomed.remove(&parent_id);

    // Create branches in option-list order so colors are handed out predictably.
    plans.sort_by_key(|(value, _)| node.option_position(value).unwrap_or(usize::MAX));

    // Surviving options keep their color; it must be visible to the allocator.
    for (value, slots) in &plans {
        if slots.is_empty() {
            continue;
        }
        if let Some(color) = old
            .branching_colors
            .get(value)
            .or_else(|| proposed_colors.get(value))
        {
            node.branching_colors.insert(value.clone(), color.clone());
        }
    }

    if !doomed.is_empty() {
        log::debug!("update_field: {} branch field(s) unlinked from {parent_id}", doomed.len());
    }
    let mut next = retain_outside(schema.to_vec(), &doomed);
    let Some(pidx) = find_index(&next, &parent_id) else {
        return next;
    };
    next[pidx] = node;

    let mut rng = rng();
    for (value, slots) in plans {
        let Some(pidx) = find_index(&next, &parent_id) else {
            break;
        };
        if slots.is_empty() {
            next[pidx].branching.remove(&value);
            next[pidx].branching_colors.remove(&value);
            continue;
        }

        let color = match next[pidx].branching_colors.get(&value) {
            Some(color) => color.clone(),
            None => {
                let color = next_color(&cfg.palette, &colors_in_use(&next), &mut rng);
                next[pidx]
                    .branching_colors
                    .insert(value.clone(), color.clone());
                color
            }
        };

        let mut ids = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot {
                Slot::Keep(id) => ids.push(id),
                Slot::Create(kind) => {
                    let mut child = create_for_schema(kind, &next, cfg);
                    child.parent_field_id = Some(parent_id.clone());
                    child.parent_option_value = Some(value.clone());
                    child.branching_color = Some(color.clone());
                    let at = insertion_point(&next, &parent_id, &value);
                    log::debug!("link {} ({}) under {parent_id}/{value}", child.id, child.kind);
                    ids.push(child.id.clone());
                    next.insert(at, child);
                }
            }
        }

        for child in next.iter_mut().filter(|f| ids.contains(&f.id)) {
            child.branching_color = Some(color.clone());
        }
        if let Some(pidx) = find_index(&next, &parent_id) {
            next[pidx].branching.insert(value, ids);
        }
    }

    next
}

/// Right after the subtree of the last child under `(parent_id, option)`, or right after the parent.
fn insertion_point(schema: &[FieldNode], parent_id: &str, option: &str) -> usize {
    let last_child = schema.iter().rposition(|f| {
        f.is_child_of(parent_id) && f.parent_option_value.as_deref() == Some(option)
    });
    match last_child {
        Some(idx) => subtree_span(schema, idx).end,
        None => find_index(schema, parent_id).map_or(schema.len(), |p| p + 1),
    }
}

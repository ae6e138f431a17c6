// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Ordering: moving root fields and repairing subtree contiguity after drag-and-drop.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use crate::logic::tree::index_map;
use crate::models::FieldNode;

/// Restore subtree contiguity after a flat reorder.
///
/// Root fields keep their new relative order; each is followed by its
/// descendants (depth-first, siblings in their current relative order).
/// Nodes whose parent chain is dangling or cyclic are kept where they are
/// found, with whatever descendants hang below them.
pub fn regroup(schema: &[FieldNode]) -> Vec<FieldNode> {
    let index = index_map(schema);
    let mut children_of: HashMap<usize, Vec<usize>> = HashMap::new();
    for (idx, field) in schema.iter().enumerate() {
        if let Some(&parent) = field
            .parent_field_id
            .as_deref()
            .and_then(|p| index.get(p))
            && parent != idx
        {
            children_of.entry(parent).or_default().push(idx);
        }
    }

    let mut placed = vec![false; schema.len()];
    let mut out = Vec::with_capacity(schema.len());

    for idx in 0..schema.len() {
        if placed[idx] || !is_block_head(schema, &index, idx) {
            continue;
        }
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if placed[current] {
                continue;
            }
            placed[current] = true;
            out.push(schema[current].clone());
            if let Some(children) = children_of.get(&current) {
                stack.extend(children.iter().rev().filter(|&&c| !placed[c]));
            }
        }
    }

    // Only reachable through duplicate ids; never drop a field.
    for (idx, field) in schema.iter().enumerate() {
        if !placed[idx] {
            out.push(field.clone());
        }
    }

    out
}

/// A node opens a block when it is a root, the top of a dangling chain, or part of a cycle.
fn is_block_head(schema: &[FieldNode], index: &HashMap<&str, usize>, idx: usize) -> bool {
    let mut visited = HashSet::new();
    let mut current = idx;
    loop {
        if !visited.insert(current) {
            return true;
        }
        match schema[current]
            .parent_field_id
            .as_deref()
            .map(|p| index.get(p))
        {
            None => return current == idx,
            Some(None) => return current == idx,
            Some(Some(&parent)) => current = parent,
        }
    }
}

/// Flat move of one entry (what a drag library does), followed by [`regroup`].
pub fn reorder(schema: &[FieldNode], from: usize, to: usize) -> Vec<FieldNode> {
    if from >= schema.len() || to >= schema.len() {
        log::trace!("reorder: {from} -> {to} out of range");
        return schema.to_vec();
    }
    let mut flat = schema.to_vec();
    let moved = flat.remove(from);
    flat.insert(to, moved);
    regroup(&flat)
}

/// Apply an id order coming from the drag library, then [`regroup`].
///
/// Unknown ids are ignored; fields missing from `order` keep their relative order at the end.
pub fn apply_order(schema: &[FieldNode], order: &[String]) -> Vec<FieldNode> {
    let index = index_map(schema);
    let mut used = vec![false; schema.len()];
    let mut flat = Vec::with_capacity(schema.len());

    for id in order {
        if let Some(&idx) = index.get(id.as_str())
            && !used[idx]
        {
            used[idx] = true;
            flat.push(schema[idx].clone());
        }
    }
    for (idx, field) in schema.iter().enumerate() {
        if !used[idx] {
            flat.push(field.clone());
        }
    }

    regroup(&flat)
}

/// Swap the root field at `index` (with its subtree) with the previous root's subtree.
pub fn move_up(schema: &[FieldNode], index: usize) -> Vec<FieldNode> {
    swap_with_neighbour(schema, index, true)
}

/// Swap the root field at `index` (with its subtree) with the next root's subtree.
pub fn move_down(schema: &[FieldNode], index: usize) -> Vec<FieldNode> {
    swap_with_neighbour(schema, index, false)
}

fn swap_with_neighbour(schema: &[FieldNode], index: usize, up: bool) -> Vec<FieldNode> {
    match schema.get(index) {
        Some(field) if field.is_root() => {}
        _ => {
            log::trace!("move: index {index} is not a root field");
            return schema.to_vec();
        }
    }

    let blocks = root_blocks(schema);
    let Some(current) = blocks.iter().position(|b| b.start == index) else {
        return schema.to_vec();
    };
    let neighbour = if up {
        current.checked_sub(1)
    } else {
        Some(current + 1).filter(|&n| n < blocks.len())
    };
    let Some(neighbour) = neighbour.filter(|&n| schema[blocks[n].start].is_root()) else {
        return schema.to_vec();
    };

    let (first, second) = if up {
        (blocks[neighbour].clone(), blocks[current].clone())
    } else {
        (blocks[current].clone(), blocks[neighbour].clone())
    };

    let mut next = Vec::with_capacity(schema.len());
    next.extend_from_slice(&schema[..first.start]);
    next.extend_from_slice(&schema[second.clone()]);
    next.extend_from_slice(&schema[first]);
    next.extend_from_slice(&schema[second.end..]);
    next
}

/// Runs made of one root followed by every non-root entry up to the next root.
fn root_blocks(schema: &[FieldNode]) -> Vec<Range<usize>> {
    let mut starts: Vec<usize> = schema
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_root())
        .map(|(idx, _)| idx)
        .collect();
    if starts.first() != Some(&0) && !schema.is_empty() {
        starts.insert(0, 0);
    }
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| start..starts.get(i + 1).copied().unwrap_or(schema.len()))
        .collect()
}

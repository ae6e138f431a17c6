// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Detaching: severing a branch link while keeping both sides as valid fields.

use std::collections::HashSet;

use super::ordering::regroup;
use super::prune_branch_entry;
use crate::logic::tree::{child_ids, descendant_ids, find_index, root_of, subtree_span};
use crate::models::FieldNode;

/// Turn the child `field_id` into a root field.
///
/// Only the node's own link is cut; its descendants stay attached to it. The
/// parent forgets the child, losing the option's color when the option empties
/// and its branching state altogether when nothing is left. The detached
/// subtree moves right after the run of the parent's top-level root field.
pub fn detach_child(schema: &[FieldNode], field_id: &str) -> Vec<FieldNode> {
    let Some(idx) = find_index(schema, field_id) else {
        log::trace!("detach_child: unknown field {field_id}");
        return schema.to_vec();
    };
    let Some(parent_id) = schema[idx].parent_field_id.clone() else {
        return schema.to_vec();
    };
    let option = schema[idx].parent_option_value.clone();

    let mut next = schema.to_vec();
    next[idx].clear_parent_link();

    let Some(pidx) = find_index(&next, &parent_id) else {
        log::warn!("detach_child: parent {parent_id} of {field_id} is missing");
        return next;
    };
    let parent = &mut next[pidx];
    if let Some(option) = option.as_deref() {
        prune_branch_entry(parent, option, field_id);
    }
    if !parent.has_branches() {
        parent.clear_branching();
    }

    let mut moving: HashSet<String> = descendant_ids(&next, field_id).into_iter().collect();
    moving.insert(field_id.to_string());
    moving.remove(&parent_id);

    let (block, mut rest): (Vec<FieldNode>, Vec<FieldNode>) =
        next.into_iter().partition(|f| moving.contains(&f.id));

    let anchor = root_of(&rest, &parent_id)
        .and_then(|root| find_index(&rest, &root))
        .map_or(rest.len(), |root_idx| subtree_span(&rest, root_idx).end);

    log::debug!("detach child {field_id} from {parent_id}");
    rest.splice(anchor..anchor, block);
    rest
}

/// Turn the branching parent `field_id` into a plain field.
///
/// Direct children become root fields; grandchildren keep pointing at their
/// own parent, so only one level of nesting is removed.
pub fn detach_parent(schema: &[FieldNode], field_id: &str) -> Vec<FieldNode> {
    let Some(idx) = find_index(schema, field_id) else {
        log::trace!("detach_parent: unknown field {field_id}");
        return schema.to_vec();
    };

    let children: HashSet<String> = child_ids(schema, field_id).into_iter().collect();
    let mut next = schema.to_vec();
    next[idx].clear_branching();
    for field in next.iter_mut().filter(|f| children.contains(&f.id)) {
        field.clear_parent_link();
    }

    log::debug!("detach parent {field_id}: {} child(ren) now root", children.len());
    if schema[idx].is_root() {
        next
    } else {
        // New roots would otherwise sit inside the grandparent's run.
        regroup(&next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::tree::fixtures::{link, nested, node};
    use crate::logic::validate::check_schema;
    use crate::models::FieldKind;

    fn ids(schema: &[FieldNode]) -> Vec<&str> {
        schema.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn detaching_only_child_clears_parent_branching() {
        let mut r = node("r", FieldKind::Radio);
        let mut c = node("c", FieldKind::Text);
        link(&mut r, &mut c, "o1", "#3B82F6");
        let next = detach_child(&[r, c], "c");

        assert_eq!(ids(&next), vec!["r", "c"]);
        assert!(next[1].is_root());
        assert!(next[1].parent_option_value.is_none());
        assert!(next[1].branching_color.is_none());
        assert!(!next[0].branching_enabled);
        assert!(next[0].branching.is_empty());
        assert!(next[0].branching_colors.is_empty());
        assert!(check_schema(&next).is_empty());
    }

    #[test]
    fn detached_subtree_moves_after_parent_run() {
        let mut r = node("r", FieldKind::Checkbox);
        let mut a = node("a", FieldKind::Radio);
        let mut a1 = node("a1", FieldKind::Text);
        let mut b = node("b", FieldKind::Text);
        link(&mut r, &mut a, "o1", "#3B82F6");
        link(&mut a, &mut a1, "o1", "#10B981");
        link(&mut r, &mut b, "o2", "#F59E0B");
        let schema = vec![r, a, a1, b, node("t", FieldKind::Text)];

        let next = detach_child(&schema, "a");
        assert_eq!(ids(&next), vec!["r", "b", "a", "a1", "t"]);
        assert!(next[0].branching_enabled);
        assert!(!next[0].branching.contains_key("o1"));
        assert!(!next[0].branching_colors.contains_key("o1"));
        assert_eq!(next[3].parent_field_id.as_deref(), Some("a"));
        assert!(check_schema(&next).is_empty());
    }

    #[test]
    fn detaching_a_grandchild_keeps_contiguity() {
        let schema = nested();
        let next = detach_child(&schema, "g");
        assert_eq!(ids(&next), vec!["r", "c", "g", "t"]);
        assert!(next[2].is_root());
        assert!(!next[1].branching_enabled);
        assert!(check_schema(&next).is_empty());
    }

    #[test]
    fn detaching_a_root_is_noop() {
        let schema = nested();
        assert_eq!(detach_child(&schema, "r"), schema);
        assert_eq!(detach_child(&schema, "nope"), schema);
    }

    #[test]
    fn detach_parent_removes_one_level_only() {
        let schema = nested();
        let next = detach_parent(&schema, "r");

        assert_eq!(ids(&next), vec!["r", "c", "g", "t"]);
        assert!(!next[0].branching_enabled);
        assert!(next[1].is_root());
        assert_eq!(next[2].parent_field_id.as_deref(), Some("c"));
        assert!(next[1].branching_enabled);
        assert!(check_schema(&next).is_empty());
    }

    #[test]
    fn detach_nested_parent_regroups() {
        let mut schema = nested();
        let mut h = node("h", FieldKind::Text);
        link(&mut schema[0], &mut h, "o3", "#F59E0B");
        schema.insert(3, h);

        let next = detach_parent(&schema, "c");
        assert_eq!(ids(&next), vec!["r", "c", "h", "g", "t"]);
        assert!(next[3].is_root());
        assert!(check_schema(&next).is_empty());
    }
}

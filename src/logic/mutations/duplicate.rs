// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Field duplication, including whole branch subtrees.

use std::collections::{BTreeMap, HashMap, HashSet};

use rand::rng;

use crate::config::BuilderConfig;
use crate::logic::colors::{colors_in_use, next_color};
use crate::logic::defaults::taken_names;
use crate::logic::tree::{descendant_ids, find_index};
use crate::models::FieldNode;
use crate::utils::{new_field_id, next_name};

/// Duplicate the field at `index`.
///
/// A field without branches is cloned right after itself. A branching field is
/// cloned together with its whole subtree; the cloned run is inserted right
/// after the last original descendant, with ids, names, parent links and
/// branching records remapped so the copy references only itself. A cloned
/// child is registered in its parent's branching list next to the original.
pub fn duplicate_field(schema: &[FieldNode], index: usize, cfg: &BuilderConfig) -> Vec<FieldNode> {
    let Some(target) = schema.get(index) else {
        log::trace!("duplicate_field: no field at index {index}");
        return schema.to_vec();
    };

    let mut subtree: HashSet<String> = descendant_ids(schema, &target.id).into_iter().collect();
    subtree.insert(target.id.clone());

    // Names are checked against the schema and against clones made earlier in this pass.
    let mut taken = taken_names(schema);
    let mut remap: HashMap<String, String> = HashMap::new();
    let mut originals = Vec::with_capacity(subtree.len());
    let mut last_original = index;
    for (idx, field) in schema.iter().enumerate() {
        if subtree.contains(&field.id) {
            remap.insert(field.id.clone(), new_field_id(&cfg.id_prefix));
            originals.push(field);
            last_original = last_original.max(idx);
        }
    }

    let mut clones: Vec<FieldNode> = Vec::with_capacity(originals.len());
    for original in originals {
        let mut clone = original.clone();
        clone.id = remap[&original.id].clone();
        clone.name = next_name(original.kind.as_str(), &taken);
        taken.insert(clone.name.clone());
        clone.is_duplicate = true;

        if original.id != target.id
            && let Some(parent) = original.parent_field_id.as_ref()
            && let Some(mapped) = remap.get(parent)
        {
            clone.parent_field_id = Some(mapped.clone());
        }
        clone.branching = original
            .branching
            .iter()
            .map(|(option, ids)| {
                let ids: Vec<String> = ids.iter().filter_map(|id| remap.get(id).cloned()).collect();
                (option.clone(), ids)
            })
            .filter(|(_, ids)| !ids.is_empty())
            .collect();
        clones.push(clone);
    }

    recolor_clones(schema, &mut clones, cfg);

    let mut next = schema.to_vec();
    let clone_root_id = remap[&target.id].clone();
    if let (Some(parent_id), Some(option)) =
        (&target.parent_field_id, &target.parent_option_value)
        && let Some(pidx) = find_index(&next, parent_id)
    {
        let ids = next[pidx].branching.entry(option.clone()).or_default();
        let at = ids
            .iter()
            .position(|id| *id == target.id)
            .map_or(ids.len(), |p| p + 1);
        ids.insert(at, clone_root_id.clone());
    }

    log::debug!(
        "duplicate field {} as {clone_root_id} ({} node(s))",
        target.id,
        clones.len()
    );
    let at = last_original + 1;
    next.splice(at..at, clones);
    next
}

/// Give every cloned branching parent fresh option colors and push them down to its cloned children.
///
/// The cloned root keeps its own `branching_color`: it still hangs under the original parent option.
fn recolor_clones(schema: &[FieldNode], clones: &mut [FieldNode], cfg: &BuilderConfig) {
    let mut in_use = colors_in_use(schema);
    let mut rng = rng();
    let mut assigned: HashMap<(String, String), String> = HashMap::new();

    for clone in clones.iter_mut() {
        let mut colors = BTreeMap::new();
        for option in clone.branching.keys() {
            let color = next_color(&cfg.palette, &in_use, &mut rng);
            in_use.push(color.clone());
            assigned.insert((clone.id.clone(), option.clone()), color.clone());
            colors.insert(option.clone(), color);
        }
        clone.branching_colors = colors;
    }

    for clone in clones.iter_mut() {
        if let (Some(parent), Some(option)) = (&clone.parent_field_id, &clone.parent_option_value)
            && let Some(color) = assigned.get(&(parent.clone(), option.clone()))
        {
            clone.branching_color = Some(color.clone());
        }
    }
}

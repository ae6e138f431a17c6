// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Property-based invariant tests for the branching schema engine.
//!
//! These tests verify, for arbitrary sequences of builder operations:
//!
//! 1. Every schema invariant holds after every operation
//! 2. Operations never modify their input schema
//! 3. Regroup is idempotent, even on shuffled schemas
//! 4. Removing a field removes exactly its subtree and leaves no orphans
//! 5. Identifiers do not depend on the order in which they are computed

use std::collections::HashMap;

use branchform::logic::tree::descendant_ids;
use branchform::{
    BuilderConfig, FieldKind, FieldNode, add_field, add_option, change_kind, check_schema,
    detach_child, detach_parent, duplicate_field, identifier, move_down, move_up, regroup,
    remove_field, remove_option, reorder, set_branching_enabled, update_field,
};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

/// Operations the form builder can issue.
#[derive(Debug, Clone)]
enum Op {
    Add(usize, Option<usize>),
    Link(usize, usize, usize),
    Remove(usize),
    Duplicate(usize),
    MoveUp(usize),
    MoveDown(usize),
    Reorder(usize, usize),
    DetachChild(usize),
    DetachParent(usize),
    ChangeKind(usize, usize),
    SetBranching(usize, bool),
    AddOption(usize),
    RemoveOption(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8, proptest::option::of(0usize..40)).prop_map(|(k, at)| Op::Add(k, at)),
        (0usize..40, 0usize..5, 0usize..8).prop_map(|(i, o, k)| Op::Link(i, o, k)),
        (0usize..40, 0usize..5, 0usize..8).prop_map(|(i, o, k)| Op::Link(i, o, k)),
        (0usize..40).prop_map(Op::Remove),
        (0usize..40).prop_map(Op::Duplicate),
        (0usize..40).prop_map(Op::MoveUp),
        (0usize..40).prop_map(Op::MoveDown),
        (0usize..40, 0usize..40).prop_map(|(a, b)| Op::Reorder(a, b)),
        (0usize..40).prop_map(Op::DetachChild),
        (0usize..40).prop_map(Op::DetachParent),
        (0usize..40, 0usize..8).prop_map(|(i, k)| Op::ChangeKind(i, k)),
        (0usize..40, any::<bool>()).prop_map(|(i, on)| Op::SetBranching(i, on)),
        (0usize..40).prop_map(Op::AddOption),
        (0usize..40, 0usize..5).prop_map(|(i, o)| Op::RemoveOption(i, o)),
    ]
}

fn kind(k: usize) -> FieldKind {
    FieldKind::ALL[k % FieldKind::ALL.len()].clone()
}

/// Apply one operation; indices wrap around the current schema length.
fn apply(schema: &[FieldNode], op: &Op, cfg: &BuilderConfig) -> Vec<FieldNode> {
    let len = schema.len().max(1);
    match op {
        Op::Add(k, at) => add_field(schema, kind(*k), *at, cfg),
        Op::Link(i, o, k) => {
            let Some(field) = schema.get(i % len) else {
                return schema.to_vec();
            };
            if !field.kind.supports_branching() || field.options.is_empty() {
                return schema.to_vec();
            }
            let option = field.options[o % field.options.len()].value.clone();
            let mut proposal = field.clone();
            proposal.branching_enabled = true;
            proposal
                .branching
                .entry(option)
                .or_default()
                .push(kind(*k).as_str().to_string());
            update_field(schema, i % len, proposal, cfg)
        }
        Op::Remove(i) => remove_field(schema, i % len),
        Op::Duplicate(i) if schema.len() < 60 => duplicate_field(schema, i % len, cfg),
        Op::Duplicate(_) => schema.to_vec(),
        Op::MoveUp(i) => move_up(schema, i % len),
        Op::MoveDown(i) => move_down(schema, i % len),
        Op::Reorder(a, b) => reorder(schema, a % len, b % len),
        Op::DetachChild(i) => match schema.get(i % len) {
            Some(f) => detach_child(schema, &f.id),
            None => schema.to_vec(),
        },
        Op::DetachParent(i) => match schema.get(i % len) {
            Some(f) => detach_parent(schema, &f.id),
            None => schema.to_vec(),
        },
        Op::ChangeKind(i, k) => change_kind(schema, i % len, kind(*k), cfg),
        Op::SetBranching(i, on) => set_branching_enabled(schema, i % len, *on),
        Op::AddOption(i) => add_option(schema, i % len, cfg),
        Op::RemoveOption(i, o) => match schema.get(i % len) {
            Some(f) if !f.options.is_empty() => {
                let value = f.options[o % f.options.len()].value.clone();
                remove_option(schema, i % len, &value)
            }
            _ => schema.to_vec(),
        },
    }
}

fn build(ops: &[Op]) -> Vec<FieldNode> {
    let cfg = BuilderConfig::default();
    ops.iter().fold(Vec::new(), |schema, op| apply(&schema, op, &cfg))
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 1..40)
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Invariants hold after every operation
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn invariants_hold_after_every_operation(ops in ops_strategy()) {
        let cfg = BuilderConfig::default();
        let mut schema = Vec::new();
        for op in &ops {
            schema = apply(&schema, op, &cfg);
            let issues = check_schema(&schema);
            prop_assert!(issues.is_empty(), "after {:?}: {:?}", op, issues);
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // 2. Copy-on-write
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn operations_never_touch_their_input(ops in ops_strategy(), last in op_strategy()) {
        let cfg = BuilderConfig::default();
        let schema = build(&ops);
        let snapshot = schema.clone();
        let _ = apply(&schema, &last, &cfg);
        prop_assert_eq!(schema, snapshot);
    }

    // ═══════════════════════════════════════════════════════════════════
    // 3. Regroup idempotence
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn regroup_is_idempotent_on_shuffles(ops in ops_strategy(), seed in any::<u64>()) {
        let mut schema = build(&ops);
        // Deterministic shuffle driven by the seed.
        let mut state = seed | 1;
        for i in (1..schema.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            schema.swap(i, (state % (i as u64 + 1)) as usize);
        }

        let once = regroup(&schema);
        prop_assert_eq!(regroup(&once), once.clone());
        prop_assert_eq!(once.len(), schema.len());
        prop_assert!(check_schema(&once).is_empty());
    }

    // ═══════════════════════════════════════════════════════════════════
    // 4. Cascade completeness
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn remove_drops_exactly_the_subtree(ops in ops_strategy(), pick in any::<usize>()) {
        let schema = build(&ops);
        prop_assume!(!schema.is_empty());
        let index = pick % schema.len();
        let descendants = descendant_ids(&schema, &schema[index].id);

        let next = remove_field(&schema, index);
        prop_assert_eq!(next.len(), schema.len() - descendants.len() - 1);
        for field in &next {
            if let Some(parent) = &field.parent_field_id {
                prop_assert!(next.iter().any(|f| &f.id == parent));
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // 5. Identifier determinism
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn identifiers_ignore_query_order(ops in ops_strategy()) {
        let schema = build(&ops);
        let forward: HashMap<_, _> = schema
            .iter()
            .map(|f| (f.id.clone(), identifier(&schema, &f.id)))
            .collect();
        let backward: HashMap<_, _> = schema
            .iter()
            .rev()
            .map(|f| (f.id.clone(), identifier(&schema, &f.id)))
            .collect();
        prop_assert_eq!(&forward, &backward);
        prop_assert!(forward.values().all(|id| !id.is_empty()));
    }
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Branching schema engine for declaration forms.
//!
//! A form is a flat, ordered list of [`FieldNode`]s. Radio and checkbox fields
//! may reveal sub-fields per option; the links live in the nodes themselves and
//! every operation in [`logic::mutations`] returns a new, consistent schema.

pub mod config;
pub mod logic;
pub mod models;
pub mod mvu;
pub mod utils;

pub use config::BuilderConfig;
pub use logic::mutations::{
    add_field, add_option, apply_order, branching_cleanup, change_kind, detach_child,
    detach_parent, duplicate_field, move_down, move_up, regroup, remove_field, remove_option,
    reorder, set_branching_enabled, update_field,
};
pub use logic::tree::{child_ids, compare_identifiers, depth, descendant_ids, identifier};
pub use logic::validate::{SchemaIssue, check_schema, is_consistent};
pub use logic::visibility::{is_visible, prune_hidden_answers, visible_fields};
pub use models::{Answers, ChoiceOption, FieldKind, FieldNode, Schema};

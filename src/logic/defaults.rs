// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Default-config factory: fresh, minimally valid field nodes per kind.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use crate::config::BuilderConfig;
use crate::models::{ChoiceOption, FieldKind, FieldNode};
use crate::utils::{new_field_id, next_name};

/// Names already bound somewhere in the schema.
pub fn taken_names(schema: &[FieldNode]) -> HashSet<String> {
    schema.iter().map(|f| f.name.clone()).collect()
}

/// Build a root node of `kind` whose name is chosen by `name_for`.
///
/// `name_for` must return a name unused in the whole schema; see [`create_for_schema`].
pub fn create_default(
    kind: FieldKind,
    cfg: &BuilderConfig,
    mut name_for: impl FnMut(&FieldKind) -> String,
) -> FieldNode {
    let name = name_for(&kind);
    let mut node = FieldNode {
        id: new_field_id(&cfg.id_prefix),
        name,
        label: kind.display_name().to_string(),
        kind: kind.clone(),
        description: None,
        required: false,
        options: Vec::new(),
        default_value: None,
        placeholder: None,
        multiple: false,
        include_time: false,
        accept: Vec::new(),
        is_duplicate: false,
        parent_field_id: None,
        parent_option_value: None,
        branching_color: None,
        branching_enabled: false,
        branching: BTreeMap::new(),
        branching_colors: BTreeMap::new(),
        extra: Default::default(),
    };
    apply_kind_defaults(&mut node, cfg);
    node
}

/// Factory shortcut that collision-checks the generated name against `schema`.
pub fn create_for_schema(kind: FieldKind, schema: &[FieldNode], cfg: &BuilderConfig) -> FieldNode {
    let taken = taken_names(schema);
    create_default(kind, cfg, |k| next_name(k.as_str(), &taken))
}

/// Reset the type-specific configuration of `node` to the defaults of its kind.
pub fn apply_kind_defaults(node: &mut FieldNode, cfg: &BuilderConfig) {
    node.options.clear();
    node.default_value = None;
    node.placeholder = None;
    node.multiple = false;
    node.include_time = false;
    node.accept.clear();

    match node.kind {
        FieldKind::Radio | FieldKind::Checkbox => {
            node.options = (1..=cfg.seeded_options.max(1))
                .map(|n| seeded_option(cfg, n))
                .collect();
            if node.kind == FieldKind::Checkbox {
                node.default_value = Some(Value::Array(Vec::new()));
            }
        }
        FieldKind::Switch => {
            node.default_value = Some(Value::Bool(false));
        }
        FieldKind::Select
        | FieldKind::Date
        | FieldKind::Text
        | FieldKind::Number
        | FieldKind::Import
        | FieldKind::Unknown(_) => {}
    }
}

/// The `n`-th seeded option: label "Choix n", value "choix_n".
pub fn seeded_option(cfg: &BuilderConfig, n: usize) -> ChoiceOption {
    ChoiceOption::new(
        format!("{} {n}", cfg.option_label_prefix),
        format!("{}_{n}", cfg.option_label_prefix.to_lowercase().replace(' ', "_")),
    )
}

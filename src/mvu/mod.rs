// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Model-View-Update kernel for the form builder.
//!
//! The builder UI sends messages; `update` applies the matching pure schema
//! operation to the current schema and stores the result, so every operation
//! always sees the schema returned by the previous one.

use serde_json::Value;

use crate::config::BuilderConfig;
use crate::logic::mutations;
use crate::logic::visibility::prune_hidden_answers;
use crate::models::{Answers, FieldKind, FieldNode, Schema, parse_schema};

/// Form builder state: the schema being edited plus a live preview submission.
#[derive(Clone, Debug, Default)]
pub struct BuilderModel {
    schema: Schema,
    /// Preview answers keyed by field name.
    answers: Answers,
    config: BuilderConfig,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display.
    pub error: Option<String>,
}

impl BuilderModel {
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn schema(&self) -> &[FieldNode] {
        &self.schema
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }
}

/// Messages produced by the builder and preview views.
#[derive(Clone, Debug, PartialEq)]
pub enum BuilderMsg {
    LoadJson(String),
    AddField {
        kind: FieldKind,
        at: Option<usize>,
    },
    UpdateField {
        index: usize,
        node: Box<FieldNode>,
    },
    /// Branching selector: reveal a new `kind` field when `option` is chosen.
    LinkOption {
        index: usize,
        option: String,
        kind: FieldKind,
    },
    RemoveField(usize),
    DuplicateField(usize),
    MoveUp(usize),
    MoveDown(usize),
    Reorder {
        from: usize,
        to: usize,
    },
    ApplyOrder(Vec<String>),
    DetachChild(String),
    DetachParent(String),
    ChangeKind {
        index: usize,
        kind: FieldKind,
    },
    SetBranching {
        index: usize,
        enabled: bool,
    },
    AddOption(usize),
    RemoveOption {
        index: usize,
        value: String,
    },
    SetAnswer {
        name: String,
        value: Value,
    },
    ClearAnswer(String),
    DismissError,
}

/// Feedback surfaced to the status bar/modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuilderEvent {
    pub message: String,
    pub is_error: bool,
}

/// Update the model based on a message.
pub fn update(model: &mut BuilderModel, msg: BuilderMsg) -> Option<BuilderEvent> {
    let cfg = &model.config;
    let schema = &model.schema;
    let next = match msg {
        BuilderMsg::LoadJson(json) => {
            let event = match parse_schema(&json) {
                Ok(loaded) => {
                    let message = format!("Loaded {} field(s).", loaded.len());
                    model.schema = loaded;
                    model.answers.clear();
                    BuilderEvent {
                        message,
                        is_error: false,
                    }
                }
                Err(err) => BuilderEvent {
                    message: format!("{err:#}"),
                    is_error: true,
                },
            };
            surface_event(model, &event);
            return Some(event);
        }
        BuilderMsg::AddField { kind, at } => mutations::add_field(schema, kind, at, cfg),
        BuilderMsg::UpdateField { index, node } => {
            mutations::update_field(schema, index, *node, cfg)
        }
        BuilderMsg::LinkOption {
            index,
            option,
            kind,
        } => {
            let Some(field) = schema.get(index) else {
                return None;
            };
            let mut proposal = field.clone();
            proposal.branching_enabled = true;
            proposal
                .branching
                .entry(option)
                .or_default()
                .push(kind.as_str().to_string());
            mutations::update_field(schema, index, proposal, cfg)
        }
        BuilderMsg::RemoveField(index) => mutations::remove_field(schema, index),
        BuilderMsg::DuplicateField(index) => mutations::duplicate_field(schema, index, cfg),
        BuilderMsg::MoveUp(index) => mutations::move_up(schema, index),
        BuilderMsg::MoveDown(index) => mutations::move_down(schema, index),
        BuilderMsg::Reorder { from, to } => mutations::reorder(schema, from, to),
        BuilderMsg::ApplyOrder(order) => mutations::apply_order(schema, &order),
        BuilderMsg::DetachChild(id) => mutations::detach_child(schema, &id),
        BuilderMsg::DetachParent(id) => mutations::detach_parent(schema, &id),
        BuilderMsg::ChangeKind { index, kind } => mutations::change_kind(schema, index, kind, cfg),
        BuilderMsg::SetBranching { index, enabled } => {
            mutations::set_branching_enabled(schema, index, enabled)
        }
        BuilderMsg::AddOption(index) => mutations::add_option(schema, index, cfg),
        BuilderMsg::RemoveOption { index, value } => {
            let next = mutations::remove_option(schema, index, &value);
            if next == *schema && schema.get(index).is_some_and(|f| f.has_option(&value)) {
                let event = BuilderEvent {
                    message: "A choice field needs at least one option.".to_string(),
                    is_error: false,
                };
                surface_event(model, &event);
                return Some(event);
            }
            next
        }
        BuilderMsg::SetAnswer { name, value } => {
            model.answers.insert(name, value);
            model.answers = prune_hidden_answers(&model.schema, &model.answers);
            return None;
        }
        BuilderMsg::ClearAnswer(name) => {
            model.answers.remove(&name);
            model.answers = prune_hidden_answers(&model.schema, &model.answers);
            return None;
        }
        BuilderMsg::DismissError => {
            model.error = None;
            return None;
        }
    };

    model.schema = next;
    model.answers = prune_hidden_answers(&model.schema, &model.answers);
    None
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut BuilderModel, event: &BuilderEvent) {
    if event.is_error {
        model.error = Some(event.message.clone());
    }
    model.status = Some(event.message.clone());
}

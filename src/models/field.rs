// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Field definitions of a declaration form schema.
//! Types are kept pure so they can be shared by the builder, the renderer and persistence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field kinds the form builder knows how to configure.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Select,
    Radio,
    Checkbox,
    Switch,
    Import,
    Unknown(String),
}

impl FieldKind {
    /// Every kind an administrator can pick when adding a field.
    pub const ALL: [FieldKind; 8] = [
        FieldKind::Text,
        FieldKind::Number,
        FieldKind::Date,
        FieldKind::Select,
        FieldKind::Radio,
        FieldKind::Checkbox,
        FieldKind::Switch,
        FieldKind::Import,
    ];

    /// Creates a `FieldKind` from a persisted type token.
    ///
    /// Unknown tokens are returned as `FieldKind::Unknown` holding the original string,
    /// so a template written by a newer builder still loads.
    ///
    /// # Examples
    ///
    /// ```
    /// use branchform::models::FieldKind;
    ///
    /// assert_eq!(FieldKind::from_token("radio"), FieldKind::Radio);
    /// assert_eq!(FieldKind::from_token("rating"), FieldKind::Unknown("rating".to_string()));
    /// ```
    pub fn from_token(raw: &str) -> Self {
        match raw {
            "text" => Self::Text,
            "number" => Self::Number,
            "date" => Self::Date,
            "select" => Self::Select,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            "switch" => Self::Switch,
            "import" => Self::Import,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Like [`FieldKind::from_token`], but only for the closed set of known kinds.
    pub fn known(raw: &str) -> Option<Self> {
        match Self::from_token(raw) {
            Self::Unknown(_) => None,
            kind => Some(kind),
        }
    }

    /// String form used when emitting JSON and deriving field names.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Switch => "switch",
            Self::Import => "import",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    /// Human label shown when a field of this kind is first created.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Text => "Text",
            Self::Number => "Number",
            Self::Date => "Date",
            Self::Select => "Select",
            Self::Radio => "Single choice",
            Self::Checkbox => "Multiple choice",
            Self::Switch => "Switch",
            Self::Import => "File import",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    /// Only single- and multiple-choice fields may reveal sub-fields.
    pub fn supports_branching(&self) -> bool {
        matches!(self, Self::Radio | Self::Checkbox)
    }

    /// Kinds whose configuration includes an option list.
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }
}

impl From<String> for FieldKind {
    fn from(raw: String) -> Self {
        Self::from_token(raw.trim())
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of an option list; identified by `value`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Single entry of the schema array: a field definition plus optional branching linkage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    /// Stable join key for every relationship.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Data-binding key used by the renderer; unique within the schema.
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Select only: multi-selection mode.
    #[serde(default, skip_serializing_if = "is_false")]
    pub multiple: bool,
    /// Date only: also capture a time of day.
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_time: bool,
    /// Import only: accepted file extensions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accept: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_duplicate: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_field_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_option_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branching_color: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub branching_enabled: bool,
    /// Option value -> ordered child ids.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub branching: BTreeMap<String, Vec<String>>,
    /// Option value -> color shared by that option's children.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub branching_colors: BTreeMap<String, String>,

    /// Keys this engine does not interpret (min/max/step, ...), kept for lossless saves.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FieldNode {
    /// A node without a parent link is a root field.
    pub fn is_root(&self) -> bool {
        self.parent_field_id.is_none()
    }

    pub fn is_child_of(&self, parent_id: &str) -> bool {
        self.parent_field_id.as_deref() == Some(parent_id)
    }

    /// Position of `value` within this field's option list.
    pub fn option_position(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|o| o.value == value)
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.option_position(value).is_some()
    }

    /// True when the node currently records at least one branch child.
    pub fn has_branches(&self) -> bool {
        self.branching.values().any(|ids| !ids.is_empty())
    }

    /// Turn this node into a root field, dropping its parent link and branch color.
    pub fn clear_parent_link(&mut self) {
        self.parent_field_id = None;
        self.parent_option_value = None;
        self.branching_color = None;
    }

    /// Drop every branch record held by this node.
    pub fn clear_branching(&mut self) {
        self.branching_enabled = false;
        self.branching.clear();
        self.branching_colors.clear();
    }
}

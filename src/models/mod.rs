// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types and persistence helpers shared between builder and renderer.

pub mod field;
pub mod schema;

pub use field::{ChoiceOption, FieldKind, FieldNode};
pub use schema::{Answers, Schema, load_schema, parse_schema, schema_to_json};

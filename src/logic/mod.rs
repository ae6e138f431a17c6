// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Business logic of the branching schema engine.
//!
//! Responsibilities:
//! - Answer tree questions (depth, identifiers, descendants) over the flat schema.
//! - Create fields with type-appropriate defaults and branch colors.
//! - Transform the schema while keeping parent links, branching records and
//!   subtree contiguity consistent.
//! - Decide which branch fields a renderer shows for the current answers.

pub mod colors;
pub mod defaults;
pub mod mutations;
pub mod tree;
pub mod validate;
pub mod visibility;

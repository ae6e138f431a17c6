// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by the builder logic.

pub mod ids;

/// Generate a fresh field id.
pub use ids::new_field_id;
/// Derive the next free `${kind}_${n}` name.
pub use ids::next_name;

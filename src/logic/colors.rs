// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Branch color allocation.

use rand::Rng;

use crate::models::FieldNode;

/// First palette entry not in `existing`, or a random hex color that does not collide.
///
/// Comparison is case-insensitive, so `#3b82f6` blocks `#3B82F6`.
pub fn next_color<R: Rng + ?Sized>(palette: &[String], existing: &[String], rng: &mut R) -> String {
    let taken = |candidate: &str| existing.iter().any(|c| c.eq_ignore_ascii_case(candidate));

    if let Some(color) = palette.iter().find(|c| !taken(c)) {
        return color.clone();
    }

    loop {
        let candidate = format!("#{:06X}", rng.random_range(0..=0xFF_FFFFu32));
        if !taken(&candidate) {
            log::debug!("branch palette exhausted, using random color {candidate}");
            return candidate;
        }
    }
}

/// Every branch color currently assigned anywhere in the schema.
pub fn colors_in_use(schema: &[FieldNode]) -> Vec<String> {
    let mut colors: Vec<String> = schema
        .iter()
        .flat_map(|f| f.branching_colors.values().cloned())
        .collect();
    colors.sort();
    colors.dedup();
    colors
}

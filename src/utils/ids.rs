// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Fresh identifiers and unique field names.

use std::collections::HashSet;

use uuid::Uuid;

/// Generate a new field id such as `field_5f0c...`.
pub fn new_field_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

/// Smallest `${kind}_${n}` (n >= 1) not present in `taken`.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use branchform::utils::next_name;
///
/// let taken: HashSet<String> = ["text_1".to_string(), "text_3".to_string()].into();
/// assert_eq!(next_name("text", &taken), "text_2");
/// ```
pub fn next_name(kind: &str, taken: &HashSet<String>) -> String {
    (1..)
        .map(|n| format!("{kind}_{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| format!("{kind}_{}", Uuid::new_v4().simple()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_prefixed_and_distinct() {
        let a = new_field_id("field");
        let b = new_field_id("field");
        assert!(a.starts_with("field_"));
        assert_ne!(a, b);
    }

    #[test]
    fn first_free_suffix_is_used() {
        let taken = HashSet::new();
        assert_eq!(next_name("radio", &taken), "radio_1");
    }
}

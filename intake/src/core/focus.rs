//! Focus target selection for a rejected submit.

use crate::core::types::{ErrorMap, Field};

/// First field in canonical order that has an error.
///
/// Returns `None` for an empty map. Independent of how `errors` iterates.
pub fn focus_target(errors: &ErrorMap) -> Option<Field> {
    Field::ALL.into_iter().find(|field| errors.contains(*field))
}

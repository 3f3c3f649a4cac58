//! Availability evaluator: which options can still be picked given the rest of
//! the selection.
//!
//! Testing option `o` of type `t` means: replace (never append) the selection's
//! entry for `t` with `o`, then ask whether any variant carries every pair of
//! that test selection. An option of an already-chosen type is therefore judged
//! as a swap, not as a second value for the same type.

use std::collections::HashMap;

use serde::Serialize;

use crate::attribute::{AttributeCatalog, AttributeOptionId, AttributeTypeId};
use crate::selection::AttributeSelection;
use crate::variant::Variant;

/// Whether picking `(type_id, option_id)` on top of `selection` still reaches a variant.
pub fn is_available(
    variants: &[Variant],
    selection: &AttributeSelection,
    type_id: &AttributeTypeId,
    option_id: &AttributeOptionId,
) -> bool {
    let test = selection.with(type_id, option_id);
    variants.iter().any(|v| v.matches(&test))
}

/// Per-option affordance for the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionState {
    Selected,
    Available,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionAvailability {
    pub option_id: AttributeOptionId,
    pub state: OptionState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeAvailability {
    pub type_id: AttributeTypeId,
    pub options: Vec<OptionAvailability>,
}

impl TypeAvailability {
    pub fn state_of(&self, option_id: &AttributeOptionId) -> Option<OptionState> {
        self.options
            .iter()
            .find(|o| &o.option_id == option_id)
            .map(|o| o.state)
    }
}

/// Evaluate every option of every catalog type against one selection snapshot.
pub fn option_states(
    catalog: &AttributeCatalog,
    variants: &[Variant],
    selection: &AttributeSelection,
) -> Vec<TypeAvailability> {
    evaluate(catalog, selection, |t, o| is_available(variants, selection, t, o))
}

pub(crate) fn evaluate(
    catalog: &AttributeCatalog,
    selection: &AttributeSelection,
    mut probe: impl FnMut(&AttributeTypeId, &AttributeOptionId) -> bool,
) -> Vec<TypeAvailability> {
    catalog
        .types()
        .iter()
        .map(|attribute_type| {
            let type_id = &attribute_type.id;
            let options = catalog
                .options_for(type_id)
                .map(|option| {
                    let state = if selection.contains(type_id, &option.id) {
                        OptionState::Selected
                    } else if probe(type_id, &option.id) {
                        OptionState::Available
                    } else {
                        OptionState::Unavailable
                    };
                    OptionAvailability {
                        option_id: option.id.clone(),
                        state,
                    }
                })
                .collect();
            TypeAvailability {
                type_id: type_id.clone(),
                options,
            }
        })
        .collect()
}

/// Memoized availability for one fixed variant list.
///
/// Keyed by the test selection itself (current selection with the candidate
/// swapped in), which fully determines the answer. Call `clear` if the variant
/// list changes.
#[derive(Debug, Default)]
pub struct AvailabilityCache {
    entries: HashMap<AttributeSelection, bool>,
    hits: u64,
    misses: u64,
}

impl AvailabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_available(
        &mut self,
        variants: &[Variant],
        selection: &AttributeSelection,
        type_id: &AttributeTypeId,
        option_id: &AttributeOptionId,
    ) -> bool {
        let test = selection.with(type_id, option_id);
        if let Some(&known) = self.entries.get(&test) {
            self.hits += 1;
            return known;
        }
        self.misses += 1;
        let available = variants.iter().any(|v| v.matches(&test));
        self.entries.insert(test, available);
        available
    }

    /// [`option_states`] answered through the cache.
    pub fn option_states(
        &mut self,
        catalog: &AttributeCatalog,
        variants: &[Variant],
        selection: &AttributeSelection,
    ) -> Vec<TypeAvailability> {
        evaluate(catalog, selection, |t, o| {
            self.is_available(variants, selection, t, o)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation or the last `clear`.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

//! A shopper's (possibly partial) attribute selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use storefront_core::ValueObject;

use crate::attribute::{AttributeOptionId, AttributeTypeId};
use crate::signature::Signature;

/// Mapping `type → option`, at most one option per type.
///
/// Backed by a `BTreeMap`, so iteration order is by type id and two selections
/// holding the same entries compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSelection(BTreeMap<AttributeTypeId, AttributeOptionId>);

impl ValueObject for AttributeSelection {}

impl AttributeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs; a later pair for the same type replaces the earlier one.
    pub fn from_pairs<T, O>(pairs: impl IntoIterator<Item = (T, O)>) -> Self
    where
        T: Into<AttributeTypeId>,
        O: Into<AttributeOptionId>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(t, o)| (t.into(), o.into()))
                .collect(),
        )
    }

    /// Choose `option` for `type_id`, replacing any previous choice for that type.
    ///
    /// Returns the replaced option, if any.
    pub fn select(
        &mut self,
        type_id: AttributeTypeId,
        option_id: AttributeOptionId,
    ) -> Option<AttributeOptionId> {
        self.0.insert(type_id, option_id)
    }

    /// A copy of this selection with `type_id` set to `option_id` (overwrite, never append).
    pub fn with(&self, type_id: &AttributeTypeId, option_id: &AttributeOptionId) -> Self {
        let mut next = self.clone();
        next.0.insert(type_id.clone(), option_id.clone());
        next
    }

    pub fn clear(&mut self, type_id: &AttributeTypeId) -> Option<AttributeOptionId> {
        self.0.remove(type_id)
    }

    pub fn clear_all(&mut self) {
        self.0.clear();
    }

    pub fn get(&self, type_id: &AttributeTypeId) -> Option<&AttributeOptionId> {
        self.0.get(type_id)
    }

    pub fn contains(&self, type_id: &AttributeTypeId, option_id: &AttributeOptionId) -> bool {
        self.0.get(type_id) == Some(option_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributeTypeId, &AttributeOptionId)> {
        self.0.iter()
    }

    pub fn signature(&self) -> Signature {
        Signature::from_pairs(self.iter())
    }
}

impl<'a> IntoIterator for &'a AttributeSelection {
    type Item = (&'a AttributeTypeId, &'a AttributeOptionId);
    type IntoIter = std::collections::btree_map::Iter<'a, AttributeTypeId, AttributeOptionId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

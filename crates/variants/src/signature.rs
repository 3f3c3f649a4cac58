//! Canonical signature of a set of `(type, option)` pairs.
//!
//! Each pair becomes a `type:option` token; tokens are sorted and joined with
//! `|`. Two attribute sets are the same combination iff their signatures are
//! equal, regardless of the order the pairs were listed in. Pairs with a
//! missing id are dropped so malformed rows never break comparison.

use serde::{Deserialize, Serialize};

use storefront_core::ValueObject;

use crate::attribute::{AttributeOptionId, AttributeTypeId};

/// Separator between tokens.
pub const SEPARATOR: char = '|';

/// Order-independent key of an attribute combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl ValueObject for Signature {}

impl Signature {
    /// Signature of any collection of pairs (total: the empty set has an empty signature).
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a AttributeTypeId, &'a AttributeOptionId)>,
    {
        let mut tokens: Vec<String> = pairs
            .into_iter()
            .filter(|(t, o)| !t.is_missing() && !o.is_missing())
            .map(|(t, o)| format!("{t}:{o}"))
            .collect();
        tokens.sort_unstable();

        let mut key = String::with_capacity(tokens.iter().map(|t| t.len() + 1).sum());
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                key.push(SEPARATOR);
            }
            key.push_str(token);
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of pairs encoded in the signature.
    pub fn len(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.0.split(SEPARATOR).count()
        }
    }
}

impl core::fmt::Display for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

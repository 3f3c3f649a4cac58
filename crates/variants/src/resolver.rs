//! Variant resolver: maps a shopper's selection onto a concrete variant.
//!
//! A variant matches when every selected `(type, option)` pair appears on it,
//! so a partial selection can already resolve when only one variant fits.
//! Linear scan; variant lists are small.

use std::collections::BTreeSet;

use crate::attribute::AttributeTypeId;
use crate::selection::AttributeSelection;
use crate::variant::Variant;

/// UI-facing outcome of resolving a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The selection is empty.
    NothingSelected,
    Matched(&'a Variant),
    /// The selection is not a sellable combination. Shown as a warning, never an error.
    Unavailable,
}

impl<'a> Resolution<'a> {
    pub fn variant(&self) -> Option<&'a Variant> {
        match *self {
            Resolution::Matched(v) => Some(v),
            _ => None,
        }
    }
}

/// All variants consistent with `selection`, in list order.
pub fn matching<'a>(
    variants: &'a [Variant],
    selection: &'a AttributeSelection,
) -> impl Iterator<Item = &'a Variant> + 'a {
    variants.iter().filter(move |v| v.matches(selection))
}

/// The first variant (list order) matching a non-empty selection.
///
/// An empty selection resolves to nothing. A partial selection may match
/// several variants and the first one wins. A later match carrying the same
/// combination as the winner is a data-integrity problem and gets logged.
pub fn resolve<'a>(variants: &'a [Variant], selection: &AttributeSelection) -> Option<&'a Variant> {
    if selection.is_empty() {
        return None;
    }

    let mut found = variants.iter().filter(|v| v.matches(selection));
    let first = found.next()?;

    if let Some(other) = same_combination(first, found) {
        tracing::warn!(
            signature = %first.signature(),
            first = %first.id,
            second = %other.id,
            "variants share a combination; resolving to the first"
        );
    }

    Some(first)
}

/// The first of `rest` carrying exactly `first`'s combination.
fn same_combination<'a>(
    first: &Variant,
    mut rest: impl Iterator<Item = &'a Variant>,
) -> Option<&'a Variant> {
    let signature = first.signature();
    rest.find(|v| v.signature() == signature)
}

/// Like [`resolve`], but distinguishes "nothing selected" from "no such variant".
pub fn resolve_state<'a>(variants: &'a [Variant], selection: &AttributeSelection) -> Resolution<'a> {
    if selection.is_empty() {
        return Resolution::NothingSelected;
    }
    match resolve(variants, selection) {
        Some(v) => Resolution::Matched(v),
        None => Resolution::Unavailable,
    }
}

/// Every attribute type carried by any variant is addressed by the selection.
pub fn is_complete(variants: &[Variant], selection: &AttributeSelection) -> bool {
    let types: BTreeSet<&AttributeTypeId> = variants
        .iter()
        .flat_map(|v| v.options.iter().map(|o| &o.type_id))
        .collect();
    types.iter().all(|t| selection.get(t).is_some())
}

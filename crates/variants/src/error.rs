//! Variant engine errors.

use thiserror::Error;

use storefront_core::DomainError;

use crate::attribute::AttributeTypeId;
use crate::signature::Signature;
use crate::variant::VariantId;

/// Every failure here is local and recoverable: the operator fixes the input
/// and retries. "No matching variant" is not an error (see `resolver`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VariantError {
    /// Generation requested with no option chosen on any attribute type.
    #[error("select at least one option before generating variants")]
    NoActiveAttributeTypes,

    /// The chosen grid would produce more rows than the configured limit.
    #[error("option grid yields {requested} combinations (limit {limit})")]
    TooManyCombinations { requested: u128, limit: usize },

    #[error("variant {variant_id} has no SKU")]
    EmptySku { variant_id: VariantId },

    #[error("variant {variant_id}: discount {discount}% exceeds 100%")]
    InvalidDiscount { variant_id: VariantId, discount: u8 },

    /// A hand-added row carries two options of the same attribute type.
    #[error("variant {variant_id} has more than one option for attribute type {type_id}")]
    RepeatedAttributeType {
        variant_id: VariantId,
        type_id: AttributeTypeId,
    },

    /// Two variants share a SKU (compared case-insensitively).
    #[error("SKU {sku:?} is used by variants {first} and {second}")]
    DuplicateSku {
        sku: String,
        first: VariantId,
        second: VariantId,
    },

    /// Two variants represent the same attribute combination.
    #[error("variants {first} and {second} share the combination [{signature}]")]
    DuplicateCombination {
        signature: Signature,
        first: VariantId,
        second: VariantId,
    },

    #[error("unknown variant {0}")]
    UnknownVariant(VariantId),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<VariantError> for DomainError {
    fn from(err: VariantError) -> Self {
        match err {
            VariantError::Domain(inner) => inner,
            VariantError::UnknownVariant(_) => DomainError::not_found(),
            VariantError::DuplicateSku { .. } | VariantError::DuplicateCombination { .. } => {
                DomainError::conflict(err.to_string())
            }
            VariantError::NoActiveAttributeTypes
            | VariantError::TooManyCombinations { .. }
            | VariantError::EmptySku { .. }
            | VariantError::InvalidDiscount { .. }
            | VariantError::RepeatedAttributeType { .. } => DomainError::validation(err.to_string()),
        }
    }
}

//! Submission-time checks on a finished variant list.
//!
//! Runs before anything is handed to persistence; a failing list is rejected
//! as a whole. Checks run per variant in list order, so the reported error is
//! the first problem an operator would meet scrolling the table.

use std::collections::{HashMap, HashSet};

use crate::error::VariantError;
use crate::signature::Signature;
use crate::variant::{Variant, VariantId};

/// Validate a variant list for submission.
pub fn validate_submission(variants: &[Variant]) -> Result<(), VariantError> {
    let mut skus: HashMap<String, VariantId> = HashMap::with_capacity(variants.len());
    let mut combinations: HashMap<Signature, VariantId> = HashMap::with_capacity(variants.len());

    for variant in variants {
        check_row(variant)?;

        let sku_key = variant.sku.trim().to_lowercase();
        if let Some(&first) = skus.get(&sku_key) {
            return Err(VariantError::DuplicateSku {
                sku: variant.sku.trim().to_string(),
                first,
                second: variant.id,
            });
        }
        skus.insert(sku_key, variant.id);

        let signature = variant.signature();
        if let Some(&first) = combinations.get(&signature) {
            return Err(VariantError::DuplicateCombination {
                signature,
                first,
                second: variant.id,
            });
        }
        combinations.insert(signature, variant.id);
    }

    Ok(())
}

/// Checks that need only the row itself.
pub fn check_row(variant: &Variant) -> Result<(), VariantError> {
    if variant.sku.trim().is_empty() {
        return Err(VariantError::EmptySku {
            variant_id: variant.id,
        });
    }

    if variant.discount > 100 {
        return Err(VariantError::InvalidDiscount {
            variant_id: variant.id,
            discount: variant.discount,
        });
    }

    let mut seen = HashSet::with_capacity(variant.options.len());
    for option in &variant.options {
        if !seen.insert(&option.type_id) {
            return Err(VariantError::RepeatedAttributeType {
                variant_id: variant.id,
                type_id: option.type_id.clone(),
            });
        }
    }

    Ok(())
}

//! Combination generator: expands the operator's option grid into variants.
//!
//! Regeneration is a pure function of the grid and the existing rows:
//! - the cartesian product of the chosen options (grid order, first type varies slowest),
//! - deduplicated by canonical signature,
//! - merged against existing rows so operator edits (price, stock, SKU, images,
//!   status) survive,
//! - existing rows whose combination is no longer in the grid are dropped.

use std::collections::HashMap;

use crate::attribute::{AttributeOption, AttributeType};
use crate::config::VariantDefaults;
use crate::error::VariantError;
use crate::signature::Signature;
use crate::variant::{ProductId, Variant, VariantId, VariantOption};

/// Options chosen per attribute type, in the order the operator laid them out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionGrid {
    rows: Vec<(AttributeType, Vec<AttributeOption>)>,
}

impl OptionGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chosen options for a type. Choosing again for the same type
    /// replaces the earlier choice but keeps the type's position.
    pub fn choose(
        mut self,
        attribute_type: AttributeType,
        options: impl IntoIterator<Item = AttributeOption>,
    ) -> Self {
        let options: Vec<_> = options.into_iter().collect();
        match self.rows.iter_mut().find(|(t, _)| t.id == attribute_type.id) {
            Some(row) => *row = (attribute_type, options),
            None => self.rows.push((attribute_type, options)),
        }
        self
    }

    /// Types with at least one chosen option.
    pub fn active_types(&self) -> impl Iterator<Item = (&AttributeType, &[AttributeOption])> {
        self.rows
            .iter()
            .filter(|(_, options)| !options.is_empty())
            .map(|(t, options)| (t, options.as_slice()))
    }

    /// Number of tuples the product will produce; `None` when nothing is
    /// active. Saturates instead of overflowing.
    pub fn combination_count(&self) -> Option<u128> {
        let mut active = self.active_types().peekable();
        active.peek()?;
        Some(active.fold(1u128, |acc, (_, options)| {
            acc.saturating_mul(options.len() as u128)
        }))
    }
}

/// Builds variant lists for one product.
#[derive(Debug, Clone)]
pub struct CombinationGenerator {
    product_id: ProductId,
    defaults: VariantDefaults,
}

impl CombinationGenerator {
    pub fn new(product_id: ProductId, defaults: VariantDefaults) -> Self {
        Self {
            product_id,
            defaults,
        }
    }

    /// Regenerate the variant list for `grid`, preserving edits made on `existing`.
    pub fn generate(
        &self,
        grid: &OptionGrid,
        existing: &[Variant],
    ) -> Result<Vec<Variant>, VariantError> {
        let active: Vec<_> = grid.active_types().collect();
        if active.is_empty() {
            return Err(VariantError::NoActiveAttributeTypes);
        }

        let candidates = dedupe(cartesian(&active));
        let previous = index_by_signature(existing);

        let mut reused = 0usize;
        let variants: Vec<Variant> = candidates
            .into_iter()
            .map(|(signature, options)| match previous.get(&signature) {
                Some(old) => {
                    reused += 1;
                    self.refresh(old, options)
                }
                None => self.synthesize(&signature, options),
            })
            .collect();

        tracing::debug!(
            product_id = %self.product_id,
            generated = variants.len(),
            reused,
            dropped = existing.len().saturating_sub(reused),
            "regenerated variant grid"
        );

        Ok(variants)
    }

    fn refresh(&self, old: &Variant, options: Vec<VariantOption>) -> Variant {
        let mut variant = old.clone();
        if variant.sku.trim().is_empty() {
            variant.sku = derive_sku(self.defaults.sku_prefix.as_deref(), &options);
        }
        if variant.display_name.trim().is_empty() {
            variant.display_name = derive_display_name(&options);
        }
        variant.options = options;
        variant
    }

    fn synthesize(&self, signature: &Signature, options: Vec<VariantOption>) -> Variant {
        Variant {
            id: VariantId::derived(self.product_id, signature),
            sku: derive_sku(self.defaults.sku_prefix.as_deref(), &options),
            display_name: derive_display_name(&options),
            price: self.defaults.price,
            discount: self.defaults.discount,
            stock: self.defaults.stock,
            status: self.defaults.status,
            images: Vec::new(),
            options,
        }
    }
}

fn cartesian(active: &[(&AttributeType, &[AttributeOption])]) -> Vec<Vec<VariantOption>> {
    active
        .iter()
        .fold(vec![Vec::new()], |tuples, (attribute_type, options)| {
            let mut next = Vec::with_capacity(tuples.len() * options.len());
            for tuple in &tuples {
                for option in options.iter() {
                    let mut extended = Vec::with_capacity(tuple.len() + 1);
                    extended.extend(tuple.iter().cloned());
                    extended.push(VariantOption::snapshot(attribute_type, option));
                    next.push(extended);
                }
            }
            next
        })
}

/// Keep one tuple per signature: first position, last write.
fn dedupe(tuples: Vec<Vec<VariantOption>>) -> Vec<(Signature, Vec<VariantOption>)> {
    let mut slots: HashMap<Signature, usize> = HashMap::with_capacity(tuples.len());
    let mut unique: Vec<(Signature, Vec<VariantOption>)> = Vec::with_capacity(tuples.len());

    for options in tuples {
        let signature = Signature::from_pairs(options.iter().map(|o| (&o.type_id, &o.option_id)));
        match slots.get(&signature) {
            Some(&slot) => unique[slot].1 = options,
            None => {
                slots.insert(signature.clone(), unique.len());
                unique.push((signature, options));
            }
        }
    }

    unique
}

fn index_by_signature(existing: &[Variant]) -> HashMap<Signature, &Variant> {
    let mut index: HashMap<Signature, &Variant> = HashMap::with_capacity(existing.len());
    for variant in existing {
        let signature = variant.signature();
        if let Some(first) = index.get(&signature) {
            tracing::warn!(
                signature = %signature,
                kept = %first.id,
                ignored = %variant.id,
                "existing variants share a combination; keeping the first"
            );
            continue;
        }
        index.insert(signature, variant);
    }
    index
}

/// Default SKU: option machine values upper-cased and hyphen-joined, with an
/// optional prefix (`TEE-RED-M`).
pub fn derive_sku(prefix: Option<&str>, options: &[VariantOption]) -> String {
    prefix
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .into_iter()
        .chain(options.iter().map(|o| o.value.trim().to_string()))
        .filter(|part| !part.is_empty())
        .map(|part| part.to_uppercase().split_whitespace().collect::<Vec<_>>().join("-"))
        .collect::<Vec<_>>()
        .join("-")
}

/// Default display name: option labels joined with `" / "` (`Red / M`).
pub fn derive_display_name(options: &[VariantOption]) -> String {
    options
        .iter()
        .map(|o| o.display_value.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::AggregateId;

    fn color() -> AttributeType {
        AttributeType::new("color", "color", "Color").swatch()
    }

    fn size() -> AttributeType {
        AttributeType::new("size", "size", "Size")
    }

    fn opt(type_id: &str, value: &str, label: &str) -> AttributeOption {
        AttributeOption::new(value, type_id, value, label)
    }

    fn red() -> AttributeOption {
        opt("color", "red", "Red")
    }

    fn blue() -> AttributeOption {
        opt("color", "blue", "Blue")
    }

    fn small() -> AttributeOption {
        opt("size", "s", "S")
    }

    fn medium() -> AttributeOption {
        opt("size", "m", "M")
    }

    fn generator() -> CombinationGenerator {
        CombinationGenerator::new(ProductId::new(AggregateId::new()), VariantDefaults::default())
    }

    fn full_grid() -> OptionGrid {
        OptionGrid::new()
            .choose(color(), [red(), blue()])
            .choose(size(), [small(), medium()])
    }

    fn signatures(variants: &[Variant]) -> Vec<String> {
        variants.iter().map(|v| v.signature().to_string()).collect()
    }

    #[test]
    fn empty_grid_is_rejected() {
        let grid = OptionGrid::new()
            .choose(color(), Vec::<AttributeOption>::new())
            .choose(size(), Vec::<AttributeOption>::new());
        let err = generator().generate(&grid, &[]).unwrap_err();
        assert_eq!(err, VariantError::NoActiveAttributeTypes);
        assert_eq!(grid.combination_count(), None);
    }

    #[test]
    fn generates_cartesian_product_in_grid_order() {
        let variants = generator().generate(&full_grid(), &[]).unwrap();
        assert_eq!(
            signatures(&variants),
            vec![
                "color:red|size:s",
                "color:red|size:m",
                "color:blue|size:s",
                "color:blue|size:m",
            ]
        );
        assert_eq!(variants[1].sku, "RED-M");
        assert_eq!(variants[1].display_name, "Red / M");
        assert!(variants.iter().all(|v| v.images.is_empty()));
    }

    #[test]
    fn inactive_types_are_skipped() {
        let grid = OptionGrid::new()
            .choose(color(), [red(), blue()])
            .choose(size(), Vec::<AttributeOption>::new());
        let variants = generator().generate(&grid, &[]).unwrap();
        assert_eq!(signatures(&variants), vec!["color:red", "color:blue"]);
    }

    #[test]
    fn new_rows_take_configured_defaults() {
        let defaults = VariantDefaults {
            price: 2500,
            discount: 10,
            stock: 7,
            sku_prefix: Some("tee".into()),
            ..VariantDefaults::default()
        };
        let generator = CombinationGenerator::new(ProductId::new(AggregateId::new()), defaults);
        let variants = generator
            .generate(&OptionGrid::new().choose(color(), [red()]), &[])
            .unwrap();
        assert_eq!(variants[0].price, 2500);
        assert_eq!(variants[0].discount, 10);
        assert_eq!(variants[0].stock, 7);
        assert_eq!(variants[0].sku, "TEE-RED");
    }

    #[test]
    fn regeneration_preserves_operator_edits() {
        let generator = generator();
        let mut first = generator.generate(&full_grid(), &[]).unwrap();
        first[1].price = 1999;
        first[1].stock = 4;
        first[1].sku = "CUSTOM-RM".into();
        first[1].images = vec!["https://cdn.example/red-m.jpg".into()];
        let edited = first[1].clone();

        let second = generator.generate(&full_grid(), &first).unwrap();
        assert_eq!(second[1], edited);
    }

    #[test]
    fn regeneration_refreshes_labels_but_keeps_identity() {
        let generator = generator();
        let first = generator.generate(&full_grid(), &[]).unwrap();

        let relabeled = OptionGrid::new()
            .choose(color(), [opt("color", "red", "Crimson"), blue()])
            .choose(size(), [small(), medium()]);
        let second = generator.generate(&relabeled, &first).unwrap();

        assert_eq!(second[0].id, first[0].id);
        assert_eq!(second[0].options[0].display_value, "Crimson");
        // Derived fields already present are left alone.
        assert_eq!(second[0].display_name, "Red / S");
    }

    #[test]
    fn reused_rows_get_missing_derived_fields() {
        let generator = generator();
        let mut first = generator.generate(&full_grid(), &[]).unwrap();
        first[0].sku = "  ".into();
        first[0].display_name.clear();

        let second = generator.generate(&full_grid(), &first).unwrap();
        assert_eq!(second[0].sku, "RED-S");
        assert_eq!(second[0].display_name, "Red / S");
    }

    #[test]
    fn removing_an_option_prunes_only_its_rows() {
        let generator = generator();
        let first = generator.generate(&full_grid(), &[]).unwrap();

        let narrowed = OptionGrid::new()
            .choose(color(), [red(), blue()])
            .choose(size(), [medium()]);
        let second = generator.generate(&narrowed, &first).unwrap();

        assert_eq!(signatures(&second), vec!["color:red|size:m", "color:blue|size:m"]);
        assert_eq!(second[0].id, first[1].id);
        assert_eq!(second[1].id, first[3].id);
    }

    #[test]
    fn duplicate_options_in_grid_collapse() {
        let grid = OptionGrid::new().choose(color(), [red(), red(), blue()]);
        let variants = generator().generate(&grid, &[]).unwrap();
        assert_eq!(signatures(&variants), vec!["color:red", "color:blue"]);
    }

    #[test]
    fn choosing_a_type_twice_replaces_in_place() {
        let grid = full_grid().choose(color(), [blue()]);
        assert_eq!(grid.combination_count(), Some(2));
        let variants = generator().generate(&grid, &[]).unwrap();
        assert_eq!(signatures(&variants), vec!["color:blue|size:s", "color:blue|size:m"]);
    }

    #[test]
    fn colliding_existing_rows_keep_the_first() {
        let generator = generator();
        let mut first = generator.generate(&full_grid(), &[]).unwrap();
        let mut clone = first[0].clone();
        clone.id = VariantId::new();
        clone.price = 1;
        first.push(clone);

        let second = generator.generate(&full_grid(), &first).unwrap();
        assert_eq!(second.len(), 4);
        assert_eq!(second[0].id, first[0].id);
        assert_eq!(second[0].price, 0);
    }

    #[test]
    fn derive_sku_normalizes_parts() {
        let options = vec![
            VariantOption::snapshot(&color(), &opt("color", "navy blue", "Navy Blue")),
            VariantOption::snapshot(&size(), &opt("size", "xl", "XL")),
        ];
        assert_eq!(derive_sku(None, &options), "NAVY-BLUE-XL");
        assert_eq!(derive_sku(Some(" "), &options), "NAVY-BLUE-XL");
        assert_eq!(derive_sku(Some("Tee"), &options), "TEE-NAVY-BLUE-XL");

        let padded = vec![VariantOption::snapshot(
            &color(),
            &opt("color", "navy  \t blue", "Navy Blue"),
        )];
        assert_eq!(derive_sku(None, &padded), "NAVY-BLUE");
        assert_eq!(derive_display_name(&options), "Navy Blue / XL");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn grid_of(sizes: &[usize]) -> OptionGrid {
            sizes.iter().enumerate().fold(OptionGrid::new(), |grid, (t, &k)| {
                let type_id = format!("t{t}");
                let ty = AttributeType::new(type_id.as_str(), type_id.as_str(), type_id.to_uppercase());
                let options = (0..k).map(|o| {
                    let value = format!("o{o}");
                    AttributeOption::new(format!("{type_id}-{value}"), type_id.as_str(), value.as_str(), value.to_uppercase())
                });
                grid.choose(ty, options)
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 200,
                ..ProptestConfig::default()
            })]

            /// Property: the generator yields exactly k1 × k2 × … × kn variants.
            #[test]
            fn cartesian_completeness(sizes in proptest::collection::vec(1usize..5, 1..4)) {
                let grid = grid_of(&sizes);
                let variants = generator().generate(&grid, &[]).unwrap();
                let expected: usize = sizes.iter().product();
                prop_assert_eq!(variants.len(), expected);
                prop_assert_eq!(grid.combination_count(), Some(expected as u128));

                let mut sigs: Vec<_> = variants.iter().map(Variant::signature).collect();
                sigs.sort();
                sigs.dedup();
                prop_assert_eq!(sigs.len(), expected);
            }

            /// Property: identical inputs give identical signatures, ids and order.
            #[test]
            fn generation_is_deterministic(sizes in proptest::collection::vec(1usize..4, 1..4)) {
                let grid = grid_of(&sizes);
                let generator = generator();
                let a = generator.generate(&grid, &[]).unwrap();
                let b = generator.generate(&grid, &[]).unwrap();
                prop_assert_eq!(a, b);
            }

            /// Property: regenerating over its own output is a fixed point.
            #[test]
            fn regeneration_is_idempotent(sizes in proptest::collection::vec(1usize..4, 1..4)) {
                let grid = grid_of(&sizes);
                let generator = generator();
                let first = generator.generate(&grid, &[]).unwrap();
                let second = generator.generate(&grid, &first).unwrap();
                prop_assert_eq!(first, second);
            }
        }
    }
}

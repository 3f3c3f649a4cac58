//! What the product page needs from the engine: price range, stock state and
//! imagery for the current selection.
//!
//! When the selection names every attribute of a matching variant, everything
//! comes from that variant. Otherwise it is aggregated over every variant still
//! consistent with the selection. List prices only; discounts and tax are applied elsewhere.

use serde::Serialize;

use crate::resolver;
use crate::selection::AttributeSelection;
use crate::variant::{Variant, VariantId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl PriceRange {
    pub fn is_single(&self) -> bool {
        self.min == self.max
    }

    fn include(range: Option<Self>, price: u64) -> Option<Self> {
        Some(match range {
            None => PriceRange {
                min: price,
                max: price,
            },
            Some(r) => PriceRange {
                min: r.min.min(price),
                max: r.max.max(price),
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "quantity", rename_all = "snake_case")]
pub enum StockState {
    OutOfStock,
    LowStock(u64),
    InStock(u64),
}

impl StockState {
    pub fn from_quantity(quantity: u64, low_stock_threshold: u32) -> Self {
        if quantity == 0 {
            StockState::OutOfStock
        } else if quantity <= u64::from(low_stock_threshold) {
            StockState::LowStock(quantity)
        } else {
            StockState::InStock(quantity)
        }
    }

    pub fn can_purchase(&self) -> bool {
        !matches!(self, StockState::OutOfStock)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplaySummary {
    pub resolved: Option<VariantId>,
    /// `None` when nothing is consistent with the selection.
    pub price_range: Option<PriceRange>,
    pub stock: StockState,
    pub images: Vec<String>,
}

/// Summarize `variants` for the current selection.
pub fn summarize(
    variants: &[Variant],
    selection: &AttributeSelection,
    low_stock_threshold: u32,
) -> DisplaySummary {
    match exact_match(variants, selection) {
        Some(variant) => summarize_resolved(variants, selection, variant, low_stock_threshold),
        None => summarize_candidates(variants, selection, low_stock_threshold),
    }
}

/// First variant whose every attribute is addressed by `selection`.
///
/// Judged per variant, so a `{color}` row resolves under `{color: red}` even
/// when other rows also carry a size.
fn exact_match<'v>(variants: &'v [Variant], selection: &'v AttributeSelection) -> Option<&'v Variant> {
    if selection.is_empty() {
        return None;
    }
    resolver::matching(variants, selection)
        .find(|v| v.options.iter().all(|o| selection.get(&o.type_id).is_some()))
}

fn summarize_resolved(
    variants: &[Variant],
    selection: &AttributeSelection,
    variant: &Variant,
    low_stock_threshold: u32,
) -> DisplaySummary {
    let images = if variant.images.is_empty() {
        first_images(variants, selection)
    } else {
        variant.images.clone()
    };

    DisplaySummary {
        resolved: Some(variant.id),
        price_range: PriceRange::include(None, variant.price),
        stock: StockState::from_quantity(u64::from(variant.stock), low_stock_threshold),
        images,
    }
}

fn summarize_candidates(
    variants: &[Variant],
    selection: &AttributeSelection,
    low_stock_threshold: u32,
) -> DisplaySummary {
    let (price_range, quantity) = resolver::matching(variants, selection).fold(
        (None, 0u64),
        |(range, quantity), v| {
            (
                PriceRange::include(range, v.price),
                quantity.saturating_add(u64::from(v.stock)),
            )
        },
    );

    DisplaySummary {
        resolved: None,
        price_range,
        stock: StockState::from_quantity(quantity, low_stock_threshold),
        images: first_images(variants, selection),
    }
}

fn first_images(variants: &[Variant], selection: &AttributeSelection) -> Vec<String> {
    resolver::matching(variants, selection)
        .find(|v| !v.images.is_empty())
        .map(|v| v.images.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::VariantOption;

    fn opt(t: &str, o: &str) -> VariantOption {
        VariantOption {
            type_id: t.into(),
            option_id: o.into(),
            type_name: t.to_string(),
            type_display_name: t.to_string(),
            value: o.to_string(),
            display_value: o.to_string(),
            hex_color: None,
        }
    }

    fn variant(pairs: &[(&str, &str)], price: u64, stock: u32, images: &[&str]) -> Variant {
        let mut v = Variant::blank(VariantId::new())
            .with_options(pairs.iter().map(|(t, o)| opt(t, o)).collect());
        v.price = price;
        v.stock = stock;
        v.images = images.iter().map(|s| s.to_string()).collect();
        v
    }

    fn catalog() -> Vec<Variant> {
        vec![
            variant(&[("color", "red"), ("size", "s")], 1000, 0, &[]),
            variant(&[("color", "red"), ("size", "m")], 1200, 3, &["red-m.jpg"]),
            variant(&[("color", "blue"), ("size", "s")], 1500, 20, &["blue.jpg", "blue-2.jpg"]),
        ]
    }

    #[test]
    fn nothing_selected_aggregates_everything() {
        let summary = summarize(&catalog(), &AttributeSelection::new(), 5);
        assert_eq!(summary.resolved, None);
        assert_eq!(summary.price_range, Some(PriceRange { min: 1000, max: 1500 }));
        assert_eq!(summary.stock, StockState::InStock(23));
        assert_eq!(summary.images, vec!["red-m.jpg".to_string()]);
    }

    #[test]
    fn partial_selection_narrows_candidates() {
        let variants = catalog();
        let summary = summarize(&variants, &AttributeSelection::from_pairs([("size", "s")]), 5);
        assert_eq!(summary.resolved, None);
        assert_eq!(summary.price_range, Some(PriceRange { min: 1000, max: 1500 }));
        assert_eq!(summary.stock, StockState::InStock(20));
        assert_eq!(summary.images, vec!["blue.jpg".to_string(), "blue-2.jpg".to_string()]);
    }

    #[test]
    fn resolved_variant_drives_everything() {
        let variants = catalog();
        let selection = AttributeSelection::from_pairs([("color", "red"), ("size", "m")]);
        let summary = summarize(&variants, &selection, 5);
        assert_eq!(summary.resolved, Some(variants[1].id));
        assert!(summary.price_range.unwrap().is_single());
        assert_eq!(summary.stock, StockState::LowStock(3));
        assert_eq!(summary.images, vec!["red-m.jpg".to_string()]);
    }

    #[test]
    fn resolved_variant_without_images_falls_back() {
        let variants = catalog();
        let selection = AttributeSelection::from_pairs([("color", "red"), ("size", "s")]);
        let summary = summarize(&variants, &selection, 5);
        assert_eq!(summary.stock, StockState::OutOfStock);
        assert!(!summary.stock.can_purchase());
        assert!(summary.images.is_empty());
    }

    #[test]
    fn unavailable_selection_has_no_price() {
        let summary = summarize(&catalog(), &AttributeSelection::from_pairs([("color", "green")]), 5);
        assert_eq!(summary.resolved, None);
        assert_eq!(summary.price_range, None);
        assert_eq!(summary.stock, StockState::OutOfStock);
        assert!(summary.images.is_empty());
    }

    #[test]
    fn exact_match_in_mixed_list_resolves() {
        // A color-only row next to color + size rows.
        let variants = vec![
            variant(&[("color", "red"), ("size", "s")], 1000, 4, &[]),
            variant(&[("color", "red")], 900, 7, &["red.jpg"]),
            variant(&[("color", "blue"), ("size", "s")], 1500, 20, &[]),
        ];
        let summary = summarize(&variants, &AttributeSelection::from_pairs([("color", "red")]), 5);
        assert_eq!(summary.resolved, Some(variants[1].id));
        assert_eq!(summary.price_range, Some(PriceRange { min: 900, max: 900 }));
        assert_eq!(summary.stock, StockState::InStock(7));
        assert_eq!(summary.images, vec!["red.jpg".to_string()]);

        let blue = summarize(&variants, &AttributeSelection::from_pairs([("color", "blue")]), 5);
        assert_eq!(blue.resolved, None);
    }

    #[test]
    fn stock_state_serializes_tagged() {
        let json = serde_json::to_value(StockState::LowStock(2)).unwrap();
        assert_eq!(json, serde_json::json!({"state": "low_stock", "quantity": 2}));
        let json = serde_json::to_value(StockState::OutOfStock).unwrap();
        assert_eq!(json, serde_json::json!({"state": "out_of_stock"}));
    }
}

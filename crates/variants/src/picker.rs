//! Storefront selection session for one product page.
//!
//! Owns the shopper's selection and answers every UI question against the
//! selection as it stands after the latest change. Only active variants take
//! part; inactive rows are never offered.

use crate::attribute::{AttributeCatalog, AttributeOptionId, AttributeTypeId};
use crate::availability::{AvailabilityCache, TypeAvailability};
use crate::config::VariantConfig;
use crate::display::{self, DisplaySummary};
use crate::resolver::{self, Resolution};
use crate::selection::AttributeSelection;
use crate::variant::Variant;

#[derive(Debug)]
pub struct VariantPicker<'a> {
    catalog: &'a AttributeCatalog,
    variants: Vec<Variant>,
    selection: AttributeSelection,
    cache: AvailabilityCache,
    low_stock_threshold: u32,
}

impl<'a> VariantPicker<'a> {
    pub fn new(catalog: &'a AttributeCatalog, variants: &[Variant], config: &VariantConfig) -> Self {
        Self {
            catalog,
            variants: variants.iter().filter(|v| v.is_active()).cloned().collect(),
            selection: AttributeSelection::new(),
            cache: AvailabilityCache::new(),
            low_stock_threshold: config.low_stock_threshold,
        }
    }

    /// Start from a saved selection (e.g. a deep link). Entries naming types or
    /// options the catalog does not know are dropped.
    pub fn with_selection(mut self, selection: AttributeSelection) -> Self {
        for (type_id, option_id) in selection.iter() {
            if self.is_known(type_id, option_id) {
                self.selection.select(type_id.clone(), option_id.clone());
            }
        }
        self
    }

    /// Toggle an option: choosing the current option again clears its type.
    ///
    /// Returns `false` (and changes nothing) for options the catalog does not
    /// know under `type_id`.
    pub fn select(&mut self, type_id: &AttributeTypeId, option_id: &AttributeOptionId) -> bool {
        if !self.is_known(type_id, option_id) {
            tracing::debug!(%type_id, %option_id, "ignoring selection of unknown option");
            return false;
        }
        if self.selection.contains(type_id, option_id) {
            self.selection.clear(type_id);
        } else {
            self.selection.select(type_id.clone(), option_id.clone());
        }
        true
    }

    pub fn clear(&mut self, type_id: &AttributeTypeId) {
        self.selection.clear(type_id);
    }

    pub fn reset(&mut self) {
        self.selection.clear_all();
    }

    pub fn selection(&self) -> &AttributeSelection {
        &self.selection
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn resolution(&self) -> Resolution<'_> {
        resolver::resolve_state(&self.variants, &self.selection)
    }

    pub fn is_complete(&self) -> bool {
        resolver::is_complete(&self.variants, &self.selection)
    }

    /// Selected / available / unavailable for every catalog option.
    pub fn option_states(&mut self) -> Vec<TypeAvailability> {
        self.cache
            .option_states(self.catalog, &self.variants, &self.selection)
    }

    pub fn summary(&self) -> DisplaySummary {
        display::summarize(&self.variants, &self.selection, self.low_stock_threshold)
    }

    fn is_known(&self, type_id: &AttributeTypeId, option_id: &AttributeOptionId) -> bool {
        self.catalog
            .option(option_id)
            .is_some_and(|o| &o.type_id == type_id)
    }
}

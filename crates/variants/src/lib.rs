//! Product-variant attribute engine.
//!
//! Expands chosen attribute options into concrete variants, resolves a
//! shopper's selection to a variant, and reports which options remain
//! choosable. Pure, deterministic domain logic (no IO, no HTTP, no storage).
//!
//! Data flow: catalog → [`generator`] (admin authoring) → persisted variants →
//! [`resolver`] + [`availability`] (storefront) → [`display`].

pub mod attribute;
pub mod availability;
pub mod config;
pub mod display;
pub mod error;
pub mod generator;
pub mod picker;
pub mod resolver;
pub mod selection;
pub mod signature;
pub mod validation;
pub mod variant;
pub mod variant_set;

pub use attribute::{
    AttributeCatalog, AttributeKind, AttributeOption, AttributeOptionId, AttributeType,
    AttributeTypeId,
};
pub use availability::{
    is_available, option_states, AvailabilityCache, OptionAvailability, OptionState,
    TypeAvailability,
};
pub use config::{VariantConfig, VariantDefaults};
pub use display::{summarize, DisplaySummary, PriceRange, StockState};
pub use error::VariantError;
pub use generator::{derive_display_name, derive_sku, CombinationGenerator, OptionGrid};
pub use picker::VariantPicker;
pub use resolver::{is_complete, matching, resolve, resolve_state, Resolution};
pub use selection::AttributeSelection;
pub use signature::Signature;
pub use validation::{check_row, validate_submission};
pub use variant::{ProductId, Variant, VariantId, VariantOption, VariantStatus};
pub use variant_set::{
    AddVariantRow, LoadVariants, RegenerateVariants, RemoveVariant, SubmitVariants,
    UpdateVariant, VariantChanges, VariantRemoved, VariantRowAdded, VariantSet,
    VariantSetCommand, VariantSetEvent, VariantUpdated, VariantsLoaded, VariantsRegenerated,
    VariantsSubmitted,
};

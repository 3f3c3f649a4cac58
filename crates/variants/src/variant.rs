use serde::{Deserialize, Serialize};

use storefront_core::{AggregateId, Entity, ValueObject};

use crate::attribute::{AttributeOption, AttributeOptionId, AttributeType, AttributeTypeId};
use crate::selection::AttributeSelection;
use crate::signature::Signature;

/// Product identifier (the variant set's aggregate id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Variant identifier.
///
/// Persisted variants keep their id across edits and regenerations. Rows created
/// by the generator get a name-based id derived from the product and the
/// combination signature, so generating twice yields the same ids.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub AggregateId);

impl VariantId {
    pub fn new() -> Self {
        Self(AggregateId::new())
    }

    pub fn derived(product_id: ProductId, signature: &Signature) -> Self {
        Self(AggregateId::derived(
            product_id.0.as_uuid(),
            signature.as_str().as_bytes(),
        ))
    }
}

impl Default for VariantId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for VariantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Snapshot of one `(type, option)` pair taken when the variant was built.
///
/// Carries the display fields so a variant stays self-describing if the
/// catalog changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    pub type_id: AttributeTypeId,
    pub option_id: AttributeOptionId,
    pub type_name: String,
    pub type_display_name: String,
    pub value: String,
    pub display_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex_color: Option<String>,
}

impl ValueObject for VariantOption {}

impl VariantOption {
    pub fn snapshot(attribute_type: &AttributeType, option: &AttributeOption) -> Self {
        Self {
            type_id: attribute_type.id.clone(),
            option_id: option.id.clone(),
            type_name: attribute_type.name.clone(),
            type_display_name: attribute_type.display_name.clone(),
            value: option.value.clone(),
            display_value: option.display_value.clone(),
            hex_color: option.hex_color.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantStatus {
    #[default]
    Active,
    Inactive,
}

/// One concrete, sellable combination of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub sku: String,
    pub display_name: String,
    /// Price in smallest currency unit (e.g. cents).
    pub price: u64,
    /// Discount percentage (0..=100).
    pub discount: u8,
    pub stock: u32,
    pub status: VariantStatus,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub options: Vec<VariantOption>,
}

impl Entity for Variant {
    type Id = VariantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Variant {
    /// An empty row (the "add row" action), active, no options.
    pub fn blank(id: VariantId) -> Self {
        Self {
            id,
            sku: String::new(),
            display_name: String::new(),
            price: 0,
            discount: 0,
            stock: 0,
            status: VariantStatus::Active,
            images: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Vec<VariantOption>) -> Self {
        self.options = options;
        self
    }

    pub fn signature(&self) -> Signature {
        Signature::from_pairs(self.options.iter().map(|o| (&o.type_id, &o.option_id)))
    }

    /// The option this variant carries for `type_id`, if any.
    pub fn option_for(&self, type_id: &AttributeTypeId) -> Option<&AttributeOptionId> {
        self.options
            .iter()
            .find(|o| &o.type_id == type_id)
            .map(|o| &o.option_id)
    }

    /// Whether every entry of `selection` appears on this variant (selection ⊆ attributes).
    pub fn matches(&self, selection: &AttributeSelection) -> bool {
        selection.iter().all(|(type_id, option_id)| {
            self.options
                .iter()
                .any(|o| &o.type_id == type_id && &o.option_id == option_id)
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == VariantStatus::Active
    }

    /// Active and in stock.
    pub fn is_sellable(&self) -> bool {
        self.is_active() && self.stock > 0
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{Aggregate, AggregateRoot, DomainError, TenantId};
use storefront_events::Event;

use crate::config::VariantConfig;
use crate::error::VariantError;
use crate::generator::{derive_display_name, derive_sku, CombinationGenerator, OptionGrid};
use crate::validation::{check_row, validate_submission};
use crate::variant::{ProductId, Variant, VariantId, VariantOption, VariantStatus};

/// Aggregate root: the variant list of one product while an operator edits it.
///
/// Rows are loaded from persistence, regenerated from an option grid, added by
/// hand, edited and removed; `SubmitVariants` validates the whole list before
/// it is handed back to persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSet {
    id: ProductId,
    tenant_id: Option<TenantId>,
    variants: Vec<Variant>,
    config: VariantConfig,
    submitted: bool,
    version: u64,
    loaded: bool,
}

impl VariantSet {
    /// Create an empty, not-yet-loaded aggregate instance for rehydration.
    pub fn empty(id: ProductId, config: VariantConfig) -> Self {
        Self {
            id,
            tenant_id: None,
            variants: Vec::new(),
            config,
            submitted: false,
            version: 0,
            loaded: false,
        }
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn variant(&self, id: VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// Submitted and not edited since.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn generator(&self) -> CombinationGenerator {
        CombinationGenerator::new(self.id, self.config.defaults.clone())
    }
}

impl AggregateRoot for VariantSet {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Operator edits to one row. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantChanges {
    pub sku: Option<String>,
    pub display_name: Option<String>,
    pub price: Option<u64>,
    pub discount: Option<u8>,
    pub stock: Option<u32>,
    pub status: Option<VariantStatus>,
    pub images: Option<Vec<String>>,
}

impl VariantChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply_to(&self, variant: &mut Variant) {
        if let Some(sku) = &self.sku {
            variant.sku = sku.clone();
        }
        if let Some(name) = &self.display_name {
            variant.display_name = name.clone();
        }
        if let Some(price) = self.price {
            variant.price = price;
        }
        if let Some(discount) = self.discount {
            variant.discount = discount;
        }
        if let Some(stock) = self.stock {
            variant.stock = stock;
        }
        if let Some(status) = self.status {
            variant.status = status;
        }
        if let Some(images) = &self.images {
            variant.images = images.clone();
        }
    }
}

/// Command: LoadVariants (open an editing session from the persisted list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadVariants {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub variants: Vec<Variant>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RegenerateVariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegenerateVariants {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub grid: OptionGrid,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddVariantRow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddVariantRow {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub options: Vec<VariantOption>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateVariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateVariant {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub changes: VariantChanges,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveVariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveVariant {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SubmitVariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitVariants {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantSetCommand {
    LoadVariants(LoadVariants),
    RegenerateVariants(RegenerateVariants),
    AddVariantRow(AddVariantRow),
    UpdateVariant(UpdateVariant),
    RemoveVariant(RemoveVariant),
    SubmitVariants(SubmitVariants),
}

/// Event: VariantsLoaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantsLoaded {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub variants: Vec<Variant>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: VariantsRegenerated (replaces the whole list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantsRegenerated {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub variants: Vec<Variant>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: VariantRowAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRowAdded {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub variant: Variant,
    pub occurred_at: DateTime<Utc>,
}

/// Event: VariantUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantUpdated {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub changes: VariantChanges,
    pub occurred_at: DateTime<Utc>,
}

/// Event: VariantRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRemoved {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: VariantsSubmitted (the list passed validation and may be persisted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantsSubmitted {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub variant_count: usize,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantSetEvent {
    VariantsLoaded(VariantsLoaded),
    VariantsRegenerated(VariantsRegenerated),
    VariantRowAdded(VariantRowAdded),
    VariantUpdated(VariantUpdated),
    VariantRemoved(VariantRemoved),
    VariantsSubmitted(VariantsSubmitted),
}

impl Event for VariantSetEvent {
    fn event_type(&self) -> &'static str {
        match self {
            VariantSetEvent::VariantsLoaded(_) => "variants.variant_set.loaded",
            VariantSetEvent::VariantsRegenerated(_) => "variants.variant_set.regenerated",
            VariantSetEvent::VariantRowAdded(_) => "variants.variant_set.row_added",
            VariantSetEvent::VariantUpdated(_) => "variants.variant_set.variant_updated",
            VariantSetEvent::VariantRemoved(_) => "variants.variant_set.variant_removed",
            VariantSetEvent::VariantsSubmitted(_) => "variants.variant_set.submitted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            VariantSetEvent::VariantsLoaded(e) => e.occurred_at,
            VariantSetEvent::VariantsRegenerated(e) => e.occurred_at,
            VariantSetEvent::VariantRowAdded(e) => e.occurred_at,
            VariantSetEvent::VariantUpdated(e) => e.occurred_at,
            VariantSetEvent::VariantRemoved(e) => e.occurred_at,
            VariantSetEvent::VariantsSubmitted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for VariantSet {
    type Command = VariantSetCommand;
    type Event = VariantSetEvent;
    type Error = VariantError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            VariantSetEvent::VariantsLoaded(e) => {
                self.id = e.product_id;
                self.tenant_id = Some(e.tenant_id);
                self.variants = e.variants.clone();
                self.loaded = true;
                self.submitted = false;
            }
            VariantSetEvent::VariantsRegenerated(e) => {
                self.variants = e.variants.clone();
                self.submitted = false;
            }
            VariantSetEvent::VariantRowAdded(e) => {
                self.variants.push(e.variant.clone());
                self.submitted = false;
            }
            VariantSetEvent::VariantUpdated(e) => {
                if let Some(variant) = self.variants.iter_mut().find(|v| v.id == e.variant_id) {
                    e.changes.apply_to(variant);
                }
                self.submitted = false;
            }
            VariantSetEvent::VariantRemoved(e) => {
                self.variants.retain(|v| v.id != e.variant_id);
                self.submitted = false;
            }
            VariantSetEvent::VariantsSubmitted(_) => {
                self.submitted = true;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            VariantSetCommand::LoadVariants(cmd) => self.handle_load(cmd),
            VariantSetCommand::RegenerateVariants(cmd) => self.handle_regenerate(cmd),
            VariantSetCommand::AddVariantRow(cmd) => self.handle_add_row(cmd),
            VariantSetCommand::UpdateVariant(cmd) => self.handle_update(cmd),
            VariantSetCommand::RemoveVariant(cmd) => self.handle_remove(cmd),
            VariantSetCommand::SubmitVariants(cmd) => self.handle_submit(cmd),
        }
    }
}

impl VariantSet {
    /// Every command except `LoadVariants` targets a loaded set of the same tenant and product.
    fn ensure_target(&self, tenant_id: TenantId, product_id: ProductId) -> Result<(), VariantError> {
        if !self.loaded {
            return Err(DomainError::not_found().into());
        }
        if self.tenant_id != Some(tenant_id) {
            return Err(DomainError::invariant("tenant mismatch").into());
        }
        if self.id != product_id {
            return Err(DomainError::invariant("product_id mismatch").into());
        }
        Ok(())
    }

    fn ensure_known(&self, variant_id: VariantId) -> Result<&Variant, VariantError> {
        self.variant(variant_id)
            .ok_or(VariantError::UnknownVariant(variant_id))
    }

    fn handle_load(&self, cmd: &LoadVariants) -> Result<Vec<VariantSetEvent>, VariantError> {
        if self.loaded {
            return Err(DomainError::conflict("variant set already loaded").into());
        }
        if self.id != cmd.product_id {
            return Err(DomainError::invariant("product_id mismatch").into());
        }

        Ok(vec![VariantSetEvent::VariantsLoaded(VariantsLoaded {
            tenant_id: cmd.tenant_id,
            product_id: cmd.product_id,
            variants: cmd.variants.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_regenerate(
        &self,
        cmd: &RegenerateVariants,
    ) -> Result<Vec<VariantSetEvent>, VariantError> {
        self.ensure_target(cmd.tenant_id, cmd.product_id)?;

        let requested = cmd
            .grid
            .combination_count()
            .ok_or(VariantError::NoActiveAttributeTypes)?;
        if requested > self.config.max_combinations as u128 {
            return Err(VariantError::TooManyCombinations {
                requested,
                limit: self.config.max_combinations,
            });
        }

        let variants = self.generator().generate(&cmd.grid, &self.variants)?;

        Ok(vec![VariantSetEvent::VariantsRegenerated(VariantsRegenerated {
            tenant_id: cmd.tenant_id,
            product_id: cmd.product_id,
            variants,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_row(&self, cmd: &AddVariantRow) -> Result<Vec<VariantSetEvent>, VariantError> {
        self.ensure_target(cmd.tenant_id, cmd.product_id)?;

        if self.variant(cmd.variant_id).is_some() {
            return Err(DomainError::conflict(format!("variant {} already exists", cmd.variant_id)).into());
        }

        // Manual rows start from the generator defaults; SKU and name derive from
        // whatever options the operator attached (possibly none).
        let defaults = &self.config.defaults;
        let variant = Variant {
            id: cmd.variant_id,
            sku: derive_sku(defaults.sku_prefix.as_deref(), &cmd.options),
            display_name: derive_display_name(&cmd.options),
            price: defaults.price,
            discount: defaults.discount,
            stock: defaults.stock,
            status: defaults.status,
            images: Vec::new(),
            options: cmd.options.clone(),
        };

        Ok(vec![VariantSetEvent::VariantRowAdded(VariantRowAdded {
            tenant_id: cmd.tenant_id,
            product_id: cmd.product_id,
            variant,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(&self, cmd: &UpdateVariant) -> Result<Vec<VariantSetEvent>, VariantError> {
        self.ensure_target(cmd.tenant_id, cmd.product_id)?;
        let current = self.ensure_known(cmd.variant_id)?;

        if cmd.changes.is_empty() {
            return Err(DomainError::validation("no changes given").into());
        }

        let mut preview = current.clone();
        cmd.changes.apply_to(&mut preview);
        if cmd.changes.discount.is_some() || cmd.changes.sku.is_some() {
            check_row(&preview)?;
        }

        Ok(vec![VariantSetEvent::VariantUpdated(VariantUpdated {
            tenant_id: cmd.tenant_id,
            product_id: cmd.product_id,
            variant_id: cmd.variant_id,
            changes: cmd.changes.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveVariant) -> Result<Vec<VariantSetEvent>, VariantError> {
        self.ensure_target(cmd.tenant_id, cmd.product_id)?;
        self.ensure_known(cmd.variant_id)?;

        Ok(vec![VariantSetEvent::VariantRemoved(VariantRemoved {
            tenant_id: cmd.tenant_id,
            product_id: cmd.product_id,
            variant_id: cmd.variant_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_submit(&self, cmd: &SubmitVariants) -> Result<Vec<VariantSetEvent>, VariantError> {
        self.ensure_target(cmd.tenant_id, cmd.product_id)?;

        if self.submitted {
            return Err(DomainError::conflict("variant set has no unsubmitted changes").into());
        }

        if let Err(err) = validate_submission(&self.variants) {
            tracing::info!(product_id = %self.id, error = %err, "variant submission rejected");
            return Err(err);
        }

        Ok(vec![VariantSetEvent::VariantsSubmitted(VariantsSubmitted {
            tenant_id: cmd.tenant_id,
            product_id: cmd.product_id,
            variant_count: self.variants.len(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

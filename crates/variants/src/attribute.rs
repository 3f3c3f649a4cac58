//! Attribute catalog: selectable attribute types (Color, Size) and their options.
//!
//! The catalog is read-only input to the engine. Options are always referred to
//! by id; labels may change upstream without changing combination identity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, Entity};

macro_rules! impl_string_id {
    ($t:ident) => {
        impl $t {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Blank ids count as missing (malformed upstream data).
            pub fn is_missing(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

/// Opaque identifier of an attribute type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeTypeId(String);

/// Opaque identifier of an attribute option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeOptionId(String);

impl_string_id!(AttributeTypeId);
impl_string_id!(AttributeOptionId);

/// How the storefront renders a type's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    #[default]
    Text,
    /// Options carry a `hex_color` and render as color swatches.
    Swatch,
}

/// An axis of variation (e.g. "Color").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeType {
    pub id: AttributeTypeId,
    /// Machine key (e.g. `color`).
    pub name: String,
    /// Label (e.g. "Color").
    pub display_name: String,
    #[serde(default)]
    pub kind: AttributeKind,
}

impl AttributeType {
    pub fn new(
        id: impl Into<AttributeTypeId>,
        name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_name: display_name.into(),
            kind: AttributeKind::Text,
        }
    }

    pub fn swatch(mut self) -> Self {
        self.kind = AttributeKind::Swatch;
        self
    }
}

impl Entity for AttributeType {
    type Id = AttributeTypeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// One value along an attribute type (e.g. "Red").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeOption {
    pub id: AttributeOptionId,
    /// Back-reference to the owning type.
    pub type_id: AttributeTypeId,
    /// Machine key (e.g. `red`).
    pub value: String,
    /// Label (e.g. "Red").
    pub display_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex_color: Option<String>,
}

impl AttributeOption {
    pub fn new(
        id: impl Into<AttributeOptionId>,
        type_id: impl Into<AttributeTypeId>,
        value: impl Into<String>,
        display_value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            type_id: type_id.into(),
            value: value.into(),
            display_value: display_value.into(),
            hex_color: None,
        }
    }

    /// Attach a swatch color (`#rgb` or `#rrggbb`).
    pub fn with_hex_color(mut self, hex: impl Into<String>) -> Result<Self, DomainError> {
        let hex = hex.into();
        if !is_hex_color(&hex) {
            return Err(DomainError::validation(format!(
                "option {}: invalid hex color {hex:?}",
                self.id
            )));
        }
        self.hex_color = Some(hex.to_ascii_lowercase());
        Ok(self)
    }
}

impl Entity for AttributeOption {
    type Id = AttributeOptionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Read-only set of attribute types and their options, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeCatalog {
    types: Vec<AttributeType>,
    options: Vec<AttributeOption>,
}

impl AttributeCatalog {
    /// Build a catalog, rejecting duplicate ids and options of unknown types.
    pub fn new(
        types: Vec<AttributeType>,
        options: Vec<AttributeOption>,
    ) -> Result<Self, DomainError> {
        let mut type_ids = HashSet::new();
        for ty in &types {
            if ty.id.is_missing() {
                return Err(DomainError::validation("attribute type id cannot be empty"));
            }
            if !type_ids.insert(&ty.id) {
                return Err(DomainError::conflict(format!(
                    "duplicate attribute type id {}",
                    ty.id
                )));
            }
        }

        let mut option_ids = HashSet::new();
        for option in &options {
            if option.id.is_missing() {
                return Err(DomainError::validation("attribute option id cannot be empty"));
            }
            if !type_ids.contains(&option.type_id) {
                return Err(DomainError::invariant(format!(
                    "option {} references unknown attribute type {}",
                    option.id, option.type_id
                )));
            }
            if !option_ids.insert(&option.id) {
                return Err(DomainError::conflict(format!(
                    "duplicate attribute option id {}",
                    option.id
                )));
            }
        }

        Ok(Self { types, options })
    }

    pub fn types(&self) -> &[AttributeType] {
        &self.types
    }

    pub fn options(&self) -> &[AttributeOption] {
        &self.options
    }

    pub fn attribute_type(&self, id: &AttributeTypeId) -> Option<&AttributeType> {
        self.types.iter().find(|t| &t.id == id)
    }

    pub fn option(&self, id: &AttributeOptionId) -> Option<&AttributeOption> {
        self.options.iter().find(|o| &o.id == id)
    }

    /// Options of one type, in catalog order.
    pub fn options_for<'a>(
        &'a self,
        type_id: &AttributeTypeId,
    ) -> impl Iterator<Item = &'a AttributeOption> + use<'a> {
        let type_id = type_id.clone();
        self.options.iter().filter(move |o| o.type_id == type_id)
    }
}

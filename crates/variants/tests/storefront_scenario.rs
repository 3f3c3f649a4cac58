use chrono::Utc;
use serde_json::json;
use storefront_core::{Aggregate, AggregateId, TenantId};
use storefront_variants::{
    AttributeCatalog, AttributeOption, AttributeSelection, AttributeType, LoadVariants,
    OptionGrid, OptionState, ProductId, RegenerateVariants, Resolution, StockState,
    SubmitVariants, UpdateVariant, Variant, VariantChanges, VariantConfig, VariantPicker,
    VariantSet, VariantSetCommand,
};

/// Color {Red, Blue} × Size {S, M}.
fn catalog() -> AttributeCatalog {
    AttributeCatalog::new(
        vec![
            AttributeType::new("color", "color", "Color").swatch(),
            AttributeType::new("size", "size", "Size"),
        ],
        vec![
            AttributeOption::new("red", "color", "red", "Red")
                .with_hex_color("#ff0000")
                .unwrap(),
            AttributeOption::new("blue", "color", "blue", "Blue")
                .with_hex_color("#0000ff")
                .unwrap(),
            AttributeOption::new("s", "size", "s", "S"),
            AttributeOption::new("m", "size", "m", "M"),
        ],
    )
    .unwrap()
}

fn full_grid(catalog: &AttributeCatalog) -> OptionGrid {
    catalog.types().iter().fold(OptionGrid::new(), |grid, ty| {
        grid.choose(ty.clone(), catalog.options_for(&ty.id).cloned())
    })
}

/// Admin side: load an empty product, regenerate, edit, submit.
fn author_variants(catalog: &AttributeCatalog) -> Vec<Variant> {
    let tenant_id = TenantId::new();
    let product_id = ProductId::new(AggregateId::new());
    let mut set = VariantSet::empty(product_id, VariantConfig::default());

    set.execute(&VariantSetCommand::LoadVariants(LoadVariants {
        tenant_id,
        product_id,
        variants: Vec::new(),
        occurred_at: Utc::now(),
    }))
    .unwrap();
    set.execute(&VariantSetCommand::RegenerateVariants(RegenerateVariants {
        tenant_id,
        product_id,
        grid: full_grid(catalog),
        occurred_at: Utc::now(),
    }))
    .unwrap();

    let ids: Vec<_> = set.variants().iter().map(|v| v.id).collect();
    for (i, id) in ids.into_iter().enumerate() {
        set.execute(&VariantSetCommand::UpdateVariant(UpdateVariant {
            tenant_id,
            product_id,
            variant_id: id,
            changes: VariantChanges {
                price: Some(1000 + 100 * i as u64),
                stock: Some(if i == 2 { 0 } else { 10 }),
                images: Some(vec![format!("https://cdn.example/{i}.jpg")]),
                ..VariantChanges::default()
            },
            occurred_at: Utc::now(),
        }))
        .unwrap();
    }

    set.execute(&VariantSetCommand::SubmitVariants(SubmitVariants {
        tenant_id,
        product_id,
        occurred_at: Utc::now(),
    }))
    .unwrap();

    set.variants().to_vec()
}

#[test]
fn color_by_size_grid_end_to_end() {
    storefront_observability::init();
    let catalog = catalog();
    let variants = author_variants(&catalog);

    let signatures: Vec<_> = variants.iter().map(|v| v.signature().to_string()).collect();
    assert_eq!(
        signatures,
        vec![
            "color:red|size:s",
            "color:red|size:m",
            "color:blue|size:s",
            "color:blue|size:m",
        ]
    );

    let mut picker = VariantPicker::new(&catalog, &variants, &VariantConfig::default());
    assert_eq!(picker.resolution(), Resolution::NothingSelected);

    picker.select(&"color".into(), &"red".into());
    let states = picker.option_states();
    assert_eq!(states[0].state_of(&"red".into()), Some(OptionState::Selected));
    assert_eq!(states[0].state_of(&"blue".into()), Some(OptionState::Available));
    assert_eq!(states[1].state_of(&"s".into()), Some(OptionState::Available));
    assert_eq!(states[1].state_of(&"m".into()), Some(OptionState::Available));

    picker.select(&"size".into(), &"m".into());
    let resolved = picker.resolution().variant().unwrap();
    assert_eq!(resolved.signature().as_str(), "color:red|size:m");
    assert_eq!(resolved.display_name, "Red / M");
    assert_eq!(resolved.sku, "RED-M");
    assert_eq!(resolved.options[0].hex_color.as_deref(), Some("#ff0000"));

    let summary = picker.summary();
    assert_eq!(summary.resolved, Some(resolved.id));
    assert_eq!(summary.stock, StockState::InStock(10));
    assert_eq!(summary.images, vec!["https://cdn.example/1.jpg".to_string()]);
}

#[test]
fn out_of_stock_variant_still_resolves() {
    let catalog = catalog();
    let variants = author_variants(&catalog);
    let selection = AttributeSelection::from_pairs([("color", "blue"), ("size", "s")]);

    let picker =
        VariantPicker::new(&catalog, &variants, &VariantConfig::default()).with_selection(selection);
    let resolved = picker.resolution().variant().unwrap();
    assert!(!resolved.is_sellable());
    assert_eq!(picker.summary().stock, StockState::OutOfStock);
}

#[test]
fn submitted_variants_round_trip_through_json() {
    let catalog = catalog();
    let variants = author_variants(&catalog);

    let value = serde_json::to_value(&variants).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 4);
    assert_eq!(value[0]["status"], json!("active"));
    assert_eq!(value[0]["options"][0]["type_id"], json!("color"));
    assert_eq!(value[0]["options"][0]["hex_color"], json!("#ff0000"));
    assert!(value[0]["options"][1].get("hex_color").is_none());

    let back: Vec<Variant> = serde_json::from_value(value).unwrap();
    assert_eq!(back, variants);
}

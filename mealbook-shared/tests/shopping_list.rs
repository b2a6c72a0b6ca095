/// End-to-end shopping-list pipeline tests
///
/// Exercises gateway-shaped rows through aggregate → normalize → render
/// without a database: the gateway's only contract is the ordered
/// `IngredientUsage` rows, so the rest of the pipeline is covered purely.

use mealbook_shared::shopping::{
    aggregate_ingredients, normalize_amount, render_shopping_list, DocumentStyle, IngredientUsage,
    ShoppingListRow,
};
use rust_decimal::Decimal;
use std::str::FromStr;

fn usage(name: &str, unit: &str, amount: &str) -> IngredientUsage {
    IngredientUsage {
        name: name.to_string(),
        measurement_unit: unit.to_string(),
        amount: Decimal::from_str(amount).expect("valid decimal literal"),
    }
}

fn pipeline_rows(rows: Vec<IngredientUsage>) -> Vec<ShoppingListRow> {
    aggregate_ingredients(rows)
        .into_iter()
        .map(|item| ShoppingListRow {
            name: item.name,
            amount: normalize_amount(item.amount),
            unit: item.measurement_unit,
        })
        .collect()
}

#[test]
fn two_recipe_cart_produces_expected_rows_and_document() {
    // Recipe A: Flour 2.000 kg, Sugar 0.500 kg
    // Recipe B: Flour 1.500 kg, Egg 3 pcs
    let rows = pipeline_rows(vec![
        usage("Flour", "kg", "2.000"),
        usage("Sugar", "kg", "0.500"),
        usage("Flour", "kg", "1.500"),
        usage("Egg", "pcs", "3"),
    ]);

    assert_eq!(
        rows,
        vec![
            ShoppingListRow {
                name: "Flour".to_string(),
                amount: "3.5".to_string(),
                unit: "kg".to_string(),
            },
            ShoppingListRow {
                name: "Sugar".to_string(),
                amount: "0.5".to_string(),
                unit: "kg".to_string(),
            },
            ShoppingListRow {
                name: "Egg".to_string(),
                amount: "3".to_string(),
                unit: "pcs".to_string(),
            },
        ]
    );

    let style = DocumentStyle::default();
    let bytes = render_shopping_list(&style, &rows).expect("render should succeed");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn empty_cart_renders_placeholder_document() {
    let rows = pipeline_rows(Vec::new());
    assert!(rows.is_empty());

    let style = DocumentStyle::default();
    let bytes = render_shopping_list(&style, &rows).expect("empty cart must render, not fail");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn repeated_export_is_deterministic_in_rows() {
    let snapshot = vec![
        usage("Salt", "g", "1.5"),
        usage("Pepper", "g", "0.25"),
        usage("Salt", "g", "2.5"),
    ];

    let first = pipeline_rows(snapshot.clone());
    let second = pipeline_rows(snapshot);

    assert_eq!(first, second);
    assert_eq!(first[0].amount, "4");
}

#[test]
fn mismatched_units_keep_first_and_are_not_averaged() {
    let rows = pipeline_rows(vec![
        usage("Milk", "ml", "200"),
        usage("Milk", "l", "1"),
    ]);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].unit, "ml");
    assert_eq!(rows[0].amount, "201");
}

/// Ingredient aggregation
///
/// Folds the gateway's flattened ingredient usage rows into one line item
/// per distinct ingredient, summing quantities exactly.
///
/// Two behaviors are carried over from the legacy system deliberately and
/// are pinned by the tests here rather than "fixed" silently:
///
/// - Line items merge by ingredient NAME, not id. Two ingredient records
///   sharing a display name fold into one line.
/// - The measurement unit of the first occurrence wins. A later row with
///   the same name but a different unit contributes its quantity and its
///   unit is ignored (logged at debug, never converted or averaged).
///
/// Output order is first-seen order over the input, which the gateway
/// fixes to cart insertion order. Aggregating the same snapshot twice
/// yields identical output.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One flattened usage row from the cart snapshot
///
/// `amount` is exact fixed-point (NUMERIC(7,3) in the database); sums over
/// many rows stay exact because no binary floating point is involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IngredientUsage {
    /// Ingredient display name (the merge key)
    pub name: String,

    /// Measurement unit string
    pub measurement_unit: String,

    /// Quantity contributed by one recipe line
    pub amount: Decimal,
}

/// One aggregated output line: summed quantity for one ingredient key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Ingredient display name
    pub name: String,

    /// Exact sum of all contributing quantities
    pub amount: Decimal,

    /// Unit of the first occurrence
    pub measurement_unit: String,
}

/// Aggregates usage rows into ordered line items
///
/// One output row per distinct ingredient name, in first-seen order;
/// quantities are exact decimal sums. Empty input yields an empty vec
/// (the renderer substitutes the placeholder row).
pub fn aggregate_ingredients<I>(rows: I) -> Vec<LineItem>
where
    I: IntoIterator<Item = IngredientUsage>,
{
    let mut items: Vec<LineItem> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for row in rows {
        match index_by_name.get(&row.name) {
            Some(&idx) => {
                let item = &mut items[idx];
                if item.measurement_unit != row.measurement_unit {
                    debug!(
                        ingredient = %row.name,
                        kept_unit = %item.measurement_unit,
                        ignored_unit = %row.measurement_unit,
                        "Unit mismatch while aggregating; keeping first-seen unit"
                    );
                }
                item.amount += row.amount;
            }
            None => {
                index_by_name.insert(row.name.clone(), items.len());
                items.push(LineItem {
                    name: row.name,
                    amount: row.amount,
                    measurement_unit: row.measurement_unit,
                });
            }
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn usage(name: &str, unit: &str, amount: &str) -> IngredientUsage {
        IngredientUsage {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount: Decimal::from_str(amount).expect("valid decimal literal"),
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("valid decimal literal")
    }

    #[test]
    fn test_two_recipes_worked_example() {
        // Recipe A: Flour 2.000 kg, Sugar 0.500 kg
        // Recipe B: Flour 1.500 kg, Egg 3 pcs
        let rows = vec![
            usage("Flour", "kg", "2.000"),
            usage("Sugar", "kg", "0.500"),
            usage("Flour", "kg", "1.500"),
            usage("Egg", "pcs", "3"),
        ];

        let items = aggregate_ingredients(rows);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "Flour");
        assert_eq!(items[0].amount, dec("3.500"));
        assert_eq!(items[0].measurement_unit, "kg");
        assert_eq!(items[1].name, "Sugar");
        assert_eq!(items[1].amount, dec("0.500"));
        assert_eq!(items[2].name, "Egg");
        assert_eq!(items[2].amount, dec("3"));
    }

    #[test]
    fn test_first_seen_order_is_preserved() {
        let rows = vec![
            usage("Salt", "g", "1"),
            usage("Pepper", "g", "2"),
            usage("Salt", "g", "1"),
            usage("Basil", "g", "5"),
            usage("Pepper", "g", "1"),
        ];

        let names: Vec<String> = aggregate_ingredients(rows)
            .into_iter()
            .map(|item| item.name)
            .collect();

        assert_eq!(names, vec!["Salt", "Pepper", "Basil"]);
    }

    #[test]
    fn test_merges_by_name_not_identity() {
        // Two distinct ingredient records sharing a display name fold into
        // one line (legacy behavior, pinned here).
        let rows = vec![
            usage("Milk", "ml", "200"),
            usage("Milk", "ml", "300"),
        ];

        let items = aggregate_ingredients(rows);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount, dec("500"));
    }

    #[test]
    fn test_unit_mismatch_keeps_first_unit() {
        let rows = vec![
            usage("Milk", "ml", "200"),
            usage("Milk", "l", "1"),
        ];

        let items = aggregate_ingredients(rows);

        // First unit wins; the mismatching quantity still contributes.
        // Never averaged, never converted.
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].measurement_unit, "ml");
        assert_eq!(items[0].amount, dec("201"));
    }

    #[test]
    fn test_sums_are_exact() {
        // 0.1 + 0.2 must be exactly 0.3: no binary-float drift.
        let rows = vec![
            usage("Vanilla", "g", "0.1"),
            usage("Vanilla", "g", "0.2"),
        ];

        let items = aggregate_ingredients(rows);

        assert_eq!(items[0].amount, dec("0.3"));
    }

    #[test]
    fn test_many_small_contributions_stay_exact() {
        let rows: Vec<IngredientUsage> =
            (0..1000).map(|_| usage("Yeast", "g", "0.001")).collect();

        let items = aggregate_ingredients(rows);

        assert_eq!(items[0].amount, dec("1.000"));
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let rows = vec![
            usage("Flour", "kg", "2.000"),
            usage("Sugar", "kg", "0.500"),
            usage("Flour", "kg", "1.500"),
        ];

        let first = aggregate_ingredients(rows.clone());
        let second = aggregate_ingredients(rows);

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let items = aggregate_ingredients(Vec::new());
        assert!(items.is_empty());
    }
}

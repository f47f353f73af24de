//! Ingredient and recipe calculator logic

use std::fmt;

use serde::Serialize;

use crate::catalog::ItemLookup;
use crate::models::{IngredientLine, IngredientResult, Item, Recipe, RecipeTotals};
use crate::units::{self, Unit};

/// Calculate weight, calories and cost for one ingredient line.
///
/// Never fails: a missing item, a zero quantity or an absent catalog field
/// each contribute zero to the corresponding figure.
pub fn calculate_ingredient(line: &IngredientLine, item: Option<&Item>) -> IngredientResult {
    let quantity = sanitize_quantity(line.quantity);
    let Some(item) = item else {
        return IngredientResult::default();
    };
    if quantity == 0.0 {
        return IngredientResult::default();
    }

    let native_quantity = units::convert(quantity, line.unit, item.native_unit);

    IngredientResult {
        weight_grams: finite_or_zero(units::to_base_grams(quantity, line.unit)),
        calories: item
            .calories_per_native_unit
            .map_or(0.0, |density| finite_or_zero(native_quantity * density)),
        cost: item
            .unit_cost()
            .map_or(0.0, |cost| finite_or_zero(native_quantity * cost)),
    }
}

/// Aggregate every line of a recipe into totals and per-portion figures
pub fn aggregate_recipe(recipe: &Recipe, items: &impl ItemLookup) -> RecipeTotals {
    let results: Vec<IngredientResult> = recipe
        .lines
        .iter()
        .map(|line| calculate_ingredient(line, resolve(line, items)))
        .collect();
    totals_from_results(&results, recipe.effective_portions())
}

fn totals_from_results(results: &[IngredientResult], effective_portions: u64) -> RecipeTotals {
    let total_weight_grams = order_independent_sum(results.iter().map(|r| r.weight_grams));
    let total_calories = order_independent_sum(results.iter().map(|r| r.calories));
    let total_cost = order_independent_sum(results.iter().map(|r| r.cost));
    let divisor = effective_portions.max(1) as f64;

    RecipeTotals {
        total_weight_grams,
        total_calories,
        total_cost,
        effective_portions: effective_portions.max(1),
        weight_per_portion: total_weight_grams / divisor,
        calories_per_portion: total_calories / divisor,
        cost_per_portion: total_cost / divisor,
    }
}

fn resolve<'a>(line: &IngredientLine, items: &'a impl ItemLookup) -> Option<&'a Item> {
    line.item_id.as_deref().and_then(|id| items.item(id))
}

/// NaN, infinities and negatives count as zero
fn sanitize_quantity(quantity: f64) -> f64 {
    if quantity.is_finite() && quantity > 0.0 {
        quantity
    } else {
        0.0
    }
}

// Overflowed products (inf, or inf * 0 = NaN) must not poison the totals.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

// Summed in sorted order so the total is identical for any line ordering.
fn order_independent_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    finite_or_zero(values.iter().sum())
}

/// One line of a recipe card
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBreakdown {
    pub item_id: Option<String>,
    pub item_name: String,
    /// False when the line has no item or the item is not in the catalog
    pub resolved: bool,
    pub quantity: f64,
    pub unit: Unit,
    /// Tag shown to the user; the caller's own tag for unrecognized units
    pub unit_label: String,
    pub result: IngredientResult,
}

/// Per-line breakdown plus totals, as shown on a recipe card
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCard {
    pub recipe_id: String,
    pub recipe_name: String,
    pub portion_count: i64,
    pub lines: Vec<LineBreakdown>,
    pub totals: RecipeTotals,
}

/// Build a recipe card
pub fn summarize_recipe(recipe: &Recipe, items: &impl ItemLookup) -> RecipeCard {
    let lines: Vec<LineBreakdown> = recipe
        .lines
        .iter()
        .map(|line| {
            let item = resolve(line, items);
            LineBreakdown {
                item_id: line.item_id.clone(),
                item_name: match (item, &line.item_id) {
                    (Some(item), _) => item.name.clone(),
                    (None, Some(id)) => format!("{} (not in catalog)", id),
                    (None, None) => "(no item)".to_string(),
                },
                resolved: item.is_some(),
                quantity: sanitize_quantity(line.quantity),
                unit: line.unit,
                unit_label: line.unit_label().to_string(),
                result: calculate_ingredient(line, item),
            }
        })
        .collect();

    let results: Vec<IngredientResult> = lines.iter().map(|l| l.result).collect();
    let totals = totals_from_results(&results, recipe.effective_portions());

    RecipeCard {
        recipe_id: recipe.id.clone(),
        recipe_name: recipe.name.clone(),
        portion_count: recipe.portion_count,
        lines,
        totals,
    }
}

impl RecipeCard {
    pub fn unresolved_lines(&self) -> usize {
        self.lines.iter().filter(|l| !l.resolved).count()
    }
}

impl fmt::Display for RecipeCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.recipe_name)?;
        writeln!(
            f,
            "Portions: {} (divisor {})",
            self.portion_count, self.totals.effective_portions
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "{:<28} {:>10} {:<4} {:>10} {:>10} {:>10}",
            "Ingredient", "Qty", "Unit", "Grams", "kcal", "Cost"
        )?;
        writeln!(f, "{}", "-".repeat(77))?;
        for line in &self.lines {
            writeln!(
                f,
                "{:<28} {:>10.3} {:<4} {:>10.1} {:>10.1} {:>10.2}",
                line.item_name,
                line.quantity,
                line.unit_label,
                line.result.weight_grams,
                line.result.calories,
                line.result.cost
            )?;
        }
        writeln!(f)?;

        write!(f, "{}", self.totals)
    }
}

impl fmt::Display for RecipeTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Totals:")?;
        writeln!(f, "  Weight:   {:.1} g", self.total_weight_grams)?;
        writeln!(f, "  Calories: {:.1} kcal", self.total_calories)?;
        writeln!(f, "  Cost:     {:.2}", self.total_cost)?;
        writeln!(f)?;

        writeln!(f, "Per portion:")?;
        writeln!(f, "  Weight:   {:.1} g", self.weight_per_portion)?;
        writeln!(f, "  Calories: {:.1} kcal", self.calories_per_portion)?;
        writeln!(f, "  Cost:     {:.2}", self.cost_per_portion)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn priced(id: &str, native: Unit, cost: f64) -> Item {
        let mut item = Item::new(id, native);
        item.current_unit_cost = Some(cost);
        item
    }

    fn sample_catalog() -> Catalog {
        let mut flour = priced("flour", Unit::Kilogram, 1.2);
        flour.calories_per_native_unit = Some(3640.0);
        let mut milk = priced("milk", Unit::Liter, 0.9);
        milk.calories_per_native_unit = Some(640.0);
        let mut eggs = priced("eggs", Unit::UnitCount, 0.25);
        eggs.calories_per_native_unit = Some(72.0);
        Catalog::from_items([flour, milk, eggs])
    }

    fn sample_recipe() -> Recipe {
        let mut recipe = Recipe::new("crepes", "Crepes");
        recipe.set_portion_count(4);
        recipe.add_line(IngredientLine::new("flour", 250.0, Unit::Gram));
        recipe.add_line(IngredientLine::new("milk", 500.0, Unit::Milliliter));
        recipe.add_line(IngredientLine::new("eggs", 3.0, Unit::UnitCount));
        recipe
    }

    #[test]
    fn test_cost_in_native_unit() {
        let item = priced("beef", Unit::Kilogram, 10.0);
        let result = calculate_ingredient(&IngredientLine::new("beef", 3.0, Unit::Kilogram), Some(&item));
        assert!(close(result.cost, 30.0));
        assert!(close(result.weight_grams, 3000.0));
    }

    #[test]
    fn test_cost_converts_line_unit_to_native() {
        let item = priced("beef", Unit::Kilogram, 10.0);
        let result = calculate_ingredient(&IngredientLine::new("beef", 500.0, Unit::Gram), Some(&item));
        assert!(close(result.cost, 5.0));
    }

    #[test]
    fn test_two_line_recipe_cost_per_portion() {
        let catalog = Catalog::from_items([
            priced("beef", Unit::Kilogram, 10.0),
            priced("pork", Unit::Kilogram, 10.0),
        ]);
        let mut recipe = Recipe::new("stew", "Stew");
        recipe.add_line(IngredientLine::new("beef", 3.0, Unit::Kilogram));
        recipe.add_line(IngredientLine::new("pork", 500.0, Unit::Gram));
        recipe.set_portion_count(5);

        let totals = aggregate_recipe(&recipe, &catalog);
        assert!(close(totals.total_cost, 35.0));
        assert!(close(totals.cost_per_portion, 7.0));
        assert_eq!(totals.effective_portions, 5);
    }

    #[test]
    fn test_missing_cost_and_calories() {
        let item = Item::new("salt", Unit::Kilogram);
        let result = calculate_ingredient(&IngredientLine::new("salt", 20.0, Unit::Gram), Some(&item));
        assert_eq!(result.cost, 0.0);
        assert_eq!(result.calories, 0.0);
        assert!(close(result.weight_grams, 20.0));
    }

    #[test]
    fn test_average_cost_used_when_current_missing() {
        let mut item = Item::new("oil", Unit::Liter);
        item.average_unit_cost = Some(4.0);
        let result = calculate_ingredient(&IngredientLine::new("oil", 250.0, Unit::Milliliter), Some(&item));
        assert!(close(result.cost, 1.0));
    }

    #[test]
    fn test_missing_item_is_zero() {
        let line = IngredientLine::new("ghost", 3.0, Unit::Kilogram);
        assert_eq!(calculate_ingredient(&line, None), IngredientResult::default());

        let line = IngredientLine {
            item_id: None,
            quantity: 3.0,
            unit: Unit::Kilogram,
            raw_unit: None,
        };
        let totals = aggregate_recipe(&Recipe { lines: vec![line], ..Recipe::new("r", "R") }, &Catalog::default());
        assert_eq!(totals.total_weight_grams, 0.0);
    }

    #[test]
    fn test_bad_quantities_are_zero() {
        let item = priced("beef", Unit::Kilogram, 10.0);
        for q in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let result = calculate_ingredient(&IngredientLine::new("beef", q, Unit::Kilogram), Some(&item));
            assert_eq!(result, IngredientResult::default(), "quantity {}", q);
        }
    }

    #[test]
    fn test_unknown_unit_passes_through_as_grams() {
        let item = priced("beef", Unit::Kilogram, 10.0);
        let result = calculate_ingredient(&IngredientLine::new("beef", 4.0, Unit::Unknown), Some(&item));
        assert!(close(result.weight_grams, 4.0));
        assert!(close(result.cost, 0.04));
    }

    #[test]
    fn test_overflowing_quantity_stays_finite() {
        let free = priced("water", Unit::Kilogram, 0.0);
        let mut beef = priced("beef", Unit::Kilogram, 10.0);
        beef.calories_per_native_unit = Some(2500.0);
        let catalog = Catalog::from_items([free, beef]);

        let line = IngredientLine::new("water", 1e306, Unit::Kilogram);
        let result = calculate_ingredient(&line, catalog.item("water"));
        assert_eq!(result.cost, 0.0);
        assert_eq!(result.weight_grams, 0.0);

        let mut recipe = Recipe::new("flood", "Flood");
        recipe.add_line(line);
        recipe.add_line(IngredientLine::new("beef", 1.0, Unit::Kilogram));
        let totals = aggregate_recipe(&recipe, &catalog);
        assert!(totals.total_cost.is_finite());
        assert!(totals.cost_per_portion.is_finite());
        assert!(close(totals.total_cost, 10.0));
        assert!(close(totals.total_calories, 2500.0));
    }

    #[test]
    fn test_card_shows_unrecognized_tag() {
        let catalog = sample_catalog();
        let mut recipe = Recipe::new("r", "R");
        let mut line = IngredientLine::new("flour", 4.0, Unit::Unknown);
        line.raw_unit = Some("widget".to_string());
        recipe.add_line(line);

        let card = summarize_recipe(&recipe, &catalog);
        assert_eq!(card.lines[0].unit_label, "widget");
        assert!(card.to_string().contains("widget"));

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["lines"][0]["unitLabel"], "widget");
    }

    #[test]
    fn test_totals_render_without_lines() {
        let totals = aggregate_recipe(&sample_recipe(), &sample_catalog());
        let rendered = totals.to_string();
        assert!(rendered.starts_with("Totals:"));
        assert!(rendered.contains("Per portion:"));
        assert!(!rendered.contains("Ingredient"));
    }

    #[test]
    fn test_empty_recipe_is_zero() {
        let totals = aggregate_recipe(&Recipe::new("empty", "Empty"), &Catalog::default());
        assert_eq!(totals.total_cost, 0.0);
        assert_eq!(totals.total_calories, 0.0);
        assert_eq!(totals.total_weight_grams, 0.0);
        assert_eq!(totals.cost_per_portion, 0.0);
        assert_eq!(totals.effective_portions, 1);
    }

    #[test]
    fn test_non_positive_portions_match_one_portion() {
        let catalog = sample_catalog();
        let mut recipe = sample_recipe();
        recipe.set_portion_count(1);
        let one = aggregate_recipe(&recipe, &catalog);

        for portions in [0, -1, -30] {
            recipe.set_portion_count(portions);
            let totals = aggregate_recipe(&recipe, &catalog);
            assert_eq!(totals.calories_per_portion, one.calories_per_portion);
            assert_eq!(totals.cost_per_portion, one.cost_per_portion);
            assert_eq!(recipe.portion_count, portions);
        }
    }

    #[test]
    fn test_line_order_does_not_matter() {
        let catalog = sample_catalog();
        let recipe = sample_recipe();
        let baseline = aggregate_recipe(&recipe, &catalog);

        let mut reversed = recipe.clone();
        reversed.lines.reverse();
        assert_eq!(aggregate_recipe(&reversed, &catalog), baseline);

        let mut rotated = recipe.clone();
        rotated.lines.rotate_left(1);
        assert_eq!(aggregate_recipe(&rotated, &catalog), baseline);
    }

    #[test]
    fn test_more_quantity_never_decreases() {
        let catalog = sample_catalog();
        let flour = catalog.item("flour");
        let mut previous = IngredientResult::default();
        for q in [0.0, 10.0, 10.5, 100.0, 2500.0] {
            let result = calculate_ingredient(&IngredientLine::new("flour", q, Unit::Gram), flour);
            assert!(result.weight_grams >= previous.weight_grams);
            assert!(result.calories >= previous.calories);
            assert!(result.cost >= previous.cost);
            previous = result;
        }
    }

    #[test]
    fn test_totals_follow_edits() {
        let catalog = sample_catalog();
        let mut recipe = sample_recipe();
        let before = aggregate_recipe(&recipe, &catalog);

        if let Some(line) = recipe.line_mut(0) {
            line.quantity = 500.0;
        }
        let after = aggregate_recipe(&recipe, &catalog);
        assert!(close(after.total_cost - before.total_cost, 0.3));

        recipe.remove_line(0);
        let removed = aggregate_recipe(&recipe, &catalog);
        assert!(close(removed.total_weight_grams, 800.0));
    }

    #[test]
    fn test_recipe_card_matches_totals() {
        let catalog = sample_catalog();
        let mut recipe = sample_recipe();
        recipe.add_line(IngredientLine::new("sugar", 50.0, Unit::Gram));

        let card = summarize_recipe(&recipe, &catalog);
        assert_eq!(card.totals, aggregate_recipe(&recipe, &catalog));
        assert_eq!(card.lines.len(), 4);
        assert_eq!(card.unresolved_lines(), 1);
        assert_eq!(card.lines[3].item_name, "sugar (not in catalog)");

        let rendered = card.to_string();
        assert!(rendered.contains("=== Crepes ==="));
        assert!(rendered.contains("Per portion:"));
    }
}

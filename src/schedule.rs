//! Programmed-service rollups
//!
//! A service plans several recipes at some number of portions each. Its
//! totals are built from each recipe's per-portion figures.

use std::fmt;

use serde::Serialize;

use crate::calculator::aggregate_recipe;
use crate::catalog::{ItemLookup, RecipeBook};
use crate::models::{ScheduleEntry, ScheduleTotals};

/// Sum calories and cost across a schedule.
///
/// An entry without a recipe still counts toward lines and portions but
/// adds no calories or cost.
pub fn aggregate_schedule(entries: &[ScheduleEntry<'_>], items: &impl ItemLookup) -> ScheduleTotals {
    summarize_entries(entries, items).1
}

fn summarize_entries(
    entries: &[ScheduleEntry<'_>],
    items: &impl ItemLookup,
) -> (Vec<EntryBreakdown>, ScheduleTotals) {
    let mut breakdown = Vec::with_capacity(entries.len());
    let mut totals = ScheduleTotals::default();

    for entry in entries {
        let portions = entry.portions_ordered as f64;
        let (calories, cost) = match entry.recipe {
            Some(recipe) => {
                let recipe_totals = aggregate_recipe(recipe, items);
                (
                    recipe_totals.calories_per_portion * portions,
                    recipe_totals.cost_per_portion * portions,
                )
            }
            None => (0.0, 0.0),
        };

        totals.total_calories += calories;
        totals.total_cost += cost;
        totals.total_lines += 1;
        totals.total_portions = totals.total_portions.saturating_add(entry.portions_ordered);

        breakdown.push(EntryBreakdown {
            recipe_id: entry.recipe.map(|r| r.id.clone()),
            recipe_name: entry
                .recipe
                .map_or_else(|| "(no recipe)".to_string(), |r| r.name.clone()),
            portions_ordered: entry.portions_ordered,
            calories,
            cost,
        });
    }

    (breakdown, totals)
}

/// A service plan as loaded from a document, before recipes are resolved
#[derive(Debug, Clone, Default)]
pub struct ServicePlan {
    pub name: String,
    pub entries: Vec<PlannedEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedEntry {
    pub recipe_id: Option<String>,
    pub portions_ordered: u64,
}

impl ServicePlan {
    /// Resolve recipe references against a recipe book
    pub fn entries_in<'a>(&self, book: &'a RecipeBook) -> Vec<ScheduleEntry<'a>> {
        self.entries
            .iter()
            .map(|planned| ScheduleEntry {
                recipe: planned.recipe_id.as_deref().and_then(|id| book.get(id)),
                portions_ordered: planned.portions_ordered,
            })
            .collect()
    }

    /// Recipe ids the book does not contain
    pub fn missing_recipes<'a>(&'a self, book: &RecipeBook) -> Vec<&'a str> {
        self.entries
            .iter()
            .filter_map(|planned| planned.recipe_id.as_deref())
            .filter(|id| book.get(id).is_none())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryBreakdown {
    pub recipe_id: Option<String>,
    pub recipe_name: String,
    pub portions_ordered: u64,
    pub calories: f64,
    pub cost: f64,
}

/// Per-entry breakdown plus totals for a programmed service
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub name: String,
    pub entries: Vec<EntryBreakdown>,
    pub totals: ScheduleTotals,
}

pub fn summarize_service(
    plan: &ServicePlan,
    book: &RecipeBook,
    items: &impl ItemLookup,
) -> ServiceSummary {
    let entries = plan.entries_in(book);
    let (breakdown, totals) = summarize_entries(&entries, items);
    ServiceSummary {
        name: plan.name.clone(),
        entries: breakdown,
        totals,
    }
}

impl fmt::Display for ServiceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Service: {} ===", self.name)?;
        writeln!(f)?;

        writeln!(f, "{:<30} {:>9} {:>12} {:>12}", "Recipe", "Portions", "kcal", "Cost")?;
        writeln!(f, "{}", "-".repeat(66))?;
        for entry in &self.entries {
            writeln!(
                f,
                "{:<30} {:>9} {:>12.1} {:>12.2}",
                entry.recipe_name, entry.portions_ordered, entry.calories, entry.cost
            )?;
        }
        writeln!(f)?;

        let t = &self.totals;
        writeln!(f, "Totals:")?;
        writeln!(f, "  Lines:    {}", t.total_lines)?;
        writeln!(f, "  Portions: {}", t.total_portions)?;
        writeln!(f, "  Calories: {:.1} kcal", t.total_calories)?;
        writeln!(f, "  Cost:     {:.2}", t.total_cost)?;

        Ok(())
    }
}

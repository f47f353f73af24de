//! Data models for catalog items, recipes and derived totals

use serde::Serialize;

use crate::units::Unit;

/// Ingredient catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Unit in which calorie density and unit cost are expressed
    pub native_unit: Unit,
    pub calories_per_native_unit: Option<f64>,
    pub current_unit_cost: Option<f64>,
    pub average_unit_cost: Option<f64>,
}

impl Item {
    pub fn new(id: impl Into<String>, native_unit: Unit) -> Self {
        let id = id.into();
        Item {
            name: id.clone(),
            id,
            native_unit,
            calories_per_native_unit: None,
            current_unit_cost: None,
            average_unit_cost: None,
        }
    }

    /// Cost of one native unit. The current cost takes precedence over the
    /// rolling average.
    pub fn unit_cost(&self) -> Option<f64> {
        self.current_unit_cost.or(self.average_unit_cost)
    }
}

/// One row of a recipe
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientLine {
    pub item_id: Option<String>,
    pub quantity: f64,
    pub unit: Unit,
    /// The tag as written, kept only when it did not resolve to a known unit
    pub raw_unit: Option<String>,
}

impl IngredientLine {
    pub fn new(item_id: impl Into<String>, quantity: f64, unit: Unit) -> Self {
        IngredientLine {
            item_id: Some(item_id.into()),
            quantity,
            unit,
            raw_unit: None,
        }
    }

    /// Unit label for display: the caller's own tag when it was unrecognized
    pub fn unit_label(&self) -> &str {
        match (&self.raw_unit, self.unit) {
            (Some(raw), Unit::Unknown) => raw.as_str(),
            _ => self.unit.tag(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    /// As supplied by the caller; may be zero or negative
    pub portion_count: i64,
    pub lines: Vec<IngredientLine>,
}

impl Recipe {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Recipe {
            id: id.into(),
            name: name.into(),
            portion_count: 1,
            lines: Vec::new(),
        }
    }

    pub fn add_line(&mut self, line: IngredientLine) {
        self.lines.push(line);
    }

    /// Remove and return the line at `index`, if present
    pub fn remove_line(&mut self, index: usize) -> Option<IngredientLine> {
        if index < self.lines.len() {
            Some(self.lines.remove(index))
        } else {
            None
        }
    }

    pub fn line_mut(&mut self, index: usize) -> Option<&mut IngredientLine> {
        self.lines.get_mut(index)
    }

    pub fn set_portion_count(&mut self, portion_count: i64) {
        self.portion_count = portion_count;
    }

    /// Divisor for per-portion figures: the portion count clamped to at least 1
    pub fn effective_portions(&self) -> u64 {
        self.portion_count.max(1) as u64
    }
}

/// Derived values for a single ingredient line
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientResult {
    pub weight_grams: f64,
    pub calories: f64,
    pub cost: f64,
}

/// Recipe-level sums and per-portion figures
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeTotals {
    pub total_weight_grams: f64,
    pub total_calories: f64,
    pub total_cost: f64,
    pub effective_portions: u64,
    pub weight_per_portion: f64,
    pub calories_per_portion: f64,
    pub cost_per_portion: f64,
}

/// A recipe planned at some number of portions within a programmed service
#[derive(Debug, Clone, Copy)]
pub struct ScheduleEntry<'a> {
    pub recipe: Option<&'a Recipe>,
    pub portions_ordered: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTotals {
    pub total_calories: f64,
    pub total_cost: f64,
    pub total_lines: usize,
    pub total_portions: u64,
}

//! Recipe costing
//!
//! Turns recipes (ingredient lines plus a portion count) into total weight,
//! calories and cost, and their per-portion equivalents. Programmed services
//! are rolled up from the per-portion figures.
//!
//! The engine (`units`, `calculator`, `schedule`) is pure and cannot fail.
//! `catalog` is the boundary that loads JSON documents into typed models.

pub mod calculator;
pub mod catalog;
pub mod document;
pub mod error;
pub mod models;
pub mod parse;
pub mod schedule;
pub mod units;

pub use calculator::{aggregate_recipe, calculate_ingredient, summarize_recipe, RecipeCard};
pub use catalog::{Catalog, ItemLookup, Loader, RecipeBook};
pub use error::LoadError;
pub use models::{
    IngredientLine, IngredientResult, Item, Recipe, RecipeTotals, ScheduleEntry, ScheduleTotals,
};
pub use schedule::{aggregate_schedule, summarize_service, ServicePlan, ServiceSummary};
pub use units::{convert, from_base_grams, to_base_grams, Unit};

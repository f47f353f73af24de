//! Recipe costing CLI
//!
//! Costs recipes and programmed services from JSON catalog and recipe files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use recipe_costing::catalog::{self, Catalog, Loader};
use recipe_costing::units::{self, Unit};
use recipe_costing::{aggregate_recipe, summarize_recipe, summarize_service};

#[derive(Parser)]
#[command(name = "recipe-costing")]
#[command(about = "Recipe costing and nutritional totals for food-service kitchens")]
struct Cli {
    /// Path to the item catalog (JSON)
    #[arg(short, long, env = "RECIPE_COSTING_CATALOG", default_value = "catalog.json")]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cost a single recipe
    Calc {
        /// Recipe document (JSON)
        recipe: PathBuf,

        /// Print as JSON: totals only, or the full card with --verbose
        #[arg(long)]
        json: bool,

        /// Show the per-line breakdown (recipe card) instead of totals only
        #[arg(short, long)]
        verbose: bool,
    },

    /// Summarize every recipe found under a directory
    Report {
        /// Directory containing recipe documents
        dir: PathBuf,
    },

    /// Roll up a programmed service
    Service {
        /// Service document (JSON)
        service: PathBuf,

        /// Directory containing the recipes the service refers to
        #[arg(short, long, env = "RECIPE_COSTING_RECIPES", default_value = "recipes")]
        recipes: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert a quantity between units
    Convert {
        quantity: f64,

        /// Source unit tag (e.g. "kg")
        from: String,

        /// Target unit tag (e.g. "g")
        to: String,
    },

    /// List the unit conversion table
    Units,

    /// List all items in the catalog
    Items,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let loader = Loader::new()?;

    match cli.command {
        Commands::Calc {
            recipe,
            json,
            verbose,
        } => {
            let catalog = load_catalog(&loader, &cli.catalog)?;
            let recipe = loader
                .load_recipe(&recipe)
                .with_context(|| format!("Failed to load recipe {}", recipe.display()))?;

            for id in catalog::missing_items(&recipe, &catalog) {
                warn!("Recipe '{}' refers to unknown item '{}'", recipe.id, id);
            }

            if json && verbose {
                let card = summarize_recipe(&recipe, &catalog);
                println!("{}", serde_json::to_string_pretty(&card)?);
            } else if json {
                let totals = aggregate_recipe(&recipe, &catalog);
                println!("{}", serde_json::to_string_pretty(&totals)?);
            } else if verbose {
                println!("{}", summarize_recipe(&recipe, &catalog));
            } else {
                println!("=== {} ===", recipe.name);
                println!("{}", aggregate_recipe(&recipe, &catalog));
            }
        }

        Commands::Report { dir } => {
            let catalog = load_catalog(&loader, &cli.catalog)?;
            let book = loader
                .load_recipe_dir(&dir)
                .with_context(|| format!("Failed to load recipes from {}", dir.display()))?;

            if book.is_empty() {
                println!("No recipes found under {}", dir.display());
            } else {
                println!(
                    "{:<30} {:>8} {:>12} {:>12} {:>10}",
                    "Recipe", "Portions", "kcal/port.", "Cost/port.", "Cost"
                );
                println!("{}", "-".repeat(76));
                for recipe in book.iter() {
                    let card = summarize_recipe(recipe, &catalog);
                    let t = &card.totals;
                    println!(
                        "{:<30} {:>8} {:>12.1} {:>12.2} {:>10.2}",
                        card.recipe_name,
                        card.portion_count,
                        t.calories_per_portion,
                        t.cost_per_portion,
                        t.total_cost
                    );
                    if card.unresolved_lines() > 0 {
                        warn!(
                            "Recipe '{}' has {} line(s) with no catalog item",
                            card.recipe_id,
                            card.unresolved_lines()
                        );
                    }
                }
            }
        }

        Commands::Service {
            service,
            recipes,
            json,
        } => {
            let catalog = load_catalog(&loader, &cli.catalog)?;
            let plan = loader
                .load_service(&service)
                .with_context(|| format!("Failed to load service {}", service.display()))?;
            let book = loader
                .load_recipe_dir(&recipes)
                .with_context(|| format!("Failed to load recipes from {}", recipes.display()))?;

            for id in plan.missing_recipes(&book) {
                warn!("Service refers to unknown recipe '{}'", id);
            }

            let summary = summarize_service(&plan, &book, &catalog);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary);
            }
        }

        Commands::Convert { quantity, from, to } => {
            let from_unit = Unit::from_tag(&from);
            let to_unit = Unit::from_tag(&to);
            for (tag, unit) in [(&from, from_unit), (&to, to_unit)] {
                if !unit.is_known() {
                    warn!("Unrecognized unit '{}', treating as grams", tag);
                }
            }
            let converted = units::convert(quantity, from_unit, to_unit);
            println!("{} {} = {} {}", quantity, from_unit, converted, to_unit);
        }

        Commands::Units => {
            println!("{:<6} {:<12} {:>12}", "Tag", "Unit", "Grams");
            println!("{}", "-".repeat(32));
            for unit in Unit::ALL {
                println!("{:<6} {:<12} {:>12}", unit.tag(), unit.name(), unit.grams_per_unit());
            }
        }

        Commands::Items => {
            let catalog = load_catalog(&loader, &cli.catalog)?;
            if catalog.is_empty() {
                println!("No items in {}", cli.catalog.display());
            } else {
                println!(
                    "{:<30} {:<5} {:>10} {:>10} {:>10}",
                    "Item", "Unit", "kcal/unit", "Current", "Average"
                );
                println!("{}", "-".repeat(69));
                for item in catalog.items_sorted() {
                    println!(
                        "{:<30} {:<5} {:>10} {:>10} {:>10}",
                        item.name,
                        item.native_unit,
                        show(item.calories_per_native_unit),
                        show(item.current_unit_cost),
                        show(item.average_unit_cost)
                    );
                }
            }
        }
    }

    Ok(())
}

fn load_catalog(loader: &Loader, path: &Path) -> Result<Catalog> {
    let catalog = loader
        .load_catalog(path)
        .with_context(|| format!("Failed to load catalog {}", path.display()))?;
    info!("Catalog: {} items", catalog.len());
    Ok(catalog)
}

fn show(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

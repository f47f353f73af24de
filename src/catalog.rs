//! Item catalog, recipe book and document loading
//!
//! This is the boundary where loosely-typed JSON becomes typed models.
//! Defaults and coercions happen here, once.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::document::{
    CatalogDocument, RawId, RawIngredientLine, RawItem, RecipeDocument, ServiceDocument,
};
use crate::error::{LoadError, Result};
use crate::models::{IngredientLine, Item, Recipe};
use crate::parse::QuantityParser;
use crate::schedule::{PlannedEntry, ServicePlan};
use crate::units::Unit;

/// Anything that can resolve an item reference
pub trait ItemLookup {
    fn item(&self, id: &str) -> Option<&Item>;
}

impl ItemLookup for HashMap<String, Item> {
    fn item(&self, id: &str) -> Option<&Item> {
        self.get(id)
    }
}

/// Items keyed by id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<String, Item>,
}

impl Catalog {
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut catalog = Catalog::default();
        for item in items {
            catalog.insert(item);
        }
        catalog
    }

    /// Insert an item, returning the entry it replaced
    pub fn insert(&mut self, item: Item) -> Option<Item> {
        self.items.insert(item.id.clone(), item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items sorted by name
    pub fn items_sorted(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.values().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        items
    }
}

impl ItemLookup for Catalog {
    fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }
}

/// Recipes keyed by id
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: BTreeMap<String, Recipe>,
}

impl RecipeBook {
    pub fn insert(&mut self, recipe: Recipe) -> Option<Recipe> {
        self.recipes.insert(recipe.id.clone(), recipe)
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Recipes in id order
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }
}

/// Item ids referenced by `recipe` that `items` cannot resolve
pub fn missing_items<'a>(recipe: &'a Recipe, items: &impl ItemLookup) -> Vec<&'a str> {
    recipe
        .lines
        .iter()
        .filter_map(|line| line.item_id.as_deref())
        .filter(|id| items.item(id).is_none())
        .collect()
}

/// Find all recipe documents (`*.json`) under a directory
pub fn find_recipe_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Turns documents into models
pub struct Loader {
    parser: QuantityParser,
}

impl Loader {
    pub fn new() -> Result<Self> {
        Ok(Loader {
            parser: QuantityParser::new()?,
        })
    }

    pub fn parse_catalog(&self, json: &str) -> serde_json::Result<Catalog> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let mut catalog = Catalog::default();
        for raw in document.items {
            let Some(item) = self.item(raw) else {
                warn!("Skipping catalog item without a usable id");
                continue;
            };
            if let Some(previous) = catalog.insert(item) {
                debug!("Duplicate catalog id '{}', keeping the later entry", previous.id);
            }
        }
        Ok(catalog)
    }

    pub fn load_catalog(&self, path: &Path) -> Result<Catalog> {
        let json = read(path)?;
        let catalog = self.parse_catalog(&json).map_err(|source| json_error(path, source))?;
        debug!("Loaded {} items from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn parse_recipe(&self, json: &str) -> serde_json::Result<Recipe> {
        let document: RecipeDocument = serde_json::from_str(json)?;
        Ok(self.recipe(document))
    }

    pub fn load_recipe(&self, path: &Path) -> Result<Recipe> {
        let json = read(path)?;
        self.parse_recipe(&json).map_err(|source| json_error(path, source))
    }

    /// Load every recipe document under `dir`
    pub fn load_recipe_dir(&self, dir: &Path) -> Result<RecipeBook> {
        let mut book = RecipeBook::default();
        for path in find_recipe_files(dir)? {
            let recipe = self.load_recipe(&path)?;
            if let Some(previous) = book.insert(recipe) {
                warn!(
                    "Recipe id '{}' defined more than once, using {}",
                    previous.id,
                    path.display()
                );
            }
        }
        debug!("Loaded {} recipes from {}", book.len(), dir.display());
        Ok(book)
    }

    pub fn parse_service(&self, json: &str) -> serde_json::Result<ServicePlan> {
        let document: ServiceDocument = serde_json::from_str(json)?;
        Ok(ServicePlan {
            name: document.name.unwrap_or_default(),
            entries: document
                .entries
                .into_iter()
                .map(|raw| PlannedEntry {
                    recipe_id: raw.recipe.and_then(RawId::into_id),
                    portions_ordered: self.parser.portions_ordered(raw.portions_ordered.as_ref()),
                })
                .collect(),
        })
    }

    pub fn load_service(&self, path: &Path) -> Result<ServicePlan> {
        let json = read(path)?;
        self.parse_service(&json).map_err(|source| json_error(path, source))
    }

    fn item(&self, raw: RawItem) -> Option<Item> {
        let id = raw.id.into_id()?;
        let native_unit = match raw.native_unit.as_deref() {
            Some(tag) => Unit::from_tag(tag),
            None => Unit::Unknown,
        };
        if !native_unit.is_known() {
            debug!("Item '{}' has no recognized native unit, treating as grams", id);
        }

        Some(Item {
            name: raw.name.unwrap_or_else(|| id.clone()),
            id,
            native_unit,
            calories_per_native_unit: self.parser.optional(raw.calories_per_native_unit.as_ref()),
            current_unit_cost: self.parser.optional(raw.current_unit_cost.as_ref()),
            average_unit_cost: self.parser.optional(raw.average_unit_cost.as_ref()),
        })
    }

    fn recipe(&self, document: RecipeDocument) -> Recipe {
        let id = document.id.into_id().unwrap_or_default();
        Recipe {
            name: document.name.unwrap_or_else(|| id.clone()),
            id,
            portion_count: self.parser.portion_count(document.portion_count.as_ref()),
            lines: document
                .ingredients
                .into_iter()
                .map(|raw| self.line(raw))
                .collect(),
        }
    }

    fn line(&self, raw: RawIngredientLine) -> IngredientLine {
        let unit = raw.unit.as_deref().map_or(Unit::Unknown, Unit::from_tag);
        IngredientLine {
            item_id: raw.item.and_then(RawId::into_id),
            quantity: self.parser.quantity(raw.quantity.as_ref()),
            unit,
            raw_unit: raw.unit.filter(|_| !unit.is_known()),
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn json_error(path: &Path, source: serde_json::Error) -> LoadError {
    LoadError::Json {
        path: path.to_path_buf(),
        source,
    }
}

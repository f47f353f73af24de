//! JSON document shapes as produced by the catalog and recipe forms
//!
//! Every field the forms may leave empty is optional here; defaults are
//! applied when the document is turned into models (see `catalog`).

use serde::Deserialize;
use serde_json::Value;

use crate::parse::RawNumber;

#[derive(Debug, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub id: RawId,
    pub name: Option<String>,
    pub native_unit: Option<String>,
    pub calories_per_native_unit: Option<RawNumber>,
    pub current_unit_cost: Option<RawNumber>,
    pub average_unit_cost: Option<RawNumber>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDocument {
    pub id: RawId,
    pub name: Option<String>,
    pub portion_count: Option<RawNumber>,
    #[serde(default)]
    pub ingredients: Vec<RawIngredientLine>,
}

#[derive(Debug, Deserialize)]
pub struct RawIngredientLine {
    pub item: Option<RawId>,
    pub quantity: Option<RawNumber>,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceDocument {
    pub name: Option<String>,
    #[serde(default)]
    pub entries: Vec<RawScheduleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScheduleEntry {
    pub recipe: Option<RawId>,
    pub portions_ordered: Option<RawNumber>,
}

/// A record id as the forms send it: usually a string, sometimes a number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(serde_json::Number),
    Other(Value),
}

impl RawId {
    /// The id as a string; blank strings and non-scalar values have none
    pub fn into_id(self) -> Option<String> {
        match self {
            RawId::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            RawId::Number(n) => Some(n.to_string()),
            RawId::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(json: &str) -> Option<String> {
        serde_json::from_str::<RawId>(json).unwrap().into_id()
    }

    #[test]
    fn test_ids_accept_strings_and_numbers() {
        assert_eq!(id(r#""beef""#), Some("beef".to_string()));
        assert_eq!(id(r#"" beef ""#), Some("beef".to_string()));
        assert_eq!(id("42"), Some("42".to_string()));
        assert_eq!(id(r#""""#), None);
        assert_eq!(id("true"), None);
        assert_eq!(id(r#"{"id": 1}"#), None);
    }
}

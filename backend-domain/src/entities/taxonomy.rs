// Category taxonomy and the read-only catalog loaded from seed files

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{Location, LocationView};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: u64,
    pub category_id: u64,
    pub name: String,
}

/// A user's interest: the subcategory name plus its parent category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInterest {
    pub subcategory_id: u64,
    pub name: String,
    pub parent_category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySeed {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<SubCategorySeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategorySeed {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTree {
    pub id: u64,
    pub name: String,
    pub subcategories: Vec<SubCategory>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate category name '{0}'")]
    DuplicateCategory(String),
    #[error("duplicate subcategory id {0}")]
    DuplicateSubCategory(u64),
    #[error("duplicate location '{0}'")]
    DuplicateLocation(String),
    #[error("duplicate location id {0}")]
    DuplicateLocationId(u64),
}

/// Categories, subcategories and locations. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    subcategories: Vec<SubCategory>,
    locations: Vec<Location>,
    category_index: HashMap<u64, usize>,
    subcategory_index: HashMap<u64, usize>,
    location_index: HashMap<u64, usize>,
}

impl Catalog {
    pub fn new(seeds: Vec<CategorySeed>, locations: Vec<Location>) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::default();
        let mut names = HashSet::new();
        for seed in seeds {
            let name = seed.name.trim().to_string();
            if !names.insert(name.clone()) {
                return Err(CatalogError::DuplicateCategory(name));
            }
            catalog
                .category_index
                .insert(seed.id, catalog.categories.len());
            catalog.categories.push(Category { id: seed.id, name });
            for sub in seed.subcategories {
                if catalog.subcategory_index.contains_key(&sub.id) {
                    return Err(CatalogError::DuplicateSubCategory(sub.id));
                }
                catalog
                    .subcategory_index
                    .insert(sub.id, catalog.subcategories.len());
                catalog.subcategories.push(SubCategory {
                    id: sub.id,
                    category_id: seed.id,
                    name: sub.name.trim().to_string(),
                });
            }
        }

        let mut triples = HashSet::new();
        for location in locations {
            if catalog.location_index.contains_key(&location.id) {
                return Err(CatalogError::DuplicateLocationId(location.id));
            }
            if !triples.insert(location.triple_key()) {
                return Err(CatalogError::DuplicateLocation(location.display_name()));
            }
            catalog
                .location_index
                .insert(location.id, catalog.locations.len());
            catalog.locations.push(location);
        }
        Ok(catalog)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn category(&self, id: u64) -> Option<&Category> {
        self.category_index.get(&id).map(|idx| &self.categories[*idx])
    }

    pub fn subcategory(&self, id: u64) -> Option<&SubCategory> {
        self.subcategory_index
            .get(&id)
            .map(|idx| &self.subcategories[*idx])
    }

    pub fn location(&self, id: u64) -> Option<&Location> {
        self.location_index.get(&id).map(|idx| &self.locations[*idx])
    }

    pub fn category_tree(&self) -> Vec<CategoryTree> {
        self.categories
            .iter()
            .map(|category| CategoryTree {
                id: category.id,
                name: category.name.clone(),
                subcategories: self
                    .subcategories
                    .iter()
                    .filter(|sub| sub.category_id == category.id)
                    .cloned()
                    .collect(),
            })
            .collect()
    }

    /// Interests for the given subcategory ids; unknown ids are skipped.
    pub fn interests_for(&self, subcategory_ids: &[u64]) -> Vec<UserInterest> {
        subcategory_ids
            .iter()
            .filter_map(|id| self.subcategory(*id))
            .filter_map(|sub| {
                self.category(sub.category_id).map(|parent| UserInterest {
                    subcategory_id: sub.id,
                    name: sub.name.clone(),
                    parent_category: parent.name.clone(),
                })
            })
            .collect()
    }

    pub fn search_locations(&self, query: &str, limit: usize) -> Vec<LocationView> {
        let query = query.trim();
        let mut results = Vec::new();
        for location in &self.locations {
            if query.is_empty() || location.display_name().contains(query) {
                results.push(LocationView::from(location));
                if results.len() >= limit {
                    break;
                }
            }
        }
        results
    }
}

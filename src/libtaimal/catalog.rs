use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

static EMBEDDED_CATALOG: &str = include_str!("../catalog.json");

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ContentItem {
    pub id: String,
    pub meaning: String,
    pub pronunciation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roman: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub items: Vec<ContentItem>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog file: {0}")]
    Read(#[from] std::io::Error),
    #[error("malformed catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate item id '{0}'")]
    DuplicateId(String),
    #[error("category '{0}' has no items")]
    EmptyCategory(String),
    #[error("item '{0}' has an empty `{1}` field")]
    EmptyField(String, &'static str),
    #[error("category '{0}' is too small to quiz (needs at least two distinct answers)")]
    TooSmallToQuiz(String),
}

impl Category {
    pub fn heading(&self) -> String {
        match &self.emoji {
            Some(emoji) => format!("{} {}", emoji, self.title),
            None => self.title.clone(),
        }
    }
}

impl Catalog {
    pub fn embedded() -> Result<Catalog, CatalogError> {
        debug!("[Catalog] Loading embedded catalog.");
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_path(path: &Path) -> Result<Catalog, CatalogError> {
        info!("[Catalog] Loading catalog from {:?}.", path);
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Catalog, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        debug!(
            "[Catalog] Validated {} categories, {} items.",
            catalog.categories.len(),
            catalog.categories.iter().map(|c| c.items.len()).sum::<usize>()
        );
        Ok(catalog)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    // Everything checked here is an authoring error, caught before any quiz
    // is offered so a broken category is never rendered as a broken screen.
    fn validate(&self) -> Result<(), CatalogError> {
        let mut ids = HashSet::new();
        for category in &self.categories {
            if category.items.is_empty() {
                return Err(CatalogError::EmptyCategory(category.id.clone()));
            }
            for item in &category.items {
                if !ids.insert(item.id.as_str()) {
                    return Err(CatalogError::DuplicateId(item.id.clone()));
                }
                if item.meaning.is_empty() {
                    return Err(CatalogError::EmptyField(item.id.clone(), "meaning"));
                }
                if item.pronunciation.is_empty() {
                    return Err(CatalogError::EmptyField(item.id.clone(), "pronunciation"));
                }
            }
            // Both quiz directions need at least one real distractor per item,
            // which holds exactly when the answer side has >= 2 distinct values.
            let prons: HashSet<&str> = category.items.iter().map(|i| i.pronunciation.as_str()).collect();
            let meanings: HashSet<&str> = category.items.iter().map(|i| i.meaning.as_str()).collect();
            if prons.len() < 2 || meanings.len() < 2 {
                return Err(CatalogError::TooSmallToQuiz(category.id.clone()));
            }
        }
        Ok(())
    }
}

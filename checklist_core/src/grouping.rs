//! # Category Grouping
//!
//! Documents render in a fixed category order. Categories outside that order
//! (or documents without a category) collect in a trailing "other" group, so
//! they never appear ahead of a known category.

use std::collections::HashMap;

use crate::models::{CategoryMap, Document};
use crate::progress::percentage;

/// Display order of known category ids.
pub const CATEGORY_ORDER: &[&str] = &[
    "identity",
    "family",
    "residence",
    "financial",
    "administrative",
    "integration",
    "payment",
];

/// Id of the trailing bucket for unknown categories
pub const OTHER_CATEGORY: &str = "other";

/// Icon used when a category has no reference entry
pub const GENERIC_ICON: &str = "📄";

/// One rendered category section.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub documents: Vec<&'a Document>,
}

impl CategoryGroup<'_> {
    pub fn completed(&self) -> usize {
        self.documents.iter().filter(|d| d.is_complete).count()
    }

    pub fn total(&self) -> usize {
        self.documents.len()
    }

    /// Header counter, e.g. `2/4`
    pub fn counter(&self) -> String {
        format!("{}/{}", self.completed(), self.total())
    }

    pub fn percentage(&self) -> u32 {
        percentage(self.completed() as u32, self.total() as u32)
    }
}

/// Group documents by category in display order.
///
/// Within a group, documents keep the order the backend sent them in.
pub fn group_documents<'a>(documents: &'a [Document], categories: &CategoryMap) -> Vec<CategoryGroup<'a>> {
    let mut buckets: HashMap<&str, Vec<&'a Document>> = HashMap::new();
    let mut other: Vec<&'a Document> = Vec::new();

    for doc in documents {
        match doc.category.as_deref() {
            Some(cat) if CATEGORY_ORDER.contains(&cat) => buckets.entry(cat).or_default().push(doc),
            _ => other.push(doc),
        }
    }

    let mut groups: Vec<CategoryGroup<'a>> = CATEGORY_ORDER
        .iter()
        .filter_map(|id| {
            let docs = buckets.remove(id)?;
            let (title, icon) = match categories.get(*id) {
                Some(info) => (info.name_en.clone(), non_empty_icon(&info.icon)),
                None => (id.to_string(), GENERIC_ICON.to_string()),
            };
            Some(CategoryGroup {
                id: id.to_string(),
                title,
                icon,
                documents: docs,
            })
        })
        .collect();

    if !other.is_empty() {
        let (title, icon) = match categories.get(OTHER_CATEGORY) {
            Some(info) => (info.name_en.clone(), non_empty_icon(&info.icon)),
            None => ("Other".to_string(), GENERIC_ICON.to_string()),
        };
        groups.push(CategoryGroup {
            id: OTHER_CATEGORY.to_string(),
            title,
            icon,
            documents: other,
        });
    }

    groups
}

fn non_empty_icon(icon: &str) -> String {
    if icon.trim().is_empty() {
        GENERIC_ICON.to_string()
    } else {
        icon.to_string()
    }
}

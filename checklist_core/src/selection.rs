//! Active profile filter.
//!
//! [`ProfileSelection`] always contains [`COMMON_PROFILE`]; every constructor
//! and mutator re-establishes that, so callers never have to.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::COMMON_PROFILE;

/// Set of selected profile ids, always including `common`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ProfileSelection {
    ids: BTreeSet<String>,
}

impl ProfileSelection {
    /// Selection containing only `common`
    pub fn common_only() -> Self {
        Self::from_ids(std::iter::empty::<String>())
    }

    /// Build from any list of ids, adding `common` and dropping blanks.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: BTreeSet<String> = ids
            .into_iter()
            .map(Into::into)
            .map(|id: String| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        ids.insert(COMMON_PROFILE.to_string());
        ProfileSelection { ids }
    }

    /// Flip a profile in or out. Toggling `common` is a no-op.
    ///
    /// Returns whether the profile is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if id == COMMON_PROFILE {
            return true;
        }
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
            return true;
        }
        false
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false, `common` is always present.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Comma-joined ids for the `profiles` query parameter
    pub fn to_csv(&self) -> String {
        self.iter().collect::<Vec<_>>().join(",")
    }

    /// Parse a `profiles` query parameter
    pub fn from_csv(csv: &str) -> Self {
        Self::from_ids(csv.split(','))
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

impl Default for ProfileSelection {
    fn default() -> Self {
        Self::common_only()
    }
}

impl From<Vec<String>> for ProfileSelection {
    fn from(ids: Vec<String>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<ProfileSelection> for Vec<String> {
    fn from(selection: ProfileSelection) -> Self {
        selection.ids.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_common_only() {
        let sel = ProfileSelection::default();
        assert_eq!(sel.to_vec(), vec!["common".to_string()]);
    }

    #[test]
    fn test_common_survives_every_toggle_order() {
        let orders: [&[&str]; 4] = [
            &["married", "common", "married"],
            &["common", "common"],
            &["children", "married", "children", "common"],
            &["married", "married", "married"],
        ];
        for order in orders {
            let mut sel = ProfileSelection::common_only();
            for id in order {
                sel.toggle(id);
                assert!(sel.contains(COMMON_PROFILE), "after toggling {id} in {order:?}");
            }
        }
    }

    #[test]
    fn test_toggle_reports_state() {
        let mut sel = ProfileSelection::common_only();
        assert!(sel.toggle("married"));
        assert!(sel.contains("married"));
        assert!(!sel.toggle("married"));
        assert!(!sel.contains("married"));
        assert!(sel.toggle("common"));
    }

    #[test]
    fn test_from_ids_adds_common_and_drops_blanks() {
        let sel = ProfileSelection::from_ids(["married", " ", ""]);
        assert_eq!(sel.to_vec(), vec!["common".to_string(), "married".to_string()]);
    }

    #[test]
    fn test_csv() {
        let sel = ProfileSelection::from_ids(["married", "children"]);
        assert_eq!(sel.to_csv(), "children,common,married");
        assert_eq!(ProfileSelection::from_csv("married,children"), sel);
    }

    #[test]
    fn test_serde_as_list() {
        let sel: ProfileSelection = serde_json::from_str(r#"["married"]"#).unwrap();
        assert!(sel.contains("common"));
        let json = serde_json::to_string(&sel).unwrap();
        assert_eq!(json, r#"["common","married"]"#);
    }
}

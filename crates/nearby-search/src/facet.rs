//! Category facets over a merged result set.

use std::collections::HashMap;

use nearby_core::Category;
use serde::Serialize;

use crate::merge::MergedResultSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetEntry {
    pub category: Category,
    pub count: usize,
    pub is_selected: bool,
}

/// One entry per distinct category, in order of first appearance.
///
/// Built fresh for every result set; selection changes never survive a
/// rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FacetIndex {
    entries: Vec<FacetEntry>,
}

impl FacetIndex {
    /// Count results per category, every category selected.
    #[must_use]
    pub fn build(results: &MergedResultSet) -> Self {
        let mut positions: HashMap<&Category, usize> = HashMap::new();
        let mut entries: Vec<FacetEntry> = Vec::new();

        for result in results {
            if let Some(&pos) = positions.get(&result.category) {
                entries[pos].count += 1;
            } else {
                positions.insert(&result.category, entries.len());
                entries.push(FacetEntry {
                    category: result.category.clone(),
                    count: 1,
                    is_selected: true,
                });
            }
        }

        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[FacetEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, category: &Category) -> Option<&FacetEntry> {
        self.entries.iter().find(|e| &e.category == category)
    }

    /// `None` when the category has no facet.
    #[must_use]
    pub fn is_selected(&self, category: &Category) -> Option<bool> {
        self.get(category).map(|e| e.is_selected)
    }

    /// Flip one category's selection. Unknown categories are a no-op.
    ///
    /// Returns whether a facet was changed.
    pub fn toggle(&mut self, category: &Category) -> bool {
        match self.entry_mut(category) {
            Some(entry) => {
                entry.is_selected = !entry.is_selected;
                true
            }
            None => {
                tracing::debug!(%category, "toggle ignored for unknown category");
                false
            }
        }
    }

    /// Set one category's selection explicitly. Unknown categories are a no-op.
    ///
    /// Returns whether a facet with that category exists.
    pub fn set_selected(&mut self, category: &Category, selected: bool) -> bool {
        match self.entry_mut(category) {
            Some(entry) => {
                entry.is_selected = selected;
                true
            }
            None => {
                tracing::debug!(%category, "selection ignored for unknown category");
                false
            }
        }
    }

    /// Sum of counts; equals the length of the result set it was built from.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, category: &Category) -> Option<&mut FacetEntry> {
        self.entries.iter_mut().find(|e| &e.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{origin, poi, scenario};
    use crate::plan::SearchPlan;

    fn named(s: &str) -> Category {
        Category::Named(s.to_string())
    }

    fn merged_from(features: &[nearby_core::PointOfInterest]) -> MergedResultSet {
        SearchPlan::default().run(features, Some(origin())).unwrap()
    }

    #[test]
    fn counts_per_category_all_selected() {
        let data = vec![
            poi("h1", 0.0, 0.0, Some("hospital"), true),
            poi("g1", 0.0, 0.001, Some("grocery"), false),
            poi("p1", 0.0, 0.002, Some("pharmacy"), false),
            poi("g2", 0.0, 0.003, Some("grocery"), false),
        ];
        let facets = FacetIndex::build(&merged_from(&data));

        assert_eq!(
            facets.entries(),
            &[
                FacetEntry {
                    category: named("hospital"),
                    count: 1,
                    is_selected: true
                },
                FacetEntry {
                    category: named("grocery"),
                    count: 2,
                    is_selected: true
                },
                FacetEntry {
                    category: named("pharmacy"),
                    count: 1,
                    is_selected: true
                },
            ]
        );
    }

    #[test]
    fn missing_category_gets_its_own_facet() {
        let data = vec![
            poi("a", 0.0, 0.0, None, false),
            poi("b", 0.0, 0.001, Some("grocery"), false),
            poi("c", 0.0, 0.002, None, false),
        ];
        let facets = FacetIndex::build(&merged_from(&data));
        assert_eq!(facets.get(&Category::Missing).map(|e| e.count), Some(2));
        assert_eq!(facets.len(), 2);
    }

    #[test]
    fn empty_icon_and_absent_icon_are_separate_facets() {
        let data = vec![
            poi("blank", 0.0, 0.0, Some(""), false),
            poi("absent", 0.0, 0.001, None, false),
        ];
        let mut facets = FacetIndex::build(&merged_from(&data));
        assert_eq!(facets.len(), 2);
        assert_eq!(facets.get(&named("")).map(|e| e.count), Some(1));
        assert_eq!(facets.get(&Category::Missing).map(|e| e.count), Some(1));

        assert!(facets.toggle(&Category::Missing));
        assert_eq!(facets.is_selected(&named("")), Some(true));
    }

    #[test]
    fn total_equals_result_count() {
        let data: Vec<_> = (0..40)
            .map(|i| {
                let icon = ["grocery", "pharmacy", "bank"][i % 3];
                let lon = f64::from(u32::try_from(i).unwrap()) * 0.0005;
                poi(&format!("p{i}"), 0.0, lon, Some(icon), i % 7 == 0)
            })
            .collect();
        let merged = merged_from(&data);
        let facets = FacetIndex::build(&merged);
        assert_eq!(facets.total(), merged.len());
    }

    #[test]
    fn empty_result_set_has_no_facets() {
        let facets = FacetIndex::build(&MergedResultSet::default());
        assert!(facets.is_empty());
        assert_eq!(facets.total(), 0);
    }

    #[test]
    fn toggle_flips_only_named_category() {
        let mut facets = FacetIndex::build(&merged_from(&scenario()));
        assert!(facets.toggle(&named("grocery")));
        assert_eq!(facets.is_selected(&named("grocery")), Some(false));
        assert_eq!(facets.is_selected(&named("hospital")), Some(true));
    }

    #[test]
    fn double_toggle_is_identity() {
        let original = FacetIndex::build(&merged_from(&scenario()));
        let mut facets = original.clone();
        facets.toggle(&named("hospital"));
        facets.toggle(&named("hospital"));
        assert_eq!(facets, original);
    }

    #[test]
    fn toggle_unknown_category_is_noop() {
        let original = FacetIndex::build(&merged_from(&scenario()));
        let mut facets = original.clone();
        assert!(!facets.toggle(&named("bakery")));
        assert!(!facets.toggle(&Category::Missing));
        assert_eq!(facets, original);
    }

    #[test]
    fn set_selected_is_explicit() {
        let mut facets = FacetIndex::build(&merged_from(&scenario()));
        assert!(facets.set_selected(&named("grocery"), false));
        assert!(facets.set_selected(&named("grocery"), false));
        assert_eq!(facets.is_selected(&named("grocery")), Some(false));
        assert!(facets.set_selected(&named("grocery"), true));
        assert_eq!(facets.is_selected(&named("grocery")), Some(true));
        assert!(!facets.set_selected(&named("bakery"), false));
    }

    #[test]
    fn serializes_as_ordered_list() {
        let facets = FacetIndex::build(&merged_from(&scenario()));
        let json = serde_json::to_value(&facets).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"category": "hospital", "count": 1, "is_selected": true},
                {"category": "grocery", "count": 1, "is_selected": true},
            ])
        );
    }
}

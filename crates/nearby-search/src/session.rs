//! Reactive state for one user's search.
//!
//! Inputs are the dataset and the origin. Changing either recomputes the
//! merged result set and rebuilds the facets from scratch. Facet selection is
//! the only state changed in place, and only through [`NearbySession::toggle`]
//! or [`NearbySession::set_selected`].
//!
//! Callers that compute off the calling thread use [`NearbySession::snapshot`]
//! and [`NearbySession::apply`]; a result computed for a superseded revision
//! is dropped.

use std::sync::Arc;

use nearby_core::{Category, Coordinate, Dataset};

use crate::facet::{FacetEntry, FacetIndex};
use crate::merge::MergedResultSet;
use crate::plan::SearchPlan;
use crate::view::{filter_view, DisplayRecord};

/// Monotonic counter bumped on every input change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Revision(u64);

/// The inputs a merged result set is derived from.
#[derive(Debug, Clone, Default)]
pub struct SearchInputs {
    pub dataset: Arc<Dataset>,
    pub origin: Option<Coordinate>,
}

impl SearchInputs {
    #[must_use]
    pub fn compute(&self, plan: &SearchPlan) -> Option<MergedResultSet> {
        plan.run(&self.dataset.features, self.origin)
    }
}

#[derive(Debug, Clone)]
pub struct NearbySession {
    plan: SearchPlan,
    inputs: SearchInputs,
    revision: Revision,
    merged: Option<MergedResultSet>,
    facets: FacetIndex,
}

impl NearbySession {
    /// Empty dataset, no origin.
    #[must_use]
    pub fn new(plan: SearchPlan) -> Self {
        Self {
            plan,
            inputs: SearchInputs::default(),
            revision: Revision::default(),
            merged: None,
            facets: FacetIndex::default(),
        }
    }

    #[must_use]
    pub fn with_dataset(plan: SearchPlan, dataset: Arc<Dataset>) -> Self {
        let mut session = Self::new(plan);
        session.set_dataset(dataset);
        session
    }

    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.inputs.dataset = dataset;
        self.refresh();
    }

    pub fn set_origin(&mut self, origin: Coordinate) {
        self.inputs.origin = Some(origin);
        self.refresh();
    }

    pub fn clear_origin(&mut self) {
        self.inputs.origin = None;
        self.refresh();
    }

    #[must_use]
    pub fn origin(&self) -> Option<Coordinate> {
        self.inputs.origin
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.inputs.dataset
    }

    #[must_use]
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Current inputs tagged with the revision they belong to.
    #[must_use]
    pub fn snapshot(&self) -> (Revision, SearchInputs) {
        (self.revision, self.inputs.clone())
    }

    /// Install a merged set computed from [`Self::snapshot`].
    ///
    /// Returns `false` and leaves state untouched when `revision` is not the
    /// current one.
    pub fn apply(&mut self, revision: Revision, merged: Option<MergedResultSet>) -> bool {
        if revision != self.revision {
            tracing::debug!(
                stale = revision.0,
                current = self.revision.0,
                "discarding result for superseded inputs"
            );
            return false;
        }
        self.install(merged);
        true
    }

    /// Whether a query ran for the current inputs (false when there is no origin).
    #[must_use]
    pub fn has_searched(&self) -> bool {
        self.merged.is_some()
    }

    #[must_use]
    pub fn merged(&self) -> Option<&MergedResultSet> {
        self.merged.as_ref()
    }

    #[must_use]
    pub fn facet_index(&self) -> &FacetIndex {
        &self.facets
    }

    /// Facet list for rendering toggle controls.
    #[must_use]
    pub fn facets(&self) -> &[FacetEntry] {
        self.facets.entries()
    }

    pub fn toggle(&mut self, category: &Category) -> bool {
        self.facets.toggle(category)
    }

    pub fn set_selected(&mut self, category: &Category, selected: bool) -> bool {
        self.facets.set_selected(category, selected)
    }

    /// Display records for the currently selected categories.
    #[must_use]
    pub fn view(&self) -> Vec<DisplayRecord> {
        match &self.merged {
            Some(merged) => filter_view(merged, &self.facets)
                .into_iter()
                .map(DisplayRecord::from)
                .collect(),
            None => Vec::new(),
        }
    }

    fn refresh(&mut self) {
        self.revision = Revision(self.revision.0 + 1);
        let merged = self.inputs.compute(&self.plan);
        self.install(merged);
    }

    fn install(&mut self, merged: Option<MergedResultSet>) {
        self.facets = merged.as_ref().map(FacetIndex::build).unwrap_or_default();
        self.merged = merged;
    }
}

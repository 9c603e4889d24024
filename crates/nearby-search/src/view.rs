//! Facet-filtered view of a merged result set.

use nearby_core::Category;
use serde::Serialize;

use crate::facet::FacetIndex;
use crate::merge::{MergedResultSet, RankedResult};

/// Display-ready record handed to presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord {
    pub id: usize,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub contact_url: Option<String>,
    pub category: Category,
    pub distance_m: f64,
}

impl From<&RankedResult> for DisplayRecord {
    fn from(result: &RankedResult) -> Self {
        Self {
            id: result.id,
            name: result.name.clone(),
            description: result.description.clone(),
            address: result.address.clone(),
            phone: result.phone.clone(),
            contact_url: result.contact.clone(),
            category: result.category.clone(),
            distance_m: result.distance_m,
        }
    }
}

/// Results whose category is selected, in merged order.
///
/// A result whose category has no facet is left out.
#[must_use]
pub fn filter_view<'r>(
    results: &'r MergedResultSet,
    facets: &FacetIndex,
) -> Vec<&'r RankedResult> {
    results
        .iter()
        .filter(|result| match facets.is_selected(&result.category) {
            Some(selected) => selected,
            None => {
                tracing::debug!(
                    id = result.id,
                    category = %result.category,
                    "result has no facet; hidden"
                );
                false
            }
        })
        .collect()
}

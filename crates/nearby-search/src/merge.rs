//! Concatenation of per-class hits into one ranked result set.

use nearby_core::{Category, Coordinate};
use serde::Serialize;

use crate::index::Neighbor;
use crate::plan::PoiClass;

/// A query hit stamped with its synthetic identifier.
///
/// Only the attributes needed downstream are copied from the source feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub id: usize,
    pub class: PoiClass,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub contact: Option<String>,
    pub category: Category,
    pub position: Coordinate,
    pub distance_m: f64,
}

/// Medical results followed by general results, each in distance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MergedResultSet(Vec<RankedResult>);

impl MergedResultSet {
    #[must_use]
    pub fn results(&self) -> &[RankedResult] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedResult> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'r> IntoIterator for &'r MergedResultSet {
    type Item = &'r RankedResult;
    type IntoIter = std::slice::Iter<'r, RankedResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Merge medical and general hits.
///
/// Medical hits get ids `1..=n` and always come first, regardless of how far
/// they are compared with general hits; general hits get ids from 100 up.
#[must_use]
pub fn merge(medical: &[Neighbor<'_>], general: &[Neighbor<'_>]) -> MergedResultSet {
    let mut results = Vec::with_capacity(medical.len() + general.len());
    rank_into(&mut results, PoiClass::Medical, medical);
    rank_into(&mut results, PoiClass::General, general);
    MergedResultSet(results)
}

fn rank_into(out: &mut Vec<RankedResult>, class: PoiClass, hits: &[Neighbor<'_>]) {
    for (rank, hit) in hits.iter().enumerate() {
        out.push(RankedResult {
            id: class.id_base() + rank,
            class,
            name: hit.poi.name.clone(),
            description: hit.poi.description.clone(),
            address: hit.poi.address.clone(),
            phone: hit.poi.phone.clone(),
            contact: hit.poi.contact.clone(),
            category: hit.poi.category.clone(),
            position: hit.poi.position,
            distance_m: hit.distance_m,
        });
    }
}

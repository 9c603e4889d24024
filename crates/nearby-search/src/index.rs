//! Filtered spatial index and bounded k-nearest queries.
//!
//! Points are stored in an R-tree as unit-sphere vectors, so the tree's
//! nearest-neighbour walk visits candidates in great-circle order. Reported
//! distances are haversine metres.

use nearby_core::{Coordinate, PointOfInterest};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::geo::{haversine_m, unit_vector};

/// A point of interest with its position in the filtered set.
#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    slot: usize,
    xyz: [f64; 3],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xyz)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.xyz[0] - point[0];
        let dy = self.xyz[1] - point[1];
        let dz = self.xyz[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// One query hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub poi: &'a PointOfInterest,
    pub distance_m: f64,
}

/// Nearest-neighbour index over the features that satisfy a predicate.
///
/// Borrows the dataset; features are never copied or mutated.
pub struct SpatialIndex<'a> {
    entries: Vec<&'a PointOfInterest>,
    tree: RTree<IndexedPoint>,
}

impl<'a> SpatialIndex<'a> {
    /// Index every feature for which `predicate` returns `true`.
    ///
    /// An empty filtered set yields an index that answers every query with
    /// no results.
    pub fn build<P>(features: &'a [PointOfInterest], predicate: P) -> Self
    where
        P: Fn(&PointOfInterest) -> bool,
    {
        let entries: Vec<&'a PointOfInterest> = features.iter().filter(|p| predicate(p)).collect();
        let points = entries
            .iter()
            .enumerate()
            .map(|(slot, poi)| IndexedPoint {
                slot,
                xyz: unit_vector(poi.position),
            })
            .collect();

        Self {
            entries,
            tree: RTree::bulk_load(points),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return up to `k` features nearest to `origin`, closest first.
    ///
    /// Candidates farther than `max_distance_m` are dropped even when that
    /// leaves fewer than `k`. Equal distances are ordered by position in the
    /// filtered set, so repeated runs on the same input agree.
    #[must_use]
    pub fn nearest(
        &self,
        origin: Coordinate,
        k: usize,
        max_distance_m: Option<f64>,
    ) -> Vec<Neighbor<'a>> {
        if k == 0 || self.entries.is_empty() {
            return Vec::new();
        }

        let query = unit_vector(origin);
        let mut hits: Vec<(f64, usize)> = Vec::with_capacity(k.min(self.entries.len()));
        let mut farthest = 0.0_f64;

        for point in self.tree.nearest_neighbor_iter(&query) {
            let distance_m = haversine_m(origin, self.entries[point.slot].position);
            if max_distance_m.is_some_and(|max| distance_m > max) {
                break;
            }
            // Keep walking past k only while candidates tie with the k-th hit.
            if hits.len() >= k && distance_m > farthest {
                break;
            }
            farthest = farthest.max(distance_m);
            hits.push((distance_m, point.slot));
        }

        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        hits.truncate(k);
        hits.into_iter()
            .map(|(distance_m, slot)| Neighbor {
                poi: self.entries[slot],
                distance_m,
            })
            .collect()
    }
}

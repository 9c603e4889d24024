//! Proximity search and faceting engine.
//!
//! Data flows dataset → per-class [`SpatialIndex`] → k-nearest query →
//! [`merge`] → [`FacetIndex`] → [`filter_view`]. Every stage is a pure,
//! synchronous function of its inputs; [`NearbySession`] wires them together
//! and recomputes the chain wholesale whenever an input changes.

pub mod facet;
pub mod geo;
pub mod index;
pub mod merge;
pub mod plan;
pub mod session;
pub mod view;

pub use facet::{FacetEntry, FacetIndex};
pub use geo::{haversine_m, EARTH_RADIUS_M};
pub use index::{Neighbor, SpatialIndex};
pub use merge::{merge, MergedResultSet, RankedResult};
pub use plan::{ClassQuery, PoiClass, SearchPlan};
pub use session::{NearbySession, Revision, SearchInputs};
pub use view::{filter_view, DisplayRecord};

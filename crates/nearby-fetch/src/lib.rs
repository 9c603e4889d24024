//! HTTP collaborators for the nearby search engine: the one-shot dataset
//! fetch and the display-only reverse geocoder.

pub mod dataset;
pub mod error;
pub mod geocode;
mod http;
mod retry;

pub use dataset::DatasetClient;
pub use error::FetchError;
pub use geocode::GeocodeClient;

pub mod app_config;
pub mod config;
pub mod geojson;
pub mod poi;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geojson::{decode_feature_collection, dataset_from_value};
pub use poi::{Category, Coordinate, Dataset, PointOfInterest};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinate (lat={lat}, lon={lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Errors that make a whole dataset payload unusable.
///
/// Individual malformed features never produce one of these; they are skipped
/// and counted on [`Dataset::skipped`].
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset is not a feature collection: {0}")]
    NotFeatureCollection(String),
}

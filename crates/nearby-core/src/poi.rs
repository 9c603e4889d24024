//! Point-of-interest domain types shared by the search engine and its callers.

use serde::{Serialize, Serializer};

use crate::CoreError;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when `lat` is outside
    /// `[-90, 90]`, `lon` is outside `[-180, 180]`, or either is NaN/infinite.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoreError> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        if valid {
            Ok(Self { lat, lon })
        } else {
            Err(CoreError::InvalidCoordinate { lat, lon })
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lon)
    }
}

/// Category label a point of interest is faceted by (the dataset's `icon`).
///
/// A feature without an `icon` still gets a facet of its own, keyed as
/// [`Category::Missing`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Named(String),
    Missing,
}

impl Category {
    /// Only an absent icon is [`Category::Missing`]; an empty icon is a
    /// category of its own.
    #[must_use]
    pub fn from_icon(icon: Option<&str>) -> Self {
        icon.map_or(Category::Missing, |s| Category::Named(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Category::Named(s) => Some(s),
            Category::Missing => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Named(s) => write!(f, "{s}"),
            Category::Missing => write!(f, "uncategorized"),
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Category::Named(s) => serializer.serialize_str(s),
            Category::Missing => serializer.serialize_none(),
        }
    }
}

/// One geotagged feature from the essentials dataset.
///
/// Optional text attributes keep the distinction between absent (`None`) and
/// present-but-empty (`Some("")`).
#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    pub position: Coordinate,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub contact: Option<String>,
    pub category: Category,
    /// Medical/priority flag; selects the priority search class.
    pub priority: bool,
}

/// A decoded feature collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub name: Option<String>,
    pub features: Vec<PointOfInterest>,
    /// Features dropped during decoding because they were malformed.
    pub skipped: usize,
}

impl Dataset {
    /// The dataset used when the real one is unavailable.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

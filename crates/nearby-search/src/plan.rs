//! Per-class query parameters.
//!
//! Both classes run through the same [`ClassQuery::run`]; they differ only in
//! predicate, result cap, radius, and identifier base.

use nearby_core::{AppConfig, Coordinate, PointOfInterest};
use serde::Serialize;

use crate::index::{Neighbor, SpatialIndex};
use crate::merge::{merge, MergedResultSet};

pub const MEDICAL_MAX_RESULTS: usize = 5;
pub const GENERAL_MAX_RESULTS: usize = 100;
pub const GENERAL_MAX_DISTANCE_M: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiClass {
    /// Priority features (hospitals, labs); listed first.
    Medical,
    General,
}

impl PoiClass {
    #[must_use]
    pub fn includes(self, poi: &PointOfInterest) -> bool {
        match self {
            PoiClass::Medical => poi.priority,
            PoiClass::General => !poi.priority,
        }
    }

    /// First synthetic identifier handed out to this class.
    #[must_use]
    pub fn id_base(self) -> usize {
        match self {
            PoiClass::Medical => 1,
            PoiClass::General => 100,
        }
    }
}

impl std::fmt::Display for PoiClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoiClass::Medical => write!(f, "medical"),
            PoiClass::General => write!(f, "general"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassQuery {
    pub class: PoiClass,
    pub max_results: usize,
    pub max_distance_m: Option<f64>,
}

impl ClassQuery {
    /// 5 nearest priority features, no distance cap.
    #[must_use]
    pub fn medical() -> Self {
        Self {
            class: PoiClass::Medical,
            max_results: MEDICAL_MAX_RESULTS,
            max_distance_m: None,
        }
    }

    /// 100 nearest general features within 10 km.
    #[must_use]
    pub fn general() -> Self {
        Self {
            class: PoiClass::General,
            max_results: GENERAL_MAX_RESULTS,
            max_distance_m: Some(GENERAL_MAX_DISTANCE_M),
        }
    }

    /// Index this class's features and query them from `origin`.
    #[must_use]
    pub fn run<'a>(
        &self,
        features: &'a [PointOfInterest],
        origin: Coordinate,
    ) -> Vec<Neighbor<'a>> {
        let index = SpatialIndex::build(features, |poi| self.class.includes(poi));
        let hits = index.nearest(origin, self.max_results, self.max_distance_m);
        tracing::debug!(
            class = %self.class,
            candidates = index.len(),
            hits = hits.len(),
            "class query complete"
        );
        hits
    }
}

/// The pair of class queries run on every refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchPlan {
    pub medical: ClassQuery,
    pub general: ClassQuery,
}

impl Default for SearchPlan {
    fn default() -> Self {
        Self {
            medical: ClassQuery::medical(),
            general: ClassQuery::general(),
        }
    }
}

impl SearchPlan {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            medical: ClassQuery {
                max_results: config.medical_max_results,
                ..ClassQuery::medical()
            },
            general: ClassQuery {
                max_results: config.general_max_results,
                max_distance_m: Some(config.general_max_distance_m),
                ..ClassQuery::general()
            },
        }
    }

    /// Run both class queries and merge them.
    ///
    /// Returns `None` without querying when there is no origin, so callers can
    /// tell "no location" apart from "nothing nearby".
    #[must_use]
    pub fn run(
        &self,
        features: &[PointOfInterest],
        origin: Option<Coordinate>,
    ) -> Option<MergedResultSet> {
        let origin = origin?;
        let medical = self.medical.run(features, origin);
        let general = self.general.run(features, origin);
        Some(merge(&medical, &general))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{origin, poi, scenario};

    #[test]
    fn default_plan_matches_fixed_class_parameters() {
        let plan = SearchPlan::default();
        assert_eq!(plan.medical.max_results, 5);
        assert_eq!(plan.medical.max_distance_m, None);
        assert_eq!(plan.general.max_results, 100);
        assert_eq!(plan.general.max_distance_m, Some(10_000.0));
    }

    #[test]
    fn class_predicates_partition_by_priority() {
        let hospital = poi("h", 0.0, 0.0, Some("hospital"), true);
        let shop = poi("s", 0.0, 0.0, Some("grocery"), false);
        assert!(PoiClass::Medical.includes(&hospital));
        assert!(!PoiClass::Medical.includes(&shop));
        assert!(PoiClass::General.includes(&shop));
        assert!(!PoiClass::General.includes(&hospital));
    }

    #[test]
    fn run_without_origin_is_none() {
        let data = scenario();
        assert!(SearchPlan::default().run(&data, None).is_none());
    }

    #[test]
    fn run_on_empty_dataset_is_empty_not_none() {
        let merged = SearchPlan::default().run(&[], Some(origin())).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn medical_class_has_no_distance_cap() {
        let data = vec![poi("remote-clinic", 40.0, 40.0, Some("hospital"), true)];
        let merged = SearchPlan::default().run(&data, Some(origin())).unwrap();
        assert_eq!(merged.len(), 1);
        assert!(merged.results()[0].distance_m > 1_000_000.0);
    }

    #[test]
    fn merged_length_is_bounded_by_class_caps() {
        let mut data = Vec::new();
        for i in 0..30 {
            let lon = f64::from(i) * 0.001;
            data.push(poi(&format!("m{i}"), 0.0, lon, Some("hospital"), true));
        }
        for i in 0..300 {
            let lat = f64::from(i) * 0.0001;
            data.push(poi(&format!("g{i}"), lat, 0.0, Some("grocery"), false));
        }
        let merged = SearchPlan::default().run(&data, Some(origin())).unwrap();
        assert_eq!(merged.len(), 5 + 100);
    }

    #[test]
    fn radius_bounds_general_class_only() {
        let data = scenario();
        let merged = SearchPlan::default().run(&data, Some(origin())).unwrap();
        let names: Vec<_> = merged.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["hospital", "near-grocery"]);
    }

    #[test]
    fn from_config_overrides_caps_and_radius() {
        let config = AppConfig {
            env: nearby_core::Environment::Test,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "debug".to_string(),
            dataset_url: String::new(),
            geocode_url: String::new(),
            locality_language: "en".to_string(),
            http_timeout_secs: 5,
            user_agent: "test".to_string(),
            fetch_max_retries: 0,
            fetch_backoff_base_ms: 0,
            medical_max_results: 2,
            general_max_results: 7,
            general_max_distance_m: 250.0,
        };
        let plan = SearchPlan::from_config(&config);
        assert_eq!(plan.medical.class, PoiClass::Medical);
        assert_eq!(plan.medical.max_results, 2);
        assert_eq!(plan.medical.max_distance_m, None);
        assert_eq!(plan.general.class, PoiClass::General);
        assert_eq!(plan.general.max_results, 7);
        assert_eq!(plan.general.max_distance_m, Some(250.0));
    }
}

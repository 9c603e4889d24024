//! `nearby search` and `nearby facets`.

use std::path::Path;
use std::sync::Arc;

use nearby_core::{decode_feature_collection, AppConfig, Category, Coordinate, Dataset};
use nearby_fetch::DatasetClient;
use nearby_search::{NearbySession, SearchPlan};
use serde::Serialize;

use crate::render;

#[derive(Debug, Serialize)]
struct SearchOutput<'s> {
    searched: bool,
    facets: &'s [nearby_search::FacetEntry],
    results: Vec<nearby_search::DisplayRecord>,
}

/// Load the dataset from `file` when given, otherwise from the configured URL.
///
/// Every failure degrades to an empty dataset.
pub(crate) async fn load_dataset(
    config: &AppConfig,
    file: Option<&Path>,
) -> anyhow::Result<Dataset> {
    let Some(path) = file else {
        let client = DatasetClient::from_config(config)?;
        return Ok(client.load_dataset().await);
    };

    let dataset = match tokio::fs::read(path).await {
        Ok(bytes) => decode_feature_collection(&bytes).unwrap_or_else(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "dataset file unusable; continuing with an empty dataset"
            );
            Dataset::empty()
        }),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "dataset file unreadable; continuing with an empty dataset"
            );
            Dataset::empty()
        }
    };
    Ok(dataset)
}

/// Build a session for `origin` with the dataset loaded.
///
/// Without an origin no dataset is fetched and no query runs.
async fn prepare_session(
    config: &AppConfig,
    origin: Option<Coordinate>,
    file: Option<&Path>,
) -> anyhow::Result<NearbySession> {
    let mut session = NearbySession::new(SearchPlan::from_config(config));
    if let Some(origin) = origin {
        session.set_dataset(Arc::new(load_dataset(config, file).await?));
        session.set_origin(origin);
    }
    Ok(session)
}

/// Apply one toggle per hidden category label, plus one for the
/// uncategorized facet when requested.
pub(crate) fn apply_hidden(
    session: &mut NearbySession,
    hide: &[String],
    uncategorized: bool,
) {
    let labels = hide.iter().map(|label| Category::Named(label.clone()));
    let missing = uncategorized.then_some(Category::Missing);
    for category in labels.chain(missing) {
        if !session.toggle(&category) {
            tracing::warn!(%category, "no results in category; hide ignored");
        }
    }
}

pub(crate) async fn run_search(
    config: &AppConfig,
    origin: Option<Coordinate>,
    file: Option<&Path>,
    hide: &[String],
    hide_uncategorized: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = prepare_session(config, origin, file).await?;
    apply_hidden(&mut session, hide, hide_uncategorized);

    let results = session.view();
    if json {
        let output = SearchOutput {
            searched: session.has_searched(),
            facets: session.facets(),
            results,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !session.has_searched() {
        println!("{}", render::LOCATION_UNAVAILABLE);
        return Ok(());
    }

    print!("{}", render::format_facets(session.facets()));
    println!();
    if results.is_empty() {
        println!("No essentials found nearby.");
    }
    for record in &results {
        print!("{}", render::format_record(record));
    }
    Ok(())
}

pub(crate) async fn run_facets(
    config: &AppConfig,
    origin: Option<Coordinate>,
    file: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let session = prepare_session(config, origin, file).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(session.facets())?);
    } else if session.has_searched() {
        print!("{}", render::format_facets(session.facets()));
    } else {
        println!("{}", render::LOCATION_UNAVAILABLE);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_grocery_and_hospital() -> NearbySession {
        let dataset = decode_feature_collection(
            br#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
                 "properties": {"name": "Hospital", "icon": "hospital", "priority": true}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0.001, 0.0]},
                 "properties": {"name": "Grocery", "icon": "grocery", "priority": false}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0.002, 0.0]},
                 "properties": {"name": "Mystery", "priority": false}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0.003, 0.0]},
                 "properties": {"name": "Blank", "icon": "", "priority": false}}
            ]}"#,
        )
        .unwrap();
        let mut session = NearbySession::with_dataset(SearchPlan::default(), Arc::new(dataset));
        session.set_origin(Coordinate::new(0.0, 0.0).unwrap());
        session
    }

    #[test]
    fn apply_hidden_toggles_named_categories() {
        let mut session = session_with_grocery_and_hospital();
        apply_hidden(&mut session, &["grocery".to_string()], false);
        let names: Vec<_> = session.view().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Hospital", "Mystery", "Blank"]);
    }

    #[test]
    fn hide_uncategorized_leaves_empty_icon_visible() {
        let mut session = session_with_grocery_and_hospital();
        apply_hidden(&mut session, &[], true);
        let names: Vec<_> = session.view().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Hospital", "Grocery", "Blank"]);
    }

    #[test]
    fn empty_label_hides_only_empty_icon() {
        let mut session = session_with_grocery_and_hospital();
        apply_hidden(&mut session, &[String::new()], false);
        let names: Vec<_> = session.view().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Hospital", "Grocery", "Mystery"]);
    }

    #[test]
    fn apply_hidden_ignores_unknown_categories() {
        let mut session = session_with_grocery_and_hospital();
        apply_hidden(&mut session, &["bakery".to_string()], false);
        assert_eq!(session.view().len(), 4);
    }

    #[tokio::test]
    async fn missing_dataset_file_degrades_to_empty() {
        let config = test_config();
        let dataset = load_dataset(&config, Some(Path::new("/nonexistent/nearby/geo.json")))
            .await
            .unwrap();
        assert!(dataset.is_empty());
    }

    #[tokio::test]
    async fn no_origin_skips_dataset_and_query() {
        // The dataset URL is unroutable; prepare_session must not touch it.
        let config = test_config();
        let session = prepare_session(&config, None, None).await.unwrap();
        assert!(!session.has_searched());
        assert!(session.dataset().is_empty());
    }

    fn test_config() -> AppConfig {
        AppConfig {
            env: nearby_core::Environment::Test,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "info".to_string(),
            dataset_url: "http://127.0.0.1:1/geo.json".to_string(),
            geocode_url: "http://127.0.0.1:1/geocode".to_string(),
            locality_language: "en".to_string(),
            http_timeout_secs: 1,
            user_agent: "nearby-test/0.1".to_string(),
            fetch_max_retries: 0,
            fetch_backoff_base_ms: 0,
            medical_max_results: 5,
            general_max_results: 100,
            general_max_distance_m: 10_000.0,
        }
    }
}

//! Decoding of the essentials feature collection.
//!
//! The payload shape is owned by the dataset publisher:
//!
//! ```json
//! { "name": "...", "type": "FeatureCollection", "features": [
//!   { "type": "Feature",
//!     "geometry": { "type": "Point", "coordinates": [lon, lat] },
//!     "properties": { "name": "...", "desc": "...", "addr": "...", "phone": "...",
//!                     "contact": "...", "icon": "...", "priority": true } } ] }
//! ```
//!
//! A feature that cannot be turned into a [`PointOfInterest`] is skipped and
//! counted; it never fails the whole collection.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::poi::{Category, Coordinate, Dataset, PointOfInterest};
use crate::DatasetError;

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    features: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    geometry: RawGeometry,
    properties: RawProperties,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    name: String,
    #[serde(default, deserialize_with = "optional_text")]
    desc: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    addr: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    contact: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    icon: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    priority: bool,
}

/// Decode a feature collection from raw response bytes.
///
/// # Errors
///
/// Returns [`DatasetError::Json`] if the bytes are not JSON, or
/// [`DatasetError::NotFeatureCollection`] if the document has no `features` array.
pub fn decode_feature_collection(bytes: &[u8]) -> Result<Dataset, DatasetError> {
    let value: Value = serde_json::from_slice(bytes)?;
    dataset_from_value(value)
}

/// Decode a feature collection from an already-parsed JSON document.
///
/// # Errors
///
/// Returns [`DatasetError::NotFeatureCollection`] if the document is not an
/// object with a `features` array, or declares a `type` other than
/// `FeatureCollection`.
pub fn dataset_from_value(value: Value) -> Result<Dataset, DatasetError> {
    let raw: RawCollection = serde_json::from_value(value)
        .map_err(|e| DatasetError::NotFeatureCollection(e.to_string()))?;

    if let Some(kind) = raw.kind.as_deref() {
        if kind != "FeatureCollection" {
            return Err(DatasetError::NotFeatureCollection(format!(
                "unexpected type \"{kind}\""
            )));
        }
    }

    let mut features = Vec::with_capacity(raw.features.len());
    let mut skipped = 0usize;
    for (position, feature) in raw.features.into_iter().enumerate() {
        match decode_feature(feature) {
            Ok(poi) => features.push(poi),
            Err(reason) => {
                skipped += 1;
                tracing::debug!(position, %reason, "skipping malformed feature");
            }
        }
    }

    if skipped > 0 {
        tracing::info!(
            skipped,
            kept = features.len(),
            "dataset contained malformed features"
        );
    }

    Ok(Dataset {
        name: raw.name,
        features,
        skipped,
    })
}

fn decode_feature(value: Value) -> Result<PointOfInterest, String> {
    let raw: RawFeature = serde_json::from_value(value).map_err(|e| e.to_string())?;

    if raw.geometry.kind != "Point" {
        return Err(format!("unsupported geometry type \"{}\"", raw.geometry.kind));
    }
    // GeoJSON positions are [lon, lat, (alt)].
    let (lon, lat) = match raw.geometry.coordinates.as_slice() {
        [lon, lat, ..] => (*lon, *lat),
        _ => return Err("point has fewer than two coordinates".to_string()),
    };
    let position = Coordinate::new(lat, lon).map_err(|e| e.to_string())?;

    let props = raw.properties;
    Ok(PointOfInterest {
        position,
        name: props.name,
        description: props.desc,
        address: props.addr,
        phone: props.phone,
        contact: props.contact,
        category: Category::from_icon(props.icon.as_deref()),
        priority: props.priority,
    })
}

/// Accept strings and numbers as text; anything else reads as absent.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Publisher data is not strict about booleans, so `priority` follows truthiness.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn feature(lon: f64, lat: f64, props: Value) -> Value {
        json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [lon, lat] },
            "properties": props
        })
    }

    #[test]
    fn decodes_full_feature() {
        let doc = json!({
            "name": "Essentials",
            "type": "FeatureCollection",
            "features": [feature(77.59, 12.97, json!({
                "name": "City Hospital",
                "desc": "24x7 emergency",
                "addr": "MG Road",
                "phone": "080-1234",
                "contact": "https://example.org/city",
                "icon": "hospital",
                "priority": true
            }))]
        });

        let dataset = dataset_from_value(doc).unwrap();
        assert_eq!(dataset.name.as_deref(), Some("Essentials"));
        assert_eq!(dataset.skipped, 0);
        let poi = &dataset.features[0];
        assert!((poi.position.lat - 12.97).abs() < 1e-9);
        assert!((poi.position.lon - 77.59).abs() < 1e-9);
        assert_eq!(poi.name, "City Hospital");
        assert_eq!(poi.phone.as_deref(), Some("080-1234"));
        assert_eq!(poi.category, Category::Named("hospital".to_string()));
        assert!(poi.priority);
    }

    #[test]
    fn absent_phone_stays_absent_and_empty_phone_stays_empty() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                feature(0.0, 0.0, json!({"name": "A", "icon": "grocery"})),
                feature(0.0, 0.0, json!({"name": "B", "icon": "grocery", "phone": ""})),
                feature(0.0, 0.0, json!({"name": "C", "phone": null})),
            ]
        });

        let dataset = dataset_from_value(doc).unwrap();
        assert_eq!(dataset.features[0].phone, None);
        assert_eq!(dataset.features[1].phone.as_deref(), Some(""));
        assert_eq!(dataset.features[2].phone, None);
        assert_eq!(dataset.features[2].category, Category::Missing);
    }

    #[test]
    fn numeric_phone_is_read_as_text() {
        let doc = json!({
            "features": [feature(0.0, 0.0, json!({"name": "A", "phone": 9_876_543_210_u64}))]
        });
        let dataset = dataset_from_value(doc).unwrap();
        assert_eq!(dataset.features[0].phone.as_deref(), Some("9876543210"));
    }

    #[test]
    fn priority_follows_truthiness() {
        let doc = json!({
            "features": [
                feature(0.0, 0.0, json!({"name": "bool", "priority": true})),
                feature(0.0, 0.0, json!({"name": "string", "priority": "true"})),
                feature(0.0, 0.0, json!({"name": "number", "priority": 1})),
                feature(0.0, 0.0, json!({"name": "false-string", "priority": "false"})),
                feature(0.0, 0.0, json!({"name": "absent"})),
                feature(0.0, 0.0, json!({"name": "null", "priority": null})),
            ]
        });
        let flags: Vec<bool> = dataset_from_value(doc)
            .unwrap()
            .features
            .iter()
            .map(|p| p.priority)
            .collect();
        assert_eq!(flags, vec![true, true, true, false, false, false]);
    }

    #[test]
    fn malformed_features_are_skipped_not_fatal() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                feature(0.0, 0.0, json!({"name": "kept"})),
                { "type": "Feature", "properties": { "name": "no geometry" } },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [0.0, 0.0] } },
                { "type": "Feature", "geometry": { "type": "LineString", "coordinates": [0.0, 0.0] },
                  "properties": { "name": "line" } },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [0.0] },
                  "properties": { "name": "short" } },
                feature(200.0, 0.0, json!({"name": "out of range"})),
                feature(0.0, 0.0, json!({"desc": "no name"})),
                "not an object",
            ]
        });

        let dataset = dataset_from_value(doc).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.features[0].name, "kept");
        assert_eq!(dataset.skipped, 7);
    }

    #[test]
    fn rejects_document_without_features() {
        let err = dataset_from_value(json!({"type": "FeatureCollection"})).unwrap_err();
        assert!(matches!(err, DatasetError::NotFeatureCollection(_)));
    }

    #[test]
    fn rejects_wrong_collection_type() {
        let err = dataset_from_value(json!({"type": "Feature", "features": []})).unwrap_err();
        assert!(matches!(err, DatasetError::NotFeatureCollection(_)));
    }

    #[test]
    fn decode_rejects_non_json_bytes() {
        let err = decode_feature_collection(b"<html>").unwrap_err();
        assert!(matches!(err, DatasetError::Json(_)));
    }

    #[test]
    fn empty_collection_decodes_to_empty_dataset() {
        let dataset = decode_feature_collection(br#"{"features": []}"#).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset, Dataset::empty());
    }
}

//! Plain-text rendering for the terminal.

use std::fmt::Write as _;

use nearby_search::{DisplayRecord, FacetEntry};

pub(crate) const LOCATION_UNAVAILABLE: &str =
    "Location unavailable: pass --lat and --lon (or set NEARBY_LAT/NEARBY_LON) to search.";

/// One line per facet: `[x] hospital (1)`.
pub(crate) fn format_facets(facets: &[FacetEntry]) -> String {
    let mut out = String::new();
    for facet in facets {
        let mark = if facet.is_selected { 'x' } else { ' ' };
        let _ = writeln!(out, "[{mark}] {} ({})", facet.category, facet.count);
    }
    out
}

/// Distance as metres below one kilometre, kilometres above.
pub(crate) fn format_distance(distance_m: f64) -> String {
    if distance_m < 1000.0 {
        format!("{distance_m:.0} m")
    } else {
        format!("{:.1} km", distance_m / 1000.0)
    }
}

/// A multi-line card for one result. Absent fields are omitted; a field
/// present but empty prints as `-`.
pub(crate) fn format_record(record: &DisplayRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#{} {} [{}] {}",
        record.id,
        record.name,
        record.category,
        format_distance(record.distance_m)
    );
    let fields = [
        ("desc", &record.description),
        ("addr", &record.address),
        ("phone", &record.phone),
        ("link", &record.contact_url),
    ];
    for (label, value) in fields {
        match value.as_deref() {
            Some("") => {
                let _ = writeln!(out, "    {label}: -");
            }
            Some(value) => {
                let _ = writeln!(out, "    {label}: {value}");
            }
            None => {}
        }
    }
    out
}

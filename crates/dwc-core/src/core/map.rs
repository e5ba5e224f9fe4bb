//! Coordinates of the current page for the map view.

use crate::api::models::{Record, ResultPage};
use crate::utils::text::display_value;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which record fields hold the coordinates and marker text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapFields {
    pub lat: String,
    pub lng: String,
    pub label: Option<String>,
}

impl Default for MapFields {
    fn default() -> Self {
        MapFields {
            lat: "lat".to_string(),
            lng: "lng".to_string(),
            label: Some("sciName_s".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    /// Index of the record within the page.
    pub row: usize,
    pub lat: f64,
    pub lng: f64,
    pub label: Option<String>,
}

fn coordinate(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Array(items) if items.len() == 1 => coordinate(&items[0]),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn point(row: usize, record: &Record, fields: &MapFields) -> Option<MapPoint> {
    let lat = coordinate(record.get(&fields.lat)?)?;
    let lng = coordinate(record.get(&fields.lng)?)?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }
    let label = fields
        .label
        .as_ref()
        .and_then(|key| record.get(key))
        .filter(|v| !v.is_null())
        .map(display_value);
    Some(MapPoint {
        row,
        lat,
        lng,
        label,
    })
}

/// Records of `page` that carry a valid coordinate pair.
pub fn map_points(page: &ResultPage, fields: &MapFields) -> Vec<MapPoint> {
    page.docs
        .iter()
        .enumerate()
        .filter_map(|(row, record)| point(row, record, fields))
        .collect()
}

/// Bounding box `(min_lng, min_lat, max_lng, max_lat)` padded by `margin`
/// degrees and clamped to the world.
pub fn bounds(points: &[MapPoint], margin: f64) -> Option<(f64, f64, f64, f64)> {
    let first = points.first()?;
    let (mut min_lng, mut min_lat, mut max_lng, mut max_lat) = (first.lng, first.lat, first.lng, first.lat);
    for p in &points[1..] {
        min_lng = min_lng.min(p.lng);
        max_lng = max_lng.max(p.lng);
        min_lat = min_lat.min(p.lat);
        max_lat = max_lat.max(p.lat);
    }
    Some((
        (min_lng - margin).max(-180.0),
        (min_lat - margin).max(-90.0),
        (max_lng + margin).min(180.0),
        (max_lat + margin).min(90.0),
    ))
}

//! Parcel boundary as GeoJSON
//!
//! Only the envelope is checked: a JSON object whose `type` member names a
//! GeoJSON geometry, Feature or FeatureCollection.

use kernel::error::{AppError, AppResult, FieldViolation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const GEOJSON_TYPES: &[&str] = &[
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
    "GeometryCollection",
    "Feature",
    "FeatureCollection",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoJson(Value);

impl GeoJson {
    pub fn new(value: Value) -> AppResult<Self> {
        let kind = value
            .as_object()
            .and_then(|obj| obj.get("type"))
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("geoJson must be an object with a \"type\" member"))?;

        if !GEOJSON_TYPES.contains(&kind) {
            return Err(invalid(format!("geoJson type {kind:?} is not a GeoJSON type")));
        }

        Ok(Self(value))
    }

    pub fn from_db(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::validation(vec![FieldViolation::new("geoJson", message)])
}

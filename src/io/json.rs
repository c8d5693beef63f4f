use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::DataFrame;

/// Read the feature properties of a GeoJSON FeatureCollection.
///
/// One row per feature, one column per property key. Keys are taken in
/// map order and appended as new ones appear in later features.
/// Geometry is ignored. Strings are stored unquoted and `null` as an empty
/// cell; other values keep their JSON text.
pub fn read_geojson_properties<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;
    let reader = BufReader::new(file);
    let json_value: Value = serde_json::from_reader(reader).map_err(Error::Json)?;
    properties_frame(&json_value)
}

fn properties_frame(collection: &Value) -> Result<DataFrame> {
    let features = collection
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Format("GeoJSON must be a FeatureCollection with a 'features' array".to_string()))?;

    let mut keys: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(features.len());
    for feature in features {
        let properties = match feature.get("properties") {
            Some(Value::Object(map)) => Some(map),
            Some(Value::Null) | None => None,
            Some(_) => {
                return Err(Error::Format(
                    "feature 'properties' must be an object".to_string(),
                ))
            }
        };
        if let Some(map) = properties {
            for key in map.keys() {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        rows.push(properties);
    }

    let records = rows
        .iter()
        .map(|properties| {
            keys.iter()
                .map(|key| match properties.and_then(|p| p.get(key)) {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                })
                .collect()
        })
        .collect();

    DataFrame::from_records(keys, records)
}

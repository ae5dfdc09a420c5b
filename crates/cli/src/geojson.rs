use serde_json::{json, Value};

/// Builds a GeoJSON `FeatureCollection` of `Point` features, one per item
/// whose `coordinates` closure resolves to a longitude/latitude pair. Items
/// with no resolvable coordinate are dropped rather than emitted with a
/// null geometry.
pub fn point_feature_collection<T>(
    items: &[T],
    coordinates: impl Fn(&T) -> Option<(f64, f64)>,
    properties: impl Fn(&T) -> Value,
) -> Value {
    let features: Vec<Value> = items
        .iter()
        .filter_map(|item| {
            let (longitude, latitude) = coordinates(item)?;
            Some(json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [longitude, latitude] },
                "properties": properties(item),
            }))
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

/// Builds a GeoJSON `FeatureCollection` of `Polygon` features from items
/// carrying their own boundary rings (`[[ [lon, lat], ... ], ...]`).
pub fn polygon_feature_collection<T>(
    items: &[T],
    boundary: impl Fn(&T) -> &Vec<Vec<[f64; 2]>>,
    properties: impl Fn(&T) -> Value,
) -> Value {
    let features: Vec<Value> = items
        .iter()
        .filter(|item| !boundary(item).is_empty())
        .map(|item| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": boundary(item) },
                "properties": properties(item),
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

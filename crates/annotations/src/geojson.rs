//! GeoJSON FeatureCollection import/export for annotation entities.
//!
//! Semantic round-trip only: property ordering may differ from the
//! original input.

use serde_json::{Map, Value};

use crate::entity::{AnnotationEntity, DEFAULT_LABEL_SIZE_PX, Label};
use crate::geometry::Geometry;
use crate::style::LayeredStyle;
use foundation::math::GeoPos;

#[derive(Debug)]
pub enum GeoJsonError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            GeoJsonError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {}

pub fn entities_from_geojson_str(payload: &str) -> Result<Vec<AnnotationEntity>, GeoJsonError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| GeoJsonError::InvalidFeature {
            index: 0,
            reason: format!("JSON parse error: {e}"),
        })?;
    entities_from_geojson_value(&value)
}

pub fn entities_from_geojson_value(value: &Value) -> Result<Vec<AnnotationEntity>, GeoJsonError> {
    let obj = value.as_object().ok_or(GeoJsonError::NotAFeatureCollection)?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or(GeoJsonError::NotAFeatureCollection)?;
    if ty != "FeatureCollection" {
        return Err(GeoJsonError::NotAFeatureCollection);
    }

    let features = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or(GeoJsonError::NotAFeatureCollection)?;

    let mut out = Vec::with_capacity(features.len());
    for (index, feat) in features.iter().enumerate() {
        let entity = entity_from_feature(feat)
            .map_err(|reason| GeoJsonError::InvalidFeature { index, reason })?;
        out.push(entity);
    }
    Ok(out)
}

/// Parses a single GeoJSON Feature into an entity.
///
/// Kept public so lenient callers can skip bad features one by one
/// instead of failing a whole batch.
pub fn entity_from_feature(value: &Value) -> Result<AnnotationEntity, String> {
    let obj = value.as_object().ok_or("feature must be an object")?;

    let feat_type = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("feature missing type")?;
    if feat_type != "Feature" {
        return Err(format!("unexpected feature type: {feat_type}"));
    }

    let props = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let id = props
        .get("id")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .or_else(|| match obj.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .ok_or("feature missing id")?;

    let geometry_val = obj.get("geometry").ok_or("feature missing geometry")?;
    let geometry = parse_geometry(geometry_val)?;

    let style = match props.get("style") {
        Some(v) => serde_json::from_value::<LayeredStyle>(v.clone())
            .map_err(|e| format!("invalid style: {e}"))?,
        None => LayeredStyle::annotation_default(),
    };

    let label = props
        .get("label")
        .and_then(|v| v.as_object())
        .and_then(|l| l.get("text"))
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .map(|text| {
            let size_px = props
                .get("labelSize")
                .and_then(|v| v.as_f64())
                .unwrap_or(DEFAULT_LABEL_SIZE_PX);
            Label::with_size(text, size_px)
        });

    let icon = props
        .get("icon")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(AnnotationEntity {
        id,
        geometry,
        style,
        label,
        icon,
    })
}

pub fn entities_to_geojson_value(entities: &[AnnotationEntity]) -> Value {
    let mut root = Map::new();
    root.insert(
        "type".to_string(),
        Value::String("FeatureCollection".to_string()),
    );

    let mut features: Vec<Value> = Vec::with_capacity(entities.len());
    for entity in entities {
        features.push(entity_to_feature(entity));
    }
    root.insert("features".to_string(), Value::Array(features));
    Value::Object(root)
}

pub fn entity_to_feature(entity: &AnnotationEntity) -> Value {
    let mut props = Map::new();
    props.insert("id".to_string(), Value::String(entity.id.clone()));
    props.insert(
        "style".to_string(),
        serde_json::to_value(&entity.style).unwrap_or(Value::Null),
    );
    if let Some(label) = &entity.label {
        let mut l = Map::new();
        l.insert("text".to_string(), Value::String(label.text.clone()));
        props.insert("label".to_string(), Value::Object(l));
        props.insert("labelSize".to_string(), Value::from(label.size_px));
    }
    if let Some(icon) = &entity.icon {
        props.insert("icon".to_string(), Value::String(icon.clone()));
    }

    let mut obj = Map::new();
    obj.insert("type".to_string(), Value::String("Feature".to_string()));
    obj.insert("id".to_string(), Value::String(entity.id.clone()));
    obj.insert("properties".to_string(), Value::Object(props));
    obj.insert(
        "geometry".to_string(),
        geometry_to_value(&entity.geometry),
    );
    Value::Object(obj)
}

pub fn geometry_to_value(geom: &Geometry) -> Value {
    let mut obj = Map::new();
    match geom {
        Geometry::Point(p) => {
            obj.insert("type".to_string(), Value::String("Point".to_string()));
            obj.insert("coordinates".to_string(), pos_coords(p));
        }
        Geometry::MultiPoint(ps) => {
            obj.insert("type".to_string(), Value::String("MultiPoint".to_string()));
            obj.insert(
                "coordinates".to_string(),
                Value::Array(ps.iter().map(pos_coords).collect()),
            );
        }
        Geometry::LineString(ps) => {
            obj.insert("type".to_string(), Value::String("LineString".to_string()));
            obj.insert(
                "coordinates".to_string(),
                Value::Array(ps.iter().map(pos_coords).collect()),
            );
        }
        Geometry::MultiLineString(lines) => {
            obj.insert(
                "type".to_string(),
                Value::String("MultiLineString".to_string()),
            );
            let coords = lines
                .iter()
                .map(|line| Value::Array(line.iter().map(pos_coords).collect()))
                .collect();
            obj.insert("coordinates".to_string(), Value::Array(coords));
        }
        Geometry::Polygon(rings) => {
            obj.insert("type".to_string(), Value::String("Polygon".to_string()));
            let coords = rings
                .iter()
                .map(|ring| Value::Array(ring.iter().map(pos_coords).collect()))
                .collect();
            obj.insert("coordinates".to_string(), Value::Array(coords));
        }
        Geometry::MultiPolygon(polys) => {
            obj.insert("type".to_string(), Value::String("MultiPolygon".to_string()));
            let coords = polys
                .iter()
                .map(|poly| {
                    let rings = poly
                        .iter()
                        .map(|ring| Value::Array(ring.iter().map(pos_coords).collect()))
                        .collect();
                    Value::Array(rings)
                })
                .collect();
            obj.insert("coordinates".to_string(), Value::Array(coords));
        }
    }
    Value::Object(obj)
}

fn pos_coords(p: &GeoPos) -> Value {
    Value::Array(vec![
        Value::from(p.lon_deg),
        Value::from(p.lat_deg),
        Value::from(p.alt_m),
    ])
}

pub fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value.as_object().ok_or("geometry must be an object")?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type")?;
    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates")?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_pos(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_positions(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_positions(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_lines(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_lines(coords)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_pos(coords: &Value) -> Result<GeoPos, String> {
    let arr = coords.as_array().ok_or("position must be an array")?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number")?;
    let lat = arr[1].as_f64().ok_or("lat must be a number")?;
    let alt = match arr.get(2) {
        Some(v) => v.as_f64().ok_or("alt must be a number")?,
        None => 0.0,
    };
    Ok(GeoPos::new(lon, lat, alt))
}

fn parse_positions(coords: &Value) -> Result<Vec<GeoPos>, String> {
    let arr = coords.as_array().ok_or("coordinates must be an array")?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_pos(item)?);
    }
    Ok(out)
}

fn parse_lines(coords: &Value) -> Result<Vec<Vec<GeoPos>>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array of arrays")?;
    let mut out = Vec::with_capacity(arr.len());
    for line in arr {
        out.push(parse_positions(line)?);
    }
    Ok(out)
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<GeoPos>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons")?;
    let mut out = Vec::with_capacity(polys.len());
    for poly in polys {
        out.push(parse_lines(poly)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{
        entities_from_geojson_str, entities_from_geojson_value, entities_to_geojson_value,
        entity_from_feature, parse_geometry,
    };
    use crate::entity::{AnnotationEntity, Label};
    use crate::geometry::Geometry;
    use foundation::math::GeoPos;
    use serde_json::json;

    #[test]
    fn round_trips_entities() {
        let entity = AnnotationEntity::new(
            "a1",
            Geometry::LineString(vec![
                GeoPos::new(10.0, 20.0, 0.0),
                GeoPos::new(11.0, 21.0, 5.0),
            ]),
        )
        .with_label(Label::new("route"));

        let value = entities_to_geojson_value(std::slice::from_ref(&entity));
        let parsed = entities_from_geojson_value(&value).expect("parse back");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0], entity);
    }

    #[test]
    fn rejects_non_feature_collection() {
        assert!(entities_from_geojson_str("{\"type\": \"Feature\"}").is_err());
        assert!(entities_from_geojson_str("null").is_err());
    }

    #[test]
    fn feature_without_id_is_invalid() {
        let feat = json!({
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}
        });
        let err = entity_from_feature(&feat).expect_err("missing id");
        assert!(err.contains("id"));
    }

    #[test]
    fn unsupported_geometry_names_the_type() {
        let geom = json!({"type": "GeometryCollection", "coordinates": []});
        let err = parse_geometry(&geom).expect_err("unsupported");
        assert!(err.contains("GeometryCollection"));
    }

    #[test]
    fn altitude_defaults_to_zero() {
        let geom = json!({"type": "Point", "coordinates": [5.0, 6.0]});
        let parsed = parse_geometry(&geom).expect("parse");
        assert_eq!(parsed, Geometry::Point(GeoPos::new(5.0, 6.0, 0.0)));
    }
}

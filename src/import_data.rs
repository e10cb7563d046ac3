use crate::track_processor::RawPoint;
use anyhow::Result;
use gpx::read;
use kml::{types::Geometry, Kml, KmlReader};
use serde_json::Value;
use std::{fs::File, io::BufReader, path::Path};

/// Accepted attribute names on JSON point records, tried in order. Route
/// files come from a handful of export tools that do not agree on the
/// longitude key.
const LONGITUDE_KEYS: &[&str] = &["lng", "lon", "long"];
const LATITUDE_KEYS: &[&str] = &["lat", "latitude"];

pub fn load_gpx(file_path: &Path) -> Result<Vec<RawPoint>> {
    let gpx_data = read(BufReader::new(File::open(file_path)?))?;
    let raw_points = gpx_data
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter())
        .map(|waypoint| RawPoint {
            latitude: waypoint.point().y(),
            longitude: waypoint.point().x(),
        })
        .collect();
    Ok(raw_points)
}

pub fn load_kml(file_path: &Path) -> Result<Vec<RawPoint>> {
    let kml_data = KmlReader::<_, f64>::from_reader(BufReader::new(File::open(file_path)?)).read()?;
    let mut raw_points = Vec::new();
    for kml in flatten_kml(vec![kml_data]) {
        let placemark = match kml {
            Kml::Placemark(placemark) => placemark,
            _ => continue,
        };
        if let Some(geometry) = &placemark.geometry {
            collect_kml_geometry(geometry, &mut raw_points);
        }
        // gx:Track stores each fix as a "lng lat alt" string
        for track in placemark.children.iter().filter(|e| e.name == "Track") {
            for coord in track.children.iter().filter(|e| e.name == "coord") {
                if let Some(content) = &coord.content {
                    let mut splitted = content.split_whitespace();
                    let longitude = splitted.next().and_then(|x| x.parse().ok());
                    let latitude = splitted.next().and_then(|x| x.parse().ok());
                    if let (Some(longitude), Some(latitude)) = (longitude, latitude) {
                        raw_points.push(RawPoint {
                            latitude,
                            longitude,
                        });
                    }
                }
            }
        }
    }
    Ok(raw_points)
}

fn collect_kml_geometry(geometry: &Geometry, raw_points: &mut Vec<RawPoint>) {
    match geometry {
        Geometry::LineString(line_string) => {
            raw_points.extend(line_string.coords.iter().map(|coord| RawPoint {
                latitude: coord.y,
                longitude: coord.x,
            }));
        }
        Geometry::MultiGeometry(multi_geometry) => {
            for geometry in &multi_geometry.geometries {
                collect_kml_geometry(geometry, raw_points);
            }
        }
        _ => {}
    }
}

fn flatten_kml(kml: Vec<Kml>) -> Vec<Kml> {
    kml.into_iter()
        .flat_map(|k| match k {
            Kml::KmlDocument(d) => flatten_kml(d.elements),
            Kml::Document { attrs: _, elements } => flatten_kml(elements),
            Kml::Folder { attrs: _, elements } => flatten_kml(elements),
            k => vec![k],
        })
        .collect()
}

/// Accepts either the site's native format (a bare array of point objects)
/// or GeoJSON with LineString geometry.
pub fn load_json(file_path: &Path) -> Result<Vec<RawPoint>> {
    let value: Value = serde_json::from_reader(BufReader::new(File::open(file_path)?))?;
    match &value {
        Value::Array(entries) => Ok(entries.iter().map(raw_point_of_record).collect()),
        Value::Object(_) => {
            let mut raw_points = Vec::new();
            collect_geojson(&value, &mut raw_points);
            if raw_points.is_empty() {
                bail!("no LineString coordinates in {}", file_path.display());
            }
            Ok(raw_points)
        }
        _ => bail!("unsupported JSON route format in {}", file_path.display()),
    }
}

fn number_of(record: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| record.get(key).and_then(Value::as_f64))
}

/// Missing or non-numeric attributes degrade to NaN, the processing pipeline
/// filters those out instead of failing the whole file.
fn raw_point_of_record(record: &Value) -> RawPoint {
    RawPoint {
        latitude: number_of(record, LATITUDE_KEYS).unwrap_or(f64::NAN),
        longitude: number_of(record, LONGITUDE_KEYS).unwrap_or(f64::NAN),
    }
}

fn collect_geojson(value: &Value, raw_points: &mut Vec<RawPoint>) {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            if let Some(features) = value.get("features").and_then(Value::as_array) {
                for feature in features {
                    collect_geojson(feature, raw_points);
                }
            }
        }
        Some("Feature") => {
            if let Some(geometry) = value.get("geometry") {
                collect_geojson(geometry, raw_points);
            }
        }
        Some("LineString") => {
            if let Some(coordinates) = value.get("coordinates").and_then(Value::as_array) {
                // GeoJSON positions are [lng, lat]
                raw_points.extend(coordinates.iter().map(|position| RawPoint {
                    latitude: position.get(1).and_then(Value::as_f64).unwrap_or(f64::NAN),
                    longitude: position.get(0).and_then(Value::as_f64).unwrap_or(f64::NAN),
                }));
            }
        }
        _ => {}
    }
}

pub fn load_route(file_path: &Path) -> Result<Vec<RawPoint>> {
    let extension = file_path
        .extension()
        .and_then(|x| x.to_str())
        .map(|x| x.to_ascii_lowercase());
    match extension.as_deref() {
        Some("gpx") => load_gpx(file_path),
        Some("kml") => load_kml(file_path),
        Some("json") | Some("geojson") => load_json(file_path),
        _ => bail!("unsupported route file type: {}", file_path.display()),
    }
}

/// The degraded-state boundary: any IO or parse failure becomes "no route
/// available" for the caller, never a crash.
pub fn load_route_or_empty(file_path: &Path) -> Vec<RawPoint> {
    match load_route(file_path) {
        Ok(raw_points) => {
            info!(
                "loaded {} raw points from {}",
                raw_points.len(),
                file_path.display()
            );
            raw_points
        }
        Err(e) => {
            warn!("failed to load route file {}: {}", file_path.display(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn longitude_key_fallback_order() {
        let record = json!({"lat": 1.0, "long": 3.0, "lon": 2.0, "lng": 4.0});
        let raw = raw_point_of_record(&record);
        assert_eq!(raw.longitude, 4.0);

        let record = json!({"lat": 1.0, "long": 3.0, "lon": 2.0});
        assert_eq!(raw_point_of_record(&record).longitude, 2.0);

        let record = json!({"lat": 1.0, "long": 3.0});
        assert_eq!(raw_point_of_record(&record).longitude, 3.0);
    }

    #[test]
    fn malformed_record_becomes_nan() {
        let record = json!({"lat": "not a number", "lng": 4.0});
        let raw = raw_point_of_record(&record);
        assert!(raw.latitude.is_nan());
        assert_eq!(raw.longitude, 4.0);
    }
}

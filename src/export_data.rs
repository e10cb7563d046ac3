use crate::course::Course;
use crate::track::Track;
use anyhow::Result;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track as GpxTrack, TrackSegment, Waypoint};
use serde_json::{json, Value};
use std::io::Write;

pub fn track_to_gpx(track: &Track) -> Gpx {
    let mut points = Vec::new();
    track.points.iter().for_each(|point| {
        points.push(Waypoint::new(Point::new(point.longitude, point.latitude)));
    });
    let gpx_track = GpxTrack {
        name: Some("Course".to_string()),
        segments: vec![TrackSegment { points }],
        ..Default::default()
    };
    Gpx {
        version: GpxVersion::Gpx11,
        tracks: vec![gpx_track],
        ..Default::default()
    }
}

pub fn write_gpx_file<W: Write>(track: &Track, writer: W) -> Result<()> {
    gpx::write(&track_to_gpx(track), writer)?;
    Ok(())
}

/// What the course page actually draws: one LineString feature for the
/// route, one Point feature per landmark.
pub fn course_to_geojson(course: &Course) -> Value {
    let coordinates: Vec<Value> = course
        .track
        .points
        .iter()
        .map(|point| json!([point.longitude, point.latitude]))
        .collect();
    let mut features = vec![json!({
        "type": "Feature",
        "properties": { "kind": "route", "course": course.kind.to_string() },
        "geometry": { "type": "LineString", "coordinates": coordinates },
    })];
    for landmark in &course.landmarks {
        features.push(json!({
            "type": "Feature",
            "properties": { "name": landmark.name, "kind": landmark.kind.to_string() },
            "geometry": {
                "type": "Point",
                "coordinates": [landmark.point.longitude, landmark.point.latitude],
            },
        }));
    }
    json!({ "type": "FeatureCollection", "features": features })
}

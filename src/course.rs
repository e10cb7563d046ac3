use crate::import_data;
use crate::track::{Landmark, LandmarkKind, RouteKind, Track, TrackPoint};
use crate::track_processor::{self, ProcessOptions, RawPoint};
use std::path::{Path, PathBuf};

/// The event advertises a water station every 5km along the course.
pub const WATER_STATION_INTERVAL_M: f64 = 5000.0;

/// Route file formats tried in order when resolving a course under the
/// route directory.
const ROUTE_EXTENSIONS: &[&str] = &["gpx", "kml", "geojson", "json"];

/// A cleaned course ready for the map: the track polyline plus the markers
/// placed along it.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Course {
    pub kind: RouteKind,
    pub track: Track,
    pub landmarks: Vec<Landmark>,
}

impl Course {
    pub fn from_raw(kind: RouteKind, raw_points: &[RawPoint], options: &ProcessOptions) -> Course {
        let track = track_processor::process(raw_points, options);
        let landmarks = place_landmarks(&track);
        Course {
            kind,
            track,
            landmarks,
        }
    }

    /// Resolves `<kind>_course.<ext>` under `route_dir` and builds the
    /// course from it. A missing, unreadable, or empty route falls back to
    /// the built-in placeholder path so the page always has something to
    /// draw.
    pub fn load(route_dir: &Path, kind: RouteKind, options: &ProcessOptions) -> Course {
        let raw_points = match find_route_file(route_dir, kind) {
            Some(file_path) => import_data::load_route_or_empty(&file_path),
            None => {
                warn!(
                    "no route file for the {} course under {}",
                    kind,
                    route_dir.display()
                );
                Vec::new()
            }
        };
        let course = Course::from_raw(kind, &raw_points, options);
        if course.track.is_empty() {
            info!("falling back to the built-in {} course path", kind);
            Course::from_raw(kind, &default_path(kind), options)
        } else {
            course
        }
    }
}

fn find_route_file(route_dir: &Path, kind: RouteKind) -> Option<PathBuf> {
    ROUTE_EXTENSIONS
        .iter()
        .map(|extension| route_dir.join(format!("{kind}_course.{extension}")))
        .find(|file_path| file_path.is_file())
}

/// Placeholder coordinates around the start area, used until the final
/// course measurement replaces them.
fn default_path(kind: RouteKind) -> Vec<RawPoint> {
    let full = [
        (37.5665, 126.9780),
        (37.5700, 126.9800),
        (37.5750, 126.9850),
    ];
    let half = [(37.5665, 126.9780), (37.5700, 126.9800)];
    let path: &[(f64, f64)] = match kind {
        RouteKind::Full => &full,
        RouteKind::Half => &half,
    };
    path.iter()
        .map(|(latitude, longitude)| RawPoint {
            latitude: *latitude,
            longitude: *longitude,
        })
        .collect()
}

/// Start and finish at the endpoints, the halfway marker at the first point
/// past half of the total length, and a water station at every 5km mark.
pub fn place_landmarks(track: &Track) -> Vec<Landmark> {
    let (first, last) = match (track.points.first(), track.points.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Vec::new(),
    };

    let mut landmarks = vec![Landmark {
        name: "Start".to_string(),
        kind: LandmarkKind::Start,
        point: first,
    }];

    let cumulative = track.cumulative_distances_m();
    if let Some(halfway) = halfway_point(track, &cumulative) {
        landmarks.push(Landmark {
            name: "Halfway".to_string(),
            kind: LandmarkKind::Halfway,
            point: halfway,
        });
    }

    let mut station_no = 1;
    let mut next_at = WATER_STATION_INTERVAL_M;
    for (point, distance) in track.points.iter().zip(cumulative.iter()) {
        if *distance >= next_at {
            landmarks.push(Landmark {
                name: format!("Water station {station_no}"),
                kind: LandmarkKind::WaterStation,
                point: *point,
            });
            station_no += 1;
            next_at += WATER_STATION_INTERVAL_M;
        }
    }

    landmarks.push(Landmark {
        name: "Finish".to_string(),
        kind: LandmarkKind::Finish,
        point: last,
    });
    landmarks
}

fn halfway_point(track: &Track, cumulative: &[f64]) -> Option<TrackPoint> {
    let total = *cumulative.last()?;
    let target = total / 2.;
    track
        .points
        .iter()
        .zip(cumulative.iter())
        .find(|(_, distance)| **distance >= target)
        .map(|(point, _)| *point)
}

/// Attaches an off-track point of interest (a medical tent, an official
/// water table) to the closest point of the cleaned track. `None` only when
/// the track is empty.
pub fn snap_to_track(
    track: &Track,
    name: &str,
    kind: LandmarkKind,
    target: &TrackPoint,
) -> Option<Landmark> {
    track_processor::nearest(track, target).map(|point| Landmark {
        name: name.to_string(),
        kind,
        point,
    })
}

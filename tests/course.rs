use assert_float_eq::assert_float_absolute_eq;
use coursemap_core::course::{self, Course};
use coursemap_core::track::{LandmarkKind, RouteKind, Track, TrackPoint};
use coursemap_core::track_processor::{ProcessOptions, RawPoint};
use coursemap_core::{export_data, import_data};
use std::fs::{self, File};
use tempdir::TempDir;

fn landmark_kinds(course: &Course) -> Vec<LandmarkKind> {
    course.landmarks.iter().map(|l| l.kind).collect()
}

#[test]
fn falls_back_to_builtin_path() {
    let temp_dir = TempDir::new("course-fallback").unwrap();
    let course = Course::load(temp_dir.path(), RouteKind::Full, &ProcessOptions::default());

    assert_eq!(course.kind, RouteKind::Full);
    assert_eq!(course.track.len(), 3);
    assert_eq!(
        course.track.points[0],
        TrackPoint {
            latitude: 37.5665,
            longitude: 126.978,
        }
    );
    // too short for any water station
    assert_eq!(
        landmark_kinds(&course),
        vec![
            LandmarkKind::Start,
            LandmarkKind::Halfway,
            LandmarkKind::Finish,
        ]
    );

    let half = Course::load(temp_dir.path(), RouteKind::Half, &ProcessOptions::default());
    assert_eq!(half.track.len(), 2);
}

#[test]
fn loads_route_file_from_directory() {
    let temp_dir = TempDir::new("course-load").unwrap();
    fs::copy(
        "./tests/data/full_course.gpx",
        temp_dir.path().join("full_course.gpx"),
    )
    .unwrap();

    let course = Course::load(temp_dir.path(), RouteKind::Full, &ProcessOptions::default());
    assert_eq!(course.track.len(), 6);
    assert_eq!(course.track.points[0].latitude, 37.5665);
    assert_eq!(course.track.points[5].longitude, 126.985);
}

#[test]
fn unreadable_route_file_falls_back() {
    let temp_dir = TempDir::new("course-broken").unwrap();
    fs::copy(
        "./tests/data/broken.gpx",
        temp_dir.path().join("half_course.gpx"),
    )
    .unwrap();

    let course = Course::load(temp_dir.path(), RouteKind::Half, &ProcessOptions::default());
    // the builtin placeholder, not a crash
    assert_eq!(course.track.len(), 2);
    assert_eq!(course.track.points[0].latitude, 37.5665);
}

#[test]
fn start_and_finish_sit_on_the_endpoints() {
    let raw_points: Vec<RawPoint> = (0..=19)
        .map(|i| RawPoint {
            latitude: 0.,
            longitude: 0.01 * i as f64,
        })
        .collect();
    let course = Course::from_raw(RouteKind::Full, &raw_points, &ProcessOptions::default());

    let start = &course.landmarks[0];
    let finish = course.landmarks.last().unwrap();
    assert_eq!(start.kind, LandmarkKind::Start);
    assert_eq!(start.point, course.track.points[0]);
    assert_eq!(finish.kind, LandmarkKind::Finish);
    assert_eq!(finish.point, course.track.points[course.track.len() - 1]);
}

#[test]
fn water_stations_every_five_km() {
    // ~1.11km per step, ~21.1km in total
    let raw_points: Vec<RawPoint> = (0..=19)
        .map(|i| RawPoint {
            latitude: 0.,
            longitude: 0.01 * i as f64,
        })
        .collect();
    let course = Course::from_raw(RouteKind::Full, &raw_points, &ProcessOptions::default());

    let stations: Vec<&coursemap_core::track::Landmark> = course
        .landmarks
        .iter()
        .filter(|l| l.kind == LandmarkKind::WaterStation)
        .collect();
    assert_eq!(stations.len(), 4);
    assert_eq!(stations[0].name, "Water station 1");
    // the first point past the 5km mark
    assert_float_absolute_eq!(stations[0].point.longitude, 0.05, 1e-9);

    let halfway = course
        .landmarks
        .iter()
        .find(|l| l.kind == LandmarkKind::Halfway)
        .unwrap();
    assert_float_absolute_eq!(halfway.point.longitude, 0.1, 1e-9);
}

#[test]
fn empty_course_has_no_landmarks() {
    let course = Course::from_raw(RouteKind::Full, &[], &ProcessOptions::default());
    assert!(course.track.is_empty());
    assert!(course.landmarks.is_empty());
}

#[test]
fn snap_to_track_picks_nearest_point() {
    let track = Track {
        points: vec![
            TrackPoint {
                latitude: 0.,
                longitude: 0.,
            },
            TrackPoint {
                latitude: 0.,
                longitude: 1.,
            },
            TrackPoint {
                latitude: 0.,
                longitude: 2.,
            },
        ],
    };
    let tent = TrackPoint {
        latitude: 0.,
        longitude: 1.4,
    };
    let landmark = course::snap_to_track(&track, "Medical tent", LandmarkKind::Medical, &tent)
        .unwrap();
    assert_eq!(landmark.kind, LandmarkKind::Medical);
    assert_eq!(
        landmark.point,
        TrackPoint {
            latitude: 0.,
            longitude: 1.,
        }
    );

    assert!(course::snap_to_track(&Track::default(), "x", LandmarkKind::Medical, &tent).is_none());
}

#[test]
fn geojson_export_shape() {
    let temp_dir = TempDir::new("course-geojson").unwrap();
    let course = Course::load(temp_dir.path(), RouteKind::Full, &ProcessOptions::default());
    let geojson = export_data::course_to_geojson(&course);

    assert_eq!(geojson["type"], "FeatureCollection");
    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 1 + course.landmarks.len());

    let route = &features[0];
    assert_eq!(route["geometry"]["type"], "LineString");
    assert_eq!(route["properties"]["course"], "full");
    // GeoJSON positions are [lng, lat]
    assert_eq!(
        route["geometry"]["coordinates"][0],
        serde_json::json!([126.978, 37.5665])
    );

    let start = &features[1];
    assert_eq!(start["geometry"]["type"], "Point");
    assert_eq!(start["properties"]["kind"], "start");
    assert_eq!(start["properties"]["name"], "Start");
}

#[test]
fn gpx_export_round_trips() {
    let temp_dir = TempDir::new("course-gpx").unwrap();
    let course = Course::load(temp_dir.path(), RouteKind::Full, &ProcessOptions::default());

    let file_path = temp_dir.path().join("cleaned_course.gpx");
    export_data::write_gpx_file(&course.track, File::create(&file_path).unwrap()).unwrap();

    let reloaded = import_data::load_gpx(&file_path).unwrap();
    assert_eq!(reloaded.len(), course.track.len());
    assert_float_absolute_eq!(reloaded[0].latitude, course.track.points[0].latitude, 1e-9);
    assert_float_absolute_eq!(
        reloaded[reloaded.len() - 1].longitude,
        course.track.points[course.track.len() - 1].longitude,
        1e-9
    );
}

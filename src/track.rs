use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

pub const EARTH_RADIUS: f64 = 6371000.0; // unit: meter

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl TrackPoint {
    /// Great-circle distance in meters. This is the only distance metric in
    /// this crate, all thresholds are expressed against it.
    pub fn haversine_distance(&self, other: &TrackPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lng = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lng / 2.).sin().powi(2);
        let c = 2. * a.sqrt().atan2((1. - a).sqrt());
        EARTH_RADIUS * c
    }
}

/// An ordered path. Insertion order is traversal order. A `Track` is built
/// fresh from raw data on every load and never mutated afterwards, when the
/// source changes the whole thing is replaced.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Track {
    pub points: Vec<TrackPoint>,
}

impl Track {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distance from the start to each point, in meters. Same length as
    /// `points` (empty for an empty track), first entry is always 0.
    pub fn cumulative_distances_m(&self) -> Vec<f64> {
        if self.points.is_empty() {
            return Vec::new();
        }
        let mut prefix_sums: Vec<f64> = self
            .points
            .windows(2)
            .scan(0., |state, pair| {
                *state += pair[0].haversine_distance(&pair[1]);
                Some(*state)
            })
            .collect();
        prefix_sums.insert(0, 0.);
        prefix_sums
    }

    pub fn total_distance_m(&self) -> f64 {
        self.cumulative_distances_m().last().copied().unwrap_or(0.)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Full,
    Half,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LandmarkKind {
    Start,
    Finish,
    Halfway,
    WaterStation,
    Medical,
}

/// A labeled point of interest. Landmarks are located relative to a track
/// (via nearest-point search or the distance walk in `course`), never fed
/// back into track processing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub kind: LandmarkKind,
    pub point: TrackPoint,
}

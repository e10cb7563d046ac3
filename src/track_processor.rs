use crate::track::{Track, TrackPoint};
use itertools::Itertools;

/// Coordinates as they come out of a route file, before any validation.
/// Latitude/longitude may be NaN when the source record was malformed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Roughly a centimeter at the equator. Near-duplicates below this delta are
/// GPS sampling noise, comparing coordinate deltas is much cheaper than a
/// real distance check and good enough at this scale.
pub const DEFAULT_DEDUP_TOLERANCE_DEG: f64 = 1e-7;

/// A single point further than this from both neighbors, while the neighbors
/// stay within it of each other, is treated as a positioning outlier.
pub const DEFAULT_SPIKE_THRESHOLD_M: f64 = 200.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProcessOptions {
    pub dedup_tolerance_deg: f64,
    pub spike_threshold_m: f64,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        ProcessOptions {
            dedup_tolerance_deg: DEFAULT_DEDUP_TOLERANCE_DEG,
            spike_threshold_m: DEFAULT_SPIKE_THRESHOLD_M,
        }
    }
}

/// Drops non-finite records, then collapses runs of near-identical points.
/// A point survives only if it differs from the previously *kept* point by
/// more than `tolerance_deg` in latitude or longitude. Order is preserved and
/// empty (or fully invalid) input degrades to an empty track, not an error.
pub fn deduplicate(raw_points: &[RawPoint], tolerance_deg: f64) -> Track {
    let points = raw_points
        .iter()
        .filter(|raw| raw.latitude.is_finite() && raw.longitude.is_finite())
        .map(|raw| TrackPoint {
            latitude: raw.latitude,
            longitude: raw.longitude,
        })
        .coalesce(|kept, next| {
            if (next.latitude - kept.latitude).abs() <= tolerance_deg
                && (next.longitude - kept.longitude).abs() <= tolerance_deg
            {
                Ok(kept)
            } else {
                Err((kept, next))
            }
        })
        .collect();
    Track { points }
}

/// Removes isolated positioning outliers: an interior point further than
/// `threshold_m` from both neighbors whose neighbors are within `threshold_m`
/// of each other. Classification always looks at the neighbors in the input
/// sequence, so dropping one point never changes the verdict for another.
/// The first and last points are kept unconditionally, the advertised start
/// and finish of a course must never vanish.
pub fn remove_spikes(track: &Track, threshold_m: f64) -> Track {
    let points = &track.points;
    if points.len() <= 2 {
        return track.clone();
    }

    let mut kept = Vec::with_capacity(points.len());
    kept.push(points[0]);
    for i in 1..points.len() - 1 {
        let d_prev = points[i - 1].haversine_distance(&points[i]);
        let d_next = points[i].haversine_distance(&points[i + 1]);
        let d_skip = points[i - 1].haversine_distance(&points[i + 1]);
        let is_spike = d_prev > threshold_m && d_next > threshold_m && d_skip < threshold_m;
        if !is_spike {
            kept.push(points[i]);
        }
    }
    kept.push(points[points.len() - 1]);
    Track { points: kept }
}

/// Linear scan for the point closest to `target`. Ties go to the earliest
/// point (strict `<`). Tracks here are a few hundred points, anything fancier
/// than O(n) is not worth it.
pub fn nearest(track: &Track, target: &TrackPoint) -> Option<TrackPoint> {
    let mut best: Option<(f64, TrackPoint)> = None;
    for point in &track.points {
        let distance = point.haversine_distance(target);
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, *point)),
        }
    }
    best.map(|(_, point)| point)
}

/// The full cleaning pipeline: finite filter -> deduplicate -> remove_spikes.
/// Deduplication must run first, near-duplicate points sitting next to a
/// spike would otherwise hide it from the distance checks.
pub fn process(raw_points: &[RawPoint], options: &ProcessOptions) -> Track {
    let deduped = deduplicate(raw_points, options.dedup_tolerance_deg);
    remove_spikes(&deduped, options.spike_threshold_m)
}

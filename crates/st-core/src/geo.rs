//! Geographic coordinate type and polyline utilities.
//!
//! `GeoPoint` stores `(longitude, latitude)` as `f64` — shipment paths are
//! downsampled to a few hundred points per shipment, so there is no reason
//! to trade precision for memory the way a dense agent simulation would.

/// A WGS-84 geographic coordinate, longitude first.
#[derive(Copy, Clone, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Accurate to well under a metre at city scale, which is far finer than
    /// anything the tracking engine needs (its thresholds are tens of
    /// metres to tens of kilometres).
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// `true` if the two points coincide within `epsilon_deg` on both axes.
    ///
    /// Used to splice out duplicate boundary points when concatenating route
    /// segments whose endpoints meet.
    #[inline]
    pub fn coincides(self, other: GeoPoint, epsilon_deg: f64) -> bool {
        (self.lon - other.lon).abs() <= epsilon_deg
            && (self.lat - other.lat).abs() <= epsilon_deg
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

// ── Polyline helpers ──────────────────────────────────────────────────────────

/// Evenly spaced straight-line polyline from `from` to `to`, inclusive.
///
/// Returns exactly `steps + 1` points whose first and last elements equal
/// the inputs.  This is the deterministic degradation used whenever the
/// external route provider fails, so downstream code never sees an empty
/// path.
pub fn straight_line(from: GeoPoint, to: GeoPoint, steps: usize) -> Vec<GeoPoint> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            GeoPoint {
                lon: from.lon + (to.lon - from.lon) * t,
                lat: from.lat + (to.lat - from.lat) * t,
            }
        })
        .collect()
}

/// Index of the path point nearest to `point` (linear scan).
///
/// The engine resumes ticking from this index rather than a stored one: a
/// resumed shipment's path may have been replaced wholesale by dispatch, so
/// a persisted index cannot be trusted.  Returns 0 for an empty path.
pub fn nearest_index(path: &[GeoPoint], point: GeoPoint) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (i, p) in path.iter().enumerate() {
        let d = p.distance_m(point);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Downsample `path` to at most `max_points`, always keeping the first and
/// last points; interior points are kept every Nth.
///
/// Bounds both storage per shipment and the per-tick position work.
pub fn downsample(path: &[GeoPoint], max_points: usize) -> Vec<GeoPoint> {
    let max_points = max_points.max(2);
    if path.len() <= max_points {
        return path.to_vec();
    }

    let stride = path.len().div_ceil(max_points - 1);
    let mut out: Vec<GeoPoint> = path.iter().copied().step_by(stride).collect();
    let last = path[path.len() - 1];
    match out.last() {
        Some(&p) if p == last => {}
        _ => out.push(last),
    }
    out
}

/// Append `segment` to `path`, dropping the segment's first point when it
/// coincides with the path's last point.
pub fn splice_append(path: &mut Vec<GeoPoint>, segment: Vec<GeoPoint>, epsilon_deg: f64) {
    let skip = match (path.last(), segment.first()) {
        (Some(&tail), Some(&head)) => usize::from(tail.coincides(head, epsilon_deg)),
        _ => 0,
    };
    path.extend(segment.into_iter().skip(skip));
}

/// Arithmetic mean of a point set.  Returns `None` for an empty slice.
pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lon, lat) = points
        .iter()
        .fold((0.0, 0.0), |(lon, lat), p| (lon + p.lon, lat + p.lat));
    Some(GeoPoint { lon: lon / n, lat: lat / n })
}

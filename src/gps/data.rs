// src/gps/data.rs
//! Track data structures and utilities

use crate::error::{GpsError, Result};
use chrono::{Duration, NaiveTime};
use serde::Serialize;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A single position of a recorded track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPoint {
    time: String,
    #[serde(rename = "lat")]
    latitude: f64,
    #[serde(rename = "lon")]
    longitude: f64,
}

impl TrackPoint {
    /// Create a point from decimal degrees.
    ///
    /// Returns `None` for coordinates outside the valid range and for the
    /// `(0, 0)` origin, which receivers report for positions they could not
    /// resolve. A real fix exactly on the equator and prime meridian is lost
    /// by this rule.
    pub fn new(time: impl Into<String>, latitude: f64, longitude: f64) -> Option<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        if latitude == 0.0 && longitude == 0.0 {
            return None;
        }
        Some(Self {
            time: time.into(),
            latitude,
            longitude,
        })
    }

    /// Raw timestamp token as recorded (`HHMMSS[.sss]`)
    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Time of day of the fix, if the timestamp token is well formed
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.time, "%H%M%S%.f").ok()
    }

    /// Great-circle distance to another point in meters
    pub fn distance_to(&self, other: &TrackPoint) -> f64 {
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();
        let a = (dlat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

/// Smallest latitude/longitude rectangle covering a set of points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn from_point(point: &TrackPoint) -> Self {
        Self {
            min_lat: point.latitude,
            max_lat: point.latitude,
            min_lon: point.longitude,
            max_lon: point.longitude,
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a TrackPoint>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bounds = Self::from_point(points.next()?);
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Grow the rectangle to include `point`
    pub fn extend(&mut self, point: &TrackPoint) {
        self.min_lat = self.min_lat.min(point.latitude);
        self.max_lat = self.max_lat.max(point.latitude);
        self.min_lon = self.min_lon.min(point.longitude);
        self.max_lon = self.max_lon.max(point.longitude);
    }

    /// Midpoint as `(latitude, longitude)`
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lon
            && longitude <= self.max_lon
    }
}

/// Counters collected while scanning a log. Diagnostic only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Non-empty lines seen
    pub lines: usize,
    /// Lines starting with a registered sentence prefix
    pub sentences: usize,
    /// Recognized sentences with missing or unparsable fields
    pub malformed: usize,
    /// Parsed positions dropped by the point validity rule
    pub degenerate: usize,
    pub accepted: usize,
}

/// Ordered track points plus their bounding box
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackResult {
    points: Vec<TrackPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<Bounds>,
}

impl TrackResult {
    pub(crate) fn new(points: Vec<TrackPoint>, bounds: Option<Bounds>) -> Self {
        Self { points, bounds }
    }

    /// Build a result from already validated points, computing the bounds
    pub fn from_points(points: Vec<TrackPoint>) -> Self {
        let bounds = Bounds::from_points(&points);
        Self { points, bounds }
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    /// Bounding box of all points, `None` for an empty track
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fail with `GpsError::EmptyInput` when the track has no point
    pub fn require_points(&self) -> Result<&Self> {
        if self.points.is_empty() {
            Err(GpsError::EmptyInput)
        } else {
            Ok(self)
        }
    }

    pub fn summary(&self) -> TrackSummary {
        let distance_m: f64 = self
            .points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum();

        let duration = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => elapsed(first, last),
            _ => None,
        };

        TrackSummary {
            points: self.points.len(),
            distance_m,
            duration,
        }
    }
}

/// Elapsed time between two fixes. Logs only carry the time of day, so a
/// negative difference is taken as a midnight rollover.
fn elapsed(first: &TrackPoint, last: &TrackPoint) -> Option<Duration> {
    let start = first.time_of_day()?;
    let end = last.time_of_day()?;
    let delta = end.signed_duration_since(start);
    if delta < Duration::zero() {
        Some(delta + Duration::hours(24))
    } else {
        Some(delta)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackSummary {
    pub points: usize,
    pub distance_m: f64,
    pub duration: Option<Duration>,
}

impl TrackSummary {
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    /// Average speed in km/h
    pub fn average_speed(&self) -> Option<f64> {
        let seconds = self.duration?.num_milliseconds() as f64 / 1000.0;
        if seconds > 0.0 {
            Some(self.distance_km() / (seconds / 3600.0))
        } else {
            None
        }
    }

    pub fn format_duration(&self) -> String {
        let Some(duration) = self.duration else {
            return "Unknown".to_string();
        };
        let total_seconds = duration.num_seconds();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

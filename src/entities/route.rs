use geo_types::{LineString, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

/// Route geometry in Google's encoded polyline format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline(pub String);

impl Polyline {
    /// Precision Google encodes route geometry with.
    const PRECISION: u32 = 5;

    pub fn decode(&self) -> Result<LineString<f64>, Error> {
        polyline::decode_polyline(&self.0, Self::PRECISION).map_err(|err| {
            tracing::warn!("malformed polyline: {:?}", err);
            invalid_input_error()
        })
    }

    pub fn bounding_rect(&self) -> Result<Option<Rect<f64>>, Error> {
        let line = self.decode()?;
        let mut points = line.points();

        let first = match points.next() {
            Some(point) => point,
            None => return Ok(None),
        };

        let (min, max) = points.fold((first, first), |(min, max), point| {
            (
                (min.x().min(point.x()), min.y().min(point.y())).into(),
                (max.x().max(point.x()), max.y().max(point.y())).into(),
            )
        });

        Ok(Some(Rect::new(min.0, max.0)))
    }
}

/// Formats to exactly one fractional digit, rounding halves up.
pub fn tenths(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub distance_km: String,
    pub eta_minutes: String,
    pub distance_meters: f64,
    pub eta_seconds: f64,
    pub polyline: Polyline,
}

impl RouteInfo {
    pub fn new(distance_meters: f64, eta_seconds: f64, polyline: Polyline) -> Self {
        Self {
            distance_km: tenths(distance_meters / 1000.0),
            eta_minutes: tenths(eta_seconds / 60.0),
            distance_meters,
            eta_seconds,
            polyline,
        }
    }
}

/// Raw answer of a directions lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Directions {
    pub polyline: Polyline,
    pub distance_meters: f64,
    pub eta_seconds: f64,
}

impl From<Directions> for RouteInfo {
    fn from(directions: Directions) -> Self {
        RouteInfo::new(
            directions.distance_meters,
            directions.eta_seconds,
            directions.polyline,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_distance_and_time_to_one_digit() {
        let route = RouteInfo::new(3_000.0, 600.0, Polyline("".into()));
        assert_eq!(route.distance_km, "3.0");
        assert_eq!(route.eta_minutes, "10.0");

        let route = RouteInfo::new(12_345.0, 754.0, Polyline("".into()));
        assert_eq!(route.distance_km, "12.3");
        assert_eq!(route.eta_minutes, "12.6");
    }

    #[test]
    fn rounds_halves_up() {
        assert_eq!(tenths(1.25), "1.3");
        assert_eq!(tenths(0.05), "0.1");
        assert_eq!(tenths(2.449), "2.4");
        assert_eq!(tenths(0.0), "0.0");
    }

    #[test]
    fn decodes_reference_polyline() {
        let polyline = Polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@".into());
        let line = polyline.decode().unwrap();
        let points: Vec<(f64, f64)> = line.points().map(|p| (p.y(), p.x())).collect();

        assert_eq!(points.len(), 3);
        assert!((points[0].0 - 38.5).abs() < 1e-9 && (points[0].1 + 120.2).abs() < 1e-9);
        assert!((points[1].0 - 40.7).abs() < 1e-9 && (points[1].1 + 120.95).abs() < 1e-9);
        assert!((points[2].0 - 43.252).abs() < 1e-9 && (points[2].1 + 126.453).abs() < 1e-9);

        let rect = polyline.bounding_rect().unwrap().unwrap();
        assert!((rect.min().y - 38.5).abs() < 1e-9);
        assert!((rect.max().x + 120.2).abs() < 1e-9);
    }

    #[test]
    fn rejects_malformed_polyline() {
        assert!(Polyline("_p~iF ~ps|U".into()).decode().is_err());
        assert_eq!(Polyline("".into()).bounding_rect().unwrap(), None);
    }
}

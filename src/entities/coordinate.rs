use geo_types::{coord, Point, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

const METERS_PER_DEGREE: f64 = 111_320.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn validate(self) -> Result<Self, Error> {
        match self.is_valid() {
            true => Ok(self),
            false => Err(invalid_input_error()),
        }
    }

    /// Parses the `lat,lng` form used by the Google web services and by config.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let (latitude, longitude) = input.split_once(',').ok_or_else(invalid_input_error)?;

        let latitude: f64 = latitude.trim().parse().map_err(|_| invalid_input_error())?;
        let longitude: f64 = longitude.trim().parse().map_err(|_| invalid_input_error())?;

        Coordinate::new(latitude, longitude).validate()
    }
}

impl From<Coordinate> for String {
    fn from(coordinate: Coordinate) -> Self {
        format!("{},{}", coordinate.latitude, coordinate.longitude)
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        Point::new(coordinate.longitude, coordinate.latitude)
    }
}

impl From<Coordinate> for geo_types::Geometry<f64> {
    fn from(coordinate: Coordinate) -> Self {
        geo_types::Geometry::Point(coordinate.into())
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(point: Point<f64>) -> Self {
        Coordinate::new(point.y(), point.x())
    }
}

/// Visible map area, expressed the way the map view sizes itself.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Coordinate,
    pub latitudinal_meters: f64,
    pub longitudinal_meters: f64,
}

impl Region {
    pub fn around(center: Coordinate, meters: f64) -> Self {
        Self {
            center,
            latitudinal_meters: meters,
            longitudinal_meters: meters,
        }
    }

    pub fn from_rect(rect: Rect<f64>) -> Self {
        let center: Coordinate = Point::from(rect.center()).into();
        let latitudinal_meters = rect.height() * METERS_PER_DEGREE;
        let longitudinal_meters =
            rect.width() * METERS_PER_DEGREE * center.latitude.to_radians().cos();

        Self {
            center,
            latitudinal_meters,
            longitudinal_meters,
        }
    }

    pub fn rect(&self) -> Rect<f64> {
        let half_lat = self.latitudinal_meters / METERS_PER_DEGREE / 2.0;
        let half_lng = self.longitudinal_meters
            / (METERS_PER_DEGREE * self.center.latitude.to_radians().cos())
            / 2.0;

        Rect::new(
            coord! { x: self.center.longitude - half_lng, y: self.center.latitude - half_lat },
            coord! { x: self.center.longitude + half_lng, y: self.center.latitude + half_lat },
        )
    }

    /// Radius of the circle a place search is biased towards.
    pub fn search_radius(&self) -> f64 {
        self.latitudinal_meters.max(self.longitudinal_meters) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lat_lng_pairs() {
        let coordinate = Coordinate::parse("33.8938, 35.5018").unwrap();
        assert_eq!(coordinate, Coordinate::new(33.8938, 35.5018));

        assert!(Coordinate::parse("33.8938").is_err());
        assert!(Coordinate::parse("north,35.5").is_err());
        assert!(Coordinate::parse("95.0,35.5").is_err());
    }

    #[test]
    fn points_are_longitude_first() {
        let point: Point<f64> = Coordinate::new(10.0, 20.0).into();
        assert_eq!(point.x(), 20.0);
        assert_eq!(point.y(), 10.0);

        let back: Coordinate = point.into();
        assert_eq!(back, Coordinate::new(10.0, 20.0));
    }

    #[test]
    fn region_round_trips_through_its_rect() {
        let region = Region::around(Coordinate::new(33.89, 35.50), 10_000.0);
        let rebuilt = Region::from_rect(region.rect());

        assert!((rebuilt.center.latitude - 33.89).abs() < 1e-9);
        assert!((rebuilt.center.longitude - 35.50).abs() < 1e-9);
        assert!((rebuilt.latitudinal_meters - 10_000.0).abs() < 1.0);
        assert!((rebuilt.longitudinal_meters - 10_000.0).abs() < 50.0);
        assert_eq!(region.search_radius(), 5_000.0);
    }
}

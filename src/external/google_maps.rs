use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    api::{DirectionsAPI, GeocodingAPI, PlaceSearchAPI},
    entities::{Coordinate, Directions, Place, Placemark, Polyline, Region},
    error::{lookup_failed_error, upstream_error, Error},
};

/// Client for the Google Maps web services backing directions, reverse
/// geocoding and place search.
#[derive(Clone, Debug)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coordinate {
    fn from(location: LatLng) -> Self {
        Coordinate::new(location.lat, location.lng)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaceResult {
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Value {
    pub value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Leg {
    pub distance: Value,
    pub duration: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteResult {
    pub legs: Vec<Leg>,
    pub overview_polyline: EncodedPolyline,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    results: Option<T>,
    routes: Option<T>,
}

impl GoogleMaps {
    pub fn new(api_base: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            api_key,
        }
    }

    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Response<T>, Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("https://{}/maps/api/{}/json", self.api_base, path);

        let res = self
            .client
            .get(url)
            .query(&[("key", &self.api_key)])
            .query(query)
            .send()
            .await?;

        if let Some(err) = status_error(path, res.status().as_u16()) {
            return Err(err);
        }

        Ok(res.json().await?)
    }
}

/// Every endpoint here is a lookup, so any non-200 answer is a failed lookup.
fn status_error(path: &str, status_code: u16) -> Option<Error> {
    match status_code {
        200 => None,
        400..=499 => {
            tracing::warn!(path, status_code, "maps request rejected");
            Some(lookup_failed_error(format!("{} lookup rejected", path)))
        }
        _ => {
            tracing::warn!(path, status_code, "maps service unavailable");
            Some(upstream_error())
        }
    }
}

#[async_trait]
impl DirectionsAPI for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<Directions, Error> {
        let data: Response<Vec<RouteResult>> = self
            .get(
                "directions",
                &[
                    ("origin", String::from(from)),
                    ("destination", String::from(to)),
                ],
            )
            .await?;

        match data.status.as_str() {
            "OK" => (),
            "ZERO_RESULTS" | "NOT_FOUND" => return Err(lookup_failed_error("no route found")),
            _ => return Err(upstream_error()),
        }

        let route = data
            .routes
            .and_then(|routes| routes.into_iter().next())
            .ok_or_else(upstream_error)?;

        let (distance_meters, eta_seconds) = route
            .legs
            .iter()
            .fold((0.0, 0.0), |(distance, duration), leg| {
                (distance + leg.distance.value, duration + leg.duration.value)
            });

        Ok(Directions {
            polyline: Polyline(route.overview_polyline.points),
            distance_meters,
            eta_seconds,
        })
    }
}

#[async_trait]
impl GeocodingAPI for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Placemark, Error> {
        let data: Response<Vec<GeocodeResult>> = self
            .get("geocode", &[("latlng", String::from(coordinate))])
            .await?;

        match data.status.as_str() {
            "OK" => {
                let name = data
                    .results
                    .and_then(|results| results.into_iter().next())
                    .map(|result| result.formatted_address)
                    .unwrap_or_default();

                Ok(Placemark { name })
            }
            "ZERO_RESULTS" => Ok(Placemark::default()),
            _ => Err(upstream_error()),
        }
    }
}

#[async_trait]
impl PlaceSearchAPI for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn search(&self, query: String, region: Option<Region>) -> Result<Vec<Place>, Error> {
        let mut params = vec![("query", query)];

        if let Some(region) = region {
            params.push(("location", String::from(region.center)));
            params.push(("radius", region.search_radius().round().to_string()));
        }

        let data: Response<Vec<PlaceResult>> = self.get("place/textsearch", &params).await?;

        match data.status.as_str() {
            "OK" | "ZERO_RESULTS" => (),
            _ => return Err(upstream_error()),
        }

        let places = data
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|result| Place {
                name: result.name.unwrap_or_default(),
                address: result.formatted_address.unwrap_or_default(),
                coordinate: result.geometry.location.into(),
            })
            .collect();

        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn failed_requests_surface_as_lookup_failures() {
        assert!(status_error("directions", 200).is_none());

        let rejected = status_error("place/textsearch", 403).unwrap();
        assert_eq!(rejected.kind(), ErrorKind::LookupFailed);
        assert_eq!(rejected.message, "place/textsearch lookup rejected");

        assert_eq!(
            status_error("directions", 400).unwrap().kind(),
            ErrorKind::LookupFailed
        );
        assert_eq!(
            status_error("geocode", 503).unwrap().kind(),
            ErrorKind::LookupFailed
        );
    }

    #[test]
    fn parses_directions_response() {
        let body = r#"{
            "status": "OK",
            "routes": [{
                "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC" },
                "legs": [
                    { "distance": { "value": 2500 }, "duration": { "value": 300 } },
                    { "distance": { "value": 500 }, "duration": { "value": 60 } }
                ]
            }]
        }"#;

        let data: Response<Vec<RouteResult>> = serde_json::from_str(body).unwrap();
        let route = data.routes.unwrap().remove(0);

        assert_eq!(route.legs.len(), 2);
        assert_eq!(route.overview_polyline.points, "_p~iF~ps|U_ulLnnqC");
    }

    #[test]
    fn parses_text_search_response() {
        let body = r#"{
            "status": "OK",
            "results": [{
                "name": "Harbour Cafe",
                "formatted_address": "1 Quay St",
                "geometry": { "location": { "lat": 33.9, "lng": 35.5 } }
            }]
        }"#;

        let data: Response<Vec<PlaceResult>> = serde_json::from_str(body).unwrap();
        let result = data.results.unwrap().remove(0);
        let coordinate: Coordinate = result.geometry.location.into();

        assert_eq!(result.name.as_deref(), Some("Harbour Cafe"));
        assert_eq!(coordinate, Coordinate::new(33.9, 35.5));
    }
}

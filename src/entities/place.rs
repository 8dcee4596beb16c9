use serde::{Deserialize, Serialize};

use crate::entities::Coordinate;

/// A place as returned by the search provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
}

/// A ranked search result. `id` is the ordinal within one response only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub id: usize,
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
}

impl PlaceCandidate {
    pub fn ranked(places: Vec<Place>) -> Vec<PlaceCandidate> {
        places
            .into_iter()
            .enumerate()
            .map(|(id, place)| PlaceCandidate {
                id,
                name: place.name,
                address: place.address,
                coordinate: place.coordinate,
            })
            .collect()
    }
}

/// Best-effort reverse geocoding answer. The name may be empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Placemark {
    pub name: String,
}

use serde::{Deserialize, Serialize};

use crate::entities::{Coordinate, Polyline, Region};

/// Span of the region shown around a location fix.
pub const FIX_REGION_METERS: f64 = 10_000.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub coordinate: Coordinate,
    pub title: String,
    pub subtitle: String,
}

/// Overlays, annotations and region of the single map view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapScene {
    pub region: Option<Region>,
    pub annotation: Option<Annotation>,
    pub overlay: Option<Polyline>,
}

impl MapScene {
    pub fn center_on(&mut self, coordinate: Coordinate) {
        self.region = Some(Region::around(coordinate, FIX_REGION_METERS));
    }

    pub fn mark_destination(&mut self, coordinate: Coordinate, title: String) {
        self.annotation = Some(Annotation {
            coordinate,
            title,
            subtitle: "Destination".into(),
        });
    }

    pub fn title_destination(&mut self, title: String) {
        if let Some(annotation) = self.annotation.as_mut() {
            annotation.title = title;
        }
    }

    /// Swaps the route overlay and fits the region to it.
    pub fn show_route(&mut self, polyline: Polyline) {
        match polyline.bounding_rect() {
            Ok(Some(rect)) => self.region = Some(Region::from_rect(rect)),
            Ok(None) => (),
            Err(err) => tracing::warn!("route geometry could not be decoded: {:?}", err),
        }

        self.overlay = Some(polyline);
    }

    pub fn clear(&mut self) {
        self.overlay = None;
        self.annotation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_replaces_the_overlay_and_fits_the_region() {
        let mut map = MapScene::default();
        map.center_on(Coordinate::new(0.0, 0.0));

        map.show_route(Polyline("??".into()));
        map.show_route(Polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@".into()));

        assert_eq!(
            map.overlay,
            Some(Polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@".into()))
        );

        let region = map.region.unwrap();
        assert!(region.center.latitude > 38.5 && region.center.latitude < 43.252);
    }

    #[test]
    fn destination_annotation_is_replaced_and_titled() {
        let mut map = MapScene::default();
        map.mark_destination(Coordinate::new(1.0, 1.0), "".into());
        map.mark_destination(Coordinate::new(2.0, 2.0), "".into());
        map.title_destination("Harbour".into());

        let annotation = map.annotation.clone().unwrap();
        assert_eq!(annotation.coordinate, Coordinate::new(2.0, 2.0));
        assert_eq!(annotation.title, "Harbour");
        assert_eq!(annotation.subtitle, "Destination");

        map.clear();
        assert!(map.annotation.is_none() && map.overlay.is_none());
    }
}

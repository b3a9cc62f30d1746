use serde::{Deserialize, Serialize};

/// A WGS84 position. Both components are always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite components.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        (lat.is_finite() && lon.is_finite()).then_some(Self { lat, lon })
    }
}

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern latitude boundary.
    pub south: f64,
    /// Western longitude boundary.
    pub west: f64,
    /// Northern latitude boundary.
    pub north: f64,
    /// Eastern longitude boundary.
    pub east: f64,
}

impl BoundingBox {
    /// Smallest box containing every point, `None` for an empty input.
    pub fn around<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<Self> {
        points.into_iter().fold(None, |acc: Option<Self>, p| {
            Some(match acc {
                None => Self {
                    south: p.lat,
                    west: p.lon,
                    north: p.lat,
                    east: p.lon,
                },
                Some(b) => Self {
                    south: b.south.min(p.lat),
                    west: b.west.min(p.lon),
                    north: b.north.max(p.lat),
                    east: b.east.max(p.lon),
                },
            })
        })
    }

    /// Grow the box on every side by `ratio` of its height/width.
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_pad = (self.north - self.south).abs() * ratio;
        let lon_pad = (self.east - self.west).abs() * ratio;
        Self {
            south: self.south - lat_pad,
            west: self.west - lon_pad,
            north: self.north + lat_pad,
            east: self.east + lon_pad,
        }
    }

    /// Zero-area box (every point in the same place).
    pub fn is_point(&self) -> bool {
        self.south == self.north && self.west == self.east
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn rejects_non_finite() {
        assert!(GeoPoint::new(f64::NAN, 1.0).is_none());
        assert!(GeoPoint::new(1.0, f64::INFINITY).is_none());
        assert!(GeoPoint::new(0.0, 0.0).is_some());
    }

    #[test]
    fn bounds_cover_all_points() {
        let points = [pt(19.07, 72.87), pt(12.97, 77.59), pt(28.61, 77.20)];
        let b = BoundingBox::around(&points).unwrap();
        assert_eq!(b.south, 12.97);
        assert_eq!(b.north, 28.61);
        assert_eq!(b.west, 72.87);
        assert_eq!(b.east, 77.59);
        assert!(points.iter().all(|p| b.contains(p)));
    }

    #[test]
    fn single_point_has_no_area() {
        let b = BoundingBox::around(&[pt(19.0, 72.0)]).unwrap();
        assert!(b.is_point());
        assert!(!BoundingBox::around(&[pt(19.0, 72.0), pt(19.5, 72.0)]).unwrap().is_point());
    }

    #[test]
    fn empty_input_has_no_bounds() {
        assert!(BoundingBox::around(&[] as &[GeoPoint]).is_none());
    }

    #[test]
    fn pad_grows_each_side_by_ratio() {
        let b = BoundingBox {
            south: 10.0,
            west: 70.0,
            north: 20.0,
            east: 80.0,
        }
        .pad(0.2);
        assert_eq!(b.south, 8.0);
        assert_eq!(b.north, 22.0);
        assert_eq!(b.west, 68.0);
        assert_eq!(b.east, 82.0);
    }
}

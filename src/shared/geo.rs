use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Smallest extent, in degrees, an axis of a bounding box is allowed to have
/// before padding.
pub const MIN_SPAN_DEGREES: f64 = 0.001;
pub const DEFAULT_PADDING: f64 = 0.02;

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Axis aligned extent in degrees, longitude on x and latitude on y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Raw extent of the given coordinates. Non finite coordinates are
    /// skipped; `None` when nothing is left.
    pub fn from_coordinates<'a, I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        coordinates
            .into_iter()
            .filter(|coordinate| coordinate.is_finite())
            .fold(None, |acc: Option<Self>, coordinate| {
                let (lat, lon) = (coordinate.latitude, coordinate.longitude);
                Some(match acc {
                    None => Self::new(lon, lat, lon, lat),
                    Some(bbox) => Self::new(
                        bbox.min_lon.min(lon),
                        bbox.min_lat.min(lat),
                        bbox.max_lon.max(lon),
                        bbox.max_lat.max(lat),
                    ),
                })
            })
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Widens any axis narrower than `span` to exactly `span`, keeping its
    /// midpoint.
    pub fn with_min_span(self, span: f64) -> Self {
        let (min_lon, max_lon) = widen(self.min_lon, self.max_lon, span);
        let (min_lat, max_lat) = widen(self.min_lat, self.max_lat, span);
        Self::new(min_lon, min_lat, max_lon, max_lat)
    }

    /// Grows each axis by `fraction` of its span on both sides. Negative or
    /// non finite fractions are treated as zero so the box never inverts.
    pub fn padded(self, fraction: f64) -> Self {
        let fraction = if fraction.is_finite() {
            fraction.max(0.0)
        } else {
            0.0
        };
        let pad_x = self.width() * fraction;
        let pad_y = self.height() * fraction;
        Self::new(
            self.min_lon - pad_x,
            self.min_lat - pad_y,
            self.max_lon + pad_x,
            self.max_lat + pad_y,
        )
    }

    /// `[[min_lat, min_lon], [max_lat, max_lon]]`, the corner order Leaflet
    /// expects for `L.latLngBounds`.
    pub fn leaflet_bounds(&self) -> [[f64; 2]; 2] {
        [[self.min_lat, self.min_lon], [self.max_lat, self.max_lon]]
    }
}

fn widen(min: f64, max: f64, span: f64) -> (f64, f64) {
    if max - min >= span {
        return (min, max);
    }
    let mid = (min + max) / 2.0;
    (mid - span / 2.0, mid + span / 2.0)
}

/// Padded extent of a geometry collection. Degenerate axes are widened to
/// [`MIN_SPAN_DEGREES`] before `padding_fraction` of the span is added on
/// each side.
pub fn compute_bbox<'a, I>(coordinates: I, padding_fraction: f64) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    BoundingBox::from_coordinates(coordinates)
        .map(|bbox| bbox.with_min_span(MIN_SPAN_DEGREES).padded(padding_fraction))
}

#[test]
fn bbox_padding_test() {
    let coordinates = [Coordinate::new(10.0, 20.0), Coordinate::new(12.0, 24.0)];
    let bbox = compute_bbox(&coordinates, 0.1).unwrap();
    assert!((bbox.min_lon - 19.6).abs() < 1e-9);
    assert!((bbox.max_lon - 24.4).abs() < 1e-9);
    assert!((bbox.min_lat - 9.8).abs() < 1e-9);
    assert!((bbox.max_lat - 12.2).abs() < 1e-9);
}

#[test]
fn bbox_single_point_test() {
    let coordinates = [Coordinate::new(59.3, 18.0)];
    let bbox = compute_bbox(&coordinates, 0.0).unwrap();
    assert!((bbox.width() - MIN_SPAN_DEGREES).abs() < 1e-12);
    assert!((bbox.height() - MIN_SPAN_DEGREES).abs() < 1e-12);
    assert!((bbox.center().latitude - 59.3).abs() < 1e-12);
    assert!((bbox.center().longitude - 18.0).abs() < 1e-12);
}

#[test]
fn bbox_vertical_line_test() {
    let coordinates = [Coordinate::new(1.0, 5.0), Coordinate::new(2.0, 5.0)];
    let bbox = compute_bbox(&coordinates, DEFAULT_PADDING).unwrap();
    assert!(bbox.max_lon > bbox.min_lon);
    assert!((bbox.width() - MIN_SPAN_DEGREES * 1.04).abs() < 1e-12);
    assert!((bbox.height() - 1.04).abs() < 1e-12);
}

#[test]
fn bbox_empty_test() {
    assert!(compute_bbox(std::iter::empty::<&Coordinate>(), DEFAULT_PADDING).is_none());
    let nan = [Coordinate::new(f64::NAN, 1.0)];
    assert!(compute_bbox(&nan, DEFAULT_PADDING).is_none());
}

#[test]
fn bbox_invalid_padding_test() {
    let coordinates = [Coordinate::new(59.0, 18.0), Coordinate::new(60.0, 19.0)];
    let unpadded = compute_bbox(&coordinates, 0.0).unwrap();
    for fraction in [-1.0, -0.25, f64::NAN, f64::INFINITY] {
        let bbox = compute_bbox(&coordinates, fraction).unwrap();
        assert_eq!(bbox, unpadded);
        assert!(bbox.max_lon >= bbox.min_lon);
        assert!(bbox.max_lat >= bbox.min_lat);
    }
}

#[test]
fn leaflet_bounds_test() {
    let bbox = BoundingBox::new(18.0, 59.0, 18.5, 59.5);
    assert_eq!(bbox.leaflet_bounds(), [[59.0, 18.0], [59.5, 18.5]]);
    assert_eq!(bbox.center(), Coordinate::new(59.25, 18.25));
}

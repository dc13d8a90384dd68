use crate::{
    render::Error,
    shared::{BoundingBox, Coordinate},
};

/// Canvas width in pixels at scale 1.
pub const BASE_WIDTH_PX: f64 = 1200.0;

/// Equirectangular mapping of a bounding box onto a pixel canvas, north up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub bbox: BoundingBox,
    pub width: u32,
    pub height: u32,
}

impl Projection {
    /// Width is `1200 × scale`; height follows the aspect ratio of the box
    /// (1.0 when the box has no width) and is never below one pixel.
    pub fn new(bbox: BoundingBox, scale: f32) -> Result<Self, Error> {
        let width = (BASE_WIDTH_PX * scale as f64).floor();
        let aspect = if bbox.width() != 0.0 {
            bbox.height() / bbox.width()
        } else {
            1.0
        };
        let height = (width * aspect).floor().max(1.0);
        let fits = |px: f64| px.is_finite() && (1.0..=u32::MAX as f64).contains(&px);
        if !fits(width) || !fits(height) {
            return Err(Error::InvalidCanvas {
                width: width as i64,
                height: height as i64,
            });
        }
        Ok(Self {
            bbox,
            width: width as u32,
            height: height as u32,
        })
    }

    pub fn project(&self, coordinate: &Coordinate) -> (f32, f32) {
        let x = fraction(coordinate.longitude, self.bbox.min_lon, self.bbox.width());
        let y = fraction(self.bbox.max_lat - coordinate.latitude, 0.0, self.bbox.height());
        ((x * self.width as f64) as f32, (y * self.height as f64) as f32)
    }
}

fn fraction(value: f64, origin: f64, span: f64) -> f64 {
    if span == 0.0 {
        0.5
    } else {
        (value - origin) / span
    }
}

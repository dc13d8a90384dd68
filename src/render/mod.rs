use std::{collections::BTreeMap, fs, io, path::Path, time::Instant};

use thiserror::Error;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::debug;

mod projection;
pub use projection::*;

use crate::{
    feed::{Shape, Stop},
    shared::{BoundingBox, Rgba},
};

/// Points per inch; stroke widths and marker sizes are given in points.
const POINTS_PER_INCH: f32 = 72.0;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: i64, height: i64 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub dpi: u32,
    /// Route line width in points.
    pub line_width: f32,
    /// Multiplies the 1200 px base width.
    pub scale: f32,
    /// Used for every shape when no shape carries its own color.
    pub line_color: Rgba,
    pub stop_color: Rgba,
    /// Stop marker area in square points.
    pub stop_size: f32,
    /// `None` keeps the canvas fully transparent.
    pub background: Option<Rgba>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: 150,
            line_width: 2.0,
            scale: 1.0,
            line_color: Rgba::RED,
            stop_color: Rgba::rgb(0x1f, 0x77, 0xb4),
            stop_size: 6.0,
            background: None,
        }
    }
}

impl RenderConfig {
    fn points_to_pixels(&self, points: f32) -> f32 {
        points * self.dpi as f32 / POINTS_PER_INCH
    }
}

/// Draws the shapes, then the stops on top, onto a canvas covering exactly
/// `bbox`.
///
/// As soon as one shape has a color of its own, every shape is drawn in its
/// own color and uncolored shapes fall back to black. Otherwise all shapes
/// share `config.line_color`. Shapes are batched into one path per color.
pub fn render(
    shapes: &[Shape],
    stops: Option<&[Stop]>,
    bbox: &BoundingBox,
    config: &RenderConfig,
) -> Result<Pixmap, Error> {
    let now = Instant::now();
    let projection = Projection::new(*bbox, config.scale)?;
    let mut pixmap =
        Pixmap::new(projection.width, projection.height).ok_or(Error::InvalidCanvas {
            width: projection.width as i64,
            height: projection.height as i64,
        })?;
    if let Some(background) = config.background {
        pixmap.fill(background.into());
    }

    let per_shape_colors = shapes.iter().any(|shape| shape.color.is_some());
    let mut batches: BTreeMap<Rgba, PathBuilder> = BTreeMap::new();
    for shape in shapes {
        let color = if per_shape_colors {
            shape.color.unwrap_or(Rgba::BLACK)
        } else {
            config.line_color
        };
        let pb = batches.entry(color).or_insert_with(PathBuilder::new);
        let mut points = shape.points.iter().map(|point| projection.project(point));
        if let Some((x, y)) = points.next() {
            pb.move_to(x, y);
        }
        for (x, y) in points {
            pb.line_to(x, y);
        }
    }

    let mut stroke = Stroke::default();
    stroke.width = config.points_to_pixels(config.line_width);
    stroke.line_cap = LineCap::Round;
    stroke.line_join = LineJoin::Round;
    for (color, pb) in batches {
        let Some(path) = pb.finish() else {
            continue;
        };
        pixmap.stroke_path(&path, &solid(color), &stroke, Transform::identity(), None);
    }

    if let Some(stops) = stops {
        draw_stops(&mut pixmap, &projection, stops, config);
    }

    debug!(
        "Rendered {} shapes on {}x{} canvas in {:?}",
        shapes.len(),
        projection.width,
        projection.height,
        now.elapsed()
    );
    Ok(pixmap)
}

fn draw_stops(
    pixmap: &mut Pixmap,
    projection: &Projection,
    stops: &[Stop],
    config: &RenderConfig,
) {
    // marker size is an area, as for a scatter plot
    let radius = config.points_to_pixels(config.stop_size.sqrt()) / 2.0;
    let mut pb = PathBuilder::new();
    for stop in stops {
        let (x, y) = projection.project(&stop.coordinate);
        pb.push_circle(x, y, radius);
    }
    if let Some(path) = pb.finish() {
        pixmap.fill_path(
            &path,
            &solid(config.stop_color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

fn solid(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

pub fn save_png<P: AsRef<Path>>(pixmap: &Pixmap, path: P) -> Result<(), Error> {
    let data = pixmap
        .encode_png()
        .map_err(|err| Error::Encode(err.to_string()))?;
    fs::write(path, data)?;
    Ok(())
}

/// Renders and writes the PNG. Returns the bounding box the canvas covers,
/// which is what the image must be georeferenced with.
pub fn render_to_file<P: AsRef<Path>>(
    shapes: &[Shape],
    stops: Option<&[Stop]>,
    bbox: &BoundingBox,
    config: &RenderConfig,
    path: P,
) -> Result<BoundingBox, Error> {
    let pixmap = render(shapes, stops, bbox, config)?;
    save_png(&pixmap, path)?;
    Ok(*bbox)
}

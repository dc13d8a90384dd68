use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::BoundingBox;

pub const DEFAULT_METADATA_FILE: &str = "overlay-metadata.json";

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    /// `[[min_lat, min_lon], [max_lat, max_lon]]`
    pub leaflet_bounds: [[f64; 2]; 2],
    /// `[lat, lon]`
    pub center: [f64; 2],
}

impl From<&BoundingBox> for Bounds {
    fn from(bbox: &BoundingBox) -> Self {
        let center = bbox.center();
        Self {
            min_lon: bbox.min_lon,
            min_lat: bbox.min_lat,
            max_lon: bbox.max_lon,
            max_lat: bbox.max_lat,
            leaflet_bounds: bbox.leaflet_bounds(),
            center: [center.latitude, center.longitude],
        }
    }
}

/// Sidecar describing where the rendered image sits on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub bounds: Bounds,
    /// Absolute path of the image.
    pub output_image: String,
    /// Serialized as `null` when no route filter was applied.
    pub filtered_routes: Option<Vec<String>>,
}

impl Metadata {
    /// `output_image` must already exist, it is resolved to an absolute path.
    pub fn new<P: AsRef<Path>>(
        bbox: &BoundingBox,
        output_image: P,
        filtered_routes: Option<Vec<String>>,
    ) -> Result<Self, self::Error> {
        let output_image = output_image.as_ref().canonicalize()?;
        Ok(Self {
            bounds: bbox.into(),
            output_image: output_image.display().to_string(),
            filtered_routes,
        })
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), self::Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn image_file_name(&self) -> String {
        Path::new(&self.output_image)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output_image.clone())
    }

    pub fn leaflet_bounds_json(&self) -> Result<String, self::Error> {
        Ok(serde_json::to_string_pretty(&self.bounds.leaflet_bounds)?)
    }

    /// JavaScript that places the image on a Leaflet `map` and zooms to it.
    pub fn leaflet_snippet(&self) -> Result<String, self::Error> {
        let bounds = serde_json::to_string(&self.bounds.leaflet_bounds)?;
        Ok(format!(
            "L.imageOverlay('{}', {bounds}).addTo(map);\nmap.fitBounds({bounds});",
            self.image_file_name()
        ))
    }
}

//! Renders the route geometry of a GTFS feed into a transparent PNG and
//! describes its geographic bounds so it can be laid over a web map.

use thiserror::Error;

pub mod feed;
pub mod gtfs;
pub mod metadata;
pub mod pipeline;
pub mod render;
pub mod shared;

pub mod prelude {
    pub use crate::Error;
    pub use crate::feed::{
        Direction, Feed, Route, RouteFilter, RouteTable, Shape, Stop, Trip, TripColumns,
        TripTable, enrich_colors, filter_shapes,
    };
    pub use crate::gtfs::{Config, GtfsReader, Table};
    pub use crate::metadata::Metadata;
    pub use crate::pipeline::{Options, Overlay, Sources, run};
    pub use crate::render::RenderConfig;
    pub use crate::shared::{BoundingBox, Coordinate, Rgba, compute_bbox};
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Gtfs(#[from] gtfs::Error),
    #[error(transparent)]
    Feed(#[from] feed::Error),
    #[error(transparent)]
    Render(#[from] render::Error),
    #[error(transparent)]
    Metadata(#[from] metadata::Error),
    #[error("No shapes left to render")]
    EmptyShapes,
}

use std::{collections::BTreeMap, sync::Arc, time::Instant};

use thiserror::Error;
use tracing::{debug, warn};

pub mod color;
pub mod filter;
mod models;
pub use color::*;
pub use filter::*;
pub use models::*;

use crate::{
    gtfs::{self, GtfsReader, Table},
    shared::Coordinate,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("a trips table is required to filter by route_id (pass --trips)")]
    RouteFilterWithoutTrips,
    #[error("trips table missing columns required for route filtering: {0}")]
    MissingTripColumns(String),
}

/// Everything read from a feed. Only shapes are mandatory.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub shapes: Vec<Shape>,
    pub trips: Option<TripTable>,
    pub routes: Option<RouteTable>,
    pub stops: Option<Vec<Stop>>,
}

impl Feed {
    pub fn load_gtfs(gtfs: &GtfsReader) -> Result<Self, gtfs::Error> {
        Ok(Self {
            shapes: load_shapes(gtfs)?,
            trips: load_trips(gtfs)?,
            routes: load_routes(gtfs)?,
            stops: load_stops(gtfs)?,
        })
    }
}

fn load_shapes(gtfs: &GtfsReader) -> Result<Vec<Shape>, gtfs::Error> {
    debug!("Loading shapes...");
    let now = Instant::now();
    let records = gtfs.read_shapes()?;

    let mut points: BTreeMap<String, Vec<(u32, Coordinate)>> = BTreeMap::new();
    let mut non_finite = 0;
    for shape in records.rows {
        let coordinate = Coordinate::new(shape.shape_pt_lat, shape.shape_pt_lon);
        let entry = points.entry(shape.shape_id).or_default();
        if !coordinate.is_finite() {
            non_finite += 1;
            continue;
        }
        entry.push((shape.shape_pt_sequence, coordinate));
    }
    if non_finite > 0 {
        warn!("Skipped {non_finite} shape points with non finite coordinates");
    }

    let total = points.len();
    let shapes: Vec<Shape> = points
        .into_iter()
        .filter_map(|(id, mut points)| {
            if points.len() < 2 {
                return None;
            }
            points.sort_by_key(|(sequence, _)| *sequence);
            let points = points.into_iter().map(|(_, coordinate)| coordinate).collect();
            Some(Shape::new(id, points))
        })
        .collect();

    if shapes.len() < total {
        debug!(
            "Dropped {} shapes with fewer than two points",
            total - shapes.len()
        );
    }
    debug!("Loading shapes took {:?}", now.elapsed());
    Ok(shapes)
}

fn load_trips(gtfs: &GtfsReader) -> Result<Option<TripTable>, gtfs::Error> {
    let Some(records) = gtfs.read_trips()? else {
        return Ok(None);
    };
    debug!("Loading trips...");
    let now = Instant::now();
    let columns = TripColumns {
        route_id: records.has_column("route_id"),
        shape_id: records.has_column("shape_id"),
        direction_id: records.has_column("direction_id"),
    };
    if !columns.direction_id {
        debug!("{} has no direction_id column", gtfs.file_name(Table::Trips));
    }

    let trips = records
        .rows
        .into_iter()
        .map(|trip| Trip {
            id: trip.trip_id.map(Arc::from),
            route_id: trip.route_id.map(Arc::from),
            shape_id: trip.shape_id.map(Arc::from),
            direction: trip.direction_id.and_then(Direction::from_gtfs),
        })
        .collect();
    debug!("Loading trips took {:?}", now.elapsed());
    Ok(Some(TripTable::new(trips).with_columns(columns)))
}

fn load_routes(gtfs: &GtfsReader) -> Result<Option<RouteTable>, gtfs::Error> {
    let Some(records) = gtfs.read_routes()? else {
        return Ok(None);
    };
    debug!("Loading routes...");
    let now = Instant::now();
    let has_color = records.has_column("route_color");
    let routes = records
        .rows
        .into_iter()
        .filter_map(|route| {
            route.route_id.map(|id| Route {
                id: id.into(),
                color: route.route_color,
            })
        })
        .collect();
    debug!("Loading routes took {:?}", now.elapsed());
    Ok(Some(RouteTable { routes, has_color }))
}

fn load_stops(gtfs: &GtfsReader) -> Result<Option<Vec<Stop>>, gtfs::Error> {
    let Some(records) = gtfs.read_stops()? else {
        return Ok(None);
    };
    if !records.has_column("stop_lat") || !records.has_column("stop_lon") {
        warn!(
            "{} has no stop_lat/stop_lon columns, stops will not be drawn",
            gtfs.file_name(Table::Stops)
        );
        return Ok(None);
    }
    debug!("Loading stops...");
    let now = Instant::now();
    let stops: Vec<Stop> = records
        .rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, stop)| {
            let coordinate = Coordinate::new(stop.stop_lat?, stop.stop_lon?);
            let id = stop.stop_id.unwrap_or_else(|| i.to_string());
            Some(Stop {
                id: id.into(),
                coordinate,
            })
        })
        .collect();
    debug!("Loading stops took {:?}", now.elapsed());
    Ok(Some(stops))
}

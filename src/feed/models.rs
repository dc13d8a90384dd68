use std::sync::Arc;

use crate::shared::{Coordinate, Rgba};

/// The path a vehicle follows, built from the points of one `shape_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// External `shape_id`, kept as an opaque string.
    pub id: Arc<str>,
    /// Points ordered by `shape_pt_sequence`. Always at least two.
    pub points: Box<[Coordinate]>,
    /// Color resolved from the routes that use this shape, if any.
    pub color: Option<Rgba>,
}

impl Shape {
    pub fn new<I: Into<Arc<str>>>(id: I, points: Vec<Coordinate>) -> Self {
        Self {
            id: id.into(),
            points: points.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }
}

/// GTFS `direction_id`. Which value is "inbound" is up to the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Outbound,
    Inbound,
}

impl Direction {
    pub fn from_gtfs(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Outbound),
            1 => Some(Self::Inbound),
            _ => None,
        }
    }
}

/// One vehicle journey. Only the join keys are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trip {
    pub id: Option<Arc<str>>,
    pub route_id: Option<Arc<str>>,
    pub shape_id: Option<Arc<str>>,
    pub direction: Option<Direction>,
}

impl Trip {
    pub fn new<R: Into<Arc<str>>, S: Into<Arc<str>>>(route_id: R, shape_id: S) -> Self {
        Self {
            id: None,
            route_id: Some(route_id.into()),
            shape_id: Some(shape_id.into()),
            direction: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
}

/// Which optional `trips.txt` columns the feed carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripColumns {
    pub route_id: bool,
    pub shape_id: bool,
    pub direction_id: bool,
}

impl TripColumns {
    pub const ALL: Self = Self {
        route_id: true,
        shape_id: true,
        direction_id: true,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripTable {
    pub trips: Vec<Trip>,
    pub columns: TripColumns,
}

impl TripTable {
    pub fn new(trips: Vec<Trip>) -> Self {
        Self {
            trips,
            columns: TripColumns::ALL,
        }
    }

    pub fn with_columns(mut self, columns: TripColumns) -> Self {
        self.columns = columns;
        self
    }

    pub fn can_join_shapes_to_routes(&self) -> bool {
        self.columns.route_id && self.columns.shape_id
    }
}

/// A transit line. `color` is the raw `route_color` value.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: Arc<str>,
    pub color: Option<String>,
}

impl Route {
    pub fn new<I: Into<Arc<str>>>(id: I, color: Option<&str>) -> Self {
        Self {
            id: id.into(),
            color: color.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteTable {
    pub routes: Vec<Route>,
    pub has_color: bool,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes,
            has_color: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: Arc<str>,
    pub coordinate: Coordinate,
}

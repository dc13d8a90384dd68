use std::collections::HashSet;

use tracing::debug;

use crate::feed::{Direction, Error, Shape, TripTable};

/// Route selection applied to the shapes before rendering. Route ids form
/// an OR set; an empty set selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFilter {
    pub route_ids: Vec<String>,
    pub direction: Option<Direction>,
}

impl RouteFilter {
    pub fn new<I, S>(route_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            route_ids: route_ids.into_iter().map(Into::into).collect(),
            direction: None,
        }
    }

    /// A single `route_id` wins over a comma separated `route_ids` list.
    /// Blank entries in the list are ignored.
    pub fn parse(route_id: Option<&str>, route_ids: Option<&str>) -> Self {
        if let Some(route_id) = route_id.filter(|id| !id.is_empty()) {
            return Self::new([route_id]);
        }
        let route_ids = route_ids
            .map(|ids| {
                ids.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            route_ids,
            direction: None,
        }
    }

    pub fn with_direction(mut self, direction: Option<Direction>) -> Self {
        self.direction = direction;
        self
    }

    pub fn is_active(&self) -> bool {
        !self.route_ids.is_empty()
    }

    /// The route ids to report, `None` when no route filter applies.
    pub fn filtered_routes(&self) -> Option<Vec<String>> {
        self.is_active().then(|| self.route_ids.clone())
    }
}

/// Keeps the shapes referenced by at least one trip of the requested
/// routes. The direction only narrows the trips when the feed carries a
/// `direction_id` column.
pub fn filter_shapes(
    shapes: Vec<Shape>,
    trips: Option<&TripTable>,
    filter: &RouteFilter,
) -> Result<Vec<Shape>, Error> {
    if !filter.is_active() {
        if filter.direction.is_some() {
            debug!("Direction given without route ids, ignoring it");
        }
        return Ok(shapes);
    }
    let trips = trips.ok_or(Error::RouteFilterWithoutTrips)?;
    if !trips.can_join_shapes_to_routes() {
        let missing: Vec<&str> = [
            ("route_id", trips.columns.route_id),
            ("shape_id", trips.columns.shape_id),
        ]
        .into_iter()
        .filter_map(|(name, present)| (!present).then_some(name))
        .collect();
        return Err(Error::MissingTripColumns(missing.join(", ")));
    }

    let direction = filter.direction.filter(|_| trips.columns.direction_id);
    if filter.direction.is_some() && direction.is_none() {
        debug!("Trips carry no direction_id, direction filter ignored");
    }

    let route_ids: HashSet<&str> = filter.route_ids.iter().map(String::as_str).collect();
    let shape_ids: HashSet<&str> = trips
        .trips
        .iter()
        .filter(|trip| {
            trip.route_id
                .as_deref()
                .is_some_and(|route_id| route_ids.contains(route_id))
        })
        .filter(|trip| direction.is_none() || trip.direction == direction)
        .filter_map(|trip| trip.shape_id.as_deref())
        .collect();

    Ok(shapes
        .into_iter()
        .filter(|shape| shape_ids.contains(&*shape.id))
        .collect())
}

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::{
    feed::{RouteTable, Shape, TripTable},
    shared::Rgba,
};

/// Annotates shapes with the `route_color` of the routes whose trips use
/// them. Shapes that already carry a color keep it.
///
/// When one shape serves routes of different colors, the route with the
/// lowest id (string order) that has a usable color decides. Returns the
/// shapes untouched if either table is missing or lacks a join column.
pub fn enrich_colors(
    shapes: Vec<Shape>,
    trips: Option<&TripTable>,
    routes: Option<&RouteTable>,
) -> Vec<Shape> {
    let (Some(trips), Some(routes)) = (trips, routes) else {
        return shapes;
    };
    if !trips.can_join_shapes_to_routes() {
        debug!("Trips lack route_id/shape_id, skipping route colors");
        return shapes;
    }
    if !routes.has_color {
        debug!("Routes carry no route_color, skipping route colors");
        return shapes;
    }

    let route_colors = route_colors(routes);
    let mut shape_routes: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for trip in &trips.trips {
        if let (Some(shape_id), Some(route_id)) =
            (trip.shape_id.as_deref(), trip.route_id.as_deref())
        {
            shape_routes.entry(shape_id).or_default().insert(route_id);
        }
    }

    shapes
        .into_iter()
        .map(|mut shape| {
            if shape.color.is_none() {
                shape.color = shape_routes.get(&*shape.id).and_then(|route_ids| {
                    route_ids
                        .iter()
                        .find_map(|route_id| route_colors.get(route_id).copied())
                });
            }
            shape
        })
        .collect()
}

/// First usable color per route id. Blank and unparsable values are
/// skipped.
fn route_colors(routes: &RouteTable) -> HashMap<&str, Rgba> {
    let mut colors: HashMap<&str, Rgba> = HashMap::new();
    for route in &routes.routes {
        let Some(raw) = route.color.as_deref().filter(|raw| !raw.trim().is_empty()) else {
            continue;
        };
        match raw.parse::<Rgba>() {
            Ok(color) => {
                colors.entry(&*route.id).or_insert(color);
            }
            Err(err) => warn!("Route {}: {err}", route.id),
        }
    }
    colors
}

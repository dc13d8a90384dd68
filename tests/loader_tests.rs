mod common;

use common::*;
use gtfs_overlay::{gtfs, prelude::*};

fn load(reader: GtfsReader) -> Feed {
    Feed::load_gtfs(&reader).unwrap()
}

#[test]
fn shapes_are_grouped_and_sorted_test() {
    let dir = tempfile::tempdir().unwrap();
    let shapes = write(dir.path(), "shapes.txt", SHAPES);
    let feed = load(GtfsReader::default().with_file(Table::Shapes, shapes));

    assert_eq!(ids(&feed.shapes), ["1", "2"]);
    let first = &feed.shapes[0];
    let latitudes: Vec<f64> = first.points.iter().map(|point| point.latitude).collect();
    assert_eq!(latitudes, [59.30, 59.31, 59.32]);
    assert!(feed.shapes.iter().all(|shape| shape.color.is_none()));
    assert!(feed.trips.is_none());
    assert!(feed.routes.is_none());
    assert!(feed.stops.is_none());
}

#[test]
fn identifiers_stay_strings_test() {
    let dir = tempfile::tempdir().unwrap();
    let shapes = write(
        dir.path(),
        "shapes.txt",
        "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence\n\
         007,1.0,2.0,1\n007,1.5,2.5,2\n7,3.0,4.0,1\n7,3.5,4.5,2\n",
    );
    let feed = load(GtfsReader::default().with_file(Table::Shapes, shapes));
    assert_eq!(ids(&feed.shapes), ["007", "7"]);
}

#[test]
fn single_point_shape_is_dropped_test() {
    let dir = tempfile::tempdir().unwrap();
    let contents = format!("{SHAPES}lonely,59.40,18.20,1\n");
    let shapes = write(dir.path(), "shapes.txt", &contents);
    let feed = load(GtfsReader::default().with_file(Table::Shapes, shapes));

    assert_eq!(ids(&feed.shapes), ["1", "2"]);
    assert!(feed.shapes.iter().all(|shape| shape.points.len() >= 2));
}

#[test]
fn non_finite_points_are_dropped_test() {
    let dir = tempfile::tempdir().unwrap();
    let shapes = write(
        dir.path(),
        "shapes.txt",
        "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence\n\
         1,59.30,18.00,1\n1,NaN,18.80,2\n\
         2,59.35,18.10,1\n2,59.36,inf,2\n2,59.37,18.12,3\n",
    );
    let feed = load(GtfsReader::default().with_file(Table::Shapes, shapes));

    assert_eq!(ids(&feed.shapes), ["2"]);
    let points = &feed.shapes[0].points;
    assert_eq!(points.len(), 2);
    assert!(points.iter().all(|point| point.is_finite()));
}

#[test]
fn missing_shape_columns_test() {
    let dir = tempfile::tempdir().unwrap();
    let shapes = write(
        dir.path(),
        "shapes.txt",
        "shape_id,shape_pt_lat,shape_pt_lon\n1,59.3,18.0\n",
    );
    let result = Feed::load_gtfs(&GtfsReader::default().with_file(Table::Shapes, shapes));
    match result {
        Err(gtfs::Error::MissingColumns { file, columns }) => {
            assert_eq!(file, "shapes.txt");
            assert_eq!(columns, "shape_pt_sequence");
        }
        other => panic!("expected missing columns, got {other:?}"),
    }
}

#[test]
fn optional_tables_test() {
    let dir = tempfile::tempdir().unwrap();
    let reader = GtfsReader::default()
        .with_file(Table::Shapes, write(dir.path(), "shapes.txt", SHAPES))
        .with_file(Table::Trips, write(dir.path(), "trips.txt", TRIPS))
        .with_file(Table::Routes, write(dir.path(), "routes.txt", ROUTES))
        .with_file(Table::Stops, write(dir.path(), "stops.txt", STOPS));
    let feed = load(reader);

    let trips = feed.trips.unwrap();
    assert_eq!(trips.columns, TripColumns::ALL);
    assert_eq!(trips.trips.len(), 3);
    assert_eq!(trips.trips[0].route_id.as_deref(), Some("42"));
    assert_eq!(trips.trips[0].shape_id.as_deref(), Some("1"));
    assert_eq!(trips.trips[0].direction, Some(Direction::Outbound));
    assert_eq!(trips.trips[2].direction, Some(Direction::Inbound));

    let routes = feed.routes.unwrap();
    assert!(routes.has_color);
    assert_eq!(routes.routes[0].color.as_deref(), Some("00FF00"));
    assert_eq!(routes.routes[1].color, None);

    let stops = feed.stops.unwrap();
    assert_eq!(stops.len(), 2);
    assert_eq!(&*stops[1].id, "s2");
    assert_eq!(stops[1].coordinate, Coordinate::new(59.36, 18.11));
}

#[test]
fn trips_without_direction_test() {
    let dir = tempfile::tempdir().unwrap();
    let reader = GtfsReader::default()
        .with_file(Table::Shapes, write(dir.path(), "shapes.txt", SHAPES))
        .with_file(
            Table::Trips,
            write(
                dir.path(),
                "trips.txt",
                "route_id,service_id,trip_id,shape_id\n42,wk,t1,1\n",
            ),
        );
    let trips = load(reader).trips.unwrap();
    assert!(!trips.columns.direction_id);
    assert!(trips.can_join_shapes_to_routes());
    assert_eq!(trips.trips[0].direction, None);
}

#[test]
fn stops_without_coordinates_test() {
    let dir = tempfile::tempdir().unwrap();
    let reader = GtfsReader::default()
        .with_file(Table::Shapes, write(dir.path(), "shapes.txt", SHAPES))
        .with_file(
            Table::Stops,
            write(dir.path(), "stops.txt", "stop_id,stop_name\ns1,Central\n"),
        );
    assert!(load(reader).stops.is_none());
}

#[test]
fn stops_without_position_are_skipped_test() {
    let dir = tempfile::tempdir().unwrap();
    let reader = GtfsReader::default()
        .with_file(Table::Shapes, write(dir.path(), "shapes.txt", SHAPES))
        .with_file(
            Table::Stops,
            write(
                dir.path(),
                "stops.txt",
                "stop_id,stop_lat,stop_lon,location_type\ns1,59.3,18.0,0\nnode,,,3\n",
            ),
        );
    let stops = load(reader).stops.unwrap();
    assert_eq!(stops.len(), 1);
    assert_eq!(&*stops[0].id, "s1");
}

#[test]
fn load_from_zip_test() {
    let dir = tempfile::tempdir().unwrap();
    let feed_path = write_zip(
        dir.path(),
        "feed.zip",
        &[("shapes.txt", SHAPES), ("trips.txt", TRIPS)],
    );
    let feed = load(GtfsReader::default().from_zip(&feed_path));
    assert_eq!(ids(&feed.shapes), ["1", "2"]);
    assert_eq!(feed.trips.unwrap().trips.len(), 3);
    assert!(feed.routes.is_none());
    assert!(feed.stops.is_none());
}

#[test]
fn explicit_file_overrides_zip_test() {
    let dir = tempfile::tempdir().unwrap();
    let feed_path = write_zip(dir.path(), "feed.zip", &[("shapes.txt", SHAPES)]);
    let shapes = write(
        dir.path(),
        "other_shapes.txt",
        "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence\nx,1.0,2.0,1\nx,1.5,2.5,2\n",
    );
    let feed = load(
        GtfsReader::default()
            .from_zip(&feed_path)
            .with_file(Table::Shapes, shapes),
    );
    assert_eq!(ids(&feed.shapes), ["x"]);
}

#[test]
fn zip_without_shapes_test() {
    let dir = tempfile::tempdir().unwrap();
    let feed_path = write_zip(dir.path(), "feed.zip", &[("trips.txt", TRIPS)]);
    let result = Feed::load_gtfs(&GtfsReader::default().from_zip(&feed_path));
    assert!(matches!(result, Err(gtfs::Error::FileNotFound(name)) if name == "shapes.txt"));
}

#[test]
fn custom_file_names_test() {
    let dir = tempfile::tempdir().unwrap();
    let feed_path = write_zip(dir.path(), "feed.zip", &[("geometry.csv", SHAPES)]);
    let config = gtfs::Config {
        shapes_file_name: "geometry.csv".into(),
        ..Default::default()
    };
    let feed = load(GtfsReader::new(config).from_zip(&feed_path));
    assert_eq!(feed.shapes.len(), 2);
}

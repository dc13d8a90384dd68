#![allow(dead_code)]

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use gtfs_overlay::prelude::*;
use zip::write::SimpleFileOptions;

/// Two shapes with three points each; points of shape "1" are out of order.
pub const SHAPES: &str = "\
shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence,shape_dist_traveled
1,59.30,18.00,1,0.0
1,59.32,18.04,3,
1,59.31,18.02,2,1.5
2,59.35,18.10,1,
2,59.36,18.11,2,
2,59.37,18.12,3,
";

pub const TRIPS: &str = "\
route_id,service_id,trip_id,shape_id,direction_id
42,weekday,t1,1,0
42,weekday,t2,1,1
43,weekday,t3,2,1
";

pub const ROUTES: &str = "\
route_id,agency_id,route_short_name,route_type,route_color
42,sl,42,3,00FF00
43,sl,43,3,
";

pub const STOPS: &str = "\
stop_id,stop_name,stop_lat,stop_lon
s1,Central,59.31,18.02
s2,Harbour,59.36,18.11
";

pub fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

pub fn write_zip(dir: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let file = fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (file_name, contents) in files {
        zip.start_file(*file_name, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
    path
}

pub fn line(id: &str, points: &[(f64, f64)]) -> Shape {
    Shape::new(
        id,
        points
            .iter()
            .map(|(lat, lon)| Coordinate::new(*lat, *lon))
            .collect(),
    )
}

pub fn ids(shapes: &[Shape]) -> Vec<&str> {
    shapes.iter().map(|shape| &*shape.id).collect()
}

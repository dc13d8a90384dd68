pub struct Config {
    pub shapes_file_name: String,
    pub routes_file_name: String,
    pub trips_file_name: String,
    pub stops_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shapes_file_name: "shapes.txt".into(),
            routes_file_name: "routes.txt".into(),
            trips_file_name: "trips.txt".into(),
            stops_file_name: "stops.txt".into(),
        }
    }
}

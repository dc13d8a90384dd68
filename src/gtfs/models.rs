use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsShape {
    pub shape_id: String,
    pub shape_pt_lat: f64,
    pub shape_pt_lon: f64,
    pub shape_pt_sequence: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsRoute {
    pub route_id: Option<String>,
    pub route_color: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsTrip {
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
    pub shape_id: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub direction_id: Option<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsStop {
    pub stop_id: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub stop_lat: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub stop_lon: Option<f64>,
}

use serde::de::DeserializeOwned;
use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};
use thiserror::Error;
use zip::ZipArchive;

mod config;
pub mod models;
pub use config::*;
pub use models::*;

pub const SHAPE_COLUMNS: [&str; 4] = [
    "shape_id",
    "shape_pt_lat",
    "shape_pt_lon",
    "shape_pt_sequence",
];

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
    #[error("{file} missing columns: {columns}")]
    MissingColumns { file: String, columns: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Shapes,
    Routes,
    Trips,
    Stops,
}

/// Rows of one feed file together with the header it was read with.
#[derive(Debug, Clone)]
pub struct Records<T> {
    pub columns: HashSet<String>,
    pub rows: Vec<T>,
}

impl<T> Records<T> {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }
}

/// Locates feed tables either as loose files or inside a zipped feed.
/// Loose files take precedence over archive entries.
#[derive(Default)]
pub struct GtfsReader {
    config: Config,
    archive: Option<PathBuf>,
    files: HashMap<Table, PathBuf>,
}

impl GtfsReader {
    pub fn new(config: self::Config) -> Self {
        Self {
            config,
            archive: None,
            files: HashMap::new(),
        }
    }

    pub fn from_zip<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.archive = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_file<P: AsRef<Path>>(mut self, table: Table, path: P) -> Self {
        self.files.insert(table, path.as_ref().to_path_buf());
        self
    }

    pub fn file_name(&self, table: Table) -> &str {
        match table {
            Table::Shapes => &self.config.shapes_file_name,
            Table::Routes => &self.config.routes_file_name,
            Table::Trips => &self.config.trips_file_name,
            Table::Stops => &self.config.stops_file_name,
        }
    }

    pub fn read_shapes(&self) -> Result<Records<GtfsShape>, self::Error> {
        self.read_table(Table::Shapes, &SHAPE_COLUMNS)?
            .ok_or_else(|| Error::FileNotFound(self.file_name(Table::Shapes).to_string()))
    }

    pub fn read_routes(&self) -> Result<Option<Records<GtfsRoute>>, self::Error> {
        self.read_table(Table::Routes, &[])
    }

    pub fn read_trips(&self) -> Result<Option<Records<GtfsTrip>>, self::Error> {
        self.read_table(Table::Trips, &[])
    }

    pub fn read_stops(&self) -> Result<Option<Records<GtfsStop>>, self::Error> {
        self.read_table(Table::Stops, &[])
    }

    /// Returns `None` when the table is neither given as a file nor present
    /// in the archive.
    pub fn read_table<T>(
        &self,
        table: Table,
        required: &[&str],
    ) -> Result<Option<Records<T>>, self::Error>
    where
        T: DeserializeOwned,
    {
        let name = self.file_name(table);
        if let Some(path) = self.files.get(&table) {
            let file = File::open(path)?;
            return parse_csv(file, name, required).map(Some);
        }

        let Some(zip_path) = &self.archive else {
            return Ok(None);
        };
        let zip_file = File::open(zip_path)?;
        let mut archive = ZipArchive::new(zip_file)?;
        let Some(index) = archive.index_for_name(name) else {
            return Ok(None);
        };
        let file = archive.by_index(index)?;
        parse_csv(file, name, required).map(Some)
    }
}

fn parse_csv<R, T>(reader: R, name: &str, required: &[&str]) -> Result<Records<T>, self::Error>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns: HashSet<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !columns.contains(*column))
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(Error::MissingColumns {
            file: name.to_string(),
            columns: missing.join(", "),
        });
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result?;
        rows.push(record);
    }
    Ok(Records { columns, rows })
}

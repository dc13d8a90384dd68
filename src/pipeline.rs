use std::{path::PathBuf, time::Instant};

use tracing::{debug, info};

use crate::{
    Error,
    feed::{self, Feed, RouteFilter},
    gtfs::{self, GtfsReader, Table},
    metadata::{DEFAULT_METADATA_FILE, Metadata},
    render::{self, RenderConfig},
    shared::{DEFAULT_PADDING, compute_bbox},
};

/// Where the feed tables come from. Explicit files win over entries of the
/// zipped `feed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sources {
    pub feed: Option<PathBuf>,
    pub shapes: Option<PathBuf>,
    pub routes: Option<PathBuf>,
    pub trips: Option<PathBuf>,
    pub stops: Option<PathBuf>,
}

impl Sources {
    pub fn reader(&self, config: gtfs::Config) -> GtfsReader {
        let mut reader = GtfsReader::new(config);
        if let Some(feed) = &self.feed {
            reader = reader.from_zip(feed);
        }
        let files = [
            (Table::Shapes, &self.shapes),
            (Table::Routes, &self.routes),
            (Table::Trips, &self.trips),
            (Table::Stops, &self.stops),
        ];
        for (table, path) in files {
            if let Some(path) = path {
                reader = reader.with_file(table, path);
            }
        }
        reader
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub sources: Sources,
    pub filter: RouteFilter,
    /// Fraction of the span added on each side of the bounding box.
    pub padding: f64,
    pub render: RenderConfig,
    pub output: PathBuf,
    pub metadata: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sources: Sources::default(),
            filter: RouteFilter::default(),
            padding: DEFAULT_PADDING,
            render: RenderConfig::default(),
            output: PathBuf::from("overlay.png"),
            metadata: PathBuf::from(DEFAULT_METADATA_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub metadata: Metadata,
    pub shape_count: usize,
}

/// Reads the feed, narrows and colors the shapes, renders the PNG and
/// writes the metadata sidecar, in that order. Nothing is written unless
/// every stage before it succeeded.
pub fn run(options: &Options) -> Result<Overlay, Error> {
    let now = Instant::now();
    let reader = options.sources.reader(gtfs::Config::default());
    let Feed {
        mut shapes,
        trips,
        routes,
        stops,
    } = Feed::load_gtfs(&reader)?;
    info!("Loaded {} shapes", shapes.len());

    if options.filter.is_active() {
        shapes = feed::filter_shapes(shapes, trips.as_ref(), &options.filter)?;
        info!(
            "Filter applied: {} shapes matching route_id={:?}",
            shapes.len(),
            options.filter.route_ids
        );
    }
    let shapes = feed::enrich_colors(shapes, trips.as_ref(), routes.as_ref());

    let bbox = compute_bbox(
        shapes.iter().flat_map(|shape| shape.points.iter()),
        options.padding,
    )
    .ok_or(Error::EmptyShapes)?;
    debug!("Bounding box {:?}", bbox);

    let bbox = render::render_to_file(
        &shapes,
        stops.as_deref(),
        &bbox,
        &options.render,
        &options.output,
    )?;
    let metadata = Metadata::new(&bbox, &options.output, options.filter.filtered_routes())?;
    metadata.write(&options.metadata)?;
    debug!("Overlay took {:?}", now.elapsed());

    Ok(Overlay {
        metadata,
        shape_count: shapes.len(),
    })
}

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use gtfs_overlay::{
    feed::{Direction, RouteFilter},
    pipeline::{self, Options, Overlay, Sources},
    render::RenderConfig,
    shared::Rgba,
};
use tracing::{Level, error, info};

/// Verbosity of the stderr log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Padding must be a finite, non negative fraction of the span.
fn parse_padding(value: &str) -> Result<f64, String> {
    let padding: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if !padding.is_finite() || padding < 0.0 {
        return Err(format!("`{value}` must be a finite number >= 0"));
    }
    Ok(padding)
}

#[derive(Parser, Debug)]
#[command(name = "gtfs-overlay")]
#[command(about = "Render GTFS shapes into a transparent PNG overlay for web maps")]
struct Args {
    /// shapes.txt
    #[arg(long, required_unless_present = "feed")]
    shapes: Option<PathBuf>,

    /// Zipped GTFS feed to read any table not given explicitly
    #[arg(long)]
    feed: Option<PathBuf>,

    /// routes.txt (optional, for colors)
    #[arg(long)]
    routes: Option<PathBuf>,

    /// trips.txt (optional, for route_id filtering)
    #[arg(long)]
    trips: Option<PathBuf>,

    /// stops.txt (optional, to draw stops)
    #[arg(long)]
    stops: Option<PathBuf>,

    /// Draw only this direction (0 or 1). Default: all directions
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    direction: Option<u8>,

    /// Output PNG filename
    #[arg(long, default_value = "overlay.png")]
    out: PathBuf,

    #[arg(long, default_value_t = 150)]
    dpi: u32,

    #[arg(long, default_value_t = 2.0)]
    linewidth: f32,

    /// Bounding box margin fraction
    #[arg(long, default_value_t = 0.02, value_parser = parse_padding)]
    pad: f64,

    /// Resolution scale (1 = base, 2 = HD)
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Line color in hex or name
    #[arg(long, default_value = "#ff0000")]
    color: Rgba,

    /// Stop marker color in hex or name
    #[arg(long = "stop_color", default_value = "#1f77b4")]
    stop_color: Rgba,

    /// Canvas background color. Default: transparent
    #[arg(long)]
    background: Option<Rgba>,

    /// Filter a single route (e.g. 42)
    #[arg(long = "route_id")]
    route_id: Option<String>,

    /// Multiple routes separated by commas (e.g. 42,44,46)
    #[arg(long = "route_ids")]
    route_ids: Option<String>,

    /// Where to write the bounds metadata
    #[arg(long, default_value = "overlay-metadata.json")]
    metadata: PathBuf,

    /// Log level
    #[arg(
        long = "log_level",
        value_enum,
        ignore_case = true,
        default_value_t = LogLevel::Info
    )]
    log_level: LogLevel,
}

impl Args {
    fn into_options(self) -> Options {
        let filter = RouteFilter::parse(self.route_id.as_deref(), self.route_ids.as_deref())
            .with_direction(self.direction.and_then(Direction::from_gtfs));
        Options {
            sources: Sources {
                feed: self.feed,
                shapes: self.shapes,
                routes: self.routes,
                trips: self.trips,
                stops: self.stops,
            },
            filter,
            padding: self.pad,
            render: RenderConfig {
                dpi: self.dpi,
                line_width: self.linewidth,
                scale: self.scale,
                line_color: self.color,
                stop_color: self.stop_color,
                background: self.background,
                ..Default::default()
            },
            output: self.out,
            metadata: self.metadata,
        }
    }
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(args.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = args.into_options();
    info!("Rendering {}", options.output.display());
    match pipeline::run(&options) {
        Ok(overlay) => print_overlay(&overlay),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}

fn print_overlay(overlay: &Overlay) {
    let metadata = &overlay.metadata;
    let (bounds, snippet) = match (metadata.leaflet_bounds_json(), metadata.leaflet_snippet()) {
        (Ok(bounds), Ok(snippet)) => (bounds, snippet),
        (Err(err), _) | (_, Err(err)) => {
            error!("{err}");
            std::process::exit(1);
        }
    };
    println!("\nImage generated: {}", metadata.output_image);
    println!("Leaflet coordinates:");
    println!("{bounds}");
    println!("Example JS:\n");
    println!("{snippet}");
}

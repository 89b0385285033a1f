use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod output;

use output::write_scene_geojson;
use trip_map_core::{HeadlessCamera, MapView, MapsConfig, Provenance, RouteMap, Scene, ViewOptions};
use trip_map_directions::{HttpMapProvider, OfflineDirections};
use trip_map_itinerary::{DayNumber, RouteCollection};

#[derive(Parser, Debug)]
#[command(
    name = "route-render",
    author,
    version,
    about = "Render an itinerary's day routes and stops to GeoJSON",
    long_about = "Reads an itinerary (an array of days, or an object with a `days` array), \
                  resolves a drawable path for every day with at least two stops, and writes \
                  the styled routes, numbered stop markers and final camera as GeoJSON.\n\n\
                  Days without an encoded polyline are routed through the directions API \
                  configured by MAPS_API_KEY (and optionally MAPS_DIRECTIONS_ENDPOINT). \
                  With --offline those days are drawn as markers only."
)]
struct Args {
    /// Input itinerary JSON file
    #[arg(short, long)]
    input: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long)]
    output: PathBuf,

    /// Day to emphasise and focus the camera on (1-based)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    active_day: Option<u32>,

    /// Never call the directions API; days without a polyline get markers only
    #[arg(long)]
    offline: bool,

    /// Check the API key against the directions endpoint before rendering
    #[arg(long, conflicts_with = "offline")]
    check_key: bool,

    /// JSON file overriding camera padding, zoom ceiling and fallback center
    #[arg(long)]
    view_options: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 768)]
    height: u32,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", args.output.display());

    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let routes = read_itinerary(&args.input)?;
    log::info!(
        "Loaded {} days with {} stops",
        routes.len(),
        routes.all_stops().count()
    );

    let options = match &args.view_options {
        Some(path) => read_view_options(path)?,
        None => ViewOptions::default(),
    };
    let camera = Box::new(HeadlessCamera::new(args.width, args.height));

    let mut map = if args.offline {
        log::info!("Offline: directions lookups disabled");
        RouteMap::ready(camera, Arc::new(OfflineDirections), options)
    } else {
        let provider = HttpMapProvider::new().with_key_check(args.check_key);
        RouteMap::load(MapsConfig::from_env(), &provider, camera, options).await
    };

    let active_day = args.active_day.and_then(DayNumber::new);
    if let Some(day) = active_day {
        if routes.day(day).is_none() {
            log::warn!("Day {} is not in the itinerary; nothing will be emphasised", day);
        }
    }

    let scene = render_resolved(&mut map, &routes, active_day).await?;

    log_scene(&scene);
    write_scene_geojson(&scene, map.viewport().as_ref(), &args.output)
        .context("Failed to write route GeoJSON")?;

    log::info!("Done!");
    Ok(())
}

/// Render, wait for the lookups that render queued, then render the result
async fn render_resolved(
    map: &mut RouteMap,
    routes: &RouteCollection,
    active_day: Option<DayNumber>,
) -> Result<Scene> {
    let first = map.render(routes, active_day);
    let view = if matches!(first, MapView::Ready(_)) {
        let applied = map.resolve_pending().await;
        log::debug!("Applied {} directions results", applied);
        map.render(routes, active_day)
    } else {
        first
    };

    match view {
        MapView::Ready(scene) => Ok(scene),
        MapView::NotConfigured { message } => bail!("{message}"),
        MapView::Unavailable { error, message } => bail!("{message} ({error})"),
    }
}

fn read_itinerary(path: &Path) -> Result<RouteCollection> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    RouteCollection::from_json(&json)
        .with_context(|| format!("Invalid itinerary in {}", path.display()))
}

fn read_view_options(path: &Path) -> Result<ViewOptions> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Invalid view options in {}", path.display()))
}

fn log_scene(scene: &Scene) {
    let decoded = scene
        .overlays
        .iter()
        .filter(|o| o.provenance == Provenance::DecodedPolyline)
        .count();

    log::info!(
        "  {} routes ({} from polylines, {} from directions), {} stops",
        scene.overlays.len(),
        decoded,
        scene.overlays.len() - decoded,
        scene.markers.len()
    );
}

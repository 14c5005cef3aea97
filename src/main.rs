mod app;

use std::f64::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::info;

use magnolia_map::logging::init_logging;
use magnolia_map::magnolia::{
    AngularStrategy, DEFAULT_MAX_RADIUS, DEFAULT_MEANING, DEFAULT_ROOT_ID, LayoutConfig,
    MagnoliaMap, MapConfig, ViewState, load_dataset,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Dataset file: `{ "nodes": [...] }` or a bare array of nodes.
    #[arg(long, default_value = "magnolia_seed.json")]
    dataset: PathBuf,

    /// Root node id; the first record is used when it is missing.
    #[arg(long, default_value = DEFAULT_ROOT_ID)]
    root: String,

    #[arg(long, default_value_t = DEFAULT_MAX_RADIUS)]
    max_radius: f64,

    #[arg(long, default_value_t = TAU)]
    angular_span: f64,

    #[arg(long, value_enum, default_value_t = AngularStrategy::LeafSlots)]
    strategy: AngularStrategy,

    /// Fraction of latent edges to reveal; clamped into [0, 1].
    #[arg(long, default_value_t = DEFAULT_MEANING, allow_hyphen_values = true)]
    meaning: f64,

    /// Start with the potential lens (latent overlay) on.
    #[arg(long)]
    potential: bool,

    /// Start with the projection lens (tree links) off.
    #[arg(long)]
    no_projection: bool,

    /// Write the derived scene as JSON to this path (`-` for stdout) and exit.
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log to rotating files in this directory instead of stderr.
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn map_config(&self) -> MapConfig {
        MapConfig {
            root_id: self.root.clone(),
            layout: LayoutConfig {
                angular_span: self.angular_span,
                max_radius: self.max_radius,
                strategy: self.strategy,
            },
        }
    }

    fn view_state(&self) -> ViewState {
        ViewState::default()
            .with_meaning(self.meaning)
            .with_potential(self.potential)
            .with_projection(!self.no_projection)
    }
}

fn export_scene(args: &Args, target: &Path) -> Result<()> {
    let store = load_dataset(&args.dataset)?;
    let map = MagnoliaMap::new(store, &args.map_config())
        .with_context(|| format!("failed to lay out {}", args.dataset.display()))?;
    let scene = map.scene(&args.view_state());
    let json = serde_json::to_string_pretty(&scene).context("failed to serialize scene")?;

    if target == Path::new("-") {
        println!("{json}");
    } else {
        fs::write(target, json)
            .with_context(|| format!("failed to write scene to {}", target.display()))?;
        info!("event=scene_exported path={}", target.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _logger = init_logging(&args.log_level, args.log_dir.as_deref())?;

    if let Some(target) = &args.export {
        return export_scene(&args, target);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1360.0, 900.0]),
        ..Default::default()
    };

    let dataset = args.dataset.clone();
    let config = args.map_config();
    let view = args.view_state();

    eframe::run_native(
        "Magnolia Map",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::MagnoliaApp::new(
                cc,
                dataset.clone(),
                config.clone(),
                view.clone(),
            )))
        }),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}

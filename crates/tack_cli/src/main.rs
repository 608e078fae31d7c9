//! Tack CLI
//!
//! Replay scroll scenes against the sticky boundary detector.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tack_core::TransitionKind;
use tack_headless::Scene;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod scene_file;

#[derive(Parser)]
#[command(name = "tack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sticky boundary detection scene runner", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scene's scroll script and print every transition
    Replay {
        /// Scene file
        scene: PathBuf,

        /// Scroll offsets to use instead of the scene's script
        #[arg(long = "to", value_delimiter = ',', allow_negative_numbers = true)]
        offsets: Vec<f32>,
    },

    /// Print the computed marker geometry of every section
    Geometry {
        /// Scene file
        scene: PathBuf,
    },

    /// Write a starter scene file
    Init {
        /// Output path
        #[arg(default_value = "scene.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Replay { scene, offsets } => cmd_replay(&scene, &offsets),
        Commands::Geometry { scene } => cmd_geometry(&scene),
        Commands::Init { path, force } => cmd_init(&path, force),
    }
}

fn cmd_replay(path: &Path, offsets: &[f32]) -> Result<()> {
    let spec = scene_file::load(path)?;
    let script = if offsets.is_empty() {
        spec.scroll.clone()
    } else {
        offsets.to_vec()
    };

    if spec.sections.is_empty() {
        warn!("{} has no sections", path.display());
    }
    if script.is_empty() {
        warn!("No scroll offsets to replay");
    }

    let mut scene = Scene::build(&spec)?;
    info!(
        "Replaying {} offsets over {} sections",
        script.len(),
        scene.sections().len()
    );

    for event in scene.history() {
        info!(
            "initial: {} {}",
            scene.section_name(event.section).unwrap_or("?"),
            event.transition.kind
        );
    }

    for &y in &script {
        for event in scene.scroll_to(y) {
            info!(
                "scroll {:>8.1}: {} {}",
                event.scroll_y,
                scene.section_name(event.section).unwrap_or("?"),
                event.transition.kind
            );
        }
    }

    for (index, section) in scene.sections().iter().enumerate() {
        let (stuck, unstuck) = scene
            .history()
            .iter()
            .filter(|e| e.section == index)
            .fold((0, 0), |(s, u), e| match e.transition.kind {
                TransitionKind::Stuck => (s + 1, u),
                TransitionKind::Unstuck => (s, u + 1),
            });
        info!("{}: {} stuck, {} unstuck", section.name, stuck, unstuck);
    }

    scene.unmount_all();
    Ok(())
}

fn cmd_geometry(path: &Path) -> Result<()> {
    let spec = scene_file::load(path)?;
    let scene = Scene::build(&spec)?;

    for report in scene.geometry() {
        match report.geometry {
            Some(geometry) => info!(
                "{}: top offset {} ({}px), bottom height {} ({}px)",
                report.name,
                geometry.top_offset,
                report.top_offset_px.unwrap_or_default(),
                geometry.bottom_height,
                report.bottom_height_px.unwrap_or_default()
            ),
            None => warn!("{}: target could not be measured", report.name),
        }
    }

    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    scene_file::write_starter(path, force)?;
    info!("Wrote starter scene to {}", path.display());
    info!("Run `tack replay {}` to replay it", path.display());
    Ok(())
}

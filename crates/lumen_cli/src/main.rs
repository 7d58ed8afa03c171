use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;
mod logger;
mod output;
mod scenes;
mod settings;

use cli::Args;
use logger::init_logger;
use settings::RenderSettings;

const DEFAULT_OUTPUT: &str = "image.ppm";

fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.log_level.into());

    info!("Lumen {}", env!("CARGO_PKG_VERSION"));

    let file_settings = match &args.config {
        Some(path) => RenderSettings::load(path)?,
        None => RenderSettings::default(),
    };
    let settings = file_settings.merge(args.overrides());

    let (world, mut camera) = scenes::build(args.scene, settings.seed.unwrap_or(0))?;
    settings.apply(&mut camera);

    let output = settings.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    info!("Rendering {:?} scene to {}", args.scene, output.display());

    output::render_to_file(&mut camera, &world, &output)?;

    Ok(())
}

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::{debug, info};

use raycastlib::{render, LightMixing, PpmFormat, Scene};

/// Render a JSON scene description into a raster image by raycasting.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Output image width in pixels
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Output image height in pixels
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Path to the JSON scene description
    scene: PathBuf,

    /// Path of the image to write; the container is chosen by extension
    /// (.ppm, .png, ...)
    output: PathBuf,

    /// How contributions from multiple lights combine per pixel
    #[arg(long, value_enum, default_value_t = MixingArg::Accumulate)]
    light_mixing: MixingArg,

    /// Write ASCII (P3) instead of binary (P6) data for .ppm outputs
    #[arg(long)]
    ascii: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MixingArg {
    /// Sum the contributions of all unshadowed lights
    Accumulate,
    /// Let the last unshadowed light in scene order decide the pixel
    Overwrite,
}

impl From<MixingArg> for LightMixing {
    fn from(arg: MixingArg) -> LightMixing {
        match arg {
            MixingArg::Accumulate => LightMixing::Accumulate,
            MixingArg::Overwrite => LightMixing::Overwrite,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(error) = run(&args) {
        log::error!("{error:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let scene = Scene::from_file(&args.scene)
        .with_context(|| format!("failed to load scene from {}", args.scene.display()))?;
    info!(
        "loaded scene: {} objects, {} lights",
        scene.primitives.len(),
        scene.light_count()
    );
    debug!("{scene:?}");

    let start = Instant::now();
    let image = render(&scene, args.width, args.height, args.light_mixing.into())?;
    info!(
        "rendered {}x{} pixels in {:.2?}",
        args.width,
        args.height,
        start.elapsed()
    );

    let is_ppm = args
        .output
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("ppm"));
    if args.ascii && is_ppm {
        let writer = BufWriter::new(File::create(&args.output)?);
        image.write_ppm(writer, PpmFormat::Ascii)?;
    } else {
        image.save(&args.output)?;
    }
    info!("wrote {}", args.output.display());
    Ok(())
}

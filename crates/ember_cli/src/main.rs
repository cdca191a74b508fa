//! Command-line front end: render a demo scene to a PNG file.

mod scenes;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ember_math::Vec3;
use ember_renderer::{render, RenderConfig};

use crate::scenes::SceneKind;

#[derive(Parser, Debug)]
#[command(name = "ember", version, about = "Monte Carlo path tracer")]
struct Args {
    /// Scene to render
    #[arg(long, short, value_enum, default_value = "cornell")]
    scene: SceneKind,

    /// Image width in pixels
    #[arg(long, short = 'W', default_value_t = 500)]
    width: u32,

    /// Image height in pixels
    #[arg(long, short = 'H', default_value_t = 500)]
    height: u32,

    /// Samples per pixel
    #[arg(long, short = 'n', default_value_t = 100)]
    samples: u32,

    /// Maximum number of bounces per path
    #[arg(long, default_value_t = 50)]
    max_depth: u32,

    /// Base seed for scene layout and sampling
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Image wrapped around the globe in the earth scene
    #[arg(long, value_name = "IMAGE")]
    texture: Option<PathBuf>,

    /// Output PNG path
    #[arg(long, short, value_name = "FILE", default_value = "render.png")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    log::info!("Building {:?} scene", args.scene);

    let demo = scenes::build(
        args.scene,
        args.width,
        args.height,
        args.seed,
        args.texture.as_deref(),
    )?;
    let config = RenderConfig {
        samples_per_pixel: args.samples.max(1),
        max_depth: args.max_depth,
        background: Vec3::ZERO,
        use_sky_gradient: demo.use_sky_gradient,
        seed: args.seed,
    };

    let image = render(&demo.camera, &demo.scene, &config);

    let png = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba())
        .context("Rendered buffer does not match image dimensions")?;
    png.save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!("Wrote {}", args.output.display());
    Ok(())
}

use std::{path::Path, process, time::Instant};

use clap::Parser;
use ember::{
    output,
    render::{render, ExecMode, RenderOptions},
    rng, scenes,
    vec3::Float,
};
use indicatif::ProgressBar;
use log::info;

#[derive(Parser)]
#[command(name = "ember", about = "A toy Monte-Carlo path tracer")]
struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 450, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Samples per pixel
    #[arg(short, long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    samples: u32,

    /// Maximum bounces per path
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..))]
    depth: u32,

    /// RNG seed; defaults to a fixed constant so renders are reproducible
    #[arg(long)]
    seed: Option<u64>,

    /// Keep only every n-th sphere of the random field
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    sphere_step: u64,

    /// Render on a single sequential task instead of the parallel grid
    #[arg(long)]
    serial: bool,

    /// Output file path (.png or .ppm)
    #[arg(short, long, default_value = "out.png")]
    output: String,
}

enum OutputFormat {
    Png,
    Ppm,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Usage errors are reported before any rendering starts
    let format = match Path::new(&args.output).extension().and_then(|e| e.to_str()) {
        Some("png") => OutputFormat::Png,
        Some("ppm") => OutputFormat::Ppm,
        _ => {
            log::error!(
                "unsupported output file '{}': only .png and .ppm are supported",
                args.output
            );
            process::exit(2);
        }
    };

    let seed = args.seed.unwrap_or(rng::DEFAULT_SEED);
    info!(
        "rendering {}x{} at {} spp, depth {}, seed {}",
        args.width, args.height, args.samples, args.depth, seed
    );

    let mut scene_rng = rng::seeded(seed);
    let world = scenes::cover_scene(args.sphere_step as usize, &mut scene_rng);
    let camera = scenes::cover_camera(args.width as Float / args.height as Float);
    info!("scene holds {} objects", world.len());

    let opts = RenderOptions {
        width: args.width,
        height: args.height,
        samples_per_pixel: args.samples,
        max_depth: args.depth,
        seed,
        mode: if args.serial {
            ExecMode::Serial
        } else {
            ExecMode::Parallel
        },
    };

    let progress = ProgressBar::new(u64::from(args.width) * u64::from(args.height));
    let start = Instant::now();
    let frame = render(&world, &camera, &opts, progress);
    info!("render finished in {:.2}s", start.elapsed().as_secs_f32());

    let saved = match format {
        OutputFormat::Png => output::save_png(&frame, &args.output).map_err(|e| e.to_string()),
        OutputFormat::Ppm => output::save_ppm(&frame, &args.output).map_err(|e| e.to_string()),
    };
    if let Err(err) = saved {
        log::error!("could not write '{}': {err}", args.output);
        process::exit(1);
    }
    info!("wrote {}", args.output);
}

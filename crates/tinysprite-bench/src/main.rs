mod app;
mod kittens;
mod sheet;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::dpi::LogicalSize;

use tinysprite::device::GpuInit;
use tinysprite::logging::{init_logging, LoggingConfig};
use tinysprite::render::BatchConfig;
use tinysprite::window::{Runtime, RuntimeConfig};

/// Falling, bouncing kittens. Hold the left mouse button to add more.
#[derive(Parser, Debug)]
#[command(name = "tinysprite-bench", version)]
struct Args {
    /// Where sprite transforms are applied.
    #[arg(long, value_enum, default_value_t = Mode::Sprite)]
    mode: Mode,

    /// Kittens at startup.
    #[arg(long, default_value_t = 2)]
    start: usize,

    /// Kittens added per frame while the mouse button is held.
    #[arg(long, default_value_t = 100)]
    add: usize,

    /// Quads per draw call.
    #[arg(long, default_value_t = BatchConfig::default().capacity)]
    capacity: usize,

    /// Seed for the simulation; random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Present with vsync instead of as fast as possible.
    #[arg(long)]
    vsync: bool,

    /// Debug logging for tinysprite and the bench.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Mode {
    /// CPU matrix stack (push/translate/rotate/img/pop per sprite).
    Sprite,
    /// Per-vertex transform attributes, applied in the vertex shader.
    Instanced,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(if args.verbose {
        LoggingConfig::with_filter("info,tinysprite=debug,tinysprite_bench=debug,wgpu_core=warn")
    } else {
        LoggingConfig::default()
    });

    let batch = BatchConfig { capacity: args.capacity };
    batch.validate().context("invalid --capacity")?;

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("mode {:?}, seed {seed}, batch capacity {}", args.mode, batch.capacity);

    let app = app::BenchApp::new(
        args.mode,
        batch,
        args.start,
        args.add,
        StdRng::seed_from_u64(seed),
    );

    let gpu_init = GpuInit {
        present_mode: if args.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        },
        ..GpuInit::default()
    };

    Runtime::run(
        RuntimeConfig {
            title: "tinysprite kittens".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        },
        gpu_init,
        app,
    )
}

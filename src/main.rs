//! Command-line entry point: run the particle backdrop.

use anyhow::Result;
use clap::Parser;

use particle_backdrop::{BackdropConfig, FieldConfig};

#[derive(Parser)]
#[command(name = "particle-backdrop")]
#[command(about = "Drifting, connected dots behind everything on screen", long_about = None)]
#[command(version)]
struct Cli {
    /// Window width in logical pixels (requires --height). Covers the monitor when omitted.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Window height in logical pixels (requires --width).
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Seed the particle generator for a reproducible field
    #[arg(long)]
    seed: Option<u64>,

    /// Draw over a solid background instead of the desktop
    #[arg(long)]
    opaque: bool,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn backdrop_config(&self) -> BackdropConfig {
        let mut field = FieldConfig::new();
        if let Some(seed) = self.seed {
            field = field.with_seed(seed);
        }

        let mut config = BackdropConfig::new().with_field(field);
        if let (Some(width), Some(height)) = (self.width, self.height) {
            config = config.with_window_size(width, height);
        }
        if self.opaque {
            config = config.opaque();
        }
        config
    }

    /// Default log filter; `RUST_LOG` still takes precedence.
    fn log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, 2) => "debug",
            _ => "trace",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    particle_backdrop::run(cli.backdrop_config())?;
    Ok(())
}

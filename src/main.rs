use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use svgpaint::{draw_svg, Target};

#[derive(Parser)]
#[command(name = "svgpaint")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Rasterize simple svg documents to png", long_about = None)]
struct Cli {
    /// Document to render
    input: PathBuf,

    /// Output path, defaults to the input with a .png extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target width in pixels
    #[arg(long, default_value = "400")]
    width: u32,

    /// Target height in pixels
    #[arg(long, default_value = "400")]
    height: u32,

    /// Scale both axes by the same factor
    #[arg(short, long)]
    keep_aspect: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
	if cli.verbose {
	    EnvFilter::new("debug")
	} else {
	    EnvFilter::new("info")
	}
    });

    tracing_subscriber::registry()
	.with(fmt::layer())
	.with(filter)
	.init();

    let output = cli.output.clone().unwrap_or_else(|| cli.input.with_extension("png"));
    let file = File::open(&cli.input).with_context(|| format!("failed to open {}", cli.input.display()))?;

    let rendering = draw_svg(BufReader::new(file), Target::new(cli.width, cli.height), cli.keep_aspect)
	.with_context(|| format!("failed to draw {}", cli.input.display()))?;

    rendering
	.raster
	.save_png(&output)
	.with_context(|| format!("failed to write {}", output.display()))?;

    info!(
	width = rendering.resolution.width,
	height = rendering.resolution.height,
	skipped_commands = rendering.diagnostics.len(),
	"wrote {}",
	output.display()
    );

    Ok(())
}

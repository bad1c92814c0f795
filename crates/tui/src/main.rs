mod logging;
mod renderer;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use elevation_profile_core::svg::render_svg;
use elevation_profile_core::{ChartConfig, ProfileChart, ProfileSnapshot, parse_auto, update};
use elevation_profile_protocol::Viewport;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Elevation profile charts for GPS tracks", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG wins if set
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the profile to a standalone SVG file
    Svg(SvgArgs),
    /// Print the sample a distance resolves to, as JSON
    Probe(ProbeArgs),
    /// Explore the profile interactively in the terminal
    View(ViewArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Profile input: JSON lines, a full input object, or GeoJSON
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Simplification tolerance in meters, overriding the input's
    #[arg(long)]
    tolerance: Option<f64>,

    /// Chart configuration JSON (margin, tickSize, dark)
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SvgArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output file; stdout when omitted
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 300.0)]
    height: f64,

    /// Use the dark palette
    #[arg(long, action = ArgAction::SetTrue)]
    dark: bool,
}

#[derive(Args, Debug)]
struct ProbeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Distance along the route in meters
    #[arg(long, allow_negative_numbers = true)]
    distance: f64,
}

#[derive(Args, Debug)]
struct ViewArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Where to write logs while the terminal is in use
    #[arg(long, default_value = "elevation-profile.log", value_hint = ValueHint::FilePath)]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Svg(args) => {
            logging::init_stderr(cli.verbose);
            handle_svg(&args)
        }
        Command::Probe(args) => {
            logging::init_stderr(cli.verbose);
            handle_probe(&args)
        }
        Command::View(args) => {
            let _guard = logging::init_file(cli.verbose, &args.log_file);
            handle_view(&args)
        }
    }
}

fn load_snapshot(args: &InputArgs) -> Result<ProfileSnapshot> {
    let path = &args.input;
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut input =
        parse_auto(&data).with_context(|| format!("failed to parse {}", path.display()))?;
    if let Some(tolerance) = args.tolerance {
        input.tolerance = tolerance;
    }
    let snapshot = update(&input)
        .with_context(|| format!("inconsistent segments in {}", path.display()))?;
    info!(
        path = %path.display(),
        samples = snapshot.buffer().len(),
        gaps = snapshot.buffer().gaps().len(),
        "loaded profile"
    );
    Ok(snapshot)
}

fn load_config(path: Option<&Path>) -> Result<ChartConfig> {
    let Some(path) = path else {
        return Ok(ChartConfig::default());
    };
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    ChartConfig::from_json(&data).with_context(|| format!("invalid config {}", path.display()))
}

fn handle_svg(args: &SvgArgs) -> Result<()> {
    let snapshot = load_snapshot(&args.input)?;
    let mut config = load_config(args.input.config.as_deref())?;
    config.dark |= args.dark;

    let chart = ProfileChart::new(snapshot, config, Viewport::new(args.width, args.height));
    let svg = render_svg(&chart.render(), args.width, args.height, config.dark);

    match &args.output {
        Some(path) => {
            fs::write(path, &svg).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = svg.len(), "wrote svg");
        }
        None => writeln!(io::stdout().lock(), "{svg}")?,
    }
    Ok(())
}

fn handle_probe(args: &ProbeArgs) -> Result<()> {
    let snapshot = load_snapshot(&args.input)?;
    let result = snapshot.correlate(args.distance)?;
    let json = match result {
        Some((hit, segments)) => serde_json::json!({
            "index": hit.index,
            "coordinate": hit.coordinate,
            "segments": segments,
        }),
        None => serde_json::Value::Null,
    };
    writeln!(io::stdout().lock(), "{}", serde_json::to_string_pretty(&json)?)?;
    Ok(())
}

fn handle_view(args: &ViewArgs) -> Result<()> {
    let snapshot = load_snapshot(&args.input)?;
    let config = load_config(args.input.config.as_deref())?;
    let title = format!(
        " elevation-profile · {} · {} samples ",
        args.input.input.display(),
        snapshot.buffer().len()
    );
    // Real size is picked up on the first frame.
    let chart = ProfileChart::new(snapshot, config, Viewport::new(0.0, 0.0));
    renderer::run_view(chart, title)
}

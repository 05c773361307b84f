//! gapminder: animate the Gapminder dataset into an SVG file.
//!
//! Run: `gapminder --data data/data.json --out gapminder.svg`
//! Open the SVG in a browser that auto-reloads, or export every frame with
//! `--frames-dir frames/`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use gapminder_viz::chart::{ChartRenderer, ChartScales};
use gapminder_viz::config::Config;
use gapminder_viz::data::load_with_timeout;
use gapminder_viz::driver::{stop_channel, FrameDriver};
use gapminder_viz::output::{ChartSvg, FrameSink, SvgFileSink, SvgFrameDirSink};

/// gapminder: animated income vs. life expectancy, 1800-2014
#[derive(Parser, Debug)]
#[command(name = "gapminder")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Animated Gapminder scatter plot rendered to SVG", long_about = None)]
struct Cli {
    /// Dataset JSON file (overrides `data.path` in the config)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tick period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Stop after this many ticks (runs until ctrl-c otherwise)
    #[arg(long)]
    ticks: Option<u64>,

    /// SVG file rewritten on every tick
    #[arg(short, long, conflicts_with = "frames_dir")]
    out: Option<PathBuf>,

    /// Directory receiving one numbered SVG per frame
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Give up loading the dataset after this many milliseconds
    #[arg(long)]
    load_timeout_ms: Option<u64>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,gapminder_viz=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// CLI > file > defaults.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default_path().map(Config::load_or_default).unwrap_or_default(),
    };

    if let Some(tick_ms) = cli.tick_ms {
        config.animation.tick_ms = tick_ms;
    }
    if let Some(timeout) = cli.load_timeout_ms {
        config.data.load_timeout_ms = timeout;
    }
    if let Some(data) = &cli.data {
        config.data.path = Some(data.clone());
    }

    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let Some(data_path) = config.data.path.clone() else {
        bail!("no dataset given: pass --data or set data.path in the config");
    };

    let timeline = load_with_timeout(&data_path, config.load_timeout(), config.animation.base_year)
        .await
        .with_context(|| format!("failed to load {}", data_path.display()))?;

    let layout = config.chart.layout()?;
    let renderer = ChartRenderer::new(ChartScales::new(&layout)?, config.tick_period());
    let mut driver = FrameDriver::start(timeline, renderer)?;
    let chart = ChartSvg::new(layout)?;

    let mut sink: Box<dyn FrameSink> = match &cli.frames_dir {
        Some(dir) => Box::new(SvgFrameDirSink::new(chart, dir)?),
        None => {
            let out = cli.out.clone().unwrap_or_else(|| PathBuf::from("gapminder.svg"));
            tracing::info!(path = %out.display(), "writing animation");
            Box::new(SvgFileSink::new(chart, out))
        }
    };

    let (handle, stop) = stop_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, stopping");
            handle.stop();
        }
    });

    let summary = driver.run(config.tick_period(), sink.as_mut(), stop, cli.ticks).await?;
    println!("{} ticks, last year {}", summary.ticks, summary.year);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

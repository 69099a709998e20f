use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use blendstack::{
    AlgorithmDescriptor, Background, BenchBudget, BenchOpts, BlendOpts, CompressionLevel,
    EncodeOpts, Engine, EngineOpts, FilterStrategy, MultipleOpts, Output, Source,
    ensure_parent_dir,
};

#[derive(Parser, Debug)]
#[command(name = "blendstack", version, about = "Composite RGBA image stacks")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Worker threads for per-pixel work (defaults to rayon's global pool).
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Blend two PNGs into one.
    Blend(BlendArgs),
    /// Composite N PNGs, first file at the bottom.
    Multiple(MultipleArgs),
    /// Time every algorithm × compression × filter over the given PNGs.
    Benchmark(BenchmarkArgs),
    /// Composite the sole/back/front/shoelace fixture set over a background.
    Compose(ComposeArgs),
    /// Print build and capability metadata as JSON.
    Version,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// PNG compression (fast, default, best, huffman, rle).
    #[arg(short, long, default_value = "fast")]
    compression: String,

    /// PNG filter (nofilter, sub, up, avg, paeth, adaptive).
    #[arg(short, long, default_value = "nofilter")]
    filter: String,
}

impl EncodeArgs {
    fn opts(&self) -> anyhow::Result<EncodeOpts> {
        Ok(EncodeOpts::parse(
            Some(self.compression.as_str()),
            Some(self.filter.as_str()),
        )?)
    }
}

#[derive(Parser, Debug)]
struct BlendArgs {
    /// Bottom layer.
    #[arg(long)]
    bottom: PathBuf,

    /// Top layer.
    #[arg(long)]
    top: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Algorithm name or JSON descriptor (default: multiplicative).
    #[arg(long)]
    algorithm: Option<String>,

    #[command(flatten)]
    encode: EncodeArgs,
}

#[derive(Parser, Debug)]
struct MultipleArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Algorithm for every step, as a name or JSON descriptor (default: multiplicative).
    #[arg(long)]
    algorithm: Option<String>,

    /// Per-step algorithms: comma-separated names or a JSON array of descriptors.
    #[arg(long)]
    algorithms: Option<String>,

    #[command(flatten)]
    encode: EncodeArgs,

    /// Layers, bottom first.
    #[arg(required = true, num_args = 1..)]
    layers: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct BenchmarkArgs {
    /// Algorithms to time: comma-separated names, one JSON descriptor or a JSON array
    /// (default: all registered).
    #[arg(long)]
    algorithms: Option<String>,

    /// Compression levels to sweep (default: all).
    #[arg(long, value_delimiter = ',')]
    compressions: Option<Vec<String>>,

    /// Filters to sweep (default: all).
    #[arg(long, value_delimiter = ',')]
    filters: Option<Vec<String>>,

    /// Stop after this many runs.
    #[arg(long)]
    max_runs: Option<usize>,

    /// Stop launching runs after this many seconds.
    #[arg(long)]
    max_seconds: Option<f64>,

    /// Print the report as JSON instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Layers, bottom first (two or more).
    #[arg(required = true, num_args = 2..)]
    layers: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Directory holding the fixture PNGs; results are written next to them.
    #[arg(long)]
    dir: PathBuf,

    /// Background (alpha, white, blue, texture).
    #[arg(long, default_value = "alpha")]
    background: String,

    /// Algorithms to compose with: comma-separated names, one JSON descriptor or a JSON array
    /// (default: all registered).
    #[arg(long)]
    algorithms: Option<String>,

    #[command(flatten)]
    encode: EncodeArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let engine = Engine::with_opts(EngineOpts {
        threads: cli.threads,
        ..EngineOpts::default()
    })?;

    match cli.cmd {
        Command::Blend(args) => cmd_blend(&engine, args),
        Command::Multiple(args) => cmd_multiple(&engine, args),
        Command::Benchmark(args) => cmd_benchmark(&engine, args),
        Command::Compose(args) => cmd_compose(&engine, args),
        Command::Version => cmd_version(&engine),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_descriptor(raw: &str) -> anyhow::Result<AlgorithmDescriptor> {
    let raw = raw.trim();
    if raw.starts_with('{') {
        serde_json::from_str(raw).with_context(|| format!("parse algorithm descriptor '{raw}'"))
    } else {
        Ok(AlgorithmDescriptor::named(raw))
    }
}

fn parse_descriptor_list(raw: &str) -> anyhow::Result<Vec<AlgorithmDescriptor>> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        serde_json::from_str(raw).with_context(|| format!("parse algorithm list '{raw}'"))
    } else if raw.starts_with('{') {
        Ok(vec![parse_descriptor(raw)?])
    } else {
        raw.split(',').map(parse_descriptor).collect()
    }
}

fn cmd_blend(engine: &Engine, args: BlendArgs) -> anyhow::Result<()> {
    let opts = BlendOpts {
        algorithm: args.algorithm.as_deref().map(parse_descriptor).transpose()?,
    };
    ensure_parent_dir(&args.out)?;
    engine
        .blend_images(
            &Source::Path(args.bottom),
            &Source::Path(args.top),
            &Output::Path(args.out.clone()),
            &opts,
            args.encode.opts()?,
        )
        .with_context(|| format!("blend into '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_multiple(engine: &Engine, args: MultipleArgs) -> anyhow::Result<()> {
    let opts = MultipleOpts {
        algorithm: args.algorithm.as_deref().map(parse_descriptor).transpose()?,
        algorithms: args
            .algorithms
            .as_deref()
            .map(parse_descriptor_list)
            .transpose()?,
    };
    let sources: Vec<Source> = args.layers.into_iter().map(Source::Path).collect();
    ensure_parent_dir(&args.out)?;
    engine
        .blend_multiple(
            &sources,
            &Output::Path(args.out.clone()),
            &opts,
            args.encode.opts()?,
        )
        .with_context(|| format!("blend into '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_benchmark(engine: &Engine, args: BenchmarkArgs) -> anyhow::Result<()> {
    let defaults = BenchOpts::default();
    let opts = BenchOpts {
        algorithms: args
            .algorithms
            .as_deref()
            .map(parse_descriptor_list)
            .transpose()?,
        compressions: match args.compressions {
            Some(list) => list
                .iter()
                .map(|s| s.parse::<CompressionLevel>())
                .collect::<Result<Vec<_>, _>>()?,
            None => defaults.compressions,
        },
        filters: match args.filters {
            Some(list) => list
                .iter()
                .map(|s| s.parse::<FilterStrategy>())
                .collect::<Result<Vec<_>, _>>()?,
            None => defaults.filters,
        },
        keep_outputs: false,
        budget: BenchBudget {
            max_runs: args.max_runs,
            max_wall: args
                .max_seconds
                .map(Duration::try_from_secs_f64)
                .transpose()
                .context("invalid --max-seconds")?,
        },
    };

    let sources: Vec<Source> = args.layers.into_iter().map(Source::Path).collect();
    let report = match sources.as_slice() {
        [bottom, top] => engine.blend_images_benchmark_all(bottom, top, &opts),
        _ => engine.blend_multiple_benchmark_all(&sources, &opts),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn cmd_compose(engine: &Engine, args: ComposeArgs) -> anyhow::Result<()> {
    let background: Background = args.background.parse()?;
    let encode = args.encode.opts()?;
    let algorithms: Vec<AlgorithmDescriptor> = match args.algorithms.as_deref() {
        Some(raw) => parse_descriptor_list(raw)?,
        None => engine
            .registry()
            .names()
            .into_iter()
            .map(AlgorithmDescriptor::named)
            .collect(),
    };

    for algorithm in &algorithms {
        let outcome = engine
            .compose_fixtures(&args.dir, algorithm, background, encode)
            .with_context(|| format!("compose with '{algorithm}'"))?;
        println!("{:<20}{}", algorithm.name(), outcome.timings);
        eprintln!("wrote {}", outcome.path.display());
    }
    Ok(())
}

fn cmd_version(engine: &Engine) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&engine.module_constants())?
    );
    Ok(())
}

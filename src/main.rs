//! Command-line front-end of the edep-sim analyses

use clap::{ArgAction, Args, Parser, Subcommand};
use edepsim_analysis::{
    analysis::{elastic, kaon},
    config::Configuration,
    inspector::{Flow, Session},
    output, skim,
    source::EventChain,
    Result,
};
use eyre::WrapErr;
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "edep-analysis")]
#[command(about = "Truth-level analyses of edep-sim neutrino events")]
#[command(version)]
struct Cli {
    /// Print more log messages (-v for debug, -vv for trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Analysis configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Neutral-current elastic proton selection
    Elastic(AnalysisArgs),
    /// K0s → π⁻π⁺ selection in charged-current events
    Kaon(AnalysisArgs),
    /// Keep only the events with a primary kaon
    Skim(SkimArgs),
    /// Look at individual events
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct AnalysisArgs {
    /// Histogram output file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Event files, chained in order
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct SkimArgs {
    /// Event file to be skimmed
    #[arg(long = "in-file", short = 'i')]
    input: PathBuf,

    /// Skimmed event file
    #[arg(long = "out-file", short = 'o')]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Event to start from
    #[arg(long, short = 'e', default_value_t = 0)]
    event: usize,

    /// Run these commands instead of reading them from the terminal
    #[arg(long = "command", short = 'c')]
    commands: Vec<String>,

    /// Event files, chained in order
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    let cfg = match &cli.config {
        Some(path) => Configuration::load(path).wrap_err("Failed to load the configuration")?,
        None => {
            let cfg = Configuration::default();
            cfg.print();
            cfg
        }
    };

    match cli.command {
        Commands::Elastic(args) => run_elastic(&cfg, args),
        Commands::Kaon(args) => run_kaon(&cfg, args),
        Commands::Skim(args) => run_skim(&cfg, args),
        Commands::Inspect(args) => run_inspector(args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        Level::WARN
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.as_str()))
        .wrap_err("failed to initialize tracing filter")?;

    // Keep stdout for the inspector
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn open_chain(files: &[PathBuf]) -> Result<EventChain> {
    let chain = EventChain::open(files).wrap_err("Failed to load the events")?;
    info!("Reading {} events...", chain.len());
    Ok(chain)
}

fn output_path(args: &AnalysisArgs, default: &str) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| Path::new(default).to_owned())
}

fn run_elastic(cfg: &Configuration, args: AnalysisArgs) -> Result<()> {
    let chain = open_chain(&args.files)?;

    // NOTE: Timing excludes event file I/O
    let saved_time = Instant::now();
    let results = elastic::run(cfg, &chain);
    results.log_summary();

    output::write_histograms(
        output_path(&args, elastic::DEFAULT_OUTPUT),
        &results.into_histograms(),
    )
    .wrap_err("Failed to output the results")?;
    info!("Elapsed time: {}", output::format_elapsed(saved_time.elapsed()));
    Ok(())
}

fn run_kaon(cfg: &Configuration, args: AnalysisArgs) -> Result<()> {
    let chain = open_chain(&args.files)?;

    let saved_time = Instant::now();
    let results = kaon::run(cfg, &chain);
    results.log_summary();

    output::write_histograms(
        output_path(&args, kaon::DEFAULT_OUTPUT),
        &results.into_histograms(),
    )
    .wrap_err("Failed to output the results")?;
    info!("Elapsed time: {}", output::format_elapsed(saved_time.elapsed()));
    Ok(())
}

fn run_skim(cfg: &Configuration, args: SkimArgs) -> Result<()> {
    let saved_time = Instant::now();
    skim::skim_file(&args.input, &args.output, cfg.progress_steps)
        .wrap_err_with(|| format!("Failed to skim {}", args.input.display()))?;
    info!("Elapsed time: {}", output::format_elapsed(saved_time.elapsed()));
    Ok(())
}

fn run_inspector(args: InspectArgs) -> Result<()> {
    let chain = EventChain::open(&args.files).wrap_err("Failed to load the events")?;
    info!("Loading event {} by default", args.event);
    let mut session = Session::new(&chain, args.event)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.commands.is_empty() {
        writeln!(out, "Type \"help\" for the list of commands")?;
        return session.run(io::stdin().lock(), &mut out);
    }
    for command in &args.commands {
        if session.execute_line(command, &mut out)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use bruh::config::Config;
use bruh::pipeline::{Action, Pipeline, PipelineOptions, WriteMode};
use bruh::report::write_outcome;
use bruh::version::selector::SelectionPolicy;

#[derive(Parser)]
#[command(name = "bruh")]
#[command(version, about = "Scan and update the API versions of Azure resources in Bicep files")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to a JSON config file (defaults to $XDG_CONFIG_HOME/bruh/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Report the API versions in use and the versions available
    Scan(ScanArgs),
    /// Rewrite files to the selected API versions
    Update(UpdateArgs),
}

#[derive(Args)]
struct ScanArgs {
    /// A .bicep file or a directory containing .bicep files
    #[arg(short, long)]
    path: PathBuf,

    /// Consider preview versions when selecting the latest version
    #[arg(long)]
    include_preview: bool,

    /// Only show outdated or unresolved references
    #[arg(short = 'u', long)]
    outdated: bool,

    /// Report references whose versions could not be fetched instead of failing
    #[arg(long)]
    keep_going: bool,
}

#[derive(Args)]
struct UpdateArgs {
    /// A .bicep file or a directory containing .bicep files
    #[arg(short, long)]
    path: PathBuf,

    /// Overwrite files instead of writing <name>_updated.bicep next to them
    #[arg(short, long)]
    in_place: bool,

    /// Consider preview versions when selecting the latest version
    #[arg(long)]
    include_preview: bool,

    /// Do not print the update report
    #[arg(short, long)]
    silent: bool,
}

fn init_tracing(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path {:?}", path))?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .init();

            Ok(Some(guard))
        }
        None => {
            // Logs go to stderr, reports to stdout
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();

            Ok(None)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let (path, options, outdated_only, silent) = match cli.command {
        Command::Scan(args) => {
            let mut options =
                PipelineOptions::new(Action::Scan, SelectionPolicy::new(args.include_preview));
            options.keep_going = args.keep_going;
            (args.path, options, args.outdated, false)
        }
        Command::Update(args) => {
            let mode = if args.in_place {
                WriteMode::InPlace
            } else {
                WriteMode::SideBySide
            };
            let options =
                PipelineOptions::new(Action::Update(mode), SelectionPolicy::new(args.include_preview));
            (args.path, options, false, args.silent)
        }
    };

    let pipeline = Pipeline::from_config(&config, options);
    info!("Running {:?} on {:?}", pipeline.options().action, path);

    let outcome = pipeline.run(&path).await?;

    if !silent {
        let mut stdout = std::io::stdout().lock();
        write_outcome(&mut stdout, &outcome, pipeline.options().action, outdated_only)?;
        stdout.flush()?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(&cli.log_level, cli.log_file.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

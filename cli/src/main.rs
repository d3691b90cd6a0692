use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use sevenzip_core::{CompressionLevel, EntryStrategyKind, ListingParser};
use sevenzip_runner::output::{ArchiveReport, OutputFormat, format_listing, format_reports};
use sevenzip_runner::{
    ExecutableSource, PlatformExecutableSource, RunnerConfig, RunnerError, SevenZipArchive,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
            CliOutputFormat::Markdown => Self::Markdown,
            CliOutputFormat::Table => Self::Table,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliCompressionLevel {
    Store,
    Fastest,
    Fast,
    Normal,
    Maximum,
    Ultra,
}

impl From<CliCompressionLevel> for CompressionLevel {
    fn from(level: CliCompressionLevel) -> Self {
        match level {
            CliCompressionLevel::Store => Self::Store,
            CliCompressionLevel::Fastest => Self::Fastest,
            CliCompressionLevel::Fast => Self::Fast,
            CliCompressionLevel::Normal => Self::Normal,
            CliCompressionLevel::Maximum => Self::Maximum,
            CliCompressionLevel::Ultra => Self::Ultra,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliStrategy {
    FixedWidth,
    Pattern,
}

impl From<CliStrategy> for EntryStrategyKind {
    fn from(strategy: CliStrategy) -> Self {
        match strategy {
            CliStrategy::FixedWidth => Self::FixedWidth,
            CliStrategy::Pattern => Self::Pattern,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "sz7")]
#[command(version)]
#[command(about = "List, extract and create archives with the 7-Zip executable")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// YAML runner configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Path to the 7-Zip executable (skips discovery).
    #[arg(long, global = true)]
    executable: Option<PathBuf>,
    /// Kill 7-Zip if it runs longer than this many milliseconds.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the contents of one or more archives.
    List(ListArgs),
    /// Extract an archive into a directory.
    Extract(ExtractArgs),
    /// Create an archive from the contents of a folder.
    Create(CreateArgs),
    /// Print the path of the 7-Zip executable that would be used.
    Locate,
    /// Parse saved `7z l` output from a file without running 7-Zip.
    ParseFile(ParseFileArgs),
    /// Parse `7z l` output from stdin without running 7-Zip.
    ParseStdin(ParseStdinArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Archives to list.
    #[arg(required = true)]
    archives: Vec<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Number of archives listed in parallel (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Archive to extract.
    archive: PathBuf,
    /// Destination directory (created if missing).
    #[arg(long, short)]
    output: PathBuf,
}

#[derive(Debug, Args)]
struct CreateArgs {
    /// Archive file to create.
    archive: PathBuf,
    /// Folder whose contents are added recursively.
    #[arg(long)]
    folder: PathBuf,
    /// Compression preset.
    #[arg(long, default_value = "normal")]
    level: CliCompressionLevel,
}

#[derive(Debug, Args)]
struct ParseFileArgs {
    /// File holding captured `7z l` output.
    #[arg(long)]
    input: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Row parser.
    #[arg(long, default_value = "fixed-width")]
    strategy: CliStrategy,
}

#[derive(Debug, Args)]
struct ParseStdinArgs {
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Row parser.
    #[arg(long, default_value = "fixed-width")]
    strategy: CliStrategy,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let result = match cli.command {
        Command::List(args) => run_list(&cli.global, args),
        Command::Extract(args) => run_extract(&cli.global, args),
        Command::Create(args) => run_create(&cli.global, args),
        Command::Locate => run_locate(&cli.global),
        Command::ParseFile(args) => run_parse_file(args),
        Command::ParseStdin(args) => run_parse_stdin(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn load_config(global: &GlobalArgs) -> Result<RunnerConfig, String> {
    let mut config = match &global.config {
        Some(path) => RunnerConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => RunnerConfig::default(),
    };
    if let Some(executable) = &global.executable {
        config.executable = Some(executable.clone());
    }
    if let Some(timeout_ms) = global.timeout_ms {
        config.timeout_ms = Some(timeout_ms);
    }
    Ok(config)
}

fn open_archive(global: &GlobalArgs) -> Result<SevenZipArchive, String> {
    let config = load_config(global)?;
    let source = PlatformExecutableSource::new(config.clone());
    SevenZipArchive::new(&source, config).map_err(|err| err.to_string())
}

fn run_list(global: &GlobalArgs, args: ListArgs) -> Result<(), String> {
    let archive = open_archive(global)?;
    let format = OutputFormat::from(args.format);

    if let [path] = args.archives.as_slice() {
        let listing = archive.list_archive(path).map_err(|err| err.to_string())?;
        println!("{}", format_listing(&listing, format)?);
        return Ok(());
    }

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = args.jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;

    let results: Vec<(PathBuf, Result<_, RunnerError>)> = pool.install(|| {
        args.archives
            .par_iter()
            .map(|path| (path.clone(), archive.list_archive(path)))
            .collect()
    });

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for (path, result) in results {
        match result {
            Ok(listing) => reports.push(ArchiveReport {
                archive: path,
                listing,
            }),
            Err(err) => failures.push(format!("{}: {err}", path.display())),
        }
    }

    if !reports.is_empty() {
        println!("{}", format_reports(&reports, format)?);
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "failed to list {} archive(s):\n  {}",
            failures.len(),
            failures.join("\n  ")
        ))
    }
}

fn run_extract(global: &GlobalArgs, args: ExtractArgs) -> Result<(), String> {
    let archive = open_archive(global)?;
    archive
        .extract_to_directory(&args.archive, &args.output)
        .map_err(|err| err.to_string())?;
    println!(
        "Extracted {} into {}",
        args.archive.display(),
        args.output.display()
    );
    Ok(())
}

fn run_create(global: &GlobalArgs, args: CreateArgs) -> Result<(), String> {
    let archive = open_archive(global)?;
    let level = CompressionLevel::from(args.level);
    archive
        .create_archive_with_level(&args.archive, &args.folder, level)
        .map_err(|err| err.to_string())?;
    println!(
        "Created {} from {} ({level})",
        args.archive.display(),
        args.folder.display()
    );
    Ok(())
}

fn run_locate(global: &GlobalArgs) -> Result<(), String> {
    let config = load_config(global)?;
    let source = PlatformExecutableSource::new(config);
    let path = source.find_executable().map_err(|err| err.to_string())?;
    println!("{}", path.display());
    Ok(())
}

fn run_parse_stdin(args: ParseStdinArgs) -> Result<(), String> {
    let mut output = String::new();
    std::io::stdin()
        .read_to_string(&mut output)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    run_parse_listing(&output, args.strategy.into(), args.format.into())
}

fn run_parse_file(args: ParseFileArgs) -> Result<(), String> {
    let output = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;
    run_parse_listing(&output, args.strategy.into(), args.format.into())
}

fn run_parse_listing(
    output: &str,
    strategy: EntryStrategyKind,
    format: OutputFormat,
) -> Result<(), String> {
    let (listing, diagnostics) = ListingParser::new(strategy).parse_with_diagnostics(output);
    debug!(
        strategy = diagnostics.strategy,
        tables = diagnostics.tables,
        candidates = diagnostics.candidate_lines,
        recognized = diagnostics.recognized_lines,
        "Parsed listing"
    );
    for line in &diagnostics.rejected_lines {
        debug!(line = %line, "Rejected listing row");
    }
    println!("{}", format_listing(&listing, format)?);
    Ok(())
}

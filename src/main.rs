use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use subdex::index::stats::print_stats;
use subdex::index::{BuildReport, NameSource, SubstringIndex, build_index};
use subdex::output;
use subdex::query::{NameSearch, SearchOptions, SortOrder};
use subdex::utils::{AppConfig, get_config_path};
use termcolor::ColorChoice;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `subdex=trace`)
const LOG_ENV: &str = "SUBDEX_LOG";

#[derive(Parser)]
#[command(name = "subdex", version)]
#[command(about = "Fast substring search over a set of names")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search query (when no subcommand is given)
    query: Option<String>,

    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the names containing QUERY
    Find {
        query: String,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print how many names a lookup of QUERY would have to verify
    Cost {
        query: String,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Show index statistics
    Stats {
        #[command(flatten)]
        source: SourceArgs,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pick a name interactively
    Pick {
        /// Initial query
        query: Option<String>,

        #[command(flatten)]
        source: SourceArgs,

        /// Result ordering
        #[arg(short, long, value_enum)]
        sort: Option<SortOrder>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Where names are read from
#[derive(Args, Clone)]
struct SourceArgs {
    /// Read names from FILE, one per line ("-" for stdin, repeatable)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Index the relative paths of files below DIR
    #[arg(short = 'd', long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Only index paths matching GLOB (with --dir)
    #[arg(short = 'g', long, value_name = "GLOB", requires = "dir")]
    glob: Option<String>,

    /// Longest indexed substring, in chars
    #[arg(
        short = 'k',
        long = "anchor-len",
        value_name = "N",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    anchor_len: Option<usize>,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Result ordering
    #[arg(short, long, value_enum)]
    sort: Option<SortOrder>,

    /// Print at most N names (0 = unlimited)
    #[arg(short = 'n', long, value_name = "N")]
    limit: Option<usize>,

    /// Print results as JSON
    #[arg(long, conflicts_with = "count")]
    json: bool,

    /// Only print the number of matches
    #[arg(short, long)]
    count: bool,

    /// When to highlight matches
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn choice(self, config: &AppConfig) -> ColorChoice {
        match self {
            ColorMode::Auto if config.color => ColorChoice::Auto,
            ColorMode::Auto | ColorMode::Never => ColorChoice::Never,
            ColorMode::Always => ColorChoice::Always,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = AppConfig::load()?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Some(Commands::Find {
            query,
            source,
            output,
        }) => run_find(&config, &source, &output, &query)?,
        Some(Commands::Cost { query, source }) => {
            let index = load_index(&config, &source)?;
            println!("{}", index.num_search_names(&query));
        }
        Some(Commands::Stats { source, json }) => {
            let (index, report) = load_index_with_report(&config, &source)?;
            let stats = index.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats, Some(&report))?;
            }
        }
        Some(Commands::Pick {
            query,
            source,
            sort,
        }) => run_pick(&config, &source, sort, query)?,
        Some(Commands::Config { action }) => run_config(&config, action)?,
        None => match cli.query {
            Some(query) => run_find(&config, &cli.source, &cli.output, &query)?,
            None => run_pick(&config, &cli.source, cli.output.sort, None)?,
        },
    }

    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
            info!(path = %path.display(), "logging to file");
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn run_find(config: &AppConfig, source: &SourceArgs, args: &OutputArgs, query: &str) -> Result<()> {
    let index = load_index(config, source)?;
    let mut search = NameSearch::new(&index);

    if args.count {
        output::print_count(search.count(query))?;
        return Ok(());
    }

    let options = SearchOptions {
        sort: args.sort.unwrap_or(config.sort),
        limit: args.limit.unwrap_or(config.limit),
    };
    let outcome = search.execute(query, &options);
    debug!(
        query,
        total = outcome.total,
        scanned = outcome.scanned,
        elapsed_us = outcome.elapsed.as_micros() as u64,
        "search finished"
    );

    if args.json {
        output::print_json(query, &outcome)?;
        return Ok(());
    }

    let choice = args.color.choice(config);
    output::print_names(&outcome.names, query, choice)?;
    if outcome.is_truncated() {
        output::print_truncation_note(outcome.names.len(), outcome.total, choice)?;
    }
    Ok(())
}

#[cfg(feature = "interactive")]
fn run_pick(
    config: &AppConfig,
    source: &SourceArgs,
    sort: Option<SortOrder>,
    query: Option<String>,
) -> Result<()> {
    let index = load_index(config, source)?;
    let mut options = config.search_options();
    if let Some(sort) = sort {
        options.sort = sort;
    }

    if let Some(name) = subdex::tui::run(index, options, query)? {
        println!("{}", name);
    }
    Ok(())
}

#[cfg(not(feature = "interactive"))]
fn run_pick(
    _config: &AppConfig,
    _source: &SourceArgs,
    _sort: Option<SortOrder>,
    _query: Option<String>,
) -> Result<()> {
    bail!("subdex was built without the `interactive` feature; pass a query instead")
}

fn run_config(config: &AppConfig, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => println!("{}", get_config_path()?.display()),
        ConfigAction::Show => println!("{}", serde_json::to_string_pretty(config)?),
        ConfigAction::Init { force } => {
            let path = get_config_path()?;
            if path.exists() && !force {
                bail!(
                    "Config file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            let path = AppConfig::default().save()?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn load_index(config: &AppConfig, source: &SourceArgs) -> Result<SubstringIndex> {
    load_index_with_report(config, source).map(|(index, _)| index)
}

fn load_index_with_report(
    config: &AppConfig,
    source: &SourceArgs,
) -> Result<(SubstringIndex, BuildReport)> {
    let sources = name_sources(config, source)?;

    let mut index_config = config.index_config();
    if let Some(len) = source.anchor_len {
        index_config.max_anchor_len = len;
    }

    let show_progress = std::io::stderr().is_terminal();
    let (index, report) = build_index(&sources, index_config, show_progress)?;
    if report.skipped > 0 {
        tracing::warn!(skipped = report.skipped, "some names were not valid UTF-8");
    }
    Ok((index, report))
}

/// Resolve the source flags, falling back to piped stdin
fn name_sources(config: &AppConfig, args: &SourceArgs) -> Result<Vec<NameSource>> {
    let mut sources: Vec<NameSource> = args
        .files
        .iter()
        .map(|path| {
            if path.as_os_str() == "-" {
                NameSource::Stdin
            } else {
                NameSource::File(path.clone())
            }
        })
        .collect();

    if let Some(root) = &args.dir {
        sources.push(NameSource::Dir {
            root: root.clone(),
            glob: args.glob.clone(),
            ignored: config.ignored_dirs.clone(),
        });
    }

    if sources.is_empty() {
        if std::io::stdin().is_terminal() {
            bail!("No names to index: pass --file or --dir, or pipe names on stdin");
        }
        sources.push(NameSource::Stdin);
    }

    Ok(sources)
}

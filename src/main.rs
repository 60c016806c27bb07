use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use paper_browser::config::{
    default_config_path, find_config_file, load_config, log_dir, Config, ConfigFile, LogFormat,
};
use paper_browser::models::{Page, PaperId};
use paper_browser::observe::TracingObserver;
use paper_browser::sources::{
    DataSource, Fetched, HttpSource, MockSource, PaperSource, SourceError, SourceMode,
};
use paper_browser::ui::tui::{self, Theme};
use paper_browser::ui::{
    format_detail, format_list, DetailView, OutputFormat, PaperBrowser, PreviewLoader, Spinner,
};
use paper_browser::utils::{terminal_width, validate_url, HttpClient};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Paper Browser - browse the latest papers and search a paper-index service
#[derive(Parser, Debug)]
#[command(name = "paper-browser")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse the latest papers and search a paper-index service", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the paper-index service
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Serve the built-in catalogue instead of calling the service
    #[arg(long, global = true)]
    mock: bool,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the most recently published papers
    Latest {
        /// Offset of the first paper
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Number of papers to fetch (defaults to the configured page size)
        #[arg(long, short = 'n')]
        max_results: Option<usize>,
    },

    /// Search papers by keyword
    #[command(alias = "s")]
    Search {
        /// Keyword to search for
        keyword: String,

        /// Offset of the first paper
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Number of papers to fetch (defaults to the configured page size)
        #[arg(long, short = 'n')]
        max_results: Option<usize>,
    },

    /// Show the details of one paper
    Show {
        /// Paper ID
        id: String,

        /// Look the paper up in these search results instead of the latest papers
        #[arg(long, short)]
        keyword: Option<String>,

        /// Download the document and print its text
        #[arg(long, short)]
        preview: bool,
    },

    /// Open the interactive browser (default)
    Browse {
        /// Color theme
        #[arg(long, value_enum, default_value_t = ThemeName::Default)]
        theme: ThemeName,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a configuration file with default values
    Init {
        /// Where to write (defaults to the per-user config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Check that a configuration file parses and its backend URL is usable
    Check {
        /// File to check (defaults to the file that would be loaded)
        path: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ThemeName {
    Default,
    Mono,
}

impl ThemeName {
    fn theme(self) -> Theme {
        match self {
            ThemeName::Default => Theme::default(),
            ThemeName::Mono => Theme::mono(),
        }
    }
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Paper Browser - Environment Variables");
    println!();
    println!("Backend:");
    println!("  PAPER_BROWSER_BACKEND__BASE_URL              Base URL of the paper-index service (default: http://127.0.0.1:8000)");
    println!("  PAPER_BROWSER_BACKEND__TIMEOUT_SECS          Request timeout in seconds (default: 30)");
    println!("  PAPER_BROWSER_BACKEND__CONNECT_TIMEOUT_SECS  Connect timeout in seconds (default: 10)");
    println!("  PAPER_BROWSER_BACKEND__PAGE_SIZE             Papers per request (default: 25)");
    println!();
    println!("Source:");
    println!("  PAPER_BROWSER_SOURCE__MODE                   http or mock (default: http)");
    println!();
    println!("Preview:");
    println!("  PAPER_BROWSER_PREVIEW__ENABLED               Load document previews (default: true)");
    println!("  PAPER_BROWSER_PREVIEW__MAX_BYTES             Largest document downloaded (default: 20971520)");
    println!("  PAPER_BROWSER_PREVIEW__MAX_CHARS             Characters of preview text (default: 4000)");
    println!("  PAPER_BROWSER_PREVIEW__ALLOW_PRIVATE_HOSTS   Allow documents on private addresses (default: false)");
    println!();
    println!("Logging:");
    println!("  PAPER_BROWSER_LOGGING__LEVEL                 Log level (default: info)");
    println!("  PAPER_BROWSER_LOGGING__FORMAT                text or json (default: text)");
    println!("  RUST_LOG                                     Overrides the log filter entirely");
    println!();
    println!("Example:");
    println!("  export PAPER_BROWSER_BACKEND__BASE_URL=\"https://papers.example.org\"");
    println!("  export PAPER_BROWSER_SOURCE__MODE=\"mock\"");
}

/// Initialize tracing. The interactive browser logs to a file so the screen stays clean.
fn init_tracing(cli: &Cli, config: &Config, to_file: bool) -> Result<Option<WorkerGuard>> {
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("paper_browser={}", log_level)));

    let (writer, guard) = if to_file {
        let dir = log_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        let appender = tracing_appender::rolling::never(&dir, "paper-browser.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        (BoxMakeWriter::new(non_blocking), Some(guard))
    } else {
        (BoxMakeWriter::new(std::io::stderr), None)
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(!to_file);

    match config.logging.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init(),
    }

    Ok(guard)
}

/// Merge command-line overrides into the loaded configuration
fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.backend.timeout_secs = timeout;
    }
    if cli.mock {
        config.source.mode = SourceMode::Mock;
    }
}

fn build_source(config: &Config) -> Result<Arc<dyn PaperSource>> {
    match config.source.mode {
        SourceMode::Mock => Ok(Arc::new(MockSource::new())),
        SourceMode::Http => {
            let client = HttpClient::with_timeouts(
                config.backend.timeout(),
                config.backend.connect_timeout(),
            )?;
            let source = HttpSource::with_client(Arc::new(client), &config.backend.base_url)
                .with_context(|| format!("Invalid base URL: {}", config.backend.base_url))?;
            Ok(Arc::new(source))
        }
    }
}

fn page_for(config: &Config, start: usize, max_results: Option<usize>) -> Page {
    let first = config.backend.first_page();
    Page::new(start, max_results.unwrap_or(first.max_results).max(1))
}

/// Fetch with a spinner on the terminal
async fn fetch_with_spinner(
    data: &DataSource,
    keyword: Option<&str>,
    quiet: bool,
) -> Result<Fetched, SourceError> {
    let spinner = (!quiet).then(|| {
        Spinner::new(&match keyword {
            Some(k) => format!("Searching for \"{}\"...", k.trim()),
            None => "Fetching latest papers...".to_string(),
        })
    });

    let fetched = match keyword {
        Some(k) => data.search(k).await,
        None => Ok(data.fetch_latest().await),
    };

    if let Some(spinner) = spinner {
        match &fetched {
            Ok(f) => match f.result_set.error_reason() {
                Some(reason) => spinner.finish_with_error(reason),
                None => spinner.finish_with_success(&format!(
                    "Found {} paper(s)",
                    f.result_set.len()
                )),
            },
            Err(e) => spinner.finish_with_error(&e.to_string()),
        }
    }
    fetched
}

/// Fetch, render the list view and report whether the fetch succeeded
async fn run_list(
    data: &DataSource,
    keyword: Option<&str>,
    cli: &Cli,
) -> Result<ExitCode> {
    let fetched = fetch_with_spinner(data, keyword, cli.quiet).await?;
    let Some(set) = data.accept(fetched) else {
        bail!("Response superseded by a newer request");
    };

    let mut browser = PaperBrowser::new(data.observer().clone());
    browser.apply(set);

    println!("{}", format_list(browser.list(), cli.output, terminal_width()));

    Ok(if browser.list().content().is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn run_show(
    data: &DataSource,
    config: &Config,
    id: &str,
    keyword: Option<&str>,
    preview: bool,
    cli: &Cli,
) -> Result<ExitCode> {
    let fetched = fetch_with_spinner(data, keyword, cli.quiet).await?;
    let Some(set) = data.accept(fetched) else {
        bail!("Response superseded by a newer request");
    };

    if let Some(reason) = set.error_reason() {
        eprintln!("Error loading papers: {}", reason);
        return Ok(ExitCode::FAILURE);
    }

    let previews = preview && config.preview.enabled;
    let mut browser = PaperBrowser::new(data.observer().clone())
        .with_detail(DetailView::new().with_previews(previews));
    browser.apply(set);

    let Some(change) = browser.select_paper(&PaperId::from(id)) else {
        return Err(SourceError::NotFound(id.to_string()).into());
    };

    if let Some(request) = change.preview_request() {
        let client = HttpClient::with_timeouts(
            config.backend.timeout(),
            config.backend.connect_timeout(),
        )?;
        let loader = PreviewLoader::new(client, &config.preview);

        let spinner = (!cli.quiet).then(|| Spinner::new("Loading document preview..."));
        let result = loader.load(&request.url).await;
        if let Some(spinner) = spinner {
            match &result {
                Ok(_) => spinner.finish_and_clear(),
                Err(e) => spinner.finish_with_error(&format!("Preview failed: {}", e)),
            }
        }

        browser
            .detail_mut()
            .preview_loaded(request.generation, result);
    }

    println!("{}", format_detail(browser.detail(), cli.output));
    Ok(ExitCode::SUCCESS)
}

async fn run_browse(data: DataSource, config: &Config, theme: ThemeName) -> Result<()> {
    let observer = data.observer().clone();
    let browser = PaperBrowser::new(observer)
        .with_detail(DetailView::new().with_previews(config.preview.enabled));

    let loader = if config.preview.enabled {
        let client = HttpClient::with_timeouts(
            config.backend.timeout(),
            config.backend.connect_timeout(),
        )?;
        Some(Arc::new(PreviewLoader::new(client, &config.preview)))
    } else {
        None
    };

    tui::run(browser, Arc::new(data), loader, theme.theme())
        .await
        .context("Terminal UI failed")
}

fn run_config(command: &ConfigCommands, config: &Config) -> Result<()> {
    match command {
        ConfigCommands::Init { path, force } => {
            let path = match path.clone().or_else(default_config_path) {
                Some(path) => path,
                None => bail!("Could not determine a config directory; pass --path"),
            };

            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }

            ConfigFile::from(&Config::default())
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote default configuration to {}", path.display());
        }
        ConfigCommands::Show => {
            let content = toml::to_string_pretty(&ConfigFile::from(config))
                .context("Failed to serialize configuration")?;
            print!("{}", content);
        }
        ConfigCommands::Check { path } => {
            let Some(path) = path.clone().or_else(find_config_file) else {
                bail!("No configuration file found; pass a path");
            };

            let checked = ConfigFile::load(&path)
                .with_context(|| format!("Invalid configuration file {}", path.display()))?
                .into_config();
            validate_url(&checked.backend.base_url).with_context(|| {
                format!("Invalid backend.base_url: {}", checked.backend.base_url)
            })?;

            println!(
                "{} is valid (backend {}, source {:?})",
                path.display(),
                checked.backend.base_url,
                checked.source.mode
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
        return Ok(ExitCode::SUCCESS);
    }

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load config file {}", path.display()),
        None => "Failed to load configuration from the environment".to_string(),
    })?;
    apply_overrides(&cli, &mut config);

    let interactive = matches!(cli.command, None | Some(Commands::Browse { .. }));
    let _log_guard = init_tracing(&cli, &config, interactive)?;

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let source = build_source(&config)?;
    tracing::debug!(source = source.id(), "Paper source ready");

    let data = |page: Page| {
        DataSource::with_observer(source.clone(), Arc::new(TracingObserver)).with_page(page)
    };

    match &cli.command {
        Some(Commands::Latest { start, max_results }) => {
            let data = data(page_for(&config, *start, *max_results));
            run_list(&data, None, &cli).await
        }
        Some(Commands::Search {
            keyword,
            start,
            max_results,
        }) => {
            let data = data(page_for(&config, *start, *max_results));
            run_list(&data, Some(keyword.as_str()), &cli).await
        }
        Some(Commands::Show {
            id,
            keyword,
            preview,
        }) => {
            let data = data(config.backend.first_page());
            run_show(&data, &config, id, keyword.as_deref(), *preview, &cli).await
        }
        Some(Commands::Config { command }) => {
            run_config(command, &config)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Browse { theme }) => {
            run_browse(data(config.backend.first_page()), &config, *theme).await?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            run_browse(data(config.backend.first_page()), &config, ThemeName::Default).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

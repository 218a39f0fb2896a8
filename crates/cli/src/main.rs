use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use hush_core::{
    ContentRecord, FetchConfig, FileStorage, HushError, Page, ReaderConfig, ReaderSession, Storage, SummaryOutcome,
    SystemPreference, THEME_STORAGE_KEY, Theme, ThemeManager, fetch_file, fetch_stdin, fetch_url, format_content,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use url::Url;

mod echo;

use echo::{
    format_size, print_banner, print_bullets, print_detail, print_error, print_info, print_step, print_success,
    print_warning,
};

pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL given to pages read from stdin without `--url`
const STDIN_URL: &str = "about:blank";

/// Output format for the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// The full reader overlay as a standalone HTML document
    View,
    Html,
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: view, html, text, json", s)),
        }
    }
}

/// Distraction-free reader view for web pages
#[derive(Parser, Debug)]
#[command(name = "hush")]
#[command(author = "Hush Contributors")]
#[command(version)]
#[command(about = "Distraction-free reader view for web pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// State file holding the theme and "what's new" flags
    /// (default: <config dir>/hush/state.json)
    #[arg(long, global = true, value_name = "FILE")]
    state_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a page in the reader
    Read(ReadArgs),

    /// Show or change the saved reader theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Args, Debug)]
struct ReadArgs {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Page URL for file or stdin input (used for relative links and the source label)
    #[arg(long, value_name = "URL")]
    url: Option<Url>,

    /// Output format (view, html, text, json)
    #[arg(short, long, default_value = "view", value_name = "FORMAT")]
    format: OutputFormat,

    /// Theme for this run only (light, dark, sepia)
    #[arg(long, value_name = "THEME")]
    theme: Option<Theme>,

    /// Request an AI summary of the article
    #[arg(long)]
    summarize: bool,

    /// Summary service endpoint
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Behave as if the system prefers a dark color scheme
    #[arg(long)]
    prefers_dark: bool,
}

#[derive(Subcommand, Debug)]
enum ThemeAction {
    /// Print the saved theme, or "system" when none is saved
    Show,
    /// Save a theme (light, dark, sepia)
    Set { theme: Theme },
    /// Forget the saved theme so the system preference applies
    Clear,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn state_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(FileStorage::default_location)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let state = state_path(cli.state_file);
    match cli.command {
        Command::Read(args) => read(args, state, cli.verbose).await,
        Command::Theme { action } => theme(action, state),
    }
}

async fn read(args: ReadArgs, state: Option<PathBuf>, verbose: bool) -> anyhow::Result<()> {
    if verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
        print_step(1, 4, "Loading page");
    }

    let (html, url) = load_input(&args).await?;

    if verbose {
        print_detail("Size", &format_size(html.len()));
        print_detail("URL", url.as_str());
        eprintln!();
        print_step(2, 4, "Resolving article content");
    }

    let page = Page::from_url(&html, url).context("Failed to parse page")?;
    let mut builder = ReaderConfig::builder()
        .summary_timeout(args.timeout)
        .reveal_delay_ms(0)
        .entrance_delay_ms(0);
    if let Some(endpoint) = &args.endpoint {
        builder = builder.summary_endpoint(endpoint.as_str());
    }

    let system = if args.prefers_dark { SystemPreference::Dark } else { SystemPreference::NoPreference };
    let session = ReaderSession::new(page, builder.build())
        .context("Failed to start reader session")?
        .with_system_preference(system);
    let mut session = match state {
        Some(path) => session.with_storage(FileStorage::new(path)),
        None => session,
    };

    if !session.open().await {
        for notice in session.take_notices() {
            print_error(&notice.message);
        }
        return Err(HushError::ExtractionFailure.into());
    }

    let Some(resolution) = session.resolution() else {
        return Err(anyhow!("reader opened without resolved content"));
    };
    let record = resolution.record.clone();
    let tier = resolution.tier.to_string();

    if verbose {
        print_detail("Tier", &tier);
        print_detail("Title", &record.title);
        print_detail("Words", &record.word_count().to_string());
        eprintln!();
    }

    if let Some(theme) = args.theme {
        session.apply_theme(theme);
    }

    if args.summarize {
        if verbose {
            print_step(3, 4, "Requesting AI summary");
        }
        summarize(&mut session).await;
    }

    let output = match args.format {
        OutputFormat::View => session
            .render_document()
            .ok_or_else(|| anyhow!("reader overlay is not mounted"))?,
        OutputFormat::Html => record.html.clone().unwrap_or_else(|| format_content(&record.text)),
        OutputFormat::Text => record.text.clone(),
        OutputFormat::Json => to_json(&session, &record, &tier)?,
    };

    if let Some(announcement) = session.overlay().and_then(|o| o.announcement) {
        print_info(&format!("{} {}", announcement.title, announcement.label));
        session.dismiss_announcement();
    }

    if verbose {
        print_step(4, 4, "Writing output");
        print_detail("Format", &format!("{:?}", args.format));
        print_detail("Theme", session.theme().label());
        eprintln!();
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Fetches or reads the page and settles the URL it is read as.
async fn load_input(args: &ReadArgs) -> anyhow::Result<(String, Url)> {
    if args.input == "-" {
        let html = fetch_stdin().context("Failed to read from stdin")?;
        let url = match &args.url {
            Some(url) => url.clone(),
            None => Url::parse(STDIN_URL)?,
        };
        return Ok((html, url));
    }

    if args.input.starts_with("http://") || args.input.starts_with("https://") {
        let mut config = FetchConfig { timeout: args.timeout, ..Default::default() };
        if let Some(user_agent) = &args.user_agent {
            config.user_agent = user_agent.clone();
        }

        let fetched = fetch_url(&args.input, &config).await.context("Failed to fetch URL")?;
        let url = args.url.clone().unwrap_or(fetched.final_url);
        return Ok((fetched.html, url));
    }

    let html = fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?;
    let url = match &args.url {
        Some(url) => url.clone(),
        None => file_url(Path::new(&args.input))?,
    };
    Ok((html, url))
}

fn file_url(path: &Path) -> anyhow::Result<Url> {
    let absolute = fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))?;
    Url::from_file_path(&absolute).map_err(|_| anyhow!("Cannot express {} as a URL", absolute.display()))
}

/// Summary failures are reported but never fail the run.
async fn summarize(session: &mut ReaderSession) {
    match session.request_summary().await {
        Ok(SummaryOutcome::Shown) => {
            if let Some(panel) = session.overlay().and_then(|o| o.summary.as_ref()) {
                print_bullets(&panel.bullets);
            }
        }
        Ok(outcome) => tracing::debug!(?outcome, "no summary displayed"),
        Err(e) => tracing::debug!(error = %e, "summary failed"),
    }

    for notice in session.take_notices() {
        print_warning(&notice.message);
    }
}

fn to_json(session: &ReaderSession, record: &ContentRecord, tier: &str) -> anyhow::Result<String> {
    let value = serde_json::json!({
        "url": session.page().url().as_str(),
        "source": session.page().root_domain(),
        "tier": tier,
        "theme": session.theme().key(),
        "content": record,
        "summary": session.cached_summary(),
    });
    serde_json::to_string_pretty(&value).context("Failed to serialize output")
}

fn theme(action: ThemeAction, state: Option<PathBuf>) -> anyhow::Result<()> {
    let path = state.ok_or_else(|| anyhow!("No config directory found; pass --state-file"))?;
    let mut storage = FileStorage::new(path);

    match action {
        ThemeAction::Show => match ThemeManager::new().stored(&storage) {
            Some(theme) => println!("{}", theme.key()),
            None => println!("system"),
        },
        ThemeAction::Set { theme } => {
            storage
                .set(THEME_STORAGE_KEY, theme.key())
                .with_context(|| format!("Failed to save theme to {}", storage.path().display()))?;
            print_success(&format!("Theme set to {}", theme.label().bright_white()));
        }
        ThemeAction::Clear => {
            storage
                .remove(THEME_STORAGE_KEY)
                .with_context(|| format!("Failed to clear theme in {}", storage.path().display()))?;
            print_success("Theme cleared; following the system preference");
        }
    }

    Ok(())
}

// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use doc_translation_queue::app_config::{self, Config};
use doc_translation_queue::content::ContentLoader;
use doc_translation_queue::database::{DatabaseConnection, Repository, TranslationFilter, TranslationStatus};
use doc_translation_queue::language_utils::normalize_locale;
use doc_translation_queue::pipeline::SubmissionOrchestrator;
use doc_translation_queue::vendor::{VendorApi, VendorClient};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit every pending translation to the vendor (default command)
    Submit,

    /// Queue documents for translation into a locale
    Enqueue {
        /// Internal locale code (e.g. 'jp')
        locale: String,

        /// Document paths relative to the source directory
        #[arg(required = true, value_name = "SLUG")]
        slugs: Vec<String>,
    },

    /// List queued translations
    Queue {
        /// Only show this status (pending, in_progress, complete, failed)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Generate shell completions for doc-translation-queue
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every subcommand
#[derive(Args, Debug)]
struct GlobalArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// SQLite database holding the translation queue
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Directory queued slugs are resolved against
    #[arg(long, global = true)]
    source_dir: Option<PathBuf>,

    /// Vendor API base URL
    #[arg(long, env = "TRANSLATION_VENDOR_API_URL", global = true)]
    vendor_api_url: Option<String>,

    /// Vendor account identifier
    #[arg(long, env = "TRANSLATION_VENDOR_USER", global = true)]
    vendor_user: Option<String>,

    /// Vendor account secret
    #[arg(long, env = "TRANSLATION_VENDOR_SECRET", hide_env_values = true, global = true)]
    vendor_secret: Option<String>,

    /// Vendor project id
    #[arg(long, env = "TRANSLATION_VENDOR_PROJECT", global = true)]
    vendor_project: Option<String>,
}

/// doc-translation-queue - submit documentation pages for translation
#[derive(Parser, Debug)]
#[command(name = "doc-translation-queue")]
#[command(version)]
#[command(about = "Submit queued documentation pages to a translation vendor")]
#[command(long_about = "Submits every PENDING translation request to the translation vendor: one job and
one batch per locale, then one upload per page. Accepted uploads move to IN_PROGRESS.

EXAMPLES:
    doc-translation-queue                                        # Submit the pending queue
    doc-translation-queue enqueue jp src/content/docs/a.mdx      # Queue a page for Japanese
    doc-translation-queue queue --status pending                 # Show what is waiting
    doc-translation-queue completions bash > dtq.bash            # Generate bash completions

CONFIGURATION:
    Settings are read from conf.json by default (missing file = defaults).
    TRANSLATION_VENDOR_API_URL, TRANSLATION_VENDOR_USER, TRANSLATION_VENDOR_SECRET
    and TRANSLATION_VENDOR_PROJECT override the vendor block; flags override both.

EXIT STATUS:
    0 when every upload was accepted, 1 otherwise.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "[!]"),
            Level::Warn => ("\x1B[1;33m", "[~]"),
            Level::Info => ("\x1B[1;32m", "[*]"),
            Level::Debug => ("\x1B[1;36m", "[.]"),
            Level::Trace => ("\x1B[1;35m", "[ ]"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Initialize the logger with trace so the level can be lowered after
    // the config is loaded
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    };

    log::logger().flush();
    std::process::exit(exit_code);
}

async fn run(cli: CommandLineOptions) -> Result<i32> {
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "doc-translation-queue", &mut std::io::stdout());
        return Ok(0);
    }

    let config = load_config(&cli.global)?;
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command.unwrap_or(Commands::Submit) {
        Commands::Submit => run_submit(config).await,
        Commands::Enqueue { locale, slugs } => run_enqueue(config, &locale, &slugs).await,
        Commands::Queue { status } => run_queue(config, status.as_deref()).await,
        Commands::Completions { .. } => Ok(0),
    }
}

/// Config file, then environment, then flags (clap resolves the last two)
fn load_config(args: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load(&args.config_path)?;

    if let Some(url) = &args.vendor_api_url {
        config.vendor.api_url = url.clone();
    }
    if let Some(user) = &args.vendor_user {
        config.vendor.user_identifier = user.clone();
    }
    if let Some(secret) = &args.vendor_secret {
        config.vendor.user_secret = secret.clone();
    }
    if let Some(project) = &args.vendor_project {
        config.vendor.project_id = project.clone();
    }
    if let Some(database) = &args.database {
        config.database_path = Some(database.clone());
    }
    if let Some(source_dir) = &args.source_dir {
        config.source_dir = source_dir.clone();
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}

fn open_repository(config: &Config) -> Result<Repository> {
    let path = config.database_path()?;
    let db = DatabaseConnection::new(&path)
        .with_context(|| format!("Failed to open translation queue at {:?}", path))?;
    Ok(Repository::new(db))
}

async fn run_submit(config: Config) -> Result<i32> {
    config.validate().context("Configuration validation failed")?;

    let repository = open_repository(&config)?;
    let vendor: Arc<dyn VendorApi> = Arc::new(VendorClient::from_config(&config)?);
    let loader = ContentLoader::new(config.source_dir.clone());

    let orchestrator = SubmissionOrchestrator::new(repository, vendor, loader);
    let report = orchestrator.run().await?;

    report.log_summary();
    Ok(report.exit_code())
}

async fn run_enqueue(config: Config, locale: &str, slugs: &[String]) -> Result<i32> {
    let locale = normalize_locale(locale);
    if config.locale_ids.vendor_id(&locale).is_none() {
        let known: Vec<&str> = config.locale_ids.locales().collect();
        warn!(
            "No vendor locale mapped for '{}' (known: {}); submission will fail for it",
            locale,
            known.join(", ")
        );
    }

    let repository = open_repository(&config)?;
    for slug in slugs {
        let record = repository.add_translation(&locale, slug).await?;
        info!("Queued {} ({}) [{}]", record.slug, record.locale, record.status);
    }

    Ok(0)
}

async fn run_queue(config: Config, status: Option<&str>) -> Result<i32> {
    let filter = match status {
        Some(status) => TranslationFilter::status(status.parse::<TranslationStatus>()?),
        None => TranslationFilter::default(),
    };

    let repository = open_repository(&config)?;
    let translations = repository.get_translations(filter).await?;

    let mut stdout = std::io::stdout();
    for translation in &translations {
        writeln!(
            stdout,
            "{:>6}  {:<6}  {:<12}  {}",
            translation.id, translation.locale, translation.status.to_string(), translation.slug
        )?;
    }

    info!("{}", repository.connection().stats()?);
    Ok(0)
}

// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pdfswahili::app_config::{self, Config, TranslationProvider};
use pdfswahili::errors::AppError;
use pdfswahili::gui;
use pdfswahili::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Ollama,
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
        }
    }
}

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
    /// Print the text layer of a PDF
    Extract {
        /// PDF file to read
        #[arg(value_name = "PDF")]
        input: PathBuf,
    },

    /// Extract a PDF and print its translation
    Translate {
        /// PDF file to translate
        #[arg(value_name = "PDF")]
        input: PathBuf,
    },

    /// Translate a PDF into a new PDF
    Convert {
        /// PDF file to translate
        #[arg(value_name = "PDF")]
        input: PathBuf,

        /// Output file, defaults to <input_stem>_swahili.pdf next to the input
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Open the interactive terminal shell
    Gui,

    /// Generate shell completions for pdfswahili
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every subcommand; they override the config file
#[derive(Args, Debug)]
struct GlobalArgs {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Translation provider to use
    #[arg(short, long, global = true, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name for LLM providers
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Source language code (e.g., 'en', 'auto')
    #[arg(short, long, global = true)]
    source_language: Option<String>,

    /// Target language code (e.g., 'sw')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// Maximum characters per translation request
    #[arg(long, global = true)]
    max_chunk_size: Option<usize>,

    /// Extra attempts for a failing chunk
    #[arg(long, global = true)]
    retries: Option<u32>,

    /// Delay between attempts in milliseconds
    #[arg(long, global = true)]
    retry_delay_ms: Option<u64>,

    /// Abort when a chunk cannot be translated instead of keeping the original
    #[arg(long, global = true)]
    fail_fast: bool,
}

/// pdfswahili - translate the text of a PDF from English to Swahili
#[derive(Parser, Debug)]
#[command(name = "pdfswahili")]
#[command(version)]
#[command(about = "Translate PDF text from English to Swahili")]
#[command(long_about = "pdfswahili extracts the text layer of a PDF, translates it in chunks and writes a new PDF.

EXAMPLES:
    pdfswahili extract report.pdf               # Print the extracted text
    pdfswahili translate report.pdf             # Print the Swahili translation
    pdfswahili convert report.pdf               # Write report_swahili.pdf
    pdfswahili convert report.pdf out.pdf       # Write to a chosen path
    pdfswahili -p ollama -m llama3.2:3b convert report.pdf
    pdfswahili gui                              # Interactive terminal shell
    pdfswahili completions bash > pdfswahili.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    google    - Google Translate web endpoint (default, no API key)
    ollama    - Local Ollama server (default: llama3.2:3b)
    openai    - OpenAI API (requires API key)
    anthropic - Anthropic API (requires API key)
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

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
        // The logger accepts everything; log::max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Info until the config or --log-level says otherwise
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            let code = e
                .downcast_ref::<AppError>()
                .map(AppError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "pdfswahili", &mut std::io::stdout());
        }
        Commands::Extract { input } => {
            let controller = build_controller(&cli.global)?;
            let text = controller.extract(&input)?;
            if !text.is_empty() {
                println!("{}", text);
            }
        }
        Commands::Translate { input } => {
            let controller = build_controller(&cli.global)?.show_progress(true);
            let text = controller.translate(&input).await?;
            if !text.is_empty() {
                println!("{}", text);
            }
        }
        Commands::Convert { input, output } => {
            let controller = build_controller(&cli.global)?.show_progress(true);
            let saved = controller.convert(&input, output.as_deref()).await?;
            println!("Saved: {}", saved.display());
        }
        Commands::Gui => {
            let controller = build_controller(&cli.global)?;
            gui::run(controller).await?;
        }
    }

    Ok(())
}

fn build_controller(args: &GlobalArgs) -> Result<Controller> {
    // If log level is set via command line, apply it immediately
    if let Some(level) = &args.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level((&level).into());
    }

    let config = load_config(args)?;

    if args.log_level.is_none() {
        log::set_max_level((&config.log_level).into());
    }

    Controller::with_config(config).context("Failed to set up the translation provider")
}

fn load_config(args: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load_or_create(Path::new(&args.config))
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    // Provider first, so the per-provider overrides below land on it
    if let Some(provider) = &args.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &args.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }
    if let Some(size) = args.max_chunk_size {
        config.translation.active_provider_config_mut().max_chars_per_request = size;
    }
    if let Some(source_language) = &args.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &args.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(retries) = args.retries {
        config.translation.common.retry_count = retries;
    }
    if let Some(delay) = args.retry_delay_ms {
        config.translation.common.retry_delay_ms = delay;
    }
    if args.fail_fast {
        config.translation.common.fail_fast = true;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone().into();
    }

    config
        .validate()
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;
    Ok(config)
}

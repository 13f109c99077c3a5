//! # studytutor: A homework tutor on the command line
//!
//! Ask a question by typing it or by pointing at a photo of it. Photos are run
//! through OCR first; the question is then sent to the configured completion
//! provider and the answer is printed.

mod config;
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use self::config::{get_config, AppConfig, OcrEngineKind};
use std::path::{Path, PathBuf};
use std::time::Duration;
use studytutor::prompts::tutor::PromptTemplates;
use studytutor::providers::factory::{create_provider, ProviderKind};
use studytutor::providers::ocr::{
    tesseract::TesseractEngine, vision::VisionOcrEngine, OcrEngine,
};
use studytutor::types::ApiKey;
use studytutor::{DispatchError, StudentLevel, TutorClient, TutorError};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a YAML configuration file (defaults to ./studytutor.yml if present)
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a homework question, typed or from a photo
    Ask(AskArgs),
    /// Read the text from a homework photo without asking for an answer
    Extract(ExtractArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LevelArg {
    School,
    University,
}

impl From<LevelArg> for StudentLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::School => StudentLevel::School,
            LevelArg::University => StudentLevel::University,
        }
    }
}

#[derive(Args, Debug)]
struct AskArgs {
    /// The student's level
    #[arg(long, value_enum, default_value_t = LevelArg::School)]
    level: LevelArg,
    /// The question text
    #[arg(long, conflicts_with = "image", required_unless_present = "image")]
    text: Option<String>,
    /// A PNG or JPEG photo of the question
    #[arg(long)]
    image: Option<PathBuf>,
    /// Override the configured model
    #[arg(long)]
    model: Option<String>,
    /// Show the extracted text and allow editing it before asking
    #[arg(long, requires = "image")]
    review: bool,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// A PNG or JPEG photo of the question
    #[arg(long)]
    image: PathBuf,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = get_config(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(
        provider = %config.provider,
        model = %config.model,
        has_api_key = config.api_key.is_some(),
        "Configuration loaded"
    );

    let outcome = match cli.command {
        Commands::Ask(args) => handle_ask(&config, args).await,
        Commands::Extract(args) => handle_extract(&config, args).await,
    };

    if let Err(err) = outcome {
        match err.downcast_ref::<TutorError>() {
            Some(tutor_error) => ui::print_error(tutor_error),
            None => eprintln!("❌ {err:#}"),
        }
        std::process::exit(1);
    }
    Ok(())
}

// --- Client Construction ---

fn request_timeout(config: &AppConfig) -> Duration {
    Duration::from_secs(config.request_timeout_secs)
}

fn build_ocr_engine(config: &AppConfig, kind: ProviderKind) -> Result<Box<dyn OcrEngine>> {
    let engine: Box<dyn OcrEngine> = match config.ocr.engine {
        OcrEngineKind::Tesseract => Box::new(TesseractEngine::new(
            config.ocr.binary.clone(),
            config.ocr.language.clone(),
        )),
        OcrEngineKind::Vision => {
            if kind != ProviderKind::OpenAi {
                bail!("The vision OCR engine needs an OpenAI-compatible provider");
            }
            let api_key = ApiKey::new(config.api_key.clone())
                .ok_or(TutorError::from(DispatchError::AuthMissing))?;
            let api_url = config
                .api_url
                .clone()
                .unwrap_or_else(|| kind.default_api_url().to_string());
            let model = config.ocr.model.clone().unwrap_or_else(|| config.model.clone());
            Box::new(VisionOcrEngine::new(
                api_url,
                api_key,
                model,
                request_timeout(config),
            )?)
        }
    };
    Ok(engine)
}

fn build_client(config: &AppConfig, model_override: Option<String>) -> Result<TutorClient> {
    let model = model_override.unwrap_or_else(|| config.model.clone());
    let kind = config.provider_kind()?;
    let provider = create_provider(kind, config.api_url.as_deref(), request_timeout(config))?;
    let templates = PromptTemplates::with_overrides(
        config.prompts.system_prompt.as_deref(),
        config.prompts.user_prompt.as_deref(),
    );

    let client = TutorClient::builder()
        .completion_provider(provider)
        .api_key(config.api_key.clone())
        .model(model)
        .ocr_engine(build_ocr_engine(config, kind)?)
        .templates(templates)
        .build()?;
    Ok(client)
}

fn read_image(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read image '{}'", path.display()))
}

// --- Command Handlers ---

async fn handle_ask(config: &AppConfig, args: AskArgs) -> Result<()> {
    let client = build_client(config, args.model)?;
    // Without a credential nothing can succeed, so stop before any OCR work.
    client.ensure_ready()?;

    let level = StudentLevel::from(args.level);
    let question = match (args.text, args.image) {
        (Some(text), _) => text,
        (None, Some(path)) => {
            let bytes = read_image(&path)?;
            let spinner = ui::spinner("Reading image...");
            let extraction = client.extract_text(&bytes).await;
            spinner.finish_and_clear();
            let suggestion = extraction?.raw_text;
            if args.review {
                ui::review_on_terminal(&suggestion).context("Failed to read the edited text")?
            } else {
                suggestion
            }
        }
        (None, None) => String::new(),
    };

    info!(%level, model = client.model(), "Asking for an answer");
    let spinner = ui::spinner("AI is thinking...");
    let answer = client.ask_text(level, &question).await;
    spinner.finish_and_clear();

    ui::print_answer(&answer?.text);
    Ok(())
}

async fn handle_extract(config: &AppConfig, args: ExtractArgs) -> Result<()> {
    let kind = config.provider_kind()?;
    let engine = build_ocr_engine(config, kind)?;

    let bytes = read_image(&args.image)?;
    let spinner = ui::spinner("Reading image...");
    let extraction = studytutor::extract::extract_text(engine.as_ref(), &bytes).await;
    spinner.finish_and_clear();

    let extraction = extraction.map_err(TutorError::from)?;
    println!("{}", extraction.raw_text);
    Ok(())
}

use anyhow::{anyhow, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use slide_common::{ensure_output_dir, GenerationRequest, PresentationData, SlideConfig};
use slide_core::{
    acquire_style_asset, capture_first_frame, export_presentation, generate_presentation,
    is_video, logging::init_logging, model_from_config, read_topics_file, ErrorReporter,
    ExportOptions, FfmpegFrameSource, GenerationError, SlideError, SlideNavigator,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "slide")]
#[command(about = "AI-generated graduation-project presentations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Override model (e.g., gemini-2.5-flash, gemini-2.5-pro)
    #[arg(long, global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive composer and viewer
    Interactive,
    /// Generate a presentation and export it to PowerPoint
    #[command(group(ArgGroup::new("topic_source").required(true).args(["topics", "topics_file"])))]
    Generate {
        /// Project title
        #[arg(long)]
        title: String,
        /// Topics and key points
        #[arg(long)]
        topics: Option<String>,
        /// Read topics from a .txt / .md file
        #[arg(long)]
        topics_file: Option<PathBuf>,
        /// Image or video to derive the visual style from
        #[arg(long)]
        style: Option<PathBuf>,
        /// Output .pptx path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also save the generated deck as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Author recorded in the document properties
        #[arg(long)]
        author: Option<String>,
    },
    /// Export a saved JSON deck to PowerPoint
    Export {
        /// Deck saved with `generate --json`
        #[arg(short, long)]
        input: PathBuf,
        /// Output .pptx path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Author recorded in the document properties
        #[arg(long)]
        author: Option<String>,
    },
    /// Extract the first frame of a video as JPEG
    Frame {
        video: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// View a saved JSON deck
    Preview {
        file: PathBuf,
    },
    /// Show or change stored configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Store the Gemini API key in the config file
    SetKey { key: String },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SlideConfig::load().await?;
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }

    let log_path = config.resolved_log_path();
    if let Err(err) = init_logging(&log_path, cli.debug) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    match cli.command {
        Some(Commands::Interactive) | None => {
            let model = model_from_config(&config).map_err(user_error)?;
            slide_tui::run_interactive(Arc::from(model), config).await?;
        }
        Some(Commands::Generate {
            title,
            topics,
            topics_file,
            style,
            output,
            json,
            author,
        }) => {
            let args = GenerateArgs {
                title,
                topics,
                topics_file,
                style,
                output,
                json,
                author,
            };
            generate(&config, args).await?;
        }
        Some(Commands::Export {
            input,
            output,
            author,
        }) => {
            let data = load_deck(&input).await?;
            let path = export(&config, &data, output, author).await?;
            println!("{}", path.display());
        }
        Some(Commands::Frame { video, output }) => {
            let path = extract_frame(&config, video, output).await?;
            println!("{}", path.display());
        }
        Some(Commands::Preview { file }) => {
            slide_tui::run_preview(&file).await?;
        }
        Some(Commands::Config { action }) => run_config(config, action).await?,
    }

    Ok(())
}

struct GenerateArgs {
    title: String,
    topics: Option<String>,
    topics_file: Option<PathBuf>,
    style: Option<PathBuf>,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    author: Option<String>,
}

/// Log the raw error and turn it into the message shown to the user.
fn user_error(err: SlideError) -> anyhow::Error {
    error!(error = %err, severity = %ErrorReporter::get_severity(&err), "command failed");
    anyhow!(ErrorReporter::format_user_error(&err))
}

async fn generate(config: &SlideConfig, args: GenerateArgs) -> Result<()> {
    let topics = match (args.topics, args.topics_file) {
        (Some(topics), _) => topics,
        (None, Some(path)) => read_topics_file(&path).await.map_err(user_error)?,
        (None, None) => String::new(),
    };

    let style = match args.style {
        Some(path) => Some(load_style(config, path).await?),
        None => None,
    };

    let request = GenerationRequest::new(args.title, topics, style)
        .map_err(|e| user_error(GenerationError::from(e).into()))?;

    let model = model_from_config(config).map_err(user_error)?;
    let data = generate_presentation(model.as_ref(), &request)
        .await
        .map_err(|e| user_error(e.into()))?;

    if let Some(json_path) = &args.json {
        let body = serde_json::to_string_pretty(&data)?;
        if let Some(parent) = json_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_output_dir(parent).await?;
        }
        tokio::fs::write(json_path, body)
            .await
            .with_context(|| format!("writing {}", json_path.display()))?;
        info!(path = %json_path.display(), "saved deck JSON");
    }

    let path = export(config, &data, args.output, args.author).await?;

    let navigator = SlideNavigator::new(data.slide_count())
        .ok_or_else(|| user_error(GenerationError::EmptyResult.into()))?;
    println!("{}", navigator.position_label());
    for (idx, slide) in data.slides.iter().enumerate() {
        println!("{:>2}. {}", idx + 1, slide.title);
    }
    println!("{}", path.display());
    Ok(())
}

async fn load_style(config: &SlideConfig, path: PathBuf) -> Result<slide_common::StyleAsset> {
    let ffmpeg = config.ffmpeg_path.clone();
    tokio::task::spawn_blocking(move || {
        let mut source = FfmpegFrameSource::new(ffmpeg);
        acquire_style_asset(&path, &mut source)
    })
    .await?
    .map_err(user_error)
}

async fn load_deck(path: &Path) -> Result<PresentationData> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let data: PresentationData =
        serde_json::from_str(&content).map_err(|e| user_error(e.into()))?;
    Ok(data)
}

async fn export(
    config: &SlideConfig,
    data: &PresentationData,
    output: Option<PathBuf>,
    author: Option<String>,
) -> Result<PathBuf> {
    let mut options = match output {
        Some(path) => ExportOptions::to_path(path),
        None => ExportOptions::in_dir(&config.output_dir),
    };
    options.author = author;
    let data = data.clone();
    tokio::task::spawn_blocking(move || export_presentation(&data, &options))
        .await?
        .map_err(user_error)
}

async fn extract_frame(
    config: &SlideConfig,
    video: PathBuf,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    if !is_video(&video) {
        let mime = mime_label(&video);
        return Err(user_error(SlideError::UnsupportedInput {
            name: video.display().to_string(),
            mime,
        }));
    }

    let output = output.unwrap_or_else(|| {
        let stem = video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frame".to_string());
        config.output_dir.join(format!("{stem}-frame.jpg"))
    });

    let ffmpeg = config.ffmpeg_path.clone();
    let jpeg = tokio::task::spawn_blocking(move || {
        let mut source = FfmpegFrameSource::new(ffmpeg);
        capture_first_frame(&video, &mut source)
    })
    .await?
    .map_err(user_error)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_output_dir(parent).await?;
    }
    tokio::fs::write(&output, jpeg)
        .await
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(output)
}

fn mime_label(path: &Path) -> String {
    path.extension()
        .map(|e| format!("*.{}", e.to_string_lossy()))
        .unwrap_or_else(|| "unknown".to_string())
}

async fn run_config(config: SlideConfig, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let mut shown = config.clone();
            shown.api_key = config.masked_api_key();
            println!("{}", serde_json::to_string_pretty(&shown)?);
            println!("config file: {}", SlideConfig::config_path()?.display());
        }
        ConfigAction::SetKey { key } => {
            let path = SlideConfig::config_path()?;
            // Env overrides must not leak into the stored file.
            let mut stored = SlideConfig::load_from(&path).await?;
            stored.api_key = Some(key.trim().to_string());
            stored.save_to(&path).await?;
            println!("API key saved to {}", path.display());
        }
    }
    Ok(())
}

//! Command-line driver for `internalize_core`.
//!
//! # Responsibility
//! - Run the parser offline over a saved AI response.
//! - Run one non-interactive capture cycle (content file + note).
//! - List stored records.

use clap::{Parser, Subcommand};
use internalize_core::db::open_db;
use internalize_core::{
    api_key_from_env, core_version, init_logging, validate_note, AppConfig, CaptureService,
    GeminiClient, ImagePayload, SqliteSheetStore, RECORD_COLUMNS,
};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "internalize", about = "Capture, review and store what you learn")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, env = "INTERNALIZE_CONFIG")]
    config: Option<PathBuf>,

    /// Absolute directory for log files; overrides the config value.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a saved AI response and print analysis, category and tasks.
    Parse {
        /// File holding the raw AI response.
        response: PathBuf,
    },
    /// Analyze content with the AI, then store it with a personal note.
    Capture {
        /// File holding the pasted content.
        #[arg(long)]
        content: PathBuf,
        /// Your own summary of the content.
        #[arg(long)]
        note: String,
        /// Optional screenshot sent along with the content.
        #[arg(long)]
        image: Option<PathBuf>,
        /// 1-based task positions to mark done before saving.
        #[arg(long, value_delimiter = ',')]
        done: Vec<usize>,
    },
    /// List stored records, newest first.
    Records {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Print the core version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.log_dir.as_ref().or(config.logging.dir.as_ref()) {
        init_logging(&config.logging.level, dir)?;
    }

    match cli.command {
        Command::Parse { response } => {
            let raw = std::fs::read_to_string(&response)?;
            let parsed = config.response_parser().parse(&raw);
            println!("category: {}", parsed.category);
            println!("--- analysis ---\n{}", parsed.analysis_text);
            println!("--- tasks ---\n{}", parsed.to_board().render());
        }
        Command::Capture {
            content,
            note,
            image,
            done,
        } => {
            validate_note(&note)?;
            let content = std::fs::read_to_string(&content)?;
            let image = image.as_deref().map(read_image).transpose()?;
            let conn = open_db(&config.store.db_path)?;
            let store = SqliteSheetStore::open_or_create(
                &conn,
                &config.store.document,
                &config.store.sheet,
                &RECORD_COLUMNS,
            )?;
            let generator =
                GeminiClient::new(api_key_from_env()).with_endpoint(config.ai.endpoint.clone());
            let service = CaptureService::new(
                generator,
                store,
                config.response_parser(),
                config.ai.model.clone(),
            );

            let mut session = service.analyze(&content, image)?;
            for position in done {
                let index = position
                    .checked_sub(1)
                    .ok_or("task positions start at 1")?;
                session.board_mut().toggle(index)?;
            }
            let record = service.save(&session, &note)?;
            println!("saved [{}] {}", record.category(), record.date());
            println!("{}", record.action_summary());
        }
        Command::Records { limit } => {
            let conn = open_db(&config.store.db_path)?;
            let store = SqliteSheetStore::open_or_create(
                &conn,
                &config.store.document,
                &config.store.sheet,
                &RECORD_COLUMNS,
            )?;
            let service = CaptureService::new(
                GeminiClient::new(None),
                store,
                config.response_parser(),
                config.ai.model.clone(),
            );
            for record in service.recent_records()?.iter().take(limit) {
                println!("{} [{}] {}", record.date(), record.category(), record.user_note());
                println!("{}\n", record.action_summary());
            }
        }
        Command::Version => println!("internalize_core version={}", core_version()),
    }
    Ok(())
}

fn read_image(path: &Path) -> Result<ImagePayload, Box<dyn Error>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let mime_type = match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => return Err(format!("unsupported image type: {}", path.display()).into()),
    };
    Ok(ImagePayload {
        mime_type: mime_type.to_string(),
        bytes: std::fs::read(path)?,
    })
}

//! CLI entrypoint for Eburon CodeMax
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use codemax_application::{
    AttachmentLoader, ChatController, ConversationLogger, LlmGateway, NoConversationLogger,
    NoPreview, NoTurnProgress, PreviewPort, SendRequest,
};
use codemax_domain::{Model, TurnPhase};
use codemax_infrastructure::{
    ConfigLoader, FileConfig, FilePreviewRenderer, GeminiLlmGateway, JsonlConversationLogger,
    LocalAttachmentLoader,
};
use codemax_presentation::{ChatRepl, Cli, ConsoleFormatter, ConsoleStreamRenderer, ReplConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // === Configuration ===
    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    if cli.show_config {
        println!();
        println!("{}", ConfigLoader::render(&config)?);
        return Ok(());
    }

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_tracing(cli.verbose, config.logging.log_dir_path().as_deref());

    info!("Starting Eburon CodeMax");

    let model: Model = match &cli.model {
        Some(id) => {
            let Ok(model) = id.parse::<Model>();
            model
        }
        None => config.chat.model.clone(),
    };

    if cli.list_models {
        print!(
            "{}",
            ConsoleFormatter::format_models(&Model::known_models(), &model)
        );
        return Ok(());
    }

    // === Dependency Injection ===
    let gateway: Arc<dyn LlmGateway> = Arc::new(
        GeminiLlmGateway::from_config(&config.provider)
            .context("Cannot connect to the Gemini API")?,
    );

    let preview_dir = preview_dir(&cli, &config);
    let preview: Arc<dyn PreviewPort> = match &preview_dir {
        Some(dir) => Arc::new(FilePreviewRenderer::new(dir)),
        None => Arc::new(NoPreview),
    };

    let conversation_logger: Arc<dyn ConversationLogger> =
        match config.logging.conversation_log_path() {
            Some(path) => match JsonlConversationLogger::new(&path) {
                Some(logger) => {
                    info!("Conversation log: {}", logger.path().display());
                    Arc::new(logger)
                }
                None => Arc::new(NoConversationLogger),
            },
            None => Arc::new(NoConversationLogger),
        };

    let attachments: Arc<dyn AttachmentLoader> =
        Arc::new(LocalAttachmentLoader::new(config.chat.max_attachment_bytes));

    let controller = Arc::new(
        ChatController::new(gateway)
            .with_preview(preview)
            .with_conversation_logger(conversation_logger),
    );

    // Chat mode
    if cli.is_interactive() {
        if cli.attach.is_some() {
            warn!("--attach is ignored in chat mode; use /attach instead");
        }
        let repl_config = ReplConfig {
            show_progress: config.repl.show_progress && !cli.quiet,
            history_file: Some(config.repl.resolved_history_file()),
        };
        let mut repl = ChatRepl::new(controller, attachments, model)
            .with_config(repl_config)
            .with_preview_dir(preview_dir);

        repl.run().await?;
        return Ok(());
    }

    // Single prompt mode
    let prompt = match cli.prompt {
        Some(p) => p,
        None => bail!("Prompt is required. Use --chat for interactive mode."),
    };

    let attachment = match &cli.attach {
        Some(path) => Some(
            attachments
                .load(path)
                .await
                .with_context(|| format!("Cannot attach {}", path.display()))?,
        ),
        None => None,
    };
    let request = SendRequest::new(prompt, model.clone()).with_attachment(attachment);

    let outcome = if cli.quiet {
        let outcome = controller.send(request, &NoTurnProgress).await?;
        println!("{}", outcome.text);
        outcome
    } else {
        println!();
        println!(
            "Eburon CodeMax - {} ({})",
            model.display_name(),
            model.variant()
        );
        println!();
        let renderer = ConsoleStreamRenderer::new().with_spinner(config.repl.show_progress);
        controller.send(request, &renderer).await?
    };

    if outcome.phase == TurnPhase::Failed {
        bail!(
            "Generation failed: {}",
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }

    if !cli.quiet {
        println!();
        print!(
            "{}",
            ConsoleFormatter::format_turn_summary(&outcome, preview_dir.as_deref())
        );
    }

    Ok(())
}

/// Preview directory, or `None` when previews are disabled
fn preview_dir(cli: &Cli, config: &FileConfig) -> Option<PathBuf> {
    if cli.no_preview || !config.preview.enabled {
        return None;
    }
    Some(
        cli.preview_dir
            .clone()
            .unwrap_or_else(|| config.preview.resolved_dir()),
    )
}

/// Initialize logging based on verbosity level; `RUST_LOG` wins when set.
///
/// With a log directory, output goes to a daily rolling file instead of
/// stderr and the returned guard must outlive the program.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "codemax.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

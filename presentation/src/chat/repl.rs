//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::{ConsoleFormatter, ConsoleStreamRenderer, ReplConfig};
use codemax_application::{AttachmentLoader, ChatController, ChatError, SendRequest};
use codemax_domain::{InlineData, Model, PromptTemplate};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    New,
    History,
    Messages,
    /// 1-based index into the conversation (see `/messages`)
    Preview(usize),
    /// 1-based index into the creation list
    Select(usize),
    Verify,
    Reset,
    Model(Option<String>),
    Models,
    Attach(PathBuf),
    Detach,
    Quit,
}

impl ReplCommand {
    /// Parse a line starting with `/`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let rest = line[name.len()..].trim();

        let command = match name {
            "/help" | "/h" | "/?" => Self::Help,
            "/new" => Self::New,
            "/history" => Self::History,
            "/messages" => Self::Messages,
            "/preview" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => Self::Preview(n),
                _ => return Err("Usage: /preview N (see /messages)".to_string()),
            },
            "/select" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => Self::Select(n),
                _ => return Err("Usage: /select N (see /history)".to_string()),
            },
            "/verify" => Self::Verify,
            "/reset" => Self::Reset,
            "/model" => Self::Model((!rest.is_empty()).then(|| rest.to_string())),
            "/models" => Self::Models,
            "/attach" if !rest.is_empty() => Self::Attach(PathBuf::from(rest)),
            "/attach" => return Err("Usage: /attach PATH".to_string()),
            "/detach" => Self::Detach,
            "/quit" | "/exit" | "/q" => Self::Quit,
            other => return Err(format!("Unknown command: {}", other)),
        };
        Ok(command)
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    controller: Arc<ChatController>,
    attachments: Arc<dyn AttachmentLoader>,
    model: Model,
    pending_attachment: Option<(PathBuf, InlineData)>,
    preview_dir: Option<PathBuf>,
    config: ReplConfig,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(
        controller: Arc<ChatController>,
        attachments: Arc<dyn AttachmentLoader>,
        model: Model,
    ) -> Self {
        Self {
            controller,
            attachments,
            model,
            pending_attachment: None,
            preview_dir: None,
            config: ReplConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Directory where previews are written, for display only
    pub fn with_preview_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.preview_dir = dir;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(path) = &self.config.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let prompt = match &self.pending_attachment {
                Some(_) => format!("{} [+file] >>> ", self.model.key()),
                None => format!("{} >>> ", self.model.key()),
            };

            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    // Handle commands
                    if line.starts_with('/') {
                        match ReplCommand::parse(line) {
                            Ok(command) => {
                                if self.handle_command(command).await {
                                    break;
                                }
                            }
                            Err(message) => {
                                println!("{}", message);
                                println!("Type /help for available commands");
                            }
                        }
                        continue;
                    }

                    self.process_prompt(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(path) = &self.config.history_file {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            Eburon CodeMax - Chat            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Model: {} ({}, {})",
            self.model.display_name(),
            self.model.key(),
            self.model.variant()
        );
        println!();
        println!("Try one of:");
        for prompt in PromptTemplate::starter_prompts() {
            println!("  - {}", prompt);
        }
        println!();
        println!("Type /help for commands.");
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /new              - Start a new chat (creations are kept)");
        println!("  /history          - List creations, most recent first");
        println!("  /select N         - Make creation N active");
        println!("  /messages         - List the messages of this chat");
        println!("  /preview N        - Preview the document in message N (not recorded)");
        println!("  /verify           - Ask the model to audit and fix the active creation");
        println!("  /reset            - Clear the active preview");
        println!("  /model [ID]       - Show or switch the model");
        println!("  /models           - List available models");
        println!("  /attach PATH      - Attach an image or PDF to the next message");
        println!("  /detach           - Drop the pending attachment");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    /// Handle a slash command. Returns true if should exit.
    async fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::New => match self.controller.new_chat() {
                Ok(()) => {
                    self.pending_attachment = None;
                    println!("{}", "Started a new chat.".green());
                }
                Err(e) => println!("{} {}", "Error:".red(), e),
            },
            ReplCommand::History => {
                if let Some(title) = self.controller.title() {
                    println!("{} {}", "Chat:".cyan().bold(), title);
                }
                let active = self.controller.active_creation().map(|c| c.id);
                print!(
                    "{}",
                    ConsoleFormatter::format_creations(&self.controller.creations(), active)
                );
            }
            ReplCommand::Messages => {
                print!(
                    "{}",
                    ConsoleFormatter::format_messages(&self.controller.messages())
                );
            }
            ReplCommand::Preview(n) => match self.controller.preview_message(n - 1) {
                Ok(creation) => {
                    println!("{} {}", "Previewing:".green(), creation.name);
                    if let Some(dir) = &self.preview_dir {
                        println!("  {}", dir.join("current.html").display());
                    }
                }
                Err(ChatError::NoSuchMessage(_)) => println!(
                    "No message {} ({} in this chat). See /messages.",
                    n,
                    self.controller.messages().len()
                ),
                Err(ChatError::NoDocument(_)) => {
                    println!("Message {} does not contain an HTML document.", n)
                }
                Err(e) => println!("{} {}", "Error:".red(), e),
            },
            ReplCommand::Select(n) => {
                let creations = self.controller.creations();
                match creations.get(n - 1) {
                    Some(creation) => match self.controller.select_creation(creation.id) {
                        Ok(selected) => println!("{} {}", "Active:".green(), selected.name),
                        Err(e) => println!("{} {}", "Error:".red(), e),
                    },
                    None => println!(
                        "No creation {} ({} recorded). See /history.",
                        n,
                        creations.len()
                    ),
                }
            }
            ReplCommand::Verify => {
                println!();
                let renderer = self.renderer();
                match self
                    .controller
                    .verify_active(self.model.clone(), &renderer)
                    .await
                {
                    Ok(outcome) => print!(
                        "{}",
                        ConsoleFormatter::format_turn_summary(&outcome, self.preview_dir.as_deref())
                    ),
                    Err(ChatError::NoActiveCreation) => {
                        println!("No active creation to verify. See /history and /select.")
                    }
                    Err(e) => println!("{} {}", "Error:".red(), e),
                }
                println!();
            }
            ReplCommand::Reset => {
                self.controller.reset_preview();
                println!("Preview cleared.");
            }
            ReplCommand::Model(None) => {
                println!(
                    "Current model: {} ({}, backend {})",
                    self.model.display_name(),
                    self.model.key(),
                    self.model.backend_id()
                );
            }
            ReplCommand::Model(Some(id)) => {
                let Ok(model) = id.parse::<Model>();
                println!("Switched to {} ({})", model.display_name(), model.variant());
                self.model = model;
            }
            ReplCommand::Models => {
                print!(
                    "{}",
                    ConsoleFormatter::format_models(&Model::known_models(), &self.model)
                );
                println!();
            }
            ReplCommand::Attach(path) => match self.attachments.load(&path).await {
                Ok(inline) => {
                    println!(
                        "Attached {} ({}) to the next message.",
                        path.display(),
                        inline.mime_type
                    );
                    self.pending_attachment = Some((path, inline));
                }
                Err(e) => println!("{} {}", "Error:".red(), e),
            },
            ReplCommand::Detach => match self.pending_attachment.take() {
                Some((path, _)) => println!("Detached {}.", path.display()),
                None => println!("No pending attachment."),
            },
        }
        false
    }

    fn renderer(&self) -> ConsoleStreamRenderer {
        ConsoleStreamRenderer::new().with_spinner(self.config.show_progress)
    }

    async fn process_prompt(&mut self, text: &str) {
        println!();

        let attachment = self.pending_attachment.take().map(|(_, inline)| inline);
        let request = SendRequest::new(text, self.model.clone()).with_attachment(attachment);
        let renderer = self.renderer();

        match self.controller.send(request, &renderer).await {
            Ok(outcome) => print!(
                "{}",
                ConsoleFormatter::format_turn_summary(&outcome, self.preview_dir.as_deref())
            ),
            Err(e) => {
                warn!("Send rejected: {}", e);
                eprintln!("Error: {}", e);
            }
        }
        println!();
    }
}

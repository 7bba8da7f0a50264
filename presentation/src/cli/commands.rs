//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for codemax
#[derive(Parser, Debug)]
#[command(name = "codemax")]
#[command(author, version, about = "Eburon CodeMax - streaming HTML builder on Gemini")]
#[command(long_about = r#"
CodeMax turns a prompt into a complete, self-contained HTML document.

The response streams into the terminal as it arrives. When it contains an
HTML document, the document is recorded as a creation and written to the
preview directory (current.html always holds the active one).

Configuration files are loaded from (in priority order):
1. --config <path>                     Explicit config file
2. CODEMAX_<SECTION>__<KEY>            Environment variables
3. ./codemax.toml                      Project-level config
4. ~/.config/codemax/config.toml       Global config

The API key is read from $GEMINI_API_KEY unless configured otherwise.

Example:
  codemax "Build a logic gate visualizer with animations"
  codemax -m codemax-1.3 --attach mockup.png "Recreate this layout"
  codemax --chat -m codemax-beta
"#)]
pub struct Cli {
    /// The prompt to send (not required in chat mode)
    pub prompt: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Model key (codemax-1.3, codemax-pro, codemax-beta) or backend id
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Attach an image or PDF to the prompt
    #[arg(short, long, value_name = "PATH")]
    pub attach: Option<PathBuf>,

    /// Directory for rendered previews
    #[arg(long, value_name = "DIR")]
    pub preview_dir: Option<PathBuf>,

    /// Do not write previews
    #[arg(long)]
    pub no_preview: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,

    /// List the available models and exit
    #[arg(long)]
    pub list_models: bool,
}

impl Cli {
    /// Interactive mode: `--chat`, or no prompt given
    pub fn is_interactive(&self) -> bool {
        self.chat || self.prompt.is_none()
    }
}

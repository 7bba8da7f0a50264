//! Configuration file loading for codemax
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Environment: `CODEMAX_<SECTION>__<KEY>` (e.g. `CODEMAX_CHAT__MODEL`)
//! 3. Project root: `./codemax.toml` or `./.codemax.toml`
//! 4. Global: `$XDG_CONFIG_HOME/codemax/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_MAX_ATTACHMENT_BYTES, FileChatConfig, FileConfig,
    FileLoggingConfig, FilePreviewConfig, FileProviderConfig, FileReplConfig,
};
pub use loader::ConfigLoader;

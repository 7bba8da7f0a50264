//! Progress reporting for a streaming turn

use codemax_application::TurnProgressNotifier;
use codemax_domain::{Creation, Model, STREAM_FAILURE_MESSAGE};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// How the next cumulative text relates to what is already on screen
#[derive(Debug, PartialEq, Eq)]
pub enum RenderStep<'a> {
    /// Print only this suffix
    Append(&'a str),
    /// The text no longer extends what was shown; print it all again
    Replace(&'a str),
}

/// Decide what to print for `cumulative` given the text already `shown`.
pub fn render_step<'a>(shown: &str, cumulative: &'a str) -> RenderStep<'a> {
    match cumulative.strip_prefix(shown) {
        Some(suffix) => RenderStep::Append(suffix),
        None => RenderStep::Replace(cumulative),
    }
}

/// Streams the response to stdout with a spinner until the first chunk
pub struct ConsoleStreamRenderer {
    show_spinner: bool,
    spinner: Mutex<Option<ProgressBar>>,
    shown: Mutex<String>,
}

impl ConsoleStreamRenderer {
    pub fn new() -> Self {
        Self {
            show_spinner: true,
            spinner: Mutex::new(None),
            shown: Mutex::new(String::new()),
        }
    }

    /// Set whether to show the waiting spinner
    pub fn with_spinner(mut self, show: bool) -> Self {
        self.show_spinner = show;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn clear_spinner(&self) {
        let spinner = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
    }

    /// End the streamed block on a fresh line.
    fn close_block(&self) {
        let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        if !shown.is_empty() && !shown.ends_with('\n') {
            println!();
        }
        shown.clear();
    }
}

impl Default for ConsoleStreamRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for ConsoleStreamRenderer {
    fn on_turn_start(&self, model: &Model) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();

        if !self.show_spinner {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(model.display_name().to_string());
        pb.set_message(format!("{} is building...", model.variant()));
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_increment(&self, cumulative: &str) {
        self.clear_spinner();

        let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stdout = std::io::stdout().lock();
        let _ = match render_step(&shown, cumulative) {
            RenderStep::Append(suffix) => write!(stdout, "{}", suffix),
            RenderStep::Replace(full) => write!(stdout, "\n{}\n{}", "[restarted]".dimmed(), full),
        };
        let _ = stdout.flush();
        shown.clear();
        shown.push_str(cumulative);
    }

    fn on_turn_settled(&self, _text: &str, creation: Option<&Creation>) {
        self.clear_spinner();
        self.close_block();
        if let Some(creation) = creation {
            println!(
                "{} Creation recorded: {}",
                "v".green(),
                creation.name.bold()
            );
        }
    }

    fn on_turn_failed(&self, error: &str) {
        self.clear_spinner();
        self.close_block();
        println!("{} {}", "x".red(), STREAM_FAILURE_MESSAGE.red());
        println!("  {}", error.dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_step_appends_unseen_suffix() {
        assert_eq!(render_step("", "<html>"), RenderStep::Append("<html>"));
        assert_eq!(
            render_step("<html>", "<html><body>"),
            RenderStep::Append("<body>")
        );
        assert_eq!(render_step("same", "same"), RenderStep::Append(""));
    }

    #[test]
    fn test_render_step_replaces_when_text_diverges() {
        assert_eq!(
            render_step("<html><body>", "<!DOCTYPE html>"),
            RenderStep::Replace("<!DOCTYPE html>")
        );
    }

    #[test]
    fn test_renderer_tracks_shown_text() {
        let renderer = ConsoleStreamRenderer::new().with_spinner(false);
        renderer.on_turn_start(&Model::CodeMaxPro);
        renderer.on_increment("c1");
        renderer.on_increment("c1c2");
        assert_eq!(*renderer.shown.lock().unwrap(), "c1c2");

        renderer.on_turn_settled("c1c2", None);
        assert!(renderer.shown.lock().unwrap().is_empty());
        assert!(renderer.spinner.lock().unwrap().is_none());
    }
}

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Builds the spinner shown while pairs are being trimmed.
pub struct ProgressBarBuilder {
    style_template: &'static str,
    message: String,
    hidden: bool,
    tick: Option<Duration>,
}

impl ProgressBarBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            style_template: "{spinner:.green} {msg} {human_pos} pairs [{elapsed_precise}]",
            message: message.into(),
            hidden: false,
            tick: None,
        }
    }

    pub fn with_tick(mut self, interval: Duration) -> Self {
        self.tick = Some(interval);
        self
    }

    /// A hidden bar accepts updates but never draws.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn build(self) -> Result<ProgressBar> {
        if self.hidden {
            return Ok(ProgressBar::hidden());
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template(self.style_template)?);
        pb.set_message(self.message);

        if let Some(interval) = self.tick {
            pb.enable_steady_tick(interval);
        }

        Ok(pb)
    }
}

//! Terminal spinner for long-running client operations.
//!
//! Thin wrapper over [`indicatif`] so callers don't repeat the styling. A
//! hidden spinner accepts every call and draws nothing, which is how
//! `--quiet` turns progress off.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// An indeterminate progress indicator.
pub struct Spinner {
    inner: ProgressBar,
}

impl Spinner {
    /// Start a spinner showing `message`, or a hidden one when `hidden`.
    pub fn start(message: impl Into<String>, hidden: bool) -> Self {
        let inner = if hidden {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        inner.set_message(message.into());
        Self {
            inner,
        }
    }

    /// Replace the text next to the spinner.
    pub fn set_message(&self, message: impl Into<String>) {
        self.inner.set_message(message.into());
    }

    /// Stop and leave `message` as the final line.
    pub fn finish_with_message(&self, message: impl Into<String>) {
        self.inner.finish_with_message(message.into());
    }

    /// Stop and erase the spinner.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    /// Whether the spinner draws nothing.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

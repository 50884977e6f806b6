//! Load spinner that becomes a no-op when the `progress` feature is disabled

use std::borrow::Cow;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner drawn on stderr while names are loaded
pub struct LoadSpinner {
    #[cfg(feature = "progress")]
    bar: ProgressBar,
}

impl LoadSpinner {
    #[cfg(feature = "progress")]
    pub fn start(message: impl Into<Cow<'static, str>>) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message);
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { bar }
    }

    #[cfg(not(feature = "progress"))]
    pub fn start(_message: impl Into<Cow<'static, str>>) -> Self {
        Self {}
    }

    #[cfg(feature = "progress")]
    pub fn set_message(&self, message: impl Into<Cow<'static, str>>) {
        self.bar.set_message(message);
    }

    #[cfg(not(feature = "progress"))]
    pub fn set_message(&self, _message: impl Into<Cow<'static, str>>) {}

    /// Remove the spinner from the terminal
    #[cfg(feature = "progress")]
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }

    #[cfg(not(feature = "progress"))]
    pub fn finish(self) {}
}

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

/// Counts generated groups.
pub struct Bar {
    bar: ProgressBar,
}

impl Bar {
    pub fn new(total: u64, description: &str) -> Result<Self> {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} groups ({per_sec}, {eta})")
            .context("invalid progress template")?
            .progress_chars("●○ ");

        bar.set_style(style);
        bar.set_message(description.to_string());

        Ok(Self { bar })
    }

    /// A bar that counts without drawing.
    pub fn hidden(total: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total);
        Self { bar }
    }

    pub fn add(&self, delta: u64) {
        self.bar.inc(delta);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Done");
    }
}

impl Drop for Bar {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish();
        }
    }
}

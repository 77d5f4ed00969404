//! Download progress with CI fallback

use indicatif::{ProgressBar, ProgressStyle};

/// Byte-level progress for the artifact transfer.
///
/// Interactive terminals get an indicatif bar, or a byte-counting spinner
/// when the remote does not advertise a length. Build logs get nothing
/// per-chunk; the installer narrates the transfer instead.
pub struct DownloadProgress {
    bar: Option<ProgressBar>,
}

impl DownloadProgress {
    pub fn new(interactive: bool, total: Option<u64>) -> Self {
        if !interactive {
            return Self { bar: None };
        }

        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("  {spinner:.cyan} {bytes}/{total_bytes} {bar:20.cyan/dim} {bytes_per_sec:.dim} {elapsed:.dim}")
                        .unwrap()
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                        .progress_chars("━╸─"),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("  {spinner:.cyan} {bytes} {bytes_per_sec:.dim}")
                        .unwrap(),
                );
                bar
            }
        };
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        Self { bar: Some(bar) }
    }

    /// Record bytes written since the last call.
    pub fn advance(&self, bytes: u64) {
        if let Some(ref bar) = self.bar {
            bar.inc(bytes);
        }
    }

    /// Clear the bar.
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

//! Terminal progress bar for batch insertion.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tabload_cli::pipeline::ProgressSink;
use tabload_db::InsertProgress;
use tabload_model::FileReport;

const TEMPLATE: &str = "{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%)";

/// One bar per file, cleared once the file is done.
pub struct BatchProgressBar {
    bar: Option<ProgressBar>,
    style: ProgressStyle,
}

impl BatchProgressBar {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        Self { bar: None, style }
    }
}

impl Default for BatchProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BatchProgressBar {
    fn insert_started(&mut self, table: &str, total_rows: usize) {
        let bar = ProgressBar::with_draw_target(
            Some(total_rows as u64),
            ProgressDrawTarget::stderr(),
        );
        bar.set_style(self.style.clone());
        bar.set_message(table.to_string());
        self.bar = Some(bar);
    }

    fn batch_inserted(&mut self, progress: InsertProgress) {
        if let Some(bar) = &self.bar {
            bar.set_position(progress.inserted as u64);
        }
    }

    fn shows_batches(&self) -> bool {
        true
    }

    fn file_finished(&mut self, _report: &FileReport) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

//! Progress bar over patient files.

use std::io::{self, IsTerminal};

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{spinner:.green} {msg:8} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})";

/// Bar drawn on stderr, or a hidden bar when stderr is not a terminal.
pub fn file_progress_bar() -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template(TEMPLATE)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(0).with_style(style)
}

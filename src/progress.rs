//! Progress bar display for license detection

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for the detection phase
pub struct ProgressDisplay {
    /// One tick per dependency
    dependency_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a progress display for `total` dependencies.
    ///
    /// The bar is hidden unless stderr is a terminal, so logs and tests see
    /// no control sequences.
    pub fn new(total: u64) -> Self {
        let dependency_pb = if console::Term::stderr().is_term() {
            ProgressBar::new(total)
        } else {
            ProgressBar::hidden()
        };

        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        dependency_pb.set_style(style);

        Self { dependency_pb }
    }

    /// Show the dependency currently being examined and advance the bar
    pub fn advance(&self, coordinate: &str) {
        // Truncate long coordinates for display
        let display = if coordinate.len() > 50 {
            let cut = coordinate.len() - 47;
            let start = (cut..coordinate.len())
                .find(|&i| coordinate.is_char_boundary(i))
                .unwrap_or(coordinate.len());
            format!("...{}", &coordinate[start..])
        } else {
            coordinate.to_string()
        };
        self.dependency_pb.set_message(display);
        self.dependency_pb.inc(1);
    }

    /// Finish progress
    pub fn finish(&self) {
        self.dependency_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.dependency_pb.abandon();
    }
}

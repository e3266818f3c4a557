//! Progress bar utilities for long-running steps.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for loading jackknife replicates.
pub fn create_replicate_progress(total_files: usize, enabled: bool) -> Option<ProgressBar> {
    if !enabled || total_files == 0 {
        return None;
    }

    let pb = ProgressBar::new(total_files as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} replicates {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    Some(pb)
}

/// Create a progress bar for writing one kinemage per category.
pub fn create_category_progress(total_categories: usize, enabled: bool) -> Option<ProgressBar> {
    if !enabled || total_categories == 0 {
        return None;
    }

    let pb = ProgressBar::new(total_categories as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} categories - {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    Some(pb)
}

/// Show the item currently being processed.
pub fn set_progress_message(pb: Option<&ProgressBar>, message: &str) {
    if let Some(pb) = pb {
        pb.set_message(message.to_string());
    }
}

/// Finish a progress bar with a message.
pub fn finish_progress(pb: Option<ProgressBar>, message: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(message.to_string());
    }
}

/// Increment a progress bar.
pub fn inc_progress(pb: Option<&ProgressBar>) {
    if let Some(pb) = pb {
        pb.inc(1);
    }
}

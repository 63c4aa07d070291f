//! Utils - Common Utilities for CLI Commands
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

// =============================================================================
// Output Formatting
// =============================================================================

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a header
pub fn print_header(title: &str) {
    println!();
    println!("{}", title.bold().underline());
    println!();
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Format a float in scientific notation
pub fn format_sci(value: f64) -> String {
    format!("{value:.4e}")
}

// =============================================================================
// Progress Bars
// =============================================================================

/// Create a training progress bar, hidden when `quiet`
pub fn training_progress_bar(total: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

//! CLI progress display utilities
//!
//! Step indicators and completion timing for the generate command.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::HumanDuration;

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for reading templates and config
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("\u{1F50D} ", "");
/// Gear - for model building and encoding
pub static GEAR: Emoji<'_, '_> = Emoji("\u{2699}\u{FE0F}  ", "");
/// Floppy disk - for writing records
pub static DISK: Emoji<'_, '_> = Emoji("\u{1F4BE} ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("\u{2728} ", "");

// =============================================================================
// Step-Based Progress
// =============================================================================

/// Print a step indicator: `[1/3] Message...`
///
/// # Example
/// ```ignore
/// print_step(1, 3, LOOKING_GLASS, "Reading configuration...");
/// print_step(2, 3, GEAR, "Building records...");
/// print_step(3, 3, DISK, "Written:");
/// ```
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

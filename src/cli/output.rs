use colored::Colorize;

use crate::poller::{StatusUpdate, LOADING_MESSAGE, NETWORK_MESSAGE, STALE_MESSAGE};

/// Print a success message to stderr with a green checkmark prefix.
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print a warning message to stderr with a yellow warning prefix.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow(), msg);
}

/// Print a bold header/section title to stderr.
pub fn header(msg: &str) {
    eprintln!("{}", msg.bold());
}

/// Create a progress spinner with the given message.
///
/// The spinner ticks at 80ms intervals and uses braille-dot characters.
/// Call `.finish_and_clear()` when done.
pub fn spinner(msg: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_style(
        indicatif::ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("valid spinner template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Render a status update the way the status bar item shows it.
///
/// The normal style puts the extra message on its own indented line; the
/// legacy style keeps everything on one line.
pub fn render_status(update: &StatusUpdate, legacy: bool) -> String {
    let message = match update.message.as_str() {
        NETWORK_MESSAGE => update.message.bright_red().to_string(),
        STALE_MESSAGE | LOADING_MESSAGE => update.message.yellow().to_string(),
        m if m.ends_with('!') => update.message.yellow().to_string(),
        _ => update.message.bold().to_string(),
    };

    match (&update.extra_message, legacy) {
        (None, _) => message,
        (Some(extra), true) => format!("{} ({})", message, extra),
        (Some(extra), false) => format!("{}\n  {}", message, extra.dimmed()),
    }
}

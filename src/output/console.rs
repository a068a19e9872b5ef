//! Console output utilities.

use console::style;

use crate::download::ErrorReporter;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     TIDAL Downloader                                  ║
║     Tracks, albums and playlists as ALAC              ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(mode: &str, targets: &[String], download_dir: &str) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Mode: {}", mode);
    if !targets.is_empty() {
        println!("  Items: {}", targets.join(", "));
    }
    println!("  Directory: {}", download_dir);
    println!();
}

/// Reports failures on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ErrorReporter for ConsoleReporter {
    fn report(&self, title: &str, content: &str) {
        tracing::debug!(title, content, "Reported error");
        print_error(&format!("{}: {}", title, content));
    }
}

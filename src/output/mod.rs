//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Progress bars
//! - Failure summaries

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    print_banner, print_config_summary, print_error, print_info, print_success, print_warning,
    ConsoleReporter,
};
pub use progress::{create_download_bar, create_item_bar, create_spinner};
pub use stats::{print_run_summary, RunSummary};

// ============================================================================
// vidjoin-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: UI Components and Styling
//
// Implements the core library's ProgressReporter for an interactive terminal.
// Everything is written to stderr so that stdout carries only the command's
// result (the output path, or JSON with --json).
//
// Visual hierarchy:
// 1. Sections (===== SECTION =====)
// 2. Processing steps (» Step description)
// 3. Status items (  Label:     Value)
// 4. Success messages (✓ Success message)

use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use vidjoin_core::format_duration;
use vidjoin_core::progress_reporting::{OutputLevel, ProgressReporter};

// ============================================================================
// STYLING CONSTANTS
// ============================================================================

pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const PROCESSING_SYMBOL: &str = "»";
    pub const ERROR_SYMBOL: &str = "✗";
    pub const WARNING_SYMBOL: &str = "!";

    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";

    pub const STATUS_INDENT: &str = "  ";
    pub const STATUS_LABEL_WIDTH: usize = 12;

    pub const PROGRESS_TEMPLATE: &str = "  Encoding: {percent:>3}% [{bar:30}] {msg}";
    pub const PROGRESS_CHARS: &str = "##.";
}

/// Formats a section header line.
pub fn format_section(title: &str) -> String {
    format!(
        "{}{}{}",
        styling::SECTION_PREFIX,
        style(title.to_uppercase()).cyan().bold(),
        styling::SECTION_SUFFIX
    )
}

/// Formats an aligned key-value status line.
pub fn format_status(label: &str, value: &str, highlight: bool) -> String {
    let label = format!("{label}:");
    let value = if highlight {
        style(value).green().bold().to_string()
    } else {
        value.to_string()
    };
    format!(
        "{}{:<width$} {}",
        styling::STATUS_INDENT,
        label,
        value,
        width = styling::STATUS_LABEL_WIDTH
    )
}

// ============================================================================
// TERMINAL REPORTER
// ============================================================================

/// Progress reporter that renders core library events on stderr.
pub struct TerminalReporter {
    term: Term,
    progress_bar: Mutex<Option<ProgressBar>>,
    verbose: bool,
}

impl TerminalReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: Mutex::new(None),
            verbose,
        }
    }

    fn write_line(&self, line: &str) {
        // Route through the bar when one is active so it is redrawn below the text.
        if let Ok(guard) = self.progress_bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.println(line);
                return;
            }
        }
        let _ = self.term.write_line(line);
    }

    fn new_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(100);
        let bar_style = ProgressStyle::with_template(styling::PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(styling::PROGRESS_CHARS);
        pb.set_style(bar_style);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl ProgressReporter for TerminalReporter {
    fn output(&self, level: OutputLevel, text: &str) {
        match level {
            OutputLevel::Section => {
                self.write_line("");
                self.write_line(&format_section(text));
                self.write_line("");
            }
            OutputLevel::Processing => {
                self.write_line(&format!(
                    "{} {}",
                    style(styling::PROCESSING_SYMBOL).cyan(),
                    style(text).bold()
                ));
            }
            OutputLevel::Success => {
                self.write_line(&format!(
                    "{} {}",
                    style(styling::SUCCESS_SYMBOL).green().bold(),
                    text
                ));
            }
            OutputLevel::Error => {
                self.write_line(&format!(
                    "{} {}",
                    style(styling::ERROR_SYMBOL).red().bold(),
                    style(text).red()
                ));
            }
            OutputLevel::Warning => {
                self.write_line(&format!(
                    "{} {}",
                    style(styling::WARNING_SYMBOL).yellow().bold(),
                    style(text).yellow()
                ));
            }
            OutputLevel::Debug => {
                if self.verbose {
                    self.write_line(&format!("{}{}", styling::STATUS_INDENT, style(text).dim()));
                }
            }
            OutputLevel::Info => {
                self.write_line(&format!("{}{}", styling::STATUS_INDENT, text));
            }
        }
    }

    fn output_status(&self, label: &str, value: &str, highlight: bool) {
        self.write_line(&format_status(label, value, highlight));
    }

    fn progress_bar(&self, percent: f32, elapsed_secs: f64, total_secs: f64) {
        if let Ok(mut guard) = self.progress_bar.lock() {
            let pb = guard.get_or_insert_with(Self::new_progress_bar);
            let position = percent.clamp(0.0, 100.0) as u64;
            // ffmpeg occasionally reports time going backwards
            if position >= pb.position() {
                pb.set_position(position);
            }
            pb.set_message(format!(
                "({} / {})",
                format_duration(elapsed_secs),
                format_duration(total_secs)
            ));
        }
    }

    fn clear_progress_bar(&self) {
        if let Ok(mut guard) = self.progress_bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn ffmpeg_command(&self, cmd_data: &str) {
        if self.verbose {
            self.write_line(&format!(
                "{}{} {}",
                styling::STATUS_INDENT,
                style("ffmpeg").dim(),
                style(cmd_data).dim()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_section_uppercases_title() {
        console::set_colors_enabled(false);
        assert_eq!(format_section("Concatenation"), "===== CONCATENATION =====");
    }

    #[test]
    fn test_format_status_aligns_label() {
        console::set_colors_enabled(false);
        assert_eq!(format_status("Clips", "3", false), "  Clips:       3");
    }

    #[test]
    fn test_progress_bar_lifecycle() {
        let reporter = TerminalReporter::new(false);
        reporter.progress_bar(40.0, 4.0, 10.0);
        reporter.progress_bar(20.0, 2.0, 10.0);
        {
            let guard = reporter.progress_bar.lock().unwrap();
            assert_eq!(guard.as_ref().unwrap().position(), 40);
        }
        reporter.clear_progress_bar();
        assert!(reporter.progress_bar.lock().unwrap().is_none());
    }
}

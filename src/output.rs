//! Cargo-style output formatting
//!
//! Status lines go to stderr so that commands writing structured data to
//! stdout (`metadata`) stay pipeable.

/// Console styles used across the tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Progress verbs ("Generating", "Created")
    Status,
    /// Informational verbs ("Scanning", "Checking")
    Info,
    /// Non-fatal diagnostics
    Warning,
    /// Directory names in tree views
    Directory,
    /// File names in tree views
    File,
    /// The final success banner
    Success,
    /// Numbered hints ("1.", "2.")
    Step,
    /// Emphasized text (paths, commands)
    Emphasis,
}

impl Style {
    pub const RESET: &'static str = "\x1b[0m";

    /// ANSI escape sequence that starts this style
    pub fn code(self) -> &'static str {
        match self {
            Style::Status | Style::Success => "\x1b[1;32m",
            Style::Info => "\x1b[1;36m",
            Style::Warning => "\x1b[1;33m",
            Style::Directory => "\x1b[1;34m",
            Style::File => "",
            Style::Step => "\x1b[33m",
            Style::Emphasis => "\x1b[1m",
        }
    }

    /// Wrap `text` in this style, or return it unchanged when color is off
    pub fn paint(self, text: &str, color: bool) -> String {
        if !color || self.code().is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.code(), text, Self::RESET)
        }
    }
}

/// Check if terminal supports colors
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err() && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(true)
}

/// Format: "{status:>12} {message}"
fn print_status(status: &str, style: Style, message: &str) {
    if supports_color() {
        eprintln!("{}{:>12}{} {}", style.code(), status, Style::RESET, message);
    } else {
        eprintln!("{:>12} {}", status, message);
    }
}

pub fn generating(message: &str) {
    print_status("Generating", Style::Status, message);
}

pub fn created(message: &str) {
    print_status("Created", Style::Status, message);
}

pub fn writing(message: &str) {
    print_status("Writing", Style::Status, message);
}

pub fn finished(message: &str) {
    print_status("Finished", Style::Status, message);
}

pub fn scanning(message: &str) {
    print_status("Scanning", Style::Info, message);
}

pub fn parsing(message: &str) {
    print_status("Parsing", Style::Info, message);
}

pub fn checking(message: &str) {
    print_status("Checking", Style::Info, message);
}

pub fn skipping(message: &str) {
    print_status("Skipping", Style::Warning, message);
}

pub fn warning(message: &str) {
    print_status("Warning", Style::Warning, message);
}

/// Format byte size in human readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_without_color_is_identity() {
        assert_eq!(Style::Directory.paint("src/", false), "src/");
    }

    #[test]
    fn paint_wraps_in_escape_codes() {
        let painted = Style::Directory.paint("src/", true);
        assert!(painted.starts_with("\x1b[1;34m"));
        assert!(painted.ends_with(Style::RESET));
    }

    #[test]
    fn file_style_has_no_escape() {
        assert_eq!(Style::File.paint("a.cu", true), "a.cu");
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(12), "12 bytes");
        assert_eq!(format_size(2048), "2.00 KB");
    }
}

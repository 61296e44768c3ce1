//! Message styling for CLI output.
//!
//! | Prefix | Meaning | Color |
//! |--------|---------|-------|
//! | `[ok]` | Success | Green |
//! | `[err]` | Error | Red |
//! | `[warn]` | Warning | Yellow |
//! | `[info]` | Information | Blue |
//! | `[hint]` | Suggestion | Cyan |
//! | `[skip]` | Skipped document | Dim |

use owo_colors::OwoColorize;

use super::color::ColorMode;

/// Message severity/type for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Ok,
    Err,
    Warn,
    Info,
    Hint,
    Skip,
}

impl MessageType {
    /// Returns the prefix text for this message type.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Ok => "[ok]",
            Self::Err => "[err]",
            Self::Warn => "[warn]",
            Self::Info => "[info]",
            Self::Hint => "[hint]",
            Self::Skip => "[skip]",
        }
    }
}

/// Styling interface for CLI output.
///
/// ```
/// use entscore_cli::ui::{ColorMode, MessageType, Style};
///
/// let style = Style::new(ColorMode::Never);
/// assert_eq!(style.message(MessageType::Ok, "Imported"), "[ok] Imported");
/// ```
#[derive(Debug, Clone)]
pub struct Style {
    color_mode: ColorMode,
    quiet: bool,
}

impl Style {
    /// Create a Style instance with an explicit color mode.
    pub fn new(color_mode: ColorMode) -> Self {
        Self {
            color_mode,
            quiet: false,
        }
    }

    /// Suppress informational messages and hints.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Whether informational output is suppressed.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(&self) -> bool {
        self.color_mode.is_enabled()
    }

    /// Format a simple message with a type prefix.
    pub fn message(&self, msg_type: MessageType, text: &str) -> String {
        let prefix = msg_type.prefix();
        if self.colors_enabled() {
            let colored_prefix = match msg_type {
                MessageType::Ok => prefix.green().to_string(),
                MessageType::Err => prefix.red().to_string(),
                MessageType::Warn => prefix.yellow().to_string(),
                MessageType::Info => prefix.blue().to_string(),
                MessageType::Hint => prefix.cyan().to_string(),
                MessageType::Skip => prefix.dimmed().to_string(),
            };
            format!("{} {}", colored_prefix, text)
        } else {
            format!("{} {}", prefix, text)
        }
    }

    /// Print an informational message to stderr unless quiet.
    pub fn notice(&self, msg_type: MessageType, text: &str) {
        if !self.is_quiet() {
            eprintln!("{}", self.message(msg_type, text));
        }
    }

    /// Format a section header.
    pub fn section(&self, title: &str) -> String {
        if self.colors_enabled() {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format a structured error with optional cause and hint.
    pub fn error_with_context(
        &self,
        msg: &str,
        cause: Option<&str>,
        hint: Option<&str>,
    ) -> String {
        let mut output = self.message(MessageType::Err, msg);

        if let Some(cause_text) = cause {
            output.push_str(&format!("\n      Cause: {}", cause_text));
        }
        if let Some(hint_text) = hint {
            output.push_str(&format!("\n      Hint: {}", hint_text));
        }

        output
    }

    /// Format a key-value pair with optional coloring.
    pub fn key_value(&self, key: &str, value: &str) -> String {
        if self.colors_enabled() {
            format!("{}: {}", key.dimmed(), value)
        } else {
            format!("{}: {}", key, value)
        }
    }

    /// Format a file path (colored cyan).
    pub fn file_path(&self, path: &str) -> String {
        if self.colors_enabled() {
            path.cyan().to_string()
        } else {
            path.to_string()
        }
    }

    /// Format a relevance score with four decimals (bold).
    ///
    /// Scores are unbounded, so there is no color scale.
    pub fn score(&self, value: f64) -> String {
        let formatted = format!("{:.4}", value);
        if self.colors_enabled() {
            formatted.bold().to_string()
        } else {
            formatted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_no_color() {
        let style = Style::new(ColorMode::Never);
        assert_eq!(style.message(MessageType::Ok, "Success"), "[ok] Success");
        assert_eq!(style.message(MessageType::Skip, "d9"), "[skip] d9");
    }

    #[test]
    fn test_error_with_context() {
        let style = Style::new(ColorMode::Never);
        let output = style.error_with_context(
            "Scoring failed",
            Some("no length record"),
            Some("Check the document id"),
        );
        assert!(output.starts_with("[err] Scoring failed"));
        assert!(output.contains("Cause: no length record"));
        assert!(output.contains("Hint: Check the document id"));
    }

    #[test]
    fn test_score_format() {
        let style = Style::new(ColorMode::Never);
        assert_eq!(style.score(1.1875), "1.1875");
        assert_eq!(style.score(0.0), "0.0000");
    }

    #[test]
    fn test_quiet_flag() {
        let style = Style::new(ColorMode::Never).quiet(true);
        assert!(style.is_quiet());
    }
}

//! Visual theme and styling.

use std::time::Duration;

use console::Style;

use crate::operation::{StepOutcome, StepRecord};

/// stepline's visual theme.
#[derive(Debug, Clone)]
pub struct SteplineTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for headers (magenta bold).
    pub header: Style,
}

impl Default for SteplineTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl SteplineTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().magenta(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        format!(
            "{} {}",
            self.header.apply_to("▸"),
            self.highlight.apply_to(title)
        )
    }

    /// Format one step record: icon, position, name, duration, and the
    /// recovered error if any.
    pub fn format_step(&self, record: &StepRecord) -> String {
        let icon = record.outcome.display_char();
        let icon = match record.outcome {
            StepOutcome::Completed => self.success.apply_to(icon.to_string()),
            StepOutcome::Recovered => self.warning.apply_to(icon.to_string()),
        };
        let mut line = format!(
            "  {} {} {} {}",
            icon,
            self.dim.apply_to(format!("[{}]", record.position)),
            record.name,
            self.dim.apply_to(format!("({})", format_duration(record.duration)))
        );
        if let Some(error) = &record.error {
            let note = format!("recovered from: {}", error);
            line.push_str(&format!(" {}", self.dim.apply_to(note)));
        }
        line
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}

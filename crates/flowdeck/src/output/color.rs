//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success/Done:   green   (done status, completed actions)
//!   - Warning/Active: yellow  (in progress, high priority)
//!   - Error/Urgent:   red     (urgent priority, failures)
//!   - Review:         blue    (in review status)
//!   - Info/Reference: cyan    (issue numbers, ids)
//!   - Muted:          dimmed  (field labels, backlog)
//!   - Emphasis:       bold    (section headers)

use crate::domain::{IssuePriority, IssueStatus};
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Apply dimmed style to text (for field names).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Apply color to a status name.
pub(crate) fn colorize_status(status: IssueStatus, config: &OutputConfig) -> String {
    let text = status.display_name();
    if !config.use_colors {
        return text.to_string();
    }
    match status {
        IssueStatus::Backlog => text.dimmed().to_string(),
        IssueStatus::Todo => text.white().to_string(),
        IssueStatus::InProgress => text.yellow().to_string(),
        IssueStatus::InReview => text.blue().to_string(),
        IssueStatus::Done => text.green().to_string(),
    }
}

/// Apply color to a priority name.
pub(crate) fn colorize_priority(priority: IssuePriority, config: &OutputConfig) -> String {
    let text = priority.as_str();
    if !config.use_colors {
        return text.to_string();
    }
    match priority {
        IssuePriority::Urgent => text.red().bold().to_string(),
        IssuePriority::High => text.yellow().to_string(),
        IssuePriority::Medium => text.to_string(),
        IssuePriority::Low => text.dimmed().to_string(),
    }
}

/// Colorize an issue reference such as `#12` (cyan).
pub(crate) fn colorize_reference(reference: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return reference.to_string();
    }
    reference.cyan().to_string()
}

/// Render a label name in its own hex color.
///
/// Falls back to magenta when the stored color is not six hex digits.
pub(crate) fn colorize_label(name: &str, hex: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return name.to_string();
    }
    match parse_hex(hex) {
        Some((r, g, b)) => name.truecolor(r, g, b).to_string(),
        None => name.magenta().to_string(),
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Status icon for list views.
pub(crate) fn status_icon(status: IssueStatus, config: &OutputConfig) -> String {
    let icon = match status {
        IssueStatus::Backlog => "○",
        IssueStatus::Todo => "◌",
        IssueStatus::InProgress => "▶",
        IssueStatus::InReview => "◎",
        IssueStatus::Done => "✓",
    };
    if !config.use_colors {
        return icon.to_string();
    }
    match status {
        IssueStatus::Backlog => icon.dimmed().to_string(),
        IssueStatus::Todo => icon.white().to_string(),
        IssueStatus::InProgress => icon.yellow().to_string(),
        IssueStatus::InReview => icon.blue().to_string(),
        IssueStatus::Done => icon.green().to_string(),
    }
}

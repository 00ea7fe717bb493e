//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use sizing_lib::{DiskSeverity, DiskThresholds, SizingStatus};

/// Hours billed per month when projecting hourly costs
pub const HOURS_PER_MONTH: f64 = 720.0;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format currency
pub fn format_currency(amount: f64, currency: &str) -> String {
    match currency {
        "USD" => format!("${:.2}", amount),
        "EUR" => format!("€{:.2}", amount),
        "GBP" => format!("£{:.2}", amount),
        _ => format!("{:.2} {}", amount, currency),
    }
}

/// Format a percentage with two decimals
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Project an hourly cost over a month
pub fn monthly_cost(hourly: f64) -> f64 {
    hourly * HOURS_PER_MONTH
}

/// Color sizing status
pub fn color_status(status: SizingStatus) -> String {
    match status {
        SizingStatus::RightSized => status.to_string().green().to_string(),
        SizingStatus::Undersized => status.to_string().red().to_string(),
        SizingStatus::Oversized => status.to_string().yellow().to_string(),
    }
}

/// Disk percentage cell, red above the critical threshold and yellow above
/// the warning threshold
pub fn color_disk(value: f64, thresholds: &DiskThresholds) -> String {
    let text = format_percent(value);
    match thresholds.severity(value) {
        DiskSeverity::Critical => text.white().on_red().to_string(),
        DiskSeverity::Warning => text.black().on_yellow().to_string(),
        DiskSeverity::Normal => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.5, "USD"), "$0.50");
        assert_eq!(format_currency(360.0, "EUR"), "€360.00");
        assert_eq!(format_currency(1.234, "CHF"), "1.23 CHF");
    }

    #[test]
    fn test_monthly_cost() {
        assert_eq!(monthly_cost(0.5), 360.0);
        assert_eq!(monthly_cost(0.0), 0.0);
    }

    #[test]
    fn test_disk_cell_marks_displayed_value() {
        let t = DiskThresholds::default();
        assert_eq!(color_disk(95.0, &t), "95.00%".white().on_red().to_string());
        assert_eq!(color_disk(85.0, &t), "85.00%".black().on_yellow().to_string());
        // Shown as "90.00%"
        assert_eq!(color_disk(90.004, &t), "90.00%".black().on_yellow().to_string());
        assert_eq!(t.severity(90.004), DiskSeverity::Warning);
    }

    #[test]
    fn test_normal_disk_cell_is_plain() {
        assert_eq!(color_disk(42.0, &DiskThresholds::default()), "42.00%");
    }
}

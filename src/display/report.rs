//! Report formatting utilities for terminal output
//!
//! Bars, percentages and the per-category analytics table.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::{Amount, ReportPeriod};
use crate::services::analytics::CategoryBreakdown;

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expense")]
    expense: String,
}

/// Format an analytics breakdown: a table of category totals, then the
/// expense distribution as bars
pub fn format_breakdown(
    breakdown: &CategoryBreakdown,
    period: &ReportPeriod,
    currency: &str,
) -> String {
    let mut output = format!("Analytics: {}\n{}\n", period, separator(40));

    if breakdown.rows.is_empty() {
        output.push_str("No transactions in this period.\n");
        return output;
    }

    let rows: Vec<BreakdownRow> = breakdown
        .rows
        .iter()
        .map(|r| BreakdownRow {
            category: r.category.clone(),
            income: r.income.format_with_symbol(currency),
            expense: r.expense.format_with_symbol(currency),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::psql())
        .modify(Columns::new(1..), Alignment::right())
        .to_string();
    output.push_str(&table);
    output.push('\n');

    if !breakdown.expense_slices.is_empty() {
        let total: Amount = breakdown.expense_slices.iter().map(|(_, a)| *a).sum();
        let max = breakdown
            .expense_slices
            .first()
            .map(|(_, a)| a.value())
            .unwrap_or(0.0);

        output.push_str("\nExpense distribution\n");
        for (category, amount) in &breakdown.expense_slices {
            let pct = if total.is_positive() {
                amount.value() / total.value() * 100.0
            } else {
                0.0
            };
            output.push_str(&format!(
                "{:<16} {} {:>6}\n",
                category,
                format_bar(amount.value(), max, 20),
                format_percentage(pct)
            ));
        }
    }

    output
}

//! Balance and dashboard formatting

use crate::services::analytics::DashboardStats;
use crate::services::Balances;

use super::report::{format_bar, format_percentage};
use super::transaction::format_transaction_list;

/// Format the balance figures as an aligned block
pub fn format_balances(balances: &Balances, currency: &str) -> String {
    let lines = [
        ("Usable balance", balances.usable_balance),
        ("Vault balance", balances.vault_balance),
        ("Total income", balances.income),
        ("Total expense", balances.expense),
        ("Borrowed", balances.borrowed),
    ];

    let mut output = String::new();
    for (label, amount) in lines {
        output.push_str(&format!(
            "{:<16} {:>14}\n",
            label,
            amount.format_with_symbol(currency)
        ));
    }
    output
}

/// Format the dashboard: balances, top expense categories and recent entries
pub fn format_dashboard(stats: &DashboardStats, name: &str, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Welcome back, {}\n", name));
    output.push_str(&"=".repeat(32));
    output.push('\n');
    output.push_str(&format_balances(&stats.balances, currency));

    output.push_str("\nTop expense categories\n");
    output.push_str("----------------------\n");
    if stats.top_expenses.is_empty() {
        output.push_str("No expenses yet.\n");
    }
    for share in &stats.top_expenses {
        output.push_str(&format!(
            "{:<16} {:>14} {:>6} {}\n",
            share.category,
            share.total.format_with_symbol(currency),
            format_percentage(share.share * 100.0),
            format_bar(share.share, 1.0, 20)
        ));
    }

    output.push_str("\nRecent transactions\n");
    output.push_str(&format_transaction_list(&stats.recent, currency));
    output.push('\n');

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Amount;
    use crate::services::analytics::CategoryShare;

    #[test]
    fn test_format_balances() {
        let balances = Balances {
            income: Amount::new(1000.0),
            expense: Amount::new(250.0),
            borrowed: Amount::zero(),
            usable_balance: Amount::new(650.0),
            vault_balance: Amount::new(100.0),
        };

        let output = format_balances(&balances, "$");
        assert!(output.contains("Usable balance"));
        assert!(output.contains("$650.00"));
        assert!(output.contains("$100.00"));
    }

    #[test]
    fn test_dashboard_bars() {
        let stats = DashboardStats {
            balances: Balances::default(),
            recent: Vec::new(),
            top_expenses: vec![CategoryShare {
                category: "Food".into(),
                total: Amount::new(30.0),
                share: 0.5,
            }],
        };

        let output = format_dashboard(&stats, "Riley", "£");
        assert!(output.contains("Welcome back, Riley"));
        assert!(output.contains("50% ██████████░░░░░░░░░░\n"));
        assert!(output.contains("No transactions found."));
    }
}

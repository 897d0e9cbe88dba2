//! Daily tip and reminder commands
//!
//! Both record their "done today" marker in the settings file.

use chrono::Local;

use crate::config::paths::FinTrackPaths;
use crate::config::settings::Settings;
use crate::error::FinTrackResult;
use crate::services::analytics;
use crate::services::tips::UnavailableTipProvider;
use crate::services::{
    GeminiTipProvider, ReminderService, TerminalNotifier, TipProvider, TipService,
};
use crate::storage::Storage;

/// Print today's tip, calling the tip service at most once per day
pub fn handle_tip_command(
    storage: &Storage,
    paths: &FinTrackPaths,
    settings: &mut Settings,
    force: bool,
) -> FinTrackResult<()> {
    let provider: Box<dyn TipProvider> = match GeminiTipProvider::from_settings(&settings.tips) {
        Ok(provider) => Box::new(provider),
        Err(e) => {
            tracing::debug!(error = %e, "tip provider unavailable");
            Box::new(UnavailableTipProvider(e.to_string()))
        }
    };

    let summary = storage.ledger.read(|state| {
        let stats = analytics::dashboard(state);
        let top: Vec<String> = stats
            .top_expenses
            .iter()
            .map(|s| format!("{} {:.2}", s.category, s.total.value()))
            .collect();
        format!(
            "Usable balance {:.2}, vault {:.2}, income {:.2}, expense {:.2}. Top expenses: {}",
            stats.balances.usable_balance.value(),
            stats.balances.vault_balance.value(),
            stats.balances.income.value(),
            stats.balances.expense.value(),
            if top.is_empty() { "none".to_string() } else { top.join(", ") }
        )
    })?;

    let service = TipService::new(provider);
    let tip = service.daily_tip(settings, Local::now().date_naive(), force, Some(&summary));

    if tip.fresh {
        settings.save(paths)?;
    }

    println!("Tip of the day: {}", tip.text);
    Ok(())
}

/// Send the daily reminder if it is due
pub fn handle_remind_command(
    storage: &Storage,
    paths: &FinTrackPaths,
    settings: &mut Settings,
) -> FinTrackResult<()> {
    let profile = storage.ledger.read(|state| state.profile.clone())?;
    let service = ReminderService::new(TerminalNotifier);

    if service.fire(&profile, settings, Local::now().naive_local())? {
        settings.save(paths)?;
    } else {
        tracing::debug!("no reminder due");
    }

    Ok(())
}

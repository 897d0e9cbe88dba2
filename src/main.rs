use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fintrack::cli::{
    handle_backup_command, handle_category_command, handle_export_command, handle_import_command,
    handle_profile_command, handle_remind_command, handle_report_command, handle_tip_command,
    handle_transaction_command, handle_vault_command,
};
use fintrack::config::paths::{FinTrackPaths, DATA_DIR_ENV};
use fintrack::config::settings::Settings;
use fintrack::display::{format_balances, format_dashboard};
use fintrack::error::FinTrackResult;
use fintrack::models::profile::CURRENCIES;
use fintrack::services::{analytics, balance, ProfileService, ProfileUpdate};
use fintrack::storage::Storage;

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Terminal personal finance tracker",
    long_about = "FinTrack records income, expenses and borrowed money, keeps a \
                  savings vault next to your spending money, and exports \
                  everything to spreadsheets."
)]
struct Cli {
    /// Data directory (defaults to the platform config directory)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up your profile
    Init {
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Currency symbol
        #[arg(long)]
        currency: Option<String>,
        /// Daily reminder time (HH:MM)
        #[arg(long)]
        reminder: Option<String>,
        /// Turn on daily reminders
        #[arg(long)]
        notifications: bool,
    },

    /// Show current configuration and paths
    Config,

    /// Show usable and vault balances
    Balance,

    /// Balances, top expense categories and recent activity
    Dashboard,

    /// Main ledger commands
    #[command(subcommand, alias = "transaction")]
    Txn(fintrack::cli::TransactionCommands),

    /// Savings vault commands
    #[command(subcommand)]
    Vault(fintrack::cli::VaultCommands),

    /// Category list commands
    #[command(subcommand)]
    Category(fintrack::cli::CategoryCommands),

    /// Profile commands
    #[command(subcommand)]
    Profile(fintrack::cli::ProfileCommands),

    /// Analytics reports
    #[command(subcommand)]
    Report(fintrack::cli::ReportCommands),

    /// Export to xlsx or csv
    #[command(subcommand)]
    Export(fintrack::cli::ExportCommands),

    /// Import an xlsx or csv file, replacing the main ledger
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Backup management commands
    #[command(subcommand)]
    Backup(fintrack::cli::BackupCommands),

    /// Today's financial tip
    Tip {
        /// Ask for a new tip even if one was produced today
        #[arg(long)]
        force: bool,
    },

    /// Send the daily logging reminder if it is due
    Remind,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => FinTrackPaths::with_base_dir(dir),
        None => FinTrackPaths::new()?,
    };
    let mut settings = Settings::load_or_create(&paths)?;

    init_logging(&settings);

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    if let Err(e) = run(cli.command, &storage, &paths, &mut settings) {
        if let Some(shortfall) = e.shortfall() {
            eprintln!("Short by {:.2}.", shortfall);
        }
        return Err(e.into());
    }

    Ok(())
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(
    command: Option<Commands>,
    storage: &Storage,
    paths: &FinTrackPaths,
    settings: &mut Settings,
) -> FinTrackResult<()> {
    match command {
        Some(Commands::Init {
            name,
            currency,
            reminder,
            notifications,
        }) => {
            println!("Initializing FinTrack at: {}", paths.base_dir().display());

            let (profile, _) = ProfileService::new(storage).update_with_settings(
                ProfileUpdate {
                    name,
                    currency,
                    reminder_time: reminder,
                    notifications_enabled: Some(notifications),
                },
                settings,
            )?;
            storage.save_all()?;

            settings.onboarding_completed = true;
            settings.save(paths)?;

            println!("Welcome, {}!", profile.name);
            println!("  Currency:  {}", profile.currency);
            println!(
                "  Reminders: {}",
                if notifications {
                    format!("daily at {}", profile.reminder_time)
                } else {
                    "off".to_string()
                }
            );
            println!();
            println!(
                "Supported currencies: {}",
                CURRENCIES
                    .iter()
                    .map(|(symbol, code)| format!("{} {}", symbol, code))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!("Run 'fintrack txn add income <amount>' to record your first entry.");
        }
        Some(Commands::Config) => {
            println!("FinTrack Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("State file:       {}", paths.state_file().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("Settings:");
            println!("  Onboarding completed: {}", settings.onboarding_completed);
            println!("  Notifications:        {}", settings.notifications_enabled);
            println!("  Log level:            {}", settings.log_level);
            println!("  Backups kept:         {}", settings.backup_retention.max_backups);
            println!(
                "  Tips:                 {} ({})",
                if settings.tips.enabled { "on" } else { "off" },
                settings.tips.model
            );
        }
        Some(Commands::Balance) => {
            let (balances, currency) = storage
                .ledger
                .read(|s| (balance::for_state(s), s.profile.currency.clone()))?;
            print!("{}", format_balances(&balances, &currency));
        }
        Some(Commands::Dashboard) => {
            let (stats, profile) = storage
                .ledger
                .read(|s| (analytics::dashboard(s), s.profile.clone()))?;
            print!("{}", format_dashboard(&stats, &profile.name, &profile.currency));
        }
        Some(Commands::Txn(cmd)) => handle_transaction_command(storage, cmd)?,
        Some(Commands::Vault(cmd)) => handle_vault_command(storage, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(storage, cmd)?,
        Some(Commands::Profile(cmd)) => handle_profile_command(storage, paths, settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(storage, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(storage, cmd)?,
        Some(Commands::Import { file }) => handle_import_command(storage, settings, &file)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(storage, settings, cmd)?,
        Some(Commands::Tip { force }) => handle_tip_command(storage, paths, settings, force)?,
        Some(Commands::Remind) => handle_remind_command(storage, paths, settings)?,
        None => {
            println!("FinTrack - personal finance tracker");
            println!();
            if !settings.onboarding_completed {
                println!("Run 'fintrack init --name <NAME>' to get started.");
            }
            println!("Run 'fintrack --help' for usage information.");
        }
    }

    Ok(())
}

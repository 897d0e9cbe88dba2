//! Import CLI command

use std::path::Path;

use crate::config::settings::Settings;
use crate::error::FinTrackResult;
use crate::services::ImportService;
use crate::storage::Storage;

/// Import a spreadsheet (xlsx or csv) into the ledger
pub fn handle_import_command(storage: &Storage, settings: &Settings, file: &Path) -> FinTrackResult<()> {
    let service = ImportService::new(storage, settings.backup_retention.clone());

    println!("Importing from: {}", file.display());
    let result = service.import_file(file)?;

    println!("{}.", result.summary());
    println!(
        "Previous data saved to: {}",
        result.backup_path.display()
    );

    if !result.warnings.is_empty() {
        println!();
        println!("{} cell(s) were filled with defaults:", result.warnings.len());
        for warning in result.warnings.iter().take(10) {
            println!("  {}", warning);
        }
        if result.warnings.len() > 10 {
            println!("  ... and {} more", result.warnings.len() - 10);
        }
    }

    Ok(())
}

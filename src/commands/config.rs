use crate::cli::ConfigCommands;
use crate::config::{ConfigStore, AUTO_UPDATE_DISABLED_KEY};
use crate::error::Error;
use crate::format::{cell_text, mask_sensitive};
use crate::ui;
use serde_json::Value;

pub fn run(config: &mut ConfigStore, cmd: ConfigCommands) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Set { key, value } => {
            config.set(&key, value.as_str())?;
            ui::success(&format!(
                "Configuration updated: {} = {}",
                key,
                mask_sensitive(&key, &value)
            ));
        }
        ConfigCommands::Get { key } => match config.get(&key) {
            Some(value) => ui::field(&key, &display_value(&key, value)),
            None => ui::warning(&format!("Configuration key \"{}\" not found", key)),
        },
        ConfigCommands::List => list(config),
        ConfigCommands::Delete { key } => {
            config.delete(&key)?;
            ui::success(&format!("Configuration deleted: {}", key));
        }
        ConfigCommands::AutoUpdate { action } => auto_update(config, &action)?,
    }
    Ok(())
}

fn list(config: &ConfigStore) {
    if config.is_empty() {
        ui::warning("No configuration set");
        return;
    }

    println!();
    ui::heading("Current Configuration:");
    for (key, value) in visible_entries(config) {
        ui::field(&format!("  {}", key), &value);
    }
    let status = if config.auto_update_disabled() {
        "disabled"
    } else {
        "enabled"
    };
    ui::field("  Auto-update checks", status);
    println!();
}

fn auto_update(config: &mut ConfigStore, action: &str) -> anyhow::Result<()> {
    match action {
        "enable" => {
            config.set_auto_update_disabled(false)?;
            ui::success("Automatic update checks enabled");
            ui::hint("  The CLI will check for updates once per day");
        }
        "disable" => {
            config.set_auto_update_disabled(true)?;
            ui::success("Automatic update checks disabled");
            ui::hint("  You can still manually check with: gisph update --check");
        }
        other => {
            ui::hint("Usage: gisph config auto-update <enable|disable>");
            return Err(Error::InvalidArgument(format!("Invalid action: {}", other)).into());
        }
    }
    Ok(())
}

/// Entries shown by `config list`: internal bookkeeping keys are hidden and
/// sensitive values masked.
pub fn visible_entries(config: &ConfigStore) -> Vec<(String, String)> {
    config
        .list()
        .filter(|(key, _)| !key.starts_with("last") && key.as_str() != AUTO_UPDATE_DISABLED_KEY)
        .map(|(key, value)| (key.clone(), display_value(key, value)))
        .collect()
}

fn display_value(key: &str, value: &Value) -> String {
    mask_sensitive(key, &cell_text(value))
}

use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{default_settings_path, save_settings, Settings};

pub fn run(config: Option<PathBuf>, force: bool) -> Result<()> {
    let path = config.unwrap_or_else(default_settings_path);
    if path.exists() && !force {
        println!(
            "Settings already exist at {} (use --force to overwrite).",
            path.display()
        );
        return Ok(());
    }
    save_settings(&path, &Settings::default())?;
    println!("Settings written to {}", path.display());
    Ok(())
}

//! The `recap config` command: print the active settings.

use anyhow::Result;
use recap_core::Settings;

pub fn run() -> Result<()> {
    let settings = Settings::from_env();
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

//! `copyforge config`: Configuration management commands.

use anyhow::Result;
use copyforge_config::AppConfig;

pub fn validate() -> Result<()> {
    let path = AppConfig::config_path();
    println!("Validating {}", path.display());

    match AppConfig::load() {
        Ok(config) => {
            let limits = config.window_limits();
            println!("  ok");
            println!("  max_messages:          {}", limits.max_messages);
            println!("  max_chars:             {}", limits.max_chars);
            println!("  max_chars_per_message: {}", limits.max_chars_per_message);
            println!("  preview_chars:         {}", limits.preview_chars);
            println!("  debug previews:        {}", config.preview.debug);
            match &config.blocks.overrides_file {
                Some(file) if !file.exists() => {
                    println!("  overrides_file:        {} (not found)", file.display());
                }
                Some(file) => println!("  overrides_file:        {}", file.display()),
                None => println!("  overrides_file:        (none)"),
            }
        }
        Err(e) => {
            println!("  error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub fn show() -> Result<()> {
    let config = AppConfig::load()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub fn path() {
    println!("{}", AppConfig::config_path().display());
}

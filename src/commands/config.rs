//! Config subcommands handler

use anyhow::Result;

use hackterm::Config;

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(config: &Config) -> Result<()> {
    let toml_str = config.to_toml()?;
    let theme = config.theme();
    println!("{}", theme.primary_text(&toml_str));
    Ok(())
}

/// Print where the configuration file lives.
#[cfg(not(tarpaulin_include))]
pub fn handle_path() -> Result<()> {
    println!("{}", Config::config_path()?.display());
    Ok(())
}

/// Write the default configuration unless a file already exists.
#[cfg(not(tarpaulin_include))]
pub fn handle_init() -> Result<()> {
    let config_path = Config::config_path()?;
    let config = Config::default();
    let theme = config.theme();

    if config_path.exists() {
        println!(
            "{}",
            theme.secondary_text(&format!(
                "Config already exists at {}, leaving it alone.",
                config_path.display()
            ))
        );
        return Ok(());
    }

    let path = config.save()?;
    println!(
        "{}",
        theme.success_text(&format!("Wrote default config to {}", path.display()))
    );
    Ok(())
}

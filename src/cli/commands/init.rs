//! Init and Config commands.

use anyhow::{Context, Result, anyhow};

use crate::config::Settings;

/// Write a default `.batch-runner/settings.toml` in the current directory.
pub fn run_init(force: bool) -> Result<()> {
    let path = Settings::init_config_file(force).map_err(|e| anyhow!(e))?;

    let verb = if force { "Wrote" } else { "Created" };
    println!("{verb} {} with the default input, output and calculator", path.display());
    Ok(())
}

/// Print the effective settings after every layer has been applied.
pub fn run_config(settings: &Settings) -> Result<()> {
    let rendered = toml::to_string_pretty(settings).context("cannot render settings as TOML")?;
    print!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CONFIG_DIR, CONFIG_FILE};

    #[test]
    fn test_second_init_needs_force() {
        figment::Jail::expect_with(|jail| {
            run_init(false).unwrap();
            assert!(jail.directory().join(CONFIG_DIR).join(CONFIG_FILE).exists());

            let err = run_init(false).unwrap_err();
            assert!(err.to_string().contains("--force"));

            run_init(true).unwrap();
            Ok(())
        });
    }

    #[test]
    fn test_config_renders_settings() {
        assert!(run_config(&Settings::default()).is_ok());
    }
}

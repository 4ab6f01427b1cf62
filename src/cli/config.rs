//! Config command handler
//!
//! Shows, changes and resets the settings in `config.toml`.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Dotted key, e.g. "simulation.tick_ms"
    pub key: Option<String>,

    /// New value for the key
    #[arg(requires = "key")]
    pub value: Option<String>,

    /// Print where the config file lives
    #[arg(long, conflicts_with_all = ["key", "reset"])]
    pub path: bool,

    /// Overwrite the file with the defaults
    #[arg(long, conflicts_with = "key")]
    pub reset: bool,
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "Unknown config key: {} (available: {})",
        key,
        Config::available_keys().join(", ")
    ))
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (args.key.as_deref(), args.value.as_deref()) {
        (None, _) => print!("{}", render(&config)?),
        (Some(key), None) => {
            let value = config.get(key).ok_or_else(|| unknown_key(key))?;
            println!("{}", value);
        }
        (Some(key), Some(value)) => {
            if config.get(key).is_none() {
                return Err(unknown_key(key));
            }
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }
    }

    Ok(())
}

/// The whole configuration as it would be written to disk
fn render(config: &Config) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_has_every_section() {
        let rendered = render(&Config::default()).unwrap();
        for section in ["[geocoder]", "[device]", "[simulation]", "[server]", "[url]"] {
            assert!(rendered.contains(section), "missing {}", section);
        }
        assert!(rendered.contains("tick_ms = 100"));
    }

    #[test]
    fn test_unknown_key_lists_available() {
        let err = unknown_key("simulation.speed").to_string();
        assert!(err.contains("simulation.speed"));
        assert!(err.contains("simulation.tick_ms"));
    }
}

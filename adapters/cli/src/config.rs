//! Loading game configuration files.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use path_defence_core::GameConfig;

/// Reads and validates a TOML game configuration.
///
/// Omitted keys fall back to the default level.
pub(crate) fn load(path: &Path) -> Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read game config {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid game config {}", path.display()))
}

fn parse(contents: &str) -> Result<GameConfig> {
    let config: GameConfig =
        toml::from_str(contents).context("failed to parse game config toml contents")?;

    if let Some(index) = config.waves.iter().position(|wave| wave.total() == 0) {
        bail!("wave {index} does not release any enemies");
    }

    Ok(config)
}

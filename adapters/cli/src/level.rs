use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tilepush_core::{Command, LegendEntry, SpriteType};

/// Level description loaded from a TOML file.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Level {
    /// Ordered legend; earlier entries stack above later ones.
    pub(crate) legend: Vec<LegendEntry>,
    /// Map text, one character per cell.
    pub(crate) map: String,
    /// Type moved by the replayed script.
    pub(crate) player: SpriteType,
    #[serde(default)]
    pub(crate) solids: Vec<SpriteType>,
    #[serde(default)]
    pub(crate) pushables: BTreeMap<SpriteType, Vec<SpriteType>>,
    #[serde(default)]
    pub(crate) background: Option<SpriteType>,
    #[serde(default)]
    pub(crate) push_limit: Option<u32>,
}

impl Level {
    /// Reads and parses the level stored at the provided path.
    pub(crate) fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read level at {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("invalid level description in {}", path.display()))
    }

    pub(crate) fn from_toml(contents: &str) -> Result<Self> {
        let level: Self = toml::from_str(contents).context("failed to parse level toml contents")?;
        if !level.legend.iter().any(|entry| entry.tag == level.player) {
            bail!("player type {} is missing from the legend", level.player);
        }
        Ok(level)
    }

    /// Commands that configure a fresh world for this level.
    pub(crate) fn setup_commands(&self) -> Vec<Command> {
        let mut commands = vec![
            Command::SetLegend {
                entries: self.legend.clone(),
            },
            Command::LoadMap {
                text: self.map.clone(),
            },
            Command::SetSolids {
                solids: self.solids.clone(),
            },
            Command::SetPushables {
                pushables: self.pushables.clone(),
            },
            Command::SetBackground {
                kind: self.background,
            },
        ];
        if let Some(max_depth) = self.push_limit {
            commands.push(Command::ConfigurePushLimit { max_depth });
        }
        commands
    }
}

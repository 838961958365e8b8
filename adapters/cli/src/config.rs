use std::{fs, path::Path};

use anyhow::{Context, Result};
use tower_inferno_core::{CellCoord, GameConfig, TowerKind};

/// Loads the run configuration, falling back to defaults when no file is given.
pub(crate) fn load(path: Option<&Path>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            parse(&text).with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if let Some(seed) = seed {
        config.waves.seed = seed;
    }

    Ok(config)
}

fn parse(text: &str) -> Result<GameConfig> {
    Ok(toml::from_str(text)?)
}

/// Tower the player asked to build before the run starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TowerOrder {
    pub(crate) kind: TowerKind,
    pub(crate) cell: CellCoord,
}

/// Parses `kind:column,row`, for example `fire:3,2`.
pub(crate) fn parse_tower_order(value: &str) -> Result<TowerOrder, String> {
    let (kind, cell) = value
        .split_once(':')
        .ok_or_else(|| format!("expected kind:column,row, got `{value}`"))?;
    Ok(TowerOrder {
        kind: parse_tower_kind(kind)?,
        cell: parse_cell(cell)?,
    })
}

/// Parses `column,row`.
pub(crate) fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected column,row, got `{value}`"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column `{column}`"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row `{row}`"))?;
    Ok(CellCoord::new(column, row))
}

fn parse_tower_kind(value: &str) -> Result<TowerKind, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "basic" | "harpoon" => Ok(TowerKind::Basic),
        "fire" => Ok(TowerKind::Fire),
        "ice" => Ok(TowerKind::Ice),
        other => Err(format!("unknown tower kind `{other}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tower_inferno_core::SpawnPattern;

    #[test]
    fn tower_orders_accept_kind_and_cell() {
        assert_eq!(
            parse_tower_order("Fire:3, 2"),
            Ok(TowerOrder {
                kind: TowerKind::Fire,
                cell: CellCoord::new(3, 2),
            })
        );
        assert_eq!(
            parse_tower_order("harpoon:0,1").map(|order| order.kind),
            Ok(TowerKind::Basic)
        );
    }

    #[test]
    fn malformed_tower_orders_are_rejected() {
        assert!(parse_tower_order("fire").is_err());
        assert!(parse_tower_order("laser:1,1").is_err());
        assert!(parse_tower_order("ice:1").is_err());
        assert!(parse_tower_order("ice:-1,2").is_err());
    }

    #[test]
    fn missing_file_defaults_and_seed_override_applies() {
        let config = load(None, Some(42)).expect("defaults load");
        assert_eq!(config.waves.seed, 42);
        assert_eq!(config.economy.starting_gold, 100);
    }

    #[test]
    fn config_file_is_read_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "[economy]\nstarting_gold = 900\n\n[waves]\npattern = \"tiered\"\n"
        )
        .expect("write config");

        let config = load(Some(file.path()), None).expect("config parses");
        assert_eq!(config.economy.starting_gold, 900);
        assert_eq!(config.economy.starting_lives, 10);
        assert_eq!(config.waves.pattern, SpawnPattern::Tiered);
    }

    #[test]
    fn unreadable_config_reports_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.toml");

        let error = load(Some(&path), None).expect_err("missing file fails");
        assert!(error.to_string().contains("missing.toml"));
    }
}

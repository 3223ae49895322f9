use std::path::Path;

use crate::ai::Difficulty;
use crate::error::ConfigError;

/// Rules of one game session. Immutable once a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameConfig {
    pub grid_size: usize,
    pub win_length: usize,
    pub initial_shifts: u32,
    /// Turns a player must wait after shifting before shifting again.
    pub shift_cooldown: u32,
    /// When false the shifting player also gets to place in the same turn.
    pub shift_ends_turn: bool,
}

impl GameConfig {
    pub const CLASSIC: GameConfig = GameConfig {
        grid_size: 4,
        win_length: 4,
        initial_shifts: 3,
        shift_cooldown: 2,
        shift_ends_turn: true,
    };
    pub const TINY_CUBE: GameConfig = GameConfig {
        grid_size: 3,
        win_length: 3,
        initial_shifts: 2,
        shift_cooldown: 1,
        shift_ends_turn: true,
    };
    pub const SHIFT_MANIA: GameConfig = GameConfig {
        grid_size: 4,
        win_length: 4,
        initial_shifts: 10,
        shift_cooldown: 0,
        shift_ends_turn: true,
    };
    pub const NO_SHIFT: GameConfig = GameConfig {
        grid_size: 4,
        win_length: 4,
        initial_shifts: 0,
        shift_cooldown: 0,
        shift_ends_turn: true,
    };
    pub const EXPERT: GameConfig = GameConfig {
        grid_size: 4,
        win_length: 4,
        initial_shifts: 1,
        shift_cooldown: 0,
        shift_ends_turn: false,
    };

    pub fn shifting_enabled(&self) -> bool {
        self.initial_shifts > 0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=8).contains(&self.grid_size) {
            return Err(ConfigError::Validation(
                "grid_size must be in [2, 8]".into(),
            ));
        }
        if self.win_length < 2 || self.win_length > self.grid_size {
            return Err(ConfigError::Validation(
                "win_length must be in [2, grid_size]".into(),
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::CLASSIC
    }
}

/// Named rule presets offered at session start.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    #[default]
    Classic,
    TinyCube,
    ShiftMania,
    NoShift,
    Expert,
}

impl GameMode {
    pub const ALL: [GameMode; 5] = [
        GameMode::Classic,
        GameMode::TinyCube,
        GameMode::ShiftMania,
        GameMode::NoShift,
        GameMode::Expert,
    ];

    pub fn config(self) -> GameConfig {
        match self {
            GameMode::Classic => GameConfig::CLASSIC,
            GameMode::TinyCube => GameConfig::TINY_CUBE,
            GameMode::ShiftMania => GameConfig::SHIFT_MANIA,
            GameMode::NoShift => GameConfig::NO_SHIFT,
            GameMode::Expert => GameConfig::EXPERT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameMode::Classic => "Classic (4x4, 4-to-win)",
            GameMode::TinyCube => "Tiny Cube (3x3, 3-to-win)",
            GameMode::ShiftMania => "Shift Mania",
            GameMode::NoShift => "No-Shift",
            GameMode::Expert => "Expert (Shift & Place)",
        }
    }
}

/// Computer opponent settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// Wall-clock budget for one decision before the watchdog falls back.
    pub think_budget_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            difficulty: Difficulty::Medium,
            think_budget_ms: 10_000,
        }
    }
}

/// Headless match runner settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub games: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Safety cap on moves per game.
    pub max_moves: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            games: 10,
            seed: None,
            max_moves: 1_000,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: GameMode,
    /// Custom rules; when present they replace the `mode` preset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<GameConfig>,
    pub ai: AiConfig,
    pub arena: ArenaConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Rules in effect: the custom table if given, otherwise the preset.
    pub fn game_config(&self) -> GameConfig {
        self.custom.unwrap_or_else(|| self.mode.config())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game_config().validate()?;
        if self.ai.think_budget_ms == 0 {
            return Err(ConfigError::Validation(
                "ai.think_budget_ms must be > 0".into(),
            ));
        }
        if self.arena.games == 0 {
            return Err(ConfigError::Validation(
                "arena.games must be > 0".into(),
            ));
        }
        if self.arena.max_moves == 0 {
            return Err(ConfigError::Validation(
                "arena.max_moves must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.game_config(), GameConfig::CLASSIC);
    }

    #[test]
    fn test_every_preset_is_valid() {
        for mode in GameMode::ALL {
            mode.config().validate().expect("preset should be valid");
        }
    }

    #[test]
    fn test_preset_values() {
        assert_eq!(GameMode::TinyCube.config().grid_size, 3);
        assert_eq!(GameMode::TinyCube.config().win_length, 3);
        assert!(!GameMode::NoShift.config().shifting_enabled());
        assert!(!GameMode::Expert.config().shift_ends_turn);
        assert_eq!(GameMode::ShiftMania.config().initial_shifts, 10);
        assert_eq!(GameMode::Classic.name(), "Classic (4x4, 4-to-win)");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
mode = "tiny-cube"

[ai]
difficulty = "hard"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.mode, GameMode::TinyCube);
        assert_eq!(config.ai.difficulty, Difficulty::Hard);
        // Other fields should be defaults
        assert_eq!(config.ai.think_budget_ms, 10_000);
        assert_eq!(config.game_config(), GameConfig::TINY_CUBE);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.mode, GameMode::Classic);
        assert!(config.custom.is_none());
        assert_eq!(config.arena.games, ArenaConfig::default().games);
    }

    #[test]
    fn test_custom_rules_override_mode() {
        let toml_str = r#"
mode = "classic"

[custom]
grid_size = 5
win_length = 4
initial_shifts = 2
shift_cooldown = 1
shift_ends_turn = false
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        config.validate().unwrap();
        assert_eq!(config.game_config().grid_size, 5);
        assert!(!config.game_config().shift_ends_turn);
    }

    #[test]
    fn test_validation_rejects_win_longer_than_grid() {
        let mut config = AppConfig::default();
        config.custom = Some(GameConfig {
            win_length: 5,
            ..GameConfig::CLASSIC
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_tiny_grid() {
        let rules = GameConfig {
            grid_size: 1,
            win_length: 1,
            ..GameConfig::CLASSIC
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_win_length_one() {
        let rules = GameConfig {
            win_length: 1,
            ..GameConfig::CLASSIC
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_budget() {
        let mut config = AppConfig::default();
        config.ai.think_budget_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_games() {
        let mut config = AppConfig::default();
        config.arena.games = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.mode, GameMode::Classic);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
mode = "expert"

[arena]
games = 3
seed = 7
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.mode, GameMode::Expert);
        assert_eq!(config.arena.games, 3);
        assert_eq!(config.arena.seed, Some(7));
        // Others are defaults
        assert_eq!(config.ai.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[ai]\nthink_budget_ms = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "mode = \"sideways\"\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
    }
}

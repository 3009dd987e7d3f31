use std::path::Path;

use kumitate_core::board::WORKSPACE_PADDING_RATIO_MAX;
use kumitate_core::game::{
    KNOB_SCALE_MAX, KNOB_SCALE_MIN, MAX_PIECES, SNAP_RATIO_MAX, SNAP_RATIO_MIN,
};
use kumitate_core::{grid_for_count, Board, GameRules, LayoutError};

use crate::error::ConfigError;

/// Puzzle to cut when a session starts.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PuzzleSettings {
    pub cols: u32,
    pub rows: u32,
    /// When set, `cols` and `rows` are replaced by the grid for about this
    /// many pieces on a `width` x `height` board.
    pub target_pieces: Option<u32>,
    pub width: f32,
    pub height: f32,
    pub seed: Option<u32>,
}

impl Default for PuzzleSettings {
    fn default() -> Self {
        PuzzleSettings {
            cols: 8,
            rows: 6,
            target_pieces: None,
            width: 800.0,
            height: 600.0,
            seed: None,
        }
    }
}

impl PuzzleSettings {
    /// Columns and rows to generate.
    pub fn grid(&self) -> (u32, u32) {
        self.target_pieces
            .and_then(|target| grid_for_count(self.width, self.height, target))
            .map_or((self.cols, self.rows), |choice| (choice.cols, choice.rows))
    }
}

/// Top-level settings, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub puzzle: PuzzleSettings,
    pub rules: GameRules,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "settings file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let puzzle = &self.puzzle;
        if !(puzzle.width.is_finite() && puzzle.width > 0.0) {
            return Err(ConfigError::Validation("puzzle.width must be > 0".into()));
        }
        if !(puzzle.height.is_finite() && puzzle.height > 0.0) {
            return Err(ConfigError::Validation("puzzle.height must be > 0".into()));
        }
        match puzzle.target_pieces {
            Some(0) => {
                return Err(ConfigError::Validation(
                    "puzzle.target_pieces must be > 0".into(),
                ));
            }
            Some(_) => {}
            None => {
                if puzzle.cols == 0 || puzzle.rows == 0 {
                    return Err(ConfigError::Validation(
                        "puzzle.cols and puzzle.rows must be > 0".into(),
                    ));
                }
                if (puzzle.cols as usize).saturating_mul(puzzle.rows as usize) > MAX_PIECES {
                    return Err(ConfigError::Validation(format!(
                        "puzzle grid must hold at most {MAX_PIECES} pieces"
                    )));
                }
            }
        }

        let rules = &self.rules;
        if !(SNAP_RATIO_MIN..=SNAP_RATIO_MAX).contains(&rules.snap_distance_ratio) {
            return Err(ConfigError::Validation(format!(
                "rules.snap_distance_ratio must be in [{SNAP_RATIO_MIN}, {SNAP_RATIO_MAX}]"
            )));
        }
        if !(KNOB_SCALE_MIN..=KNOB_SCALE_MAX).contains(&rules.knob_scale) {
            return Err(ConfigError::Validation(format!(
                "rules.knob_scale must be in [{KNOB_SCALE_MIN}, {KNOB_SCALE_MAX}]"
            )));
        }
        if !(0.0..=WORKSPACE_PADDING_RATIO_MAX).contains(&rules.workspace_padding_ratio) {
            return Err(ConfigError::Validation(format!(
                "rules.workspace_padding_ratio must be in [0, {WORKSPACE_PADDING_RATIO_MAX}]"
            )));
        }
        Ok(())
    }

    /// Cuts the configured puzzle with `seed`.
    pub fn build_board(&self, seed: u32) -> Result<Board, LayoutError> {
        let (cols, rows) = self.puzzle.grid();
        Board::new(
            self.puzzle.width,
            self.puzzle.height,
            cols,
            rows,
            seed,
            self.rules,
        )
    }

    /// TOML text for these settings, for writing an example config file.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

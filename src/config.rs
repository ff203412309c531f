/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD), or from an
/// explicit `--config` path. Falls back to sensible defaults if the file is
/// missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::rules::Difficulty;
use crate::sim::maze::{MazeParams, MIN_SIZE};

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub maze: MazeConfig,
    pub start_difficulty: Difficulty,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeedConfig {
    pub frame_rate_ms: u64,
    pub move_cooldown_frames: u32,  // frames between accepted rat moves
}

#[derive(Clone, Debug, PartialEq)]
pub struct MazeConfig {
    pub params: MazeParams,
    pub layout_file: Option<PathBuf>,  // fixed maze instead of random
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    maze: TomlMaze,
    #[serde(default)]
    difficulty: TomlDifficulty,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_frame_rate")]
    frame_rate_ms: u64,
    #[serde(default = "default_move_cooldown")]
    move_cooldown_frames: u32,
}

#[derive(Deserialize, Debug)]
struct TomlMaze {
    #[serde(default = "default_size")]
    size: usize,
    #[serde(default = "default_base_walls")]
    base_walls: usize,
    #[serde(default = "default_walls_per_level")]
    walls_per_level: usize,
    #[serde(default)]
    layout_file: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TomlDifficulty {
    #[serde(default = "default_start_difficulty")]
    start: u8,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default)]
    file: Option<String>,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_frame_rate() -> u64 { 33 }       // ~30 fps
fn default_move_cooldown() -> u32 { 15 }    // 0.5s between moves at 30 fps
fn default_size() -> usize { 9 }
fn default_base_walls() -> usize { 4 }
fn default_walls_per_level() -> usize { 2 }
fn default_start_difficulty() -> u8 { 1 }
fn default_restart() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_log_level() -> String { "info".into() }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            frame_rate_ms: default_frame_rate(),
            move_cooldown_frames: default_move_cooldown(),
        }
    }
}

impl Default for TomlMaze {
    fn default() -> Self {
        TomlMaze {
            size: default_size(),
            base_walls: default_base_walls(),
            walls_per_level: default_walls_per_level(),
            layout_file: None,
        }
    }
}

impl Default for TomlDifficulty {
    fn default() -> Self {
        TomlDifficulty { start: default_start_difficulty() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { restart: default_restart(), quit: default_quit() }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { file: None, level: default_log_level() }
    }
}

// ── Loading ──

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[])
    }
}

impl GameConfig {
    /// Load config from `config.toml` (or `explicit`, if given).
    ///
    /// Missing file or missing keys gracefully fall back to defaults.
    /// Problems are returned as warnings so the caller can report them once
    /// logging is up.
    pub fn load(explicit: Option<&Path>) -> (Self, Vec<String>) {
        let search_dirs = candidate_dirs();
        let mut warnings = Vec::new();

        let toml_cfg = match explicit {
            Some(path) => read_toml(path, &mut warnings).unwrap_or_default(),
            None => search_dirs
                .iter()
                .map(|d| d.join("config.toml"))
                .find(|p| p.exists())
                .and_then(|p| read_toml(&p, &mut warnings))
                .unwrap_or_default(),
        };

        if toml_cfg.maze.size < MIN_SIZE {
            warnings.push(format!("maze size {} raised to minimum {MIN_SIZE}", toml_cfg.maze.size));
        }
        let start = toml_cfg.difficulty.start;
        if Difficulty::new(start).level() != start {
            warnings.push(format!("start difficulty {start} clamped to {}..={}", Difficulty::MIN.level(), Difficulty::MAX.level()));
        }

        (GameConfig::from_toml(toml_cfg, &search_dirs), warnings)
    }

    /// Parse config text directly (defaults for anything missing).
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let parsed: TomlConfig = toml::from_str(text)?;
        Ok(GameConfig::from_toml(parsed, &[]))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let layout_file = toml_cfg.maze.layout_file.map(|f| resolve_path(&f, search_dirs));
        let log_file = toml_cfg.log.file.map(PathBuf::from);

        GameConfig {
            speed: SpeedConfig {
                frame_rate_ms: toml_cfg.speed.frame_rate_ms.max(1),
                move_cooldown_frames: toml_cfg.speed.move_cooldown_frames,
            },
            maze: MazeConfig {
                params: MazeParams {
                    size: toml_cfg.maze.size.max(MIN_SIZE),
                    base_walls: toml_cfg.maze.base_walls,
                    walls_per_level: toml_cfg.maze.walls_per_level,
                },
                layout_file,
            },
            start_difficulty: Difficulty::new(toml_cfg.difficulty.start),
            gamepad: GamepadConfig {
                restart: toml_cfg.gamepad.restart,
                quit: toml_cfg.gamepad.quit,
            },
            log: LogConfig {
                file: log_file,
                level: toml_cfg.log.level,
            },
        }
    }
}

/// Relative paths are looked up in the candidate dirs; first hit wins,
/// otherwise the path is kept relative to CWD.
fn resolve_path(name: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let path = PathBuf::from(name);
    if path.is_absolute() {
        return path;
    }
    search_dirs
        .iter()
        .map(|d| d.join(name))
        .find(|p| p.is_file())
        .unwrap_or(path)
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/maze-escape)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/maze-escape");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

fn read_toml(path: &Path, warnings: &mut Vec<String>) -> Option<TomlConfig> {
    match std::fs::read_to_string(path) {
        Ok(text) => match toml::from_str::<TomlConfig>(&text) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                warnings.push(format!("{} parse error, using defaults: {e}", path.display()));
                None
            }
        },
        Err(e) => {
            warnings.push(format!("could not read {}: {e}", path.display()));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.speed.move_cooldown_frames, 15);
        assert_eq!(cfg.speed.frame_rate_ms, 33);
        assert_eq!(cfg.maze.params, MazeParams::default());
        assert_eq!(cfg.start_difficulty, Difficulty::MIN);
        assert!(cfg.maze.layout_file.is_none());
        assert!(cfg.log.file.is_none());
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[maze]\nsize = 11\n\n[difficulty]\nstart = 3\n\n[log]\nfile = \"maze.log\"\n",
        )
        .unwrap();
        assert_eq!(cfg.maze.params.size, 11);
        assert_eq!(cfg.maze.params.base_walls, 4);
        assert_eq!(cfg.start_difficulty.level(), 3);
        assert_eq!(cfg.log.file, Some(PathBuf::from("maze.log")));
        assert_eq!(cfg.speed.move_cooldown_frames, 15);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let cfg = GameConfig::from_toml_str("[maze]\nsize = 2\n[difficulty]\nstart = 12\n").unwrap();
        assert_eq!(cfg.maze.params.size, MIN_SIZE);
        assert_eq!(cfg.start_difficulty, Difficulty::MAX);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(GameConfig::from_toml_str("[speed\nframe_rate_ms = ").is_err());
        assert!(GameConfig::from_toml_str("[speed]\nframe_rate_ms = \"fast\"").is_err());
    }

    #[test]
    fn missing_explicit_file_warns() {
        let (cfg, warnings) = GameConfig::load(Some(Path::new("/nonexistent/maze-escape.toml")));
        assert_eq!(cfg.maze.params, MazeParams::default());
        assert_eq!(warnings.len(), 1);
    }
}

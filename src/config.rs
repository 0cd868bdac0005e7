/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// The defaults reproduce the classic game's tuning.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub rules: RulesConfig,
    pub maze: MazeConfig,
    pub display: DisplayConfig,
}

/// Simulation tuning handed to the session. Speeds are in template
/// tiles per second at scale 1; the session scales them with the maze.
#[derive(Clone, Debug)]
pub struct RulesConfig {
    pub player_speed: f32,
    pub ghost_speed_ratio: f32,
    pub power_duration: f32,
    pub decision_interval: f32,
    pub starting_lives: u32,
}

#[derive(Clone, Debug)]
pub struct MazeConfig {
    /// Integer expansion factor: 1 = classic, 3 = wide corridors.
    pub scale: u32,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    /// Frame pacing for the render loop, milliseconds.
    pub frame_ms: u64,
    /// Draw pickups as per-cell emoji tokens instead of dots.
    pub emoji_pickups: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            player_speed: default_player_speed(),
            ghost_speed_ratio: default_ghost_ratio(),
            power_duration: default_power_duration(),
            decision_interval: default_decision_interval(),
            starting_lives: default_lives(),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    maze: TomlMaze,
    #[serde(default)]
    display: TomlDisplay,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_player_speed")]
    player_speed: f32,
    #[serde(default = "default_ghost_ratio")]
    ghost_speed_ratio: f32,
    #[serde(default = "default_power_duration")]
    power_duration: f32,
    #[serde(default = "default_decision_interval")]
    decision_interval: f32,
    #[serde(default = "default_lives")]
    starting_lives: u32,
}

#[derive(Deserialize, Debug)]
struct TomlMaze {
    #[serde(default = "default_scale")]
    scale: u32,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default)]
    emoji_pickups: bool,
}

// ── Defaults ──

fn default_player_speed() -> f32 { 4.0 }
fn default_ghost_ratio() -> f32 { 0.75 }
fn default_power_duration() -> f32 { 10.0 }
fn default_decision_interval() -> f32 { 1.0 }
fn default_lives() -> u32 { 3 }
fn default_scale() -> u32 { 1 }
fn default_frame_ms() -> u64 { 16 }

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            player_speed: default_player_speed(),
            ghost_speed_ratio: default_ghost_ratio(),
            power_duration: default_power_duration(),
            decision_interval: default_decision_interval(),
            starting_lives: default_lives(),
        }
    }
}

impl Default for TomlMaze {
    fn default() -> Self {
        TomlMaze { scale: default_scale() }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            frame_ms: default_frame_ms(),
            emoji_pickups: false,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            rules: RulesConfig {
                player_speed: toml_cfg.rules.player_speed,
                ghost_speed_ratio: toml_cfg.rules.ghost_speed_ratio,
                power_duration: toml_cfg.rules.power_duration,
                decision_interval: toml_cfg.rules.decision_interval,
                starting_lives: toml_cfg.rules.starting_lives,
            },
            maze: MazeConfig {
                scale: toml_cfg.maze.scale,
            },
            display: DisplayConfig {
                frame_ms: toml_cfg.display.frame_ms,
                emoji_pickups: toml_cfg.display.emoji_pickups,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_tuning() {
        let r = RulesConfig::default();
        assert_eq!(r.player_speed, 4.0);
        assert_eq!(r.ghost_speed_ratio, 0.75);
        assert_eq!(r.power_duration, 10.0);
        assert_eq!(r.decision_interval, 1.0);
        assert_eq!(r.starting_lives, 3);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: TomlConfig = toml::from_str(
            "[maze]\nscale = 3\n\n[rules]\nplayer_speed = 6.0\n",
        )
        .unwrap();
        assert_eq!(cfg.maze.scale, 3);
        assert_eq!(cfg.rules.player_speed, 6.0);
        assert_eq!(cfg.rules.ghost_speed_ratio, 0.75);
        assert_eq!(cfg.display.frame_ms, 16);
        assert!(!cfg.display.emoji_pickups);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.maze.scale, 1);
        assert_eq!(cfg.rules.starting_lives, 3);
    }
}

/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Only host-level settings live here — game balance is fixed in the
/// engine and deliberately not configurable.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Interval of the periodic render tick.
    pub render_interval_ms: u64,
    /// Battle animation tick interval.
    pub battle_anim_ms: u64,
    /// Minimum gap between accepted typing updates.
    pub typing_rate_limit_ms: u64,
    /// Persist after every scoring update.
    pub autosave: bool,
    /// Fixed RNG seed for reproducible runs; absent = seed from clock.
    pub seed: Option<u64>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_render_interval")]
    render_interval_ms: u64,
    #[serde(default = "default_battle_anim")]
    battle_anim_ms: u64,
    #[serde(default = "default_rate_limit")]
    typing_rate_limit_ms: u64,
    #[serde(default = "default_autosave")]
    autosave: bool,
    #[serde(default)]
    seed: Option<u64>,
}

// ── Defaults ──

fn default_render_interval() -> u64 { 1000 }
fn default_battle_anim() -> u64 { 500 }
fn default_rate_limit() -> u64 { 200 }
fn default_autosave() -> bool { true }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            render_interval_ms: default_render_interval(),
            battle_anim_ms: default_battle_anim(),
            typing_rate_limit_ms: default_rate_limit(),
            autosave: default_autosave(),
            seed: None,
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
            render_interval_ms: toml_cfg.general.render_interval_ms,
            battle_anim_ms: toml_cfg.general.battle_anim_ms,
            typing_rate_limit_ms: toml_cfg.general.typing_rate_limit_ms,
            autosave: toml_cfg.general.autosave,
            seed: toml_cfg.general.seed,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config.
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
    fn empty_toml_gives_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.general.render_interval_ms, 1000);
        assert_eq!(cfg.general.typing_rate_limit_ms, 200);
        assert!(cfg.general.autosave);
        assert_eq!(cfg.general.seed, None);
    }

    #[test]
    fn partial_toml_fills_missing_keys() {
        let cfg: TomlConfig = toml::from_str(
            "[general]\nrender_interval_ms = 250\nseed = 42\n",
        ).unwrap();
        assert_eq!(cfg.general.render_interval_ms, 250);
        assert_eq!(cfg.general.seed, Some(42));
        assert_eq!(cfg.general.battle_anim_ms, 500);
    }
}

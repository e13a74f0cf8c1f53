/// Save and load character progress.
///
/// ## File format:
///   Versioned key-value lines (`version=1` header). Character fields,
///   an optional `monster=` line for a mid-battle save, then scorer
///   fields. Parsing is tolerant: every missing or malformed field falls
///   back to its default, never rejecting the whole file.
///
/// Autosaved to save.dat after every scoring update.

use std::path::PathBuf;

use crate::domain::character::Character;
use crate::domain::monster::Monster;
use crate::domain::scorer::ExperienceScorer;

pub const SAVE_VERSION: u32 = 1;
const SAVE_FILE: &str = "save.dat";

/// Everything one session persists: character + scorer snapshots.
#[derive(Clone, Debug)]
pub struct SaveData {
    pub character: CharacterSnapshot,
    pub scorer: ScorerSnapshot,
}

/// Flat snapshot of every public-facing character field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterSnapshot {
    pub level: u32,
    pub experience: u32,
    pub combo: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub pos_x: u32,
    pub anim_frame: u32,
    pub in_battle: bool,
    pub monster: Option<MonsterSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonsterSnapshot {
    pub name: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScorerSnapshot {
    pub combo_level: u32,
    pub last_typing_ms: u64,
    pub consecutive: u32,
    pub perfect_streak: u32,
}

// ══════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════

fn save_dir() -> PathBuf {
    // 1. Try exe directory (works for local/portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // Check if writable (system installs like /usr/games/ won't be)
            let test_path = parent.join(".write_test_keyquest");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home (~/.local/share/keyquest) for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/keyquest");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. Fallback to CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn save_path() -> PathBuf {
    save_dir().join(SAVE_FILE)
}

// ══════════════════════════════════════════════════════════════
// Snapshot capture / restore
// ══════════════════════════════════════════════════════════════

pub fn capture_character(c: &Character) -> CharacterSnapshot {
    CharacterSnapshot {
        level: c.level(),
        experience: c.experience(),
        combo: c.combo(),
        hp: c.hp(),
        max_hp: c.max_hp(),
        mp: c.mp(),
        max_mp: c.max_mp(),
        pos_x: c.pos_x(),
        anim_frame: c.anim_frame(),
        in_battle: c.in_battle(),
        monster: c.monster().map(|m| MonsterSnapshot {
            name: m.name.clone(),
            level: m.level,
            hp: m.hp,
            max_hp: m.max_hp,
        }),
    }
}

pub fn restore_character(snap: &CharacterSnapshot) -> Character {
    let monster = snap.monster.as_ref().map(|m| {
        Monster::from_parts(m.name.clone(), m.level, m.hp, m.max_hp)
    });
    Character::from_parts(
        snap.level, snap.experience, snap.combo,
        snap.hp, snap.max_hp, snap.mp, snap.max_mp,
        snap.pos_x, snap.anim_frame,
        snap.in_battle, monster,
    )
}

pub fn capture_scorer(s: &ExperienceScorer) -> ScorerSnapshot {
    ScorerSnapshot {
        combo_level: s.combo_level(),
        last_typing_ms: s.last_typing_ms,
        consecutive: s.consecutive(),
        perfect_streak: s.perfect_streak(),
    }
}

pub fn restore_scorer(snap: &ScorerSnapshot) -> ExperienceScorer {
    ExperienceScorer::from_parts(
        snap.combo_level,
        snap.last_typing_ms,
        snap.consecutive,
        snap.perfect_streak,
    )
}

// ══════════════════════════════════════════════════════════════
// File operations
// ══════════════════════════════════════════════════════════════

pub fn save_game(data: &SaveData) -> Result<(), String> {
    let content = serialize(data);
    std::fs::write(save_path(), content)
        .map_err(|e| format!("Save failed: {}", e))
}

pub fn load_save() -> Option<SaveData> {
    let candidates = [save_path(), PathBuf::from(SAVE_FILE)];
    for path in &candidates {
        if let Ok(content) = std::fs::read_to_string(path) {
            return Some(parse_save(&content));
        }
    }
    None
}

pub fn delete_save() {
    let _ = std::fs::remove_file(save_path());
    let _ = std::fs::remove_file(SAVE_FILE);
}

// ══════════════════════════════════════════════════════════════
// Serialization
// ══════════════════════════════════════════════════════════════

pub fn serialize(data: &SaveData) -> String {
    let mut out = String::with_capacity(512);
    out.push_str(&format!("version={}\n", SAVE_VERSION));

    let c = &data.character;
    out.push_str(&format!("level={}\n", c.level));
    out.push_str(&format!("experience={}\n", c.experience));
    out.push_str(&format!("combo={}\n", c.combo));
    out.push_str(&format!("hp={}\n", c.hp));
    out.push_str(&format!("max_hp={}\n", c.max_hp));
    out.push_str(&format!("mp={}\n", c.mp));
    out.push_str(&format!("max_mp={}\n", c.max_mp));
    out.push_str(&format!("pos_x={}\n", c.pos_x));
    out.push_str(&format!("anim_frame={}\n", c.anim_frame));
    out.push_str(&format!("in_battle={}\n", if c.in_battle { 1 } else { 0 }));
    if let Some(m) = &c.monster {
        out.push_str(&format!("monster={},{},{},{}\n", m.name, m.level, m.hp, m.max_hp));
    }

    let s = &data.scorer;
    out.push_str(&format!("combo_level={}\n", s.combo_level));
    out.push_str(&format!("last_typing_ms={}\n", s.last_typing_ms));
    out.push_str(&format!("consecutive={}\n", s.consecutive));
    out.push_str(&format!("perfect_streak={}\n", s.perfect_streak));

    out
}

// ══════════════════════════════════════════════════════════════
// Parsing
// ══════════════════════════════════════════════════════════════

/// Field-by-field tolerant parse: anything missing or malformed keeps
/// its default.
pub fn parse_save(content: &str) -> SaveData {
    let mut character = CharacterSnapshot {
        level: 1,
        experience: 0,
        combo: 1,
        hp: 100,
        max_hp: 100,
        mp: 50,
        max_mp: 50,
        pos_x: 5,
        anim_frame: 0,
        in_battle: false,
        monster: None,
    };
    let mut scorer = ScorerSnapshot {
        combo_level: 1,
        last_typing_ms: 0,
        consecutive: 0,
        perfect_streak: 0,
    };

    for line in content.lines() {
        let line = line.trim();

        if let Some(val) = line.strip_prefix("level=") {
            if let Ok(v) = val.parse() { character.level = v; }
        } else if let Some(val) = line.strip_prefix("experience=") {
            if let Ok(v) = val.parse() { character.experience = v; }
        } else if let Some(val) = line.strip_prefix("combo=") {
            if let Ok(v) = val.parse() { character.combo = v; }
        } else if let Some(val) = line.strip_prefix("hp=") {
            if let Ok(v) = val.parse() { character.hp = v; }
        } else if let Some(val) = line.strip_prefix("max_hp=") {
            if let Ok(v) = val.parse() { character.max_hp = v; }
        } else if let Some(val) = line.strip_prefix("mp=") {
            if let Ok(v) = val.parse() { character.mp = v; }
        } else if let Some(val) = line.strip_prefix("max_mp=") {
            if let Ok(v) = val.parse() { character.max_mp = v; }
        } else if let Some(val) = line.strip_prefix("pos_x=") {
            if let Ok(v) = val.parse() { character.pos_x = v; }
        } else if let Some(val) = line.strip_prefix("anim_frame=") {
            if let Ok(v) = val.parse() { character.anim_frame = v; }
        } else if let Some(val) = line.strip_prefix("in_battle=") {
            character.in_battle = val == "1";
        } else if let Some(val) = line.strip_prefix("monster=") {
            character.monster = parse_monster(val);
        } else if let Some(val) = line.strip_prefix("combo_level=") {
            if let Ok(v) = val.parse() { scorer.combo_level = v; }
        } else if let Some(val) = line.strip_prefix("last_typing_ms=") {
            if let Ok(v) = val.parse() { scorer.last_typing_ms = v; }
        } else if let Some(val) = line.strip_prefix("consecutive=") {
            if let Ok(v) = val.parse() { scorer.consecutive = v; }
        } else if let Some(val) = line.strip_prefix("perfect_streak=") {
            if let Ok(v) = val.parse() { scorer.perfect_streak = v; }
        }
        // unknown keys (and version=) are skipped: forward-tolerant
    }

    SaveData { character, scorer }
}

fn parse_monster(val: &str) -> Option<MonsterSnapshot> {
    let p: Vec<&str> = val.split(',').collect();
    if p.len() < 4 { return None; }
    Some(MonsterSnapshot {
        name: p[0].trim().to_string(),
        level: p[1].trim().parse().ok()?,
        hp: p[2].trim().parse().ok()?,
        max_hp: p[3].trim().parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample() -> SaveData {
        SaveData {
            character: CharacterSnapshot {
                level: 7,
                experience: 123,
                combo: 3,
                hp: 88,
                max_hp: 240,
                mp: 12,
                max_mp: 95,
                pos_x: 6,
                anim_frame: 2,
                in_battle: true,
                monster: Some(MonsterSnapshot {
                    name: "Dragon".to_string(),
                    level: 9,
                    hp: 310,
                    max_hp: 465,
                }),
            },
            scorer: ScorerSnapshot {
                combo_level: 4,
                last_typing_ms: 1_699_999_999_000,
                consecutive: 23,
                perfect_streak: 3,
            },
        }
    }

    #[test]
    fn round_trip() {
        let data = sample();
        let parsed = parse_save(&serialize(&data));
        assert_eq!(parsed.character, data.character);
        assert_eq!(parsed.scorer, data.scorer);
    }

    #[test]
    fn character_round_trip_through_restore() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut c = crate::domain::character::Character::new();
        c.add_experience(300, &mut rng);
        c.set_combo(4);
        let snap = capture_character(&c);
        let restored = restore_character(&snap);
        assert_eq!(capture_character(&restored), snap);
    }

    #[test]
    fn scorer_round_trip_through_restore() {
        let mut s = crate::domain::scorer::ExperienceScorer::new();
        s.process_typing(5, 1_000);
        s.process_typing(5, 1_400);
        let snap = capture_scorer(&s);
        let restored = restore_scorer(&snap);
        assert_eq!(capture_scorer(&restored), snap);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let data = parse_save("");
        assert_eq!(data.character.level, 1);
        assert_eq!(data.character.hp, 100);
        assert_eq!(data.character.monster, None);
        assert_eq!(data.scorer.combo_level, 1);
    }

    #[test]
    fn partial_and_malformed_fields_fall_back() {
        let data = parse_save("level=9\nhp=banana\nmax_mp=70\nnot a line\nconsecutive=8\n");
        assert_eq!(data.character.level, 9);
        assert_eq!(data.character.hp, 100);   // malformed → default
        assert_eq!(data.character.max_mp, 70);
        assert_eq!(data.scorer.consecutive, 8);
    }

    #[test]
    fn battle_flag_without_monster_restores_out_of_battle() {
        let data = parse_save("level=3\nin_battle=1\n");
        assert!(data.character.in_battle);
        let c = restore_character(&data.character);
        assert!(!c.in_battle());
        assert!(c.monster().is_none());
    }

    #[test]
    fn monster_line_restores_battle() {
        let data = parse_save("in_battle=1\nmonster=Wolf,2,40,115\n");
        let c = restore_character(&data.character);
        assert!(c.in_battle());
        let m = c.monster().unwrap();
        assert_eq!(m.name, "Wolf");
        assert_eq!(m.hp, 40);
        assert_eq!(m.emoji(), "🐺");
    }
}

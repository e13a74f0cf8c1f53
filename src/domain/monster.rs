/// Monsters: generated opponents scaled to the character's level.
/// A monster is owned by the character that spawned it and lives only
/// for the duration of one battle.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Fixed species table. `offset` is relative to the character's level;
/// the spawned level is floored at 1.
#[derive(Clone, Copy, Debug)]
pub struct Species {
    pub name: &'static str,
    pub emoji: &'static str,
    pub offset: i32,
}

pub const SPECIES: &[Species] = &[
    Species { name: "Wolf",   emoji: "🐺", offset: -2 },
    Species { name: "Bear",   emoji: "🐻", offset: -1 },
    Species { name: "Dragon", emoji: "🐲", offset: 2 },
    Species { name: "Orc",    emoji: "👹", offset: 0 },
    Species { name: "Spider", emoji: "🕷️", offset: -3 },
    Species { name: "Bat",    emoji: "🦇", offset: -4 },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Monster {
    pub name: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
}

impl Monster {
    /// Spawn a random species scaled to `char_level`.
    pub fn spawn(char_level: u32, rng: &mut ChaCha8Rng) -> Self {
        let species = SPECIES[rng.gen_range(0..SPECIES.len())];
        let level = (char_level as i32 + species.offset).max(1) as u32;
        Monster::with_species(species.name, level, rng)
    }

    /// Spawn a named species at an explicit level.
    pub fn with_species(name: &str, level: u32, rng: &mut ChaCha8Rng) -> Self {
        let max_hp = level * 50 + rng.gen_range(0..30);
        Monster {
            name: name.to_string(),
            level,
            hp: max_hp,
            max_hp,
        }
    }

    /// Reconstruct from persisted fields (snapshot restore).
    pub fn from_parts(name: String, level: u32, hp: u32, max_hp: u32) -> Self {
        Monster {
            name,
            level: level.max(1),
            hp: hp.min(max_hp),
            max_hp,
        }
    }

    pub fn take_damage(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Emoji by species name; unknown names get a generic foe glyph.
    pub fn emoji(&self) -> &'static str {
        SPECIES.iter()
            .find(|s| self.name.contains(s.name))
            .map(|s| s.emoji)
            .unwrap_or("👾")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn spawn_level_floors_at_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..50 {
            let m = Monster::spawn(1, &mut rng);
            assert!(m.level >= 1);
            assert!(m.max_hp >= m.level * 50);
            assert!(m.max_hp < m.level * 50 + 30);
            assert_eq!(m.hp, m.max_hp);
        }
    }

    #[test]
    fn spawn_is_reproducible_under_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(Monster::spawn(10, &mut a), Monster::spawn(10, &mut b));
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut m = Monster::with_species("Wolf", 2, &mut rng);
        m.take_damage(m.max_hp + 1000);
        assert_eq!(m.hp, 0);
        assert!(m.is_defeated());
    }

    #[test]
    fn emoji_by_species() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(Monster::with_species("Dragon", 3, &mut rng).emoji(), "🐲");
        assert_eq!(Monster::with_species("Slime", 3, &mut rng).emoji(), "👾");
    }
}

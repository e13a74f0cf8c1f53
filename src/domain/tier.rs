/// Level tiers and level-derived attributes.
/// All lookups are pure functions of level, centralized here so the
/// renderer and the character never hardcode thresholds.

/// A contiguous level range sharing a title and emoji.
/// `max_exp == None` means the final, unbounded tier.
#[derive(Clone, Copy, Debug)]
pub struct LevelTier {
    pub level: u32,
    pub min_exp: u32,
    pub max_exp: Option<u32>,
    pub title: &'static str,
    pub emoji: &'static str,
}

/// Ascending by level. Exp ranges are contiguous: each tier's max_exp + 1
/// equals the next tier's min_exp (checked by test below).
pub const TIERS: &[LevelTier] = &[
    LevelTier { level: 1,  min_exp: 0,    max_exp: Some(99),   title: "Novice",             emoji: "⚔️" },
    LevelTier { level: 5,  min_exp: 100,  max_exp: Some(499),  title: "Apprentice Warrior", emoji: "🛡️" },
    LevelTier { level: 15, min_exp: 500,  max_exp: Some(1499), title: "Knight",             emoji: "🏰" },
    LevelTier { level: 30, min_exp: 1500, max_exp: Some(2999), title: "Legendary Warrior",  emoji: "👑" },
    LevelTier { level: 50, min_exp: 3000, max_exp: None,       title: "Key Quest Master",   emoji: "💎" },
];

impl LevelTier {
    /// Human-readable lifetime-exp band, for the status command.
    pub fn exp_range(&self) -> String {
        match self.max_exp {
            Some(max) => format!("{}-{}", self.min_exp, max),
            None => format!("{}+", self.min_exp),
        }
    }
}

/// Tier for a given level: highest tier whose level bound is <= level.
/// Levels below the first bound fall back to the first tier, so the
/// lookup is total for every level >= 1.
pub fn tier_for(level: u32) -> &'static LevelTier {
    TIERS.iter().rev()
        .find(|t| t.level <= level)
        .unwrap_or(&TIERS[0])
}

/// Display title by level threshold.
pub fn title_for(level: u32) -> &'static str {
    if level >= 50 { "Legendary Hero" }
    else if level >= 30 { "Dragon Slayer" }
    else if level >= 20 { "Spellblade" }
    else if level >= 15 { "Knight" }
    else if level >= 10 { "Warrior" }
    else if level >= 5 { "Apprentice Warrior" }
    else { "Novice" }
}

/// Equipped weapon by level threshold.
pub fn weapon_for(level: u32) -> &'static str {
    if level >= 30 { "🗡️ Dragon Sword" }
    else if level >= 20 { "⚔️ Magic Sword" }
    else if level >= 15 { "🗡️ Knight's Sword" }
    else if level >= 10 { "⚔️ Steel Sword" }
    else if level >= 5 { "🗡️ Iron Sword" }
    else { "🔪 Wooden Sword" }
}

/// Aura glyph shown beside the idle character. Empty below level 5.
pub fn aura_for(level: u32) -> &'static str {
    if level >= 30 { "✧" }
    else if level >= 15 { "★" }
    else if level >= 5 { "·" }
    else { "" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_contiguous() {
        for pair in TIERS.windows(2) {
            let max = pair[0].max_exp.expect("only the last tier is unbounded");
            assert_eq!(max + 1, pair[1].min_exp);
            assert!(pair[0].level < pair[1].level);
        }
        assert!(TIERS.last().unwrap().max_exp.is_none());
    }

    #[test]
    fn lookups_are_total() {
        for level in 1..=120 {
            assert!(!title_for(level).is_empty());
            assert!(!weapon_for(level).is_empty());
            let tier = tier_for(level);
            assert!(tier.level <= level || tier.level == 1);
        }
    }

    #[test]
    fn title_thresholds() {
        assert_eq!(title_for(1), "Novice");
        assert_eq!(title_for(4), "Novice");
        assert_eq!(title_for(5), "Apprentice Warrior");
        assert_eq!(title_for(15), "Knight");
        assert_eq!(title_for(49), "Dragon Slayer");
        assert_eq!(title_for(50), "Legendary Hero");
    }

    #[test]
    fn weapon_thresholds() {
        assert_eq!(weapon_for(1), "🔪 Wooden Sword");
        assert_eq!(weapon_for(10), "⚔️ Steel Sword");
        assert_eq!(weapon_for(30), "🗡️ Dragon Sword");
        assert_eq!(weapon_for(99), "🗡️ Dragon Sword");
    }
}

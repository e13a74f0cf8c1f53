/// Celebration animation sequences.
///
/// Each builder is a pure function returning an ordered, finite list of
/// frames; the host loop plays them with its own timer. No randomness
/// and no clock in here, so every sequence is replayable byte-for-byte.

/// One animation frame: full panel content plus how long to show it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimFrame {
    pub content: String,
    pub duration_ms: u64,
}

const FRAME_WIDTH: usize = 50;

/// Level-up celebration: explosion → level announcement → title reveal
/// → sparkle outro.
pub fn level_up_sequence(old_level: u32, new_level: u32, new_title: &str) -> Vec<AnimFrame> {
    vec![
        AnimFrame { content: explosion_frame(), duration_ms: 600 },
        AnimFrame { content: announcement_frame(old_level, new_level), duration_ms: 800 },
        AnimFrame { content: title_frame(new_title), duration_ms: 800 },
        AnimFrame { content: sparkle_frame(), duration_ms: 600 },
    ]
}

/// Short combo flash, only for combo >= 2.
pub fn combo_flash(combo_level: u32) -> Vec<AnimFrame> {
    if combo_level < 2 {
        return vec![];
    }
    let bolts = "⚡".repeat(combo_level.min(5) as usize);
    let mut content = rule_line();
    content.push_str(&center(&format!("🔥 COMBO x{} {} Keep typing! 🔥", combo_level, bolts)));
    content.push('\n');
    content.push_str(&rule_line());
    vec![AnimFrame { content, duration_ms: 400 }]
}

// ── Frame builders ──

/// Deterministic burst pattern: the scatter comes from a fixed hash of
/// the cell coordinates, not an RNG.
fn explosion_frame() -> String {
    const CHARS: [char; 5] = ['*', '+', 'x', 'o', '#'];
    let mut out = String::new();
    for y in 0..12usize {
        let mut line = String::new();
        for x in 0..FRAME_WIDTH {
            if y == 0 || y == 11 {
                line.push('=');
            } else {
                let h = x.wrapping_mul(31).wrapping_add(y.wrapping_mul(17));
                if h % 7 < 2 {
                    line.push(CHARS[h % CHARS.len()]);
                } else {
                    line.push(' ');
                }
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn announcement_frame(old_level: u32, new_level: u32) -> String {
    let mut out = rule_line();
    out.push('\n');
    out.push_str(&center("🎉 LEVEL UP! 🎉"));
    out.push('\n');
    out.push_str(&center(&format!("Level {} → {}", old_level, new_level)));
    out.push('\n');
    out.push_str(&center("⚔️ ⭐ ⚔️"));
    out.push('\n');
    out.push_str(&rule_line());
    out
}

fn title_frame(title: &str) -> String {
    let mut out = rule_line();
    out.push('\n');
    out.push_str(&center("👑 NEW TITLE 👑"));
    out.push('\n');
    out.push_str(&center(&"─".repeat(20)));
    out.push('\n');
    out.push_str(&center(title));
    out.push('\n');
    out.push_str(&center("🌟 🏆 🌟"));
    out.push('\n');
    out.push_str(&rule_line());
    out
}

fn sparkle_frame() -> String {
    let mut out = rule_line();
    out.push('\n');
    out.push_str(&center("✨🗡️ LEVEL UP COMPLETE 🗡️✨"));
    out.push('\n');
    out.push_str(&center("Keep typing to grow stronger!"));
    out.push('\n');
    out.push_str(&rule_line());
    out
}

// ── Layout helpers ──

fn rule_line() -> String {
    "─".repeat(FRAME_WIDTH)
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= FRAME_WIDTH {
        return text.to_string();
    }
    let pad = (FRAME_WIDTH - len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_up_sequence_is_finite_and_ordered() {
        let frames = level_up_sequence(3, 4, "Novice");
        assert_eq!(frames.len(), 4);
        assert!(frames.iter().all(|f| f.duration_ms > 0));
        assert!(frames.iter().all(|f| !f.content.is_empty()));
        assert!(frames[1].content.contains("Level 3 → 4"));
        assert!(frames[2].content.contains("Novice"));
    }

    #[test]
    fn sequences_are_replayable() {
        assert_eq!(level_up_sequence(9, 10, "Warrior"), level_up_sequence(9, 10, "Warrior"));
        assert_eq!(combo_flash(4), combo_flash(4));
    }

    #[test]
    fn combo_flash_only_from_level_two() {
        assert!(combo_flash(1).is_empty());
        let frames = combo_flash(3);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].content.contains("COMBO x3"));
    }

    #[test]
    fn combo_bolts_cap_at_five() {
        let frames = combo_flash(8);
        assert_eq!(frames[0].content.matches('⚡').count(), 5);
    }
}

/// Experience/combo scorer: converts typing events into experience awards.
///
/// The combo is a time-decaying multiplier on earned experience:
///   - Each event within COMBO_TIMEOUT_MS of the previous one raises the
///     combo level (capped at the multiplier table length).
///   - Events arriving within PERFECT_WINDOW_MS extend a "perfect streak";
///     a streak of 5+ grants a flat ×1.5 bonus.
///   - Every 10th consecutive event adds a milestone bonus.
///   - A gap longer than the timeout resets everything to base.
///
/// The clock is always passed in as epoch milliseconds — the scorer never
/// reads time itself, so every outcome is reproducible under test.

/// Combo window: events further apart than this break the combo.
pub const COMBO_TIMEOUT_MS: u64 = 3000;
/// Tighter window that sustains a perfect streak.
pub const PERFECT_WINDOW_MS: u64 = 1000;
/// Multiplier per combo level (index = level - 1).
pub const COMBO_MULTIPLIERS: &[f64] = &[1.0, 1.2, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0];
/// Perfect streak length that activates the streak bonus.
pub const PERFECT_STREAK_BONUS_AT: u32 = 5;
/// Flat bonus granted every MILESTONE_EVERY consecutive events.
pub const MILESTONE_EVERY: u32 = 10;
pub const MILESTONE_BONUS: u32 = 5;

#[derive(Clone, Debug)]
pub struct ExperienceScorer {
    /// Epoch ms of the last typing event; 0 = no prior event.
    pub last_typing_ms: u64,
    /// Current combo level, always in 1..=COMBO_MULTIPLIERS.len().
    combo_level: u32,
    /// Events in the current unbroken chain (including the first).
    consecutive: u32,
    /// Consecutive events inside the perfect window.
    perfect_streak: u32,
}

/// Summary for the render layer.
#[derive(Clone, Copy, Debug)]
pub struct ComboStatus {
    pub level: u32,
    pub multiplier: f64,
    pub active: bool,
    pub remaining_ms: u64,
    pub consecutive: u32,
    pub perfect_streak: u32,
}

impl ExperienceScorer {
    pub fn new() -> Self {
        ExperienceScorer {
            last_typing_ms: 0,
            combo_level: 1,
            consecutive: 0,
            perfect_streak: 0,
        }
    }

    /// Process one typing event of `chars` characters at time `now_ms`.
    /// Returns the experience gained, always >= 1.
    pub fn process_typing(&mut self, chars: u32, now_ms: u64) -> u32 {
        let elapsed = now_ms.saturating_sub(self.last_typing_ms);

        if self.last_typing_ms > 0 && elapsed <= COMBO_TIMEOUT_MS {
            self.combo_level = (self.combo_level + 1).min(COMBO_MULTIPLIERS.len() as u32);
            self.consecutive += 1;
            if elapsed < PERFECT_WINDOW_MS {
                self.perfect_streak += 1;
            } else {
                self.perfect_streak = 0;
            }
        } else {
            self.combo_level = 1;
            self.consecutive = 1;
            self.perfect_streak = 0;
        }
        self.last_typing_ms = now_ms;

        let mut exp = (chars as f64 * self.multiplier()).floor() as u32;
        if self.perfect_streak >= PERFECT_STREAK_BONUS_AT {
            exp = (exp as f64 * 1.5).floor() as u32;
        }
        if self.consecutive > 0 && self.consecutive % MILESTONE_EVERY == 0 {
            exp += MILESTONE_BONUS;
        }
        exp.max(1)
    }

    pub fn combo_level(&self) -> u32 {
        self.combo_level
    }

    /// Multiplier for the current combo level. The level is clamped into
    /// the table, so this is total.
    pub fn multiplier(&self) -> f64 {
        let idx = (self.combo_level.max(1) as usize - 1).min(COMBO_MULTIPLIERS.len() - 1);
        COMBO_MULTIPLIERS[idx]
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn perfect_streak(&self) -> u32 {
        self.perfect_streak
    }

    /// Is the combo still alive at `now_ms`?
    pub fn is_combo_active(&self, now_ms: u64) -> bool {
        self.last_typing_ms > 0
            && now_ms.saturating_sub(self.last_typing_ms) <= COMBO_TIMEOUT_MS
    }

    /// Milliseconds until the combo decays; 0 when already inactive.
    pub fn time_remaining(&self, now_ms: u64) -> u64 {
        if !self.is_combo_active(now_ms) { return 0; }
        COMBO_TIMEOUT_MS - now_ms.saturating_sub(self.last_typing_ms)
    }

    /// Force the combo back to base. Idempotent.
    pub fn break_combo(&mut self) {
        self.combo_level = 1;
        self.last_typing_ms = 0;
    }

    pub fn reset(&mut self) {
        *self = ExperienceScorer::new();
    }

    pub fn status(&self, now_ms: u64) -> ComboStatus {
        ComboStatus {
            level: self.combo_level,
            multiplier: self.multiplier(),
            active: self.is_combo_active(now_ms),
            remaining_ms: self.time_remaining(now_ms),
            consecutive: self.consecutive,
            perfect_streak: self.perfect_streak,
        }
    }

    /// Reconstruct from persisted fields (values clamped into range).
    pub fn from_parts(combo_level: u32, last_typing_ms: u64,
                      consecutive: u32, perfect_streak: u32) -> Self {
        ExperienceScorer {
            last_typing_ms,
            combo_level: combo_level.clamp(1, COMBO_MULTIPLIERS.len() as u32),
            consecutive,
            perfect_streak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_event_is_base_rate() {
        let mut s = ExperienceScorer::new();
        assert_eq!(s.process_typing(5, 1_000), 5);
        assert_eq!(s.combo_level(), 1);
        assert_eq!(s.consecutive(), 1);
    }

    #[test]
    fn rapid_typing_raises_combo() {
        let mut s = ExperienceScorer::new();
        s.process_typing(5, 0);
        let exp = s.process_typing(5, 500);
        assert_eq!(s.combo_level(), 2);
        assert!(exp > 5); // 5 * 1.2 = 6
        assert_eq!(exp, 6);
        assert_eq!(s.perfect_streak(), 1); // 500ms < perfect window
    }

    #[test]
    fn combo_caps_at_table_length() {
        let mut s = ExperienceScorer::new();
        for i in 0..20 {
            s.process_typing(1, i * 100);
            assert!(s.combo_level() >= 1);
            assert!(s.combo_level() <= COMBO_MULTIPLIERS.len() as u32);
        }
        assert_eq!(s.combo_level(), COMBO_MULTIPLIERS.len() as u32);
    }

    #[test]
    fn timeout_resets_combo() {
        let mut s = ExperienceScorer::new();
        s.process_typing(3, 0);
        s.process_typing(3, 1000);
        assert_eq!(s.combo_level(), 2);
        s.process_typing(3, 1000 + COMBO_TIMEOUT_MS + 1);
        assert_eq!(s.combo_level(), 1);
        assert_eq!(s.consecutive(), 1);
        assert_eq!(s.perfect_streak(), 0);
    }

    #[test]
    fn slow_event_inside_window_keeps_combo_but_drops_streak() {
        let mut s = ExperienceScorer::new();
        s.process_typing(1, 0);
        s.process_typing(1, 500);
        assert_eq!(s.perfect_streak(), 1);
        s.process_typing(1, 500 + 2000); // within combo window, outside perfect
        assert_eq!(s.combo_level(), 3);
        assert_eq!(s.perfect_streak(), 0);
    }

    #[test]
    fn perfect_streak_bonus() {
        let mut s = ExperienceScorer::new();
        // 6 events 100ms apart: after the 6th, streak = 5
        for i in 0..5 {
            s.process_typing(10, i * 100);
        }
        assert_eq!(s.perfect_streak(), 4);
        let exp = s.process_typing(10, 500);
        assert_eq!(s.perfect_streak(), 5);
        // combo level 6 → x3.0 → 30, then x1.5 streak bonus → 45
        assert_eq!(exp, 45);
    }

    #[test]
    fn milestone_bonus_every_tenth() {
        let mut s = ExperienceScorer::new();
        let mut awards = vec![];
        // space events 2s apart: combo grows but no perfect streak
        for i in 0..10 {
            awards.push(s.process_typing(1, i * 2000));
        }
        assert_eq!(s.consecutive(), 10);
        // 10th event: combo capped at 8 → floor(1*5.0)=5, +5 milestone
        assert_eq!(*awards.last().unwrap(), 10);
    }

    #[test]
    fn award_is_at_least_one() {
        let mut s = ExperienceScorer::new();
        assert!(s.process_typing(1, 0) >= 1);
        assert!(s.process_typing(1, 10_000_000) >= 1);
    }

    #[test]
    fn break_combo_is_idempotent() {
        let mut s = ExperienceScorer::new();
        s.process_typing(4, 0);
        s.process_typing(4, 100);
        s.break_combo();
        assert_eq!(s.combo_level(), 1);
        assert!(!s.is_combo_active(200));
        s.break_combo();
        assert_eq!(s.combo_level(), 1);
    }

    #[test]
    fn combo_activity_window() {
        let mut s = ExperienceScorer::new();
        assert!(!s.is_combo_active(0)); // fresh scorer: never active
        s.process_typing(2, 1000);
        assert!(s.is_combo_active(1000 + COMBO_TIMEOUT_MS));
        assert!(!s.is_combo_active(1001 + COMBO_TIMEOUT_MS));
        assert_eq!(s.time_remaining(2000), COMBO_TIMEOUT_MS - 1000);
    }
}

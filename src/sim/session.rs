/// Session: the explicit state object for one play session.
///
/// Owns one Character, one ExperienceScorer, and the seeded RNG every
/// random outcome flows through. No globals: the host loop constructs a
/// Session on start and drops it (or deactivates it) on stop.
///
/// Reentrancy: `handle_typing` holds a processing guard for the duration
/// of each update so side effects of the update (programmatic writes to
/// the output surface) can never re-enter the handler. Updates arriving
/// while the guard is held, or inside the rate-limit window, are dropped.

use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::character::Character;
use crate::domain::scorer::{ComboStatus, ExperienceScorer};
use crate::sim::event::GameEvent;
use crate::sim::save::{self, SaveData};

pub struct Session {
    pub character: Character,
    pub scorer: ExperienceScorer,
    rng: ChaCha8Rng,
    active: bool,
    /// Self-referential-event suppression; held during each update.
    processing: bool,
    /// Epoch ms of the last accepted typing update.
    last_update_ms: u64,
    /// Minimum gap between accepted typing updates.
    rate_limit_ms: u64,
    autosave: bool,
    pub needs_render: bool,
}

impl Session {
    pub fn new(seed: u64, rate_limit_ms: u64, autosave: bool) -> Self {
        Session {
            character: Character::new(),
            scorer: ExperienceScorer::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            active: false,
            processing: false,
            last_update_ms: 0,
            rate_limit_ms,
            autosave,
            needs_render: false,
        }
    }

    /// Restore persisted state into this session.
    pub fn load(&mut self, data: &SaveData) {
        self.character = save::restore_character(&data.character);
        self.scorer = save::restore_scorer(&data.scorer);
        self.needs_render = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&mut self, now_ms: u64) {
        self.active = true;
        self.processing = false;
        self.last_update_ms = now_ms;
        self.needs_render = true;
    }

    /// Deactivate. The host loop clears its frame queue and timers when
    /// it sees the session go inactive, so nothing leaks across
    /// stop/start cycles.
    pub fn stop(&mut self) {
        self.active = false;
        self.processing = false;
        // Pausing ends the chain; resuming starts a fresh combo.
        self.scorer.break_combo();
    }

    /// One typing event of `chars` characters. Returns the events the
    /// update produced; empty when the event was dropped (inactive,
    /// guard held, or rate-limited).
    pub fn handle_typing(&mut self, chars: u32, now_ms: u64) -> Vec<GameEvent> {
        if !self.active || self.processing || chars == 0 {
            return vec![];
        }
        if now_ms.saturating_sub(self.last_update_ms) < self.rate_limit_ms {
            return vec![];
        }

        self.processing = true;
        self.last_update_ms = now_ms;

        let exp = self.scorer.process_typing(chars, now_ms);
        self.character.set_combo(self.scorer.combo_level());

        let mut events = vec![GameEvent::ExpGained { amount: exp }];
        if self.scorer.perfect_streak() == crate::domain::scorer::PERFECT_STREAK_BONUS_AT {
            events.push(GameEvent::PerfectStreak { streak: self.scorer.perfect_streak() });
        }
        let consecutive = self.scorer.consecutive();
        if consecutive > 0 && consecutive % crate::domain::scorer::MILESTONE_EVERY == 0 {
            events.push(GameEvent::Milestone { consecutive });
        }
        events.extend(self.character.add_experience(exp, &mut self.rng));

        if self.autosave {
            let _ = save::save_game(&self.snapshot());
        }
        self.needs_render = true;

        self.processing = false;
        events
    }

    /// Attack command: only meaningful while a battle is running.
    pub fn attack(&mut self) -> (u32, Vec<GameEvent>) {
        if !self.active {
            return (0, vec![]);
        }
        let (damage, events) = self.character.attack(&mut self.rng);
        if damage > 0 {
            if self.autosave {
                let _ = save::save_game(&self.snapshot());
            }
            self.needs_render = true;
        }
        (damage, events)
    }

    /// Reset character and scorer to their initial defaults.
    pub fn reset(&mut self) {
        self.character.reset();
        self.scorer.reset();
        if self.autosave {
            let _ = save::save_game(&self.snapshot());
        }
        self.needs_render = true;
    }

    /// Cosmetic battle-animation tick. Safe to run from the timer path:
    /// only anim frame and battle position move.
    pub fn tick_animation(&mut self) {
        if !self.active { return; }
        self.character.advance_animation(&mut self.rng);
        if self.character.in_battle() {
            self.needs_render = true;
        }
    }

    pub fn combo_status(&self, now_ms: u64) -> ComboStatus {
        self.scorer.status(now_ms)
    }

    pub fn snapshot(&self) -> SaveData {
        SaveData {
            character: save::capture_character(&self.character),
            scorer: save::capture_scorer(&self.scorer),
        }
    }

    /// One-line status summary for the status command.
    pub fn status_line(&self) -> String {
        let c = &self.character;
        let next = match c.exp_to_next() {
            Some(n) => n.to_string(),
            None => "∞".to_string(),
        };
        format!(
            "Lv.{} {} | EXP {}/{} | HP {}/{} | MP {}/{} | Combo x{}",
            c.level(), c.title(), c.experience(), next,
            c.hp(), c.max_hp(), c.mp(), c.max_mp(), c.combo(),
        )
    }
}

/// Wall-clock epoch milliseconds, the timestamp fed to the scorer.
pub fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let mut s = Session::new(42, 200, false);
        s.start(0);
        s
    }

    #[test]
    fn typing_awards_experience() {
        let mut s = session();
        let events = s.handle_typing(5, 1_000);
        assert!(matches!(events[0], GameEvent::ExpGained { amount: 5 }));
        assert_eq!(s.character.experience(), 5);
        assert!(s.needs_render);
    }

    #[test]
    fn inactive_session_drops_events() {
        let mut s = Session::new(42, 200, false);
        assert!(s.handle_typing(5, 1_000).is_empty());
        assert_eq!(s.character.experience(), 0);
    }

    #[test]
    fn rate_limit_drops_bursts() {
        let mut s = session();
        s.handle_typing(5, 1_000);
        // 100ms later: inside the 200ms window, dropped
        assert!(s.handle_typing(5, 1_100).is_empty());
        assert_eq!(s.character.experience(), 5);
        // 250ms later: accepted
        assert!(!s.handle_typing(5, 1_250).is_empty());
    }

    #[test]
    fn combo_mirrors_onto_character() {
        let mut s = session();
        s.handle_typing(2, 1_000);
        s.handle_typing(2, 1_400);
        assert_eq!(s.character.combo(), s.scorer.combo_level());
        assert_eq!(s.character.combo(), 2);
    }

    #[test]
    fn fixed_seed_replays_identically() {
        let run = |seed| {
            let mut s = Session::new(seed, 0, false);
            s.start(0);
            for i in 1..=100u64 {
                s.handle_typing(3, i * 400);
                s.attack();
            }
            (
                s.character.level(),
                s.character.experience(),
                s.character.hp(),
                s.character.in_battle(),
            )
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn attack_outside_battle_returns_zero() {
        let mut s = session();
        let (damage, events) = s.attack();
        assert_eq!(damage, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn reset_clears_both_systems() {
        let mut s = session();
        s.handle_typing(50, 1_000);
        s.handle_typing(50, 1_400);
        s.reset();
        assert_eq!(s.character.experience(), 0);
        assert_eq!(s.character.level(), 1);
        assert_eq!(s.scorer.combo_level(), 1);
        assert_eq!(s.scorer.consecutive(), 0);
    }

    #[test]
    fn stop_deactivates_and_start_reactivates() {
        let mut s = session();
        s.stop();
        assert!(!s.is_active());
        assert!(s.handle_typing(5, 10_000).is_empty());
        s.start(10_000);
        assert!(!s.handle_typing(5, 10_300).is_empty());
    }

    #[test]
    fn snapshot_load_round_trip() {
        let mut s = session();
        for i in 1..=40u64 {
            s.handle_typing(4, i * 500);
        }
        let snap = s.snapshot();

        let mut restored = Session::new(99, 200, false);
        restored.load(&snap);
        assert_eq!(restored.snapshot().character, snap.character);
        assert_eq!(restored.snapshot().scorer, snap.scorer);
        assert_eq!(restored.status_line(), s.status_line());
    }
}

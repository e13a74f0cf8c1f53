/// Character state machine and battle resolver.
///
/// Processing model follows the rest of the engine: methods mutate state
/// and return the `GameEvent`s the update produced; the caller decides
/// what to show. All randomness comes through the caller's seeded RNG,
/// so full sessions replay under a fixed seed.
///
/// Level policy: rollover. `experience` is progress-within-level; each
/// level-up subtracts the current threshold and grants level-scaled
/// max-hp/mp bonuses with a full heal.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::domain::monster::Monster;
use crate::domain::tier;
use crate::sim::event::GameEvent;

pub const BASE_HP: u32 = 100;
pub const BASE_MP: u32 = 50;
/// Chance that a typing-driven exp award triggers an encounter.
pub const BATTLE_CHANCE: f64 = 0.10;
/// Chance that an attack lands critically (double damage).
pub const CRIT_CHANCE: f64 = 0.20;
/// Battle animation keeps the character's x inside this range.
pub const POS_MIN_X: u32 = 1;
pub const POS_MAX_X: u32 = 8;
/// No further rollover at or above this level.
pub const LEVEL_CAP: u32 = 50;

/// Idle/battle sprite frames, cycled by the animation tick.
const EMOJI_FRAMES: &[&str] = &["⚔️", "🗡️", "⚔️", "🛡️"];

#[derive(Clone, Debug)]
pub struct Character {
    level: u32,
    experience: u32,
    combo: u32,
    hp: u32,
    max_hp: u32,
    mp: u32,
    max_mp: u32,
    /// Horizontal battle-animation position, clamped to [POS_MIN_X, POS_MAX_X].
    pos_x: u32,
    anim_frame: u32,
    in_battle: bool,
    monster: Option<Monster>,
}

impl Character {
    pub fn new() -> Self {
        Character {
            level: 1,
            experience: 0,
            combo: 1,
            hp: BASE_HP,
            max_hp: BASE_HP,
            mp: BASE_MP,
            max_mp: BASE_MP,
            pos_x: 5,
            anim_frame: 0,
            in_battle: false,
            monster: None,
        }
    }

    // ── Read-only surface for the render layer ──

    pub fn level(&self) -> u32 { self.level }
    pub fn experience(&self) -> u32 { self.experience }
    pub fn combo(&self) -> u32 { self.combo }
    pub fn hp(&self) -> u32 { self.hp }
    pub fn max_hp(&self) -> u32 { self.max_hp }
    pub fn mp(&self) -> u32 { self.mp }
    pub fn max_mp(&self) -> u32 { self.max_mp }
    pub fn pos_x(&self) -> u32 { self.pos_x }
    pub fn anim_frame(&self) -> u32 { self.anim_frame }
    pub fn in_battle(&self) -> bool { self.in_battle }
    pub fn monster(&self) -> Option<&Monster> { self.monster.as_ref() }

    pub fn title(&self) -> &'static str {
        tier::title_for(self.level)
    }

    pub fn weapon(&self) -> &'static str {
        tier::weapon_for(self.level)
    }

    pub fn emoji(&self) -> &'static str {
        EMOJI_FRAMES[self.anim_frame as usize % EMOJI_FRAMES.len()]
    }

    /// Experience needed to finish the current level; None at the cap.
    pub fn exp_to_next(&self) -> Option<u32> {
        exp_threshold(self.level)
    }

    // ── Experience / levels ──

    /// Add experience and resolve level-ups. Outside battle, each award
    /// also rolls the random-encounter chance.
    pub fn add_experience(&mut self, amount: u32, rng: &mut ChaCha8Rng) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.experience += amount;
        self.update_level(rng, &mut events);

        if !self.in_battle && rng.gen_bool(BATTLE_CHANCE) {
            events.extend(self.start_battle(rng));
        }
        events
    }

    /// Rollover resolution: consume the per-level threshold repeatedly,
    /// granting bonuses on each level gained.
    fn update_level(&mut self, rng: &mut ChaCha8Rng, events: &mut Vec<GameEvent>) {
        let from = self.level;
        while let Some(threshold) = exp_threshold(self.level) {
            if self.experience < threshold { break; }
            self.experience -= threshold;
            self.level += 1;

            let hp_gain = self.level * 10 + rng.gen_range(0..20);
            let mp_gain = self.level * 5 + rng.gen_range(0..10);
            self.max_hp += hp_gain;
            self.max_mp += mp_gain;
            self.hp = self.max_hp;
            self.mp = self.max_mp;
        }
        if self.level > from {
            events.push(GameEvent::LevelUp { from, to: self.level });
        }
    }

    // ── HP / MP ──

    pub fn take_damage(&mut self, damage: u32) -> Vec<GameEvent> {
        self.hp = self.hp.saturating_sub(damage);
        if self.hp == 0 {
            self.die();
            return vec![GameEvent::CharacterDied];
        }
        vec![]
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    /// Spend mp; returns false (and changes nothing) when short.
    pub fn use_mp(&mut self, amount: u32) -> bool {
        if self.mp >= amount {
            self.mp -= amount;
            true
        } else {
            false
        }
    }

    pub fn restore_mp(&mut self, amount: u32) {
        self.mp = (self.mp + amount).min(self.max_mp);
    }

    /// Defeat is a soft reset: half hp/mp back, battle cleared.
    fn die(&mut self) {
        self.hp = self.max_hp / 2;
        self.mp = self.max_mp / 2;
        self.in_battle = false;
        self.monster = None;
    }

    // ── Battle ──

    /// Enter battle against a freshly generated monster. No-op if a
    /// battle is already running.
    pub fn start_battle(&mut self, rng: &mut ChaCha8Rng) -> Vec<GameEvent> {
        if self.in_battle { return vec![]; }
        let monster = Monster::spawn(self.level, rng);
        let name = monster.name.clone();
        self.monster = Some(monster);
        self.in_battle = true;
        vec![GameEvent::BattleStarted { monster: name }]
    }

    /// One synchronous attack exchange. Returns the damage dealt by the
    /// character (0 outside battle) plus the events of the exchange.
    pub fn attack(&mut self, rng: &mut ChaCha8Rng) -> (u32, Vec<GameEvent>) {
        if !self.in_battle {
            return (0, vec![]);
        }
        let Some(monster) = self.monster.as_mut() else {
            return (0, vec![]);
        };
        let mut events = Vec::new();

        let base = self.level * 10 + rng.gen_range(0..20);
        let crit = rng.gen_bool(CRIT_CHANCE);
        let damage = if crit { base * 2 } else { base };
        if crit {
            events.push(GameEvent::CriticalHit { damage });
        }

        monster.take_damage(damage);

        if monster.is_defeated() {
            let name = monster.name.clone();
            let exp = monster.level * 25;
            events.push(GameEvent::MonsterDefeated { monster: name, exp });
            // Award while still flagged in-battle so the exp cannot chain
            // into a new encounter, then clear the battle.
            events.extend(self.add_experience(exp, rng));
            self.in_battle = false;
            self.monster = None;
            self.heal(self.max_hp / 10);
            self.restore_mp(self.max_mp / 5);
        } else {
            let counter = monster.level * 5 + rng.gen_range(0..15);
            let name = monster.name.clone();
            events.push(GameEvent::MonsterCountered { monster: name, damage: counter });
            events.extend(self.take_damage(counter));
        }

        (damage, events)
    }

    // ── Cosmetic animation (never touches game-affecting state) ──

    pub fn advance_animation(&mut self, rng: &mut ChaCha8Rng) {
        self.anim_frame = (self.anim_frame + 1) % EMOJI_FRAMES.len() as u32;
        if self.in_battle {
            let step: i32 = if rng.gen_bool(0.5) { 1 } else { -1 };
            self.pos_x = (self.pos_x as i32 + step)
                .clamp(POS_MIN_X as i32, POS_MAX_X as i32) as u32;
        }
    }

    // ── Combo sync / reset ──

    /// The scorer owns the combo; the character mirrors it for display
    /// and persistence.
    pub fn set_combo(&mut self, combo: u32) {
        self.combo = combo.max(1);
    }

    pub fn reset(&mut self) {
        *self = Character::new();
    }

    /// Reconstruct from persisted fields, clamping everything back into
    /// its valid range. A battle flag without a monster is dropped.
    pub fn from_parts(
        level: u32, experience: u32, combo: u32,
        hp: u32, max_hp: u32, mp: u32, max_mp: u32,
        pos_x: u32, anim_frame: u32,
        in_battle: bool, monster: Option<Monster>,
    ) -> Self {
        let max_hp = max_hp.max(1);
        let max_mp = max_mp.max(1);
        Character {
            level: level.max(1),
            experience,
            combo: combo.max(1),
            hp: hp.min(max_hp),
            max_hp,
            mp: mp.min(max_mp),
            max_mp,
            pos_x: pos_x.clamp(POS_MIN_X, POS_MAX_X),
            anim_frame: anim_frame % EMOJI_FRAMES.len() as u32,
            in_battle: in_battle && monster.is_some(),
            monster,
        }
    }
}

/// Exp needed to complete `level`; None at or above the cap.
pub fn exp_threshold(level: u32) -> Option<u32> {
    if level >= LEVEL_CAP {
        None
    } else {
        Some(level * 100 + (level - 1) * 50)
    }
}

/// Events emitted by the engine during an update.
/// The presentation layer consumes these for messages and animation.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    ExpGained { amount: u32 },
    LevelUp { from: u32, to: u32 },
    BattleStarted { monster: String },
    CriticalHit { damage: u32 },
    MonsterCountered { monster: String, damage: u32 },
    MonsterDefeated { monster: String, exp: u32 },
    CharacterDied,
    PerfectStreak { streak: u32 },
    Milestone { consecutive: u32 },
}

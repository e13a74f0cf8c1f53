/// Entry point and game loop.
///
/// The loop is the host collaborator around the engine: it turns raw
/// keystrokes into typing events, ticks the render and battle-animation
/// timers, plays queued celebration frames, and maps command keys onto
/// session operations. All game state lives in the Session; the loop
/// only owns presentation state (frame queue, message timer).

mod config;
mod domain;
mod sim;
mod ui;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::tier;
use sim::event::GameEvent;
use sim::save;
use sim::session::{epoch_ms, Session};
use ui::animation::{self, AnimFrame};
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(10);
const MESSAGE_DURATION: Duration = Duration::from_secs(3);

fn main() {
    let config = GameConfig::load();

    let seed = config.seed.unwrap_or_else(epoch_ms);
    let mut session = Session::new(seed, config.typing_rate_limit_ms, config.autosave);
    if let Some(data) = save::load_save() {
        session.load(&data);
    }
    session.start(epoch_ms());

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut session, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Key Quest rests. {}", session.status_line());
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();

    let mut last_render = Instant::now();
    let mut last_anim = Instant::now();
    let render_interval = Duration::from_millis(config.render_interval_ms);
    let anim_interval = Duration::from_millis(config.battle_anim_ms);

    // Celebration playback: frames queued by events, played here.
    let mut frames: VecDeque<AnimFrame> = VecDeque::new();
    let mut frame_started = Instant::now();
    let mut frame_on_screen = false;

    let mut message = String::new();
    let mut message_until = Instant::now();

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }

        // ── Command keys ──

        if kb.was_pressed(KeyCode::Esc) {
            let _ = save::save_game(&session.snapshot());
            break;
        }

        if kb.was_pressed(KeyCode::F(1)) {
            if session.is_active() {
                session.stop();
                // Deterministic cancel: nothing queued survives a stop.
                frames.clear();
                frame_on_screen = false;
                renderer.invalidate();
                set_message(&mut message, &mut message_until, "💤 Key Quest is resting...  [F1] resume");
            } else {
                session.start(epoch_ms());
                set_message(&mut message, &mut message_until, "🗡️ Key Quest has awakened!");
            }
        }

        if kb.was_pressed(KeyCode::F(2)) && session.is_active() {
            save::delete_save();
            session.reset();
            set_message(&mut message, &mut message_until, "🔄 Reset to level 1!");
        }

        if kb.was_pressed(KeyCode::F(5)) && session.is_active() {
            let t = tier::tier_for(session.character.level());
            let combo = session.combo_status(epoch_ms());
            let line = format!(
                "{} | {} {} (exp {}) | chain {} perfect {}",
                session.status_line(),
                t.emoji, t.title, t.exp_range(),
                combo.consecutive, combo.perfect_streak,
            );
            set_message(&mut message, &mut message_until, &line);
        }

        if kb.was_pressed(KeyCode::Tab) && session.is_active() {
            if session.character.in_battle() {
                let (damage, events) = session.attack();
                if damage > 0 {
                    set_message(&mut message, &mut message_until,
                        &format!("⚔️ You strike for {} damage!", damage));
                }
                handle_events(&events, &mut frames, &mut message, &mut message_until);
            } else {
                set_message(&mut message, &mut message_until, "No battle in progress.");
            }
        }

        // ── Typing events ──

        let typed = kb.typed_chars();
        if typed > 0 {
            let events = session.handle_typing(typed, epoch_ms());
            handle_events(&events, &mut frames, &mut message, &mut message_until);
        }

        // ── Battle animation tick (cosmetic only) ──

        if last_anim.elapsed() >= anim_interval {
            session.tick_animation();
            last_anim = Instant::now();
        }

        // ── Message expiry ──

        if !message.is_empty() && Instant::now() >= message_until {
            message.clear();
            session.needs_render = true;
        }

        // ── Celebration frame playback ──

        if let Some(frame) = frames.front() {
            if !frame_on_screen {
                renderer.render_frame(&frame.content)?;
                frame_started = Instant::now();
                frame_on_screen = true;
            } else if frame_started.elapsed() >= Duration::from_millis(frame.duration_ms) {
                frames.pop_front();
                frame_on_screen = false;
                if frames.is_empty() {
                    renderer.invalidate();
                    session.needs_render = true;
                }
            }
        } else if session.needs_render || last_render.elapsed() >= render_interval {
            let combo = session.combo_status(epoch_ms());
            renderer.render(&session.character, &combo, &message)?;
            session.needs_render = false;
            last_render = Instant::now();
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Map engine events onto messages and queued celebration frames.
fn handle_events(
    events: &[GameEvent],
    frames: &mut VecDeque<AnimFrame>,
    message: &mut String,
    message_until: &mut Instant,
) {
    for event in events {
        match event {
            GameEvent::LevelUp { from, to } => {
                let title = tier::title_for(*to);
                frames.extend(animation::level_up_sequence(*from, *to, title));
            }
            GameEvent::BattleStarted { monster } => {
                set_message(message, message_until,
                    &format!("⚔️ A wild {} appears! [Tab] to attack!", monster));
            }
            GameEvent::CriticalHit { damage } => {
                set_message(message, message_until,
                    &format!("💥 Critical hit! {} damage!", damage));
            }
            GameEvent::MonsterCountered { monster, damage } => {
                set_message(message, message_until,
                    &format!("🐾 {} counters for {} damage!", monster, damage));
            }
            GameEvent::MonsterDefeated { monster, exp } => {
                set_message(message, message_until,
                    &format!("🎉 {} defeated! +{} EXP", monster, exp));
            }
            GameEvent::CharacterDied => {
                set_message(message, message_until,
                    "💀 You fell! Reviving at half strength...");
            }
            GameEvent::PerfectStreak { streak } => {
                set_message(message, message_until,
                    &format!("✨ Perfect streak x{}! Bonus EXP active!", streak));
            }
            GameEvent::Milestone { consecutive } => {
                frames.extend(animation::combo_flash((*consecutive / 10).clamp(2, 8)));
                set_message(message, message_until,
                    &format!("🏅 {} keystrokes in a row! +5 EXP", consecutive));
            }
            GameEvent::ExpGained { .. } => {}
        }
    }
}

fn set_message(message: &mut String, until: &mut Instant, text: &str) {
    *message = text.to_string();
    *until = Instant::now() + MESSAGE_DURATION;
}
